//! Error types for the portal cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Portal Error Enum ==
/// Unified error type for the cache layer, backend client and HTTP surface.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Backend endpoint requires an authenticated session
    #[error("Authentication required: {0}")]
    AuthRequired(String),

    /// Transport-level failure talking to the backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered with a non-success status
    #[error("Backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    /// JSON encoding or decoding failed
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// A fetch result was discarded because its handle changed underneath it
    #[error("Fetch cancelled: {0}")]
    Cancelled(String),

    /// Local I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PortalError {
    /// HTTP status this error maps to.
    pub fn status_code(&self) -> StatusCode {
        match self {
            PortalError::NotFound(_) => StatusCode::NOT_FOUND,
            PortalError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            PortalError::AuthRequired(_) => StatusCode::UNAUTHORIZED,
            PortalError::Http(_) | PortalError::Backend { .. } => StatusCode::BAD_GATEWAY,
            PortalError::Cancelled(_) => StatusCode::SERVICE_UNAVAILABLE,
            PortalError::Decode(_) | PortalError::Io(_) | PortalError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for PortalError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the portal cache.
pub type Result<T> = std::result::Result<T, PortalError>;
