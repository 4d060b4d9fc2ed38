//! Backend Module
//!
//! Access to the remote job-portal REST API.
//!
//! # Endpoints consumed
//! - paginated job list (form-encoded `POST`)
//! - latest jobs (may require a session)
//! - occupation list
//! - course, institute and all-courses lookups

pub mod extract;
mod http;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{Job, Occupation};

pub use http::HttpBackend;

// == Portal Backend ==
/// The remote API as seen by the cache layer and the aggregator.
#[async_trait]
pub trait PortalBackend: Send + Sync {
    /// Fetches one page (1-based) of the job list.
    async fn job_page(&self, page: u32, per_page: u32) -> Result<Vec<Job>>;

    /// Fetches the "latest jobs" list.
    ///
    /// `Ok(None)` means the endpoint wants an authenticated session and the
    /// caller should skip it.
    async fn latest_jobs(&self) -> Result<Option<Vec<Job>>>;

    /// Fetches the occupation list.
    async fn occupations(&self) -> Result<Vec<Occupation>>;

    /// Fetches one course record.
    async fn course(&self, id: &str) -> Result<Value>;

    /// Fetches one institute record.
    async fn institute(&self, id: &str) -> Result<Value>;

    /// Fetches the full course catalogue.
    async fn all_courses(&self) -> Result<Value>;
}
