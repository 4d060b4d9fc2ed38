//! Domain records and HTTP DTOs
//!
//! Job-portal records read from the backend, popular-search output types,
//! and the request/response bodies of the HTTP API.

pub mod job;
pub mod popular;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use job::{Job, Occupation};
pub use popular::{Confidence, PopularCacheStatus, PopularSearchItem, SearchCategory};
pub use requests::{PopularQuery, RefreshQuery, SuggestionQuery, TrackSearchRequest};
pub use responses::{HealthResponse, MessageResponse, SuggestionsResponse};
