//! Job Portal Cache - client-side caching and popular-search aggregation
//!
//! Sits between UI clients and a remote job-portal API: a TTL key/value cache
//! with a read-through helper, cache-backed resource handles, and a service
//! that mines job listings for trending search keywords.

pub mod api;
pub mod backend;
pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod popular;
pub mod resource;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use error::{PortalError, Result};
pub use tasks::spawn_cleanup_task;
