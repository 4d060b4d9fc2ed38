//! Cache Module
//!
//! In-memory TTL caching with lazy eviction and a read-through helper.

mod entry;
mod read_through;
mod service;
mod stats;
mod store;


// Re-export public types
pub use entry::CacheEntry;
pub use read_through::with_cache;
pub use service::CacheService;
pub use stats::{CacheCounters, CacheStats};
pub use store::CacheStore;
