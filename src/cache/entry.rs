//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    /// The stored payload
    pub value: Value,
    /// Insertion timestamp (Unix milliseconds)
    pub stored_at: u64,
    /// Lifetime in milliseconds
    pub ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stored at `now_ms`.
    pub fn new(value: Value, now_ms: u64, ttl_ms: u64) -> Self {
        Self {
            value,
            stored_at: now_ms,
            ttl_ms,
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now_ms`.
    ///
    /// An entry stays valid while `now - stored_at <= ttl`, so it is still
    /// readable at exactly the TTL boundary and expired one millisecond later.
    pub fn is_expired_at(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.stored_at) > self.ttl_ms
    }

    /// Age of the entry in milliseconds.
    pub fn age_ms(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.stored_at)
    }
}
