//! Cache Statistics Module
//!
//! Diagnostic view of the store: size, keys and hit/miss counters.

use serde::Serialize;

// == Cache Counters ==
/// Running counters kept by the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounters {
    /// Number of reads that returned a value
    pub hits: u64,
    /// Number of reads that found nothing (absent or expired)
    pub misses: u64,
    /// Number of entries dropped because they expired
    pub expired: u64,
}

impl CacheCounters {
    // == Record Hit ==
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expiry ==
    pub fn record_expired(&mut self, count: usize) {
        self.expired += count as u64;
    }
}

// == Cache Stats ==
/// Snapshot returned by `get_stats`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Current number of entries, including not-yet-evicted expired ones
    pub size: usize,
    /// Stored keys in sorted order
    pub keys: Vec<String>,
    pub hits: u64,
    pub misses: u64,
    pub expired: u64,
    /// hits / (hits + misses), 0.0 with no reads
    pub hit_rate: f64,
}

impl CacheStats {
    /// Builds a snapshot from keys and counters.
    pub fn new(mut keys: Vec<String>, counters: CacheCounters) -> Self {
        keys.sort();
        let total = counters.hits + counters.misses;
        let hit_rate = if total == 0 {
            0.0
        } else {
            counters.hits as f64 / total as f64
        };
        Self {
            size: keys.len(),
            keys,
            hits: counters.hits,
            misses: counters.misses,
            expired: counters.expired,
            hit_rate,
        }
    }
}
