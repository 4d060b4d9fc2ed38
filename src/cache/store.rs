//! Cache Store Module
//!
//! TTL key-value store with lazy, read-triggered eviction.

use std::collections::HashMap;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::cache::{CacheCounters, CacheEntry, CacheStats};
use crate::clock::SharedClock;

// == Cache Store ==
/// In-memory TTL store.
///
/// Expired entries are only removed when a read touches them or when
/// `cleanup_expired` is called explicitly.
#[derive(Debug)]
pub struct CacheStore {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Hit/miss/expiry counters
    counters: CacheCounters,
    /// TTL applied when `set` gets none
    default_ttl: Duration,
    /// Time source
    clock: SharedClock,
}

impl CacheStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new(default_ttl: Duration, clock: SharedClock) -> Self {
        Self {
            entries: HashMap::new(),
            counters: CacheCounters::default(),
            default_ttl,
            clock,
        }
    }

    // == Set ==
    /// Inserts or overwrites `key`. Never fails.
    ///
    /// # Arguments
    /// * `key` - The key to store
    /// * `value` - The JSON payload
    /// * `ttl` - Lifetime, `None` uses the store default
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        let ttl_ms = ttl.unwrap_or(self.default_ttl).as_millis() as u64;
        let entry = CacheEntry::new(value, self.clock.now_ms(), ttl_ms);
        self.entries.insert(key.into(), entry);
    }

    // == Get ==
    /// Returns the value if present and unexpired.
    ///
    /// An expired entry is removed and reported as absent.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_with(key, |value| Some(value.clone()))
    }

    /// Like `get`, but hands the stored value to `read`.
    ///
    /// Counts a hit only when `read` returns `Some`; a value `read` rejects
    /// is a miss and stays stored.
    pub fn get_with<T>(
        &mut self,
        key: &str,
        read: impl FnOnce(&Value) -> Option<T>,
    ) -> Option<T> {
        let now = self.clock.now_ms();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired_at(now) => {
                debug!(key, age_ms = entry.age_ms(now), "cache entry expired");
                self.entries.remove(key);
                self.counters.record_expired(1);
                self.counters.record_miss();
                None
            }
            Some(entry) => match read(&entry.value) {
                Some(out) => {
                    self.counters.record_hit();
                    Some(out)
                }
                None => {
                    self.counters.record_miss();
                    None
                }
            },
            None => {
                self.counters.record_miss();
                None
            }
        }
    }

    // == Has ==
    /// Same as `get(key).is_some()`, including the eviction side effect.
    pub fn has(&mut self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Clear ==
    /// Removes `key`. Returns whether anything was removed.
    pub fn clear(&mut self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear All ==
    /// Empties the store.
    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    // == Stats ==
    /// Returns a diagnostic snapshot.
    pub fn get_stats(&self) -> CacheStats {
        CacheStats::new(self.entries.keys().cloned().collect(), self.counters)
    }

    // == Cleanup Expired ==
    /// Removes all expired entries, returning how many were dropped.
    pub fn cleanup_expired(&mut self) -> usize {
        let now = self.clock.now_ms();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();
        self.counters.record_expired(removed);
        removed
    }

    /// Default TTL for entries stored without one.
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Current time according to the store's clock.
    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    // == Length ==
    /// Returns the current number of entries in the store.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use serde_json::json;
    use std::sync::Arc;

    fn store_with_clock() -> (CacheStore, ManualClock) {
        let clock = ManualClock::new(1_000_000);
        let store = CacheStore::new(Duration::from_secs(300), Arc::new(clock.clone()));
        (store, clock)
    }

    #[test]
    fn test_store_new() {
        let (store, _) = store_with_clock();
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_set_and_get() {
        let (mut store, _) = store_with_clock();

        store.set("key1", json!("value1"), None);

        assert_eq!(store.get("key1"), Some(json!("value1")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let (mut store, _) = store_with_clock();
        assert!(store.get("nonexistent").is_none());
    }

    #[test]
    fn test_store_clear() {
        let (mut store, _) = store_with_clock();

        store.set("key1", json!(1), None);
        assert!(store.clear("key1"));

        assert!(store.is_empty());
        assert!(store.get("key1").is_none());
    }

    #[test]
    fn test_store_clear_nonexistent_is_noop() {
        let (mut store, _) = store_with_clock();
        assert!(!store.clear("nonexistent"));
    }

    #[test]
    fn test_store_clear_all() {
        let (mut store, _) = store_with_clock();
        store.set("a", json!(1), None);
        store.set("b", json!(2), None);

        store.clear_all();

        assert!(store.is_empty());
        assert!(!store.has("a"));
    }

    #[test]
    fn test_store_overwrite_resets_ttl() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", json!("value1"), Some(Duration::from_millis(1_000)));
        clock.advance(Duration::from_millis(800));
        store.set("key1", json!("value2"), Some(Duration::from_millis(1_000)));
        clock.advance(Duration::from_millis(800));

        assert_eq!(store.get("key1"), Some(json!("value2")));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_ttl_expiration_is_lazy() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", json!("value1"), Some(Duration::from_millis(1_000)));
        clock.advance(Duration::from_millis(1_001));

        // Still physically present until a read touches it
        assert_eq!(store.len(), 1);
        assert!(store.get("key1").is_none());
        assert_eq!(store.len(), 0);
        assert!(!store.has("key1"));
    }

    #[test]
    fn test_store_default_ttl_applies() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", json!(1), None);
        clock.advance(Duration::from_secs(300));
        assert!(store.has("key1"));

        clock.advance(Duration::from_millis(1));
        assert!(!store.has("key1"));
    }

    #[test]
    fn test_store_stats() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", json!(1), None);
        store.set("short", json!(2), Some(Duration::from_millis(10)));
        store.get("key1"); // hit
        store.get("nonexistent"); // miss
        clock.advance(Duration::from_millis(11));
        store.get("short"); // expired miss

        let stats = store.get_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.size, 1);
        assert_eq!(stats.keys, vec!["key1"]);
    }

    #[test]
    fn test_store_get_with_rejected_value_is_miss() {
        let (mut store, _) = store_with_clock();
        store.set("key1", json!("text"), None);

        assert_eq!(store.get_with("key1", |v| v.as_u64()), None);
        assert_eq!(store.get_with("key1", |v| v.as_str().map(str::len)), Some(4));

        let stats = store.get_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.size, 1);
    }

    #[test]
    fn test_store_cleanup_expired() {
        let (mut store, clock) = store_with_clock();

        store.set("key1", json!(1), Some(Duration::from_secs(1)));
        store.set("key2", json!(2), Some(Duration::from_secs(10)));
        clock.advance(Duration::from_millis(1_100));

        let removed = store.cleanup_expired();
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.has("key2"));
    }
}
