//! Cache Service Module
//!
//! Shared, cloneable handle over a `CacheStore`.

use std::sync::Arc;
use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::{CacheStats, CacheStore};
use crate::clock::{system_clock, SharedClock};
use crate::error::Result;

// == Cache Service ==
/// Explicitly constructed cache handle.
///
/// Clones share one store. Independent instances never see each other's data.
#[derive(Debug, Clone)]
pub struct CacheService {
    store: Arc<RwLock<CacheStore>>,
    clock: SharedClock,
}

impl CacheService {
    /// Creates a service backed by the system clock.
    pub fn new(default_ttl: Duration) -> Self {
        Self::with_clock(default_ttl, system_clock())
    }

    /// Creates a service with an explicit time source.
    pub fn with_clock(default_ttl: Duration, clock: SharedClock) -> Self {
        Self {
            store: Arc::new(RwLock::new(CacheStore::new(default_ttl, clock.clone()))),
            clock,
        }
    }

    /// Clock shared with the underlying store.
    pub fn clock(&self) -> &SharedClock {
        &self.clock
    }

    /// Raw store handle, used by the background sweep.
    pub fn store(&self) -> Arc<RwLock<CacheStore>> {
        self.store.clone()
    }

    pub async fn get(&self, key: &str) -> Option<Value> {
        // Write lock: reads may evict
        self.store.write().await.get(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: Value, ttl: Option<Duration>) {
        self.store.write().await.set(key, value, ttl);
    }

    pub async fn has(&self, key: &str) -> bool {
        self.store.write().await.has(key)
    }

    pub async fn clear(&self, key: &str) -> bool {
        self.store.write().await.clear(key)
    }

    pub async fn clear_all(&self) {
        self.store.write().await.clear_all();
    }

    pub async fn get_stats(&self) -> CacheStats {
        self.store.read().await.get_stats()
    }

    /// Reads `key` and decodes it as `T`.
    ///
    /// A stored value that does not decode as `T` is counted as a miss.
    pub async fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.store
            .write()
            .await
            .get_with(key, |value| match T::deserialize(value) {
                Ok(decoded) => Some(decoded),
                Err(e) => {
                    debug!(key, error = %e, "cached value has unexpected shape, ignoring");
                    None
                }
            })
    }

    /// Encodes `value` and stores it under `key`.
    pub async fn set_as<T: Serialize>(
        &self,
        key: impl Into<String>,
        value: &T,
        ttl: Option<Duration>,
    ) -> Result<()> {
        let encoded = serde_json::to_value(value)?;
        self.set(key, encoded, ttl).await;
        Ok(())
    }
}
