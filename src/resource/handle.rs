//! Cached Resource Handle
//!
//! Stateful wrapper around a cache-backed fetch: holds the last data, a
//! loading flag, the last error message and when data was last fetched.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::cache::CacheService;
use crate::error::{PortalError, Result};

/// Expiry used when none is configured.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(5 * 60);

type FetchFn<T> = Arc<dyn Fn() -> BoxFuture<'static, Result<T>> + Send + Sync>;

// == Resource Options ==
#[derive(Debug, Clone)]
pub struct ResourceOptions {
    /// Cache key
    pub key: String,
    /// Cache TTL and staleness horizon
    pub expiry: Duration,
    /// Values whose change re-runs the load
    pub dependencies: Vec<String>,
    /// Disabled handles never fetch
    pub enabled: bool,
}

impl ResourceOptions {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expiry: DEFAULT_EXPIRY,
            dependencies: Vec::new(),
            enabled: true,
        }
    }

    pub fn expiry(mut self, expiry: Duration) -> Self {
        self.expiry = expiry;
        self
    }

    pub fn dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

// == Resource State ==
/// Snapshot of a handle's observable state.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    /// Unix milliseconds of the last successful load
    pub last_fetch: Option<u64>,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            last_fetch: None,
        }
    }
}

struct Inner<T> {
    state: ResourceState<T>,
    dependencies: Vec<String>,
    enabled: bool,
}

// == Cached Resource ==
/// A cache-backed fetch with observable state.
///
/// Every load attempt captures the current generation. Disabling the handle
/// or changing its dependencies bumps the generation, and results from older
/// attempts are then dropped instead of committed.
pub struct CachedResource<T> {
    cache: CacheService,
    fetch: FetchFn<T>,
    key: String,
    expiry: Duration,
    inner: RwLock<Inner<T>>,
    generation: AtomicU64,
}

impl<T> CachedResource<T>
where
    T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static,
{
    pub fn new<F, Fut>(cache: CacheService, options: ResourceOptions, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        Self {
            cache,
            fetch: Arc::new(move || fetch().boxed()),
            key: options.key,
            expiry: options.expiry,
            inner: RwLock::new(Inner {
                state: ResourceState::default(),
                dependencies: options.dependencies,
                enabled: options.enabled,
            }),
            generation: AtomicU64::new(0),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Loads through the cache. `Ok(None)` when disabled.
    pub async fn load(&self) -> Result<Option<T>> {
        self.run(false).await
    }

    /// Re-fetches regardless of the cache and overwrites the entry.
    pub async fn refresh(&self) -> Result<Option<T>> {
        self.run(true).await
    }

    async fn run(&self, force: bool) -> Result<Option<T>> {
        let generation = self.generation.load(Ordering::SeqCst);
        if !self.inner.read().await.enabled {
            return Ok(None);
        }

        if !force {
            if let Some(hit) = self.cache.get_as::<T>(&self.key).await {
                debug!(key = %self.key, "resource served from cache");
                let now = self.cache.clock().now_ms();
                let committed = self
                    .commit(generation, |state| {
                        state.data = Some(hit.clone());
                        state.error = None;
                        state.loading = false;
                        state.last_fetch = Some(now);
                    })
                    .await;
                return self.committed_or_cancelled(committed, hit);
            }
        }

        let started = self
            .commit(generation, |state| {
                state.loading = true;
                state.error = None;
            })
            .await;
        if !started {
            return Err(self.cancelled());
        }

        match (self.fetch)().await {
            Ok(data) => {
                if let Err(e) = self.cache.set_as(&self.key, &data, Some(self.expiry)).await {
                    warn!(key = %self.key, error = %e, "could not cache resource");
                }
                let now = self.cache.clock().now_ms();
                let committed = self
                    .commit(generation, |state| {
                        state.data = Some(data.clone());
                        state.loading = false;
                        state.last_fetch = Some(now);
                    })
                    .await;
                self.committed_or_cancelled(committed, data)
            }
            Err(e) => {
                let message = e.to_string();
                let committed = self
                    .commit(generation, |state| {
                        state.loading = false;
                        state.error = Some(message);
                    })
                    .await;
                if committed {
                    Err(e)
                } else {
                    Err(self.cancelled())
                }
            }
        }
    }

    /// Applies `update` only if no invalidation happened since `generation`.
    async fn commit(&self, generation: u64, update: impl FnOnce(&mut ResourceState<T>)) -> bool {
        let mut inner = self.inner.write().await;
        if self.generation.load(Ordering::SeqCst) != generation {
            return false;
        }
        update(&mut inner.state);
        true
    }

    fn committed_or_cancelled(&self, committed: bool, data: T) -> Result<Option<T>> {
        if committed {
            Ok(Some(data))
        } else {
            Err(self.cancelled())
        }
    }

    fn cancelled(&self) -> PortalError {
        debug!(key = %self.key, "stale resource load discarded");
        PortalError::Cancelled(self.key.clone())
    }

    /// Bumps the generation and clears the loading flag. Caller holds the lock.
    fn invalidate(&self, inner: &mut Inner<T>) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        inner.state.loading = false;
    }

    /// Turns the handle on or off. Enabling triggers a load.
    pub async fn set_enabled(&self, enabled: bool) -> Result<Option<T>> {
        {
            let mut inner = self.inner.write().await;
            if inner.enabled == enabled {
                return Ok(None);
            }
            inner.enabled = enabled;
            self.invalidate(&mut inner);
        }
        if enabled {
            self.load().await
        } else {
            Ok(None)
        }
    }

    /// Replaces the dependency list. A change re-runs the load.
    pub async fn set_dependencies(&self, dependencies: Vec<String>) -> Result<Option<T>> {
        let enabled = {
            let mut inner = self.inner.write().await;
            if inner.dependencies == dependencies {
                return Ok(None);
            }
            inner.dependencies = dependencies;
            self.invalidate(&mut inner);
            inner.enabled
        };
        if enabled {
            self.load().await
        } else {
            Ok(None)
        }
    }

    /// Drops the cache entry and forgets local data.
    pub async fn clear_cache(&self) {
        self.cache.clear(&self.key).await;
        let mut inner = self.inner.write().await;
        inner.state.data = None;
        inner.state.last_fetch = None;
    }

    /// `now - last_fetch > expiry`, false before the first load.
    pub async fn is_stale(&self) -> bool {
        let now = self.cache.clock().now_ms();
        self.inner
            .read()
            .await
            .state
            .last_fetch
            .map(|at| now.saturating_sub(at) > self.expiry.as_millis() as u64)
            .unwrap_or(false)
    }

    pub async fn state(&self) -> ResourceState<T> {
        self.inner.read().await.state.clone()
    }
}
