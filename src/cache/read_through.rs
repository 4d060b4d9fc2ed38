//! Read-Through Helper
//!
//! Fetch-or-populate wrapper over `CacheService`.

use std::future::Future;
use std::time::Duration;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::cache::CacheService;

/// Returns the cached value for `key`, or runs `fetch_fn` and caches its result.
///
/// A failed fetch is returned as-is and nothing is cached. Concurrent misses
/// on the same key each run their own fetch; the last write wins.
///
/// # Arguments
/// * `cache` - Store to read from and populate
/// * `key` - Cache key
/// * `fetch_fn` - Producer called only on a miss
/// * `ttl` - Lifetime of the stored result, `None` uses the store default
pub async fn with_cache<T, E, F, Fut>(
    cache: &CacheService,
    key: &str,
    fetch_fn: F,
    ttl: Option<Duration>,
) -> Result<T, E>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    if let Some(hit) = cache.get_as::<T>(key).await {
        debug!(key, "cache hit");
        return Ok(hit);
    }

    debug!(key, "cache miss, fetching");
    let fresh = fetch_fn().await?;

    if let Err(e) = cache.set_as(key, &fresh, ttl).await {
        warn!(key, error = %e, "could not cache fetched value");
    }

    Ok(fresh)
}
