//! Configuration Module
//!
//! Handles loading service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Default REST backend root.
pub const DEFAULT_BACKEND_URL: &str = "https://backend.overseas.ai/api";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL of the job-portal REST backend
    pub backend_base_url: String,
    /// Default TTL in milliseconds for cache entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Lifetime of the popular-search ranking in seconds
    pub popular_cache_secs: u64,
    /// Maximum job-list pages fetched per aggregation run
    pub analysis_max_pages: u32,
    /// `per_page` used for job-list requests
    pub analysis_page_size: u32,
    /// Pause between job-list page requests in milliseconds
    pub analysis_page_delay_ms: u64,
    /// Per-request HTTP timeout in seconds, 0 disables it
    pub request_timeout_secs: u64,
    /// JSON file backing the search history, in memory when unset
    pub search_history_path: Option<PathBuf>,
    /// Maximum number of search-history entries kept
    pub search_history_cap: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Background sweep interval in seconds, 0 disables the sweep
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `BACKEND_BASE_URL` (default: https://backend.overseas.ai/api)
    /// - `DEFAULT_TTL_MS` (default: 300000)
    /// - `POPULAR_CACHE_SECS` (default: 900)
    /// - `ANALYSIS_MAX_PAGES` (default: 5)
    /// - `ANALYSIS_PAGE_SIZE` (default: 50)
    /// - `ANALYSIS_PAGE_DELAY_MS` (default: 100)
    /// - `REQUEST_TIMEOUT_SECS` (default: 30)
    /// - `SEARCH_HISTORY_PATH` (default: unset)
    /// - `SEARCH_HISTORY_CAP` (default: 100)
    /// - `SERVER_PORT` (default: 3000)
    /// - `CLEANUP_INTERVAL` (default: 0, sweep off)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            backend_base_url: env::var("BACKEND_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or(defaults.backend_base_url),
            default_ttl_ms: env_or("DEFAULT_TTL_MS", defaults.default_ttl_ms),
            popular_cache_secs: env_or("POPULAR_CACHE_SECS", defaults.popular_cache_secs),
            analysis_max_pages: env_or("ANALYSIS_MAX_PAGES", defaults.analysis_max_pages),
            analysis_page_size: env_or("ANALYSIS_PAGE_SIZE", defaults.analysis_page_size),
            analysis_page_delay_ms: env_or(
                "ANALYSIS_PAGE_DELAY_MS",
                defaults.analysis_page_delay_ms,
            ),
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", defaults.request_timeout_secs),
            search_history_path: env::var("SEARCH_HISTORY_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            search_history_cap: env_or("SEARCH_HISTORY_CAP", defaults.search_history_cap),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            cleanup_interval: env_or("CLEANUP_INTERVAL", defaults.cleanup_interval),
        }
    }

    /// Default TTL for the cache store.
    pub fn default_ttl(&self) -> Duration {
        Duration::from_millis(self.default_ttl_ms)
    }

    /// Lifetime of the popular-search ranking.
    pub fn popular_cache_duration(&self) -> Duration {
        Duration::from_secs(self.popular_cache_secs)
    }

    /// HTTP client timeout, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    /// Pagination parameters for the popular-search aggregator.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            max_pages: self.analysis_max_pages,
            page_size: self.analysis_page_size,
            page_delay: Duration::from_millis(self.analysis_page_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_base_url: DEFAULT_BACKEND_URL.to_string(),
            default_ttl_ms: 5 * 60 * 1000,
            popular_cache_secs: 15 * 60,
            analysis_max_pages: 5,
            analysis_page_size: 50,
            analysis_page_delay_ms: 100,
            request_timeout_secs: 30,
            search_history_path: None,
            search_history_cap: 100,
            server_port: 3000,
            cleanup_interval: 0,
        }
    }
}

// == Analysis Options ==
/// How the aggregator walks the paginated job list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    /// Maximum pages requested
    pub max_pages: u32,
    /// Items requested per page; a shorter page ends the walk
    pub page_size: u32,
    /// Pause between consecutive page requests
    pub page_delay: Duration,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Config::default().analysis_options()
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
