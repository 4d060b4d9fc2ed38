//! API Handlers
//!
//! HTTP request handlers exposing the cache and popular-search layer to UI
//! clients.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use crate::backend::{HttpBackend, PortalBackend};
use crate::cache::{with_cache, CacheService, CacheStats};
use crate::clock::system_clock;
use crate::config::Config;
use crate::error::{PortalError, Result};
use crate::models::{
    HealthResponse, MessageResponse, PopularCacheStatus, PopularQuery, PopularSearchItem,
    RefreshQuery, SuggestionQuery, SuggestionsResponse, TrackSearchRequest,
};
use crate::popular::{FileHistory, MemoryHistory, PopularSearchService, SearchHistory};
use crate::resource::presets::{course_key, institute_key, COURSE_EXPIRY, INSTITUTE_EXPIRY};
use crate::resource::{all_courses_data, CachedResource};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Read-through cache for backend lookups
    pub cache: CacheService,
    /// Remote job-portal API
    pub backend: Arc<dyn PortalBackend>,
    /// Popular-search aggregator
    pub popular: Arc<PopularSearchService>,
    /// Course catalogue handle
    pub all_courses: Arc<CachedResource<Value>>,
}

impl AppState {
    /// Creates a new AppState from its parts.
    pub fn new(
        cache: CacheService,
        backend: Arc<dyn PortalBackend>,
        popular: Arc<PopularSearchService>,
    ) -> Self {
        let all_courses = Arc::new(all_courses_data(cache.clone(), backend.clone()));
        Self {
            cache,
            backend,
            popular,
            all_courses,
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the HTTP backend, the cache and the popular-search service
    /// with a file- or memory-backed history.
    pub fn from_config(config: &Config) -> Result<Self> {
        let clock = system_clock();
        let backend: Arc<dyn PortalBackend> = Arc::new(HttpBackend::new(
            config.backend_base_url.clone(),
            config.request_timeout(),
        )?);
        let cache = CacheService::with_clock(config.default_ttl(), clock.clone());
        let history: Arc<dyn SearchHistory> = match &config.search_history_path {
            Some(path) => Arc::new(FileHistory::new(path, config.search_history_cap)),
            None => Arc::new(MemoryHistory::new(config.search_history_cap)),
        };
        let popular = Arc::new(PopularSearchService::new(
            backend.clone(),
            history,
            clock,
            config.analysis_options(),
            config.popular_cache_duration(),
        ));
        Ok(Self::new(cache, backend, popular))
    }
}

/// Rejects ids that could escape the backend path segment.
fn validate_id(id: &str) -> Result<()> {
    let ok = !id.is_empty()
        && id.len() <= 64
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if ok {
        Ok(())
    } else {
        Err(PortalError::InvalidRequest(format!("Invalid id: {}", id)))
    }
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}

/// Handler for GET /popular-searches
pub async fn popular_searches_handler(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> Json<Vec<PopularSearchItem>> {
    let items = state
        .popular
        .get_popular_search_keywords(query.effective_limit())
        .await;
    Json(items)
}

/// Handler for GET /popular-searches/suggestions
pub async fn suggestions_handler(
    State(state): State<AppState>,
    Query(query): Query<SuggestionQuery>,
) -> Json<SuggestionsResponse> {
    let suggestions = state
        .popular
        .get_search_suggestions(&query.q, query.effective_limit())
        .await;
    Json(SuggestionsResponse {
        query: query.q,
        suggestions,
    })
}

/// Handler for GET /popular-searches/status
pub async fn popular_status_handler(State(state): State<AppState>) -> Json<PopularCacheStatus> {
    Json(state.popular.get_popular_search_cache_status().await)
}

/// Handler for DELETE /popular-searches/cache
pub async fn clear_popular_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.popular.clear_popular_search_cache().await;
    Json(MessageResponse::new("Popular search cache cleared"))
}

/// Handler for POST /search-history
pub async fn track_search_handler(
    State(state): State<AppState>,
    Json(req): Json<TrackSearchRequest>,
) -> Result<(StatusCode, Json<MessageResponse>)> {
    if let Some(error_msg) = req.validate() {
        return Err(PortalError::InvalidRequest(error_msg));
    }

    state
        .popular
        .track_search_query(&req.keyword, req.user_id)
        .await;

    Ok((
        StatusCode::ACCEPTED,
        Json(MessageResponse::new("Search recorded")),
    ))
}

/// Handler for GET /courses
///
/// `?refresh=true` bypasses the cache.
pub async fn courses_handler(
    State(state): State<AppState>,
    Query(query): Query<RefreshQuery>,
) -> Result<Json<Value>> {
    let loaded = if query.refresh {
        state.all_courses.refresh().await?
    } else {
        state.all_courses.load().await?
    };
    loaded
        .map(Json)
        .ok_or_else(|| PortalError::Internal("Course catalogue handle is disabled".to_string()))
}

/// Handler for GET /courses/:id
pub async fn course_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    validate_id(&id)?;
    let backend = state.backend.clone();
    let course = with_cache(
        &state.cache,
        &course_key(&id),
        || async move { backend.course(&id).await },
        Some(COURSE_EXPIRY),
    )
    .await?;
    Ok(Json(course))
}

/// Handler for GET /institutes/:id
pub async fn institute_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>> {
    validate_id(&id)?;
    let backend = state.backend.clone();
    let institute = with_cache(
        &state.cache,
        &institute_key(&id),
        || async move { backend.institute(&id).await },
        Some(INSTITUTE_EXPIRY),
    )
    .await?;
    Ok(Json(institute))
}

/// Handler for GET /cache/stats
pub async fn cache_stats_handler(State(state): State<AppState>) -> Json<CacheStats> {
    Json(state.cache.get_stats().await)
}

/// Handler for DELETE /cache
pub async fn clear_cache_handler(State(state): State<AppState>) -> Json<MessageResponse> {
    state.cache.clear_all().await;
    Json(MessageResponse::new("Cache cleared"))
}

/// Handler for DELETE /cache/:key
pub async fn clear_cache_key_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MessageResponse>> {
    if state.cache.clear(&key).await {
        Ok(Json(MessageResponse::new(format!(
            "Key '{}' cleared successfully",
            key
        ))))
    } else {
        Err(PortalError::NotFound(key))
    }
}
