//! API Routes
//!
//! Configures the Axum router with all job-portal cache endpoints.

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    cache_stats_handler, clear_cache_handler, clear_cache_key_handler,
    clear_popular_cache_handler, course_handler, courses_handler, health_handler,
    institute_handler, popular_searches_handler, popular_status_handler, suggestions_handler,
    track_search_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /popular-searches?limit=` - Ranked search keywords
/// - `GET /popular-searches/suggestions?q=&limit=` - Autocomplete
/// - `GET /popular-searches/status` - Popular-search slot status
/// - `DELETE /popular-searches/cache` - Drop the popular-search slot
/// - `POST /search-history` - Record a search
/// - `GET /courses?refresh=` - Course catalogue
/// - `GET /courses/:id` - One course
/// - `GET /institutes/:id` - One institute
/// - `GET /cache/stats` - Cache statistics
/// - `DELETE /cache` - Clear the whole cache
/// - `DELETE /cache/:key` - Clear one cache key
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/popular-searches", get(popular_searches_handler))
        .route("/popular-searches/suggestions", get(suggestions_handler))
        .route("/popular-searches/status", get(popular_status_handler))
        .route("/popular-searches/cache", delete(clear_popular_cache_handler))
        .route("/search-history", post(track_search_handler))
        .route("/courses", get(courses_handler))
        .route("/courses/:id", get(course_handler))
        .route("/institutes/:id", get(institute_handler))
        .route("/cache/stats", get(cache_stats_handler))
        .route("/cache", delete(clear_cache_handler))
        .route("/cache/:key", delete(clear_cache_key_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
