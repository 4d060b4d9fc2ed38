//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint against an in-process
//! stub of the job-portal backend.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use job_portal_cache::{
    api::create_router,
    backend::PortalBackend,
    cache::CacheService,
    clock::{ManualClock, SharedClock},
    config::AnalysisOptions,
    models::{Job, Occupation},
    popular::{MemoryHistory, PopularSearchService, SearchHistory},
    AppState, PortalError, Result,
};
use serde_json::{json, Value};
use tower::ServiceExt;

// == Stub Backend ==

#[derive(Default)]
struct StubBackend {
    jobs: Vec<Job>,
    course_calls: AtomicUsize,
    catalogue_calls: AtomicUsize,
}

#[async_trait]
impl PortalBackend for StubBackend {
    async fn job_page(&self, page: u32, _per_page: u32) -> Result<Vec<Job>> {
        if page == 1 {
            Ok(self.jobs.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn latest_jobs(&self) -> Result<Option<Vec<Job>>> {
        Ok(None)
    }

    async fn occupations(&self) -> Result<Vec<Occupation>> {
        Ok(Vec::new())
    }

    async fn course(&self, id: &str) -> Result<Value> {
        self.course_calls.fetch_add(1, Ordering::SeqCst);
        if id == "404" {
            return Err(PortalError::NotFound(format!("/course/{}", id)));
        }
        Ok(json!({ "id": id, "name": "Welding Basics" }))
    }

    async fn institute(&self, id: &str) -> Result<Value> {
        Ok(json!({ "id": id, "name": "Skill Centre" }))
    }

    async fn all_courses(&self) -> Result<Value> {
        let n = self.catalogue_calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(json!({ "courses": [], "fetch": n }))
    }
}

// == Helper Functions ==

struct TestApp {
    router: Router,
    backend: Arc<StubBackend>,
    history: Arc<MemoryHistory>,
}

fn sample_jobs() -> Vec<Job> {
    vec![
        Job::new("1", "Electrician"),
        Job::new("2", "Electrician"),
        Job::new("3", "Electrician"),
        Job::new("4", "Plumber"),
        Job::new("5", "Plumber"),
        Job::new("6", "Welder"),
    ]
}

fn create_test_app() -> TestApp {
    let clock: SharedClock = Arc::new(ManualClock::new(1_000_000));
    let backend = Arc::new(StubBackend {
        jobs: sample_jobs(),
        ..StubBackend::default()
    });
    let history = Arc::new(MemoryHistory::new(10));
    let cache = CacheService::with_clock(Duration::from_secs(300), clock.clone());
    let popular = Arc::new(PopularSearchService::new(
        backend.clone(),
        history.clone() as Arc<dyn SearchHistory>,
        clock,
        AnalysisOptions {
            max_pages: 2,
            page_size: 50,
            page_delay: Duration::ZERO,
        },
        Duration::from_secs(900),
    ));
    let state = AppState::new(cache, backend.clone(), popular);

    TestApp {
        router: create_router(state),
        backend,
        history,
    }
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// == Health ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "healthy");
    assert!(json.get("timestamp").is_some());
}

// == Popular Searches ==

#[tokio::test]
async fn test_popular_searches_ranked_and_padded() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/popular-searches", None).await;

    assert_eq!(status, StatusCode::OK);
    let items = json.as_array().unwrap();
    assert_eq!(items.len(), 6);

    let labels: Vec<&str> = items.iter().map(|i| i["label"].as_str().unwrap()).collect();
    assert_eq!(
        labels,
        vec![
            "Electrician",
            "Plumber",
            "Welder",
            "Construction Worker",
            "Cook",
            "Driver"
        ]
    );
    assert_eq!(items[0]["searchCount"], 3);
    assert_eq!(items[0]["confidence"], "measured");
    assert_eq!(items[3]["confidence"], "synthetic");
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item["id"], (i + 1) as u64);
        assert_eq!(item["value"], (i + 1) as u64);
    }
}

#[tokio::test]
async fn test_popular_searches_limit_clamped() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/popular-searches?limit=2", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_popular_status_and_clear() {
    let app = create_test_app();

    let (_, before) = send(&app.router, "GET", "/popular-searches/status", None).await;
    assert_eq!(before["cached"], false);
    assert!(before.get("jobCount").is_none());

    send(&app.router, "GET", "/popular-searches", None).await;

    let (_, after) = send(&app.router, "GET", "/popular-searches/status", None).await;
    assert_eq!(after["cached"], true);
    assert_eq!(after["jobCount"], 6);
    assert_eq!(after["age"], 0);

    let (status, _) = send(&app.router, "DELETE", "/popular-searches/cache", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, cleared) = send(&app.router, "GET", "/popular-searches/status", None).await;
    assert_eq!(cleared["cached"], false);
}

#[tokio::test]
async fn test_suggestions() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        "GET",
        "/popular-searches/suggestions?q=elec",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["query"], "elec");
    assert_eq!(json["suggestions"], json!(["Electrician"]));
}

#[tokio::test]
async fn test_suggestions_empty_query() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/popular-searches/suggestions", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["suggestions"], json!([]));
}

// == Search History ==

#[tokio::test]
async fn test_track_search_recorded() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        "POST",
        "/search-history",
        Some(r#"{"keyword":"  welder ","user_id":"u7"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::ACCEPTED);
    assert!(json.get("message").is_some());

    let entries = app.history.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].keyword, "welder");
    assert_eq!(entries[0].user_id.as_deref(), Some("u7"));
}

#[tokio::test]
async fn test_track_search_blank_keyword() {
    let app = create_test_app();

    let (status, json) = send(
        &app.router,
        "POST",
        "/search-history",
        Some(r#"{"keyword":"   "}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(json["error"].as_str().unwrap().contains("Keyword"));
    assert!(app.history.entries().await.unwrap().is_empty());
}

// == Courses and Institutes ==

#[tokio::test]
async fn test_course_read_through() {
    let app = create_test_app();

    let (status, first) = send(&app.router, "GET", "/courses/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["id"], "42");

    let (status, second) = send(&app.router, "GET", "/courses/42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);
    assert_eq!(app.backend.course_calls.load(Ordering::SeqCst), 1);

    let (_, stats) = send(&app.router, "GET", "/cache/stats", None).await;
    assert_eq!(stats["size"], 1);
    assert_eq!(stats["keys"], json!(["course_42"]));
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
}

#[tokio::test]
async fn test_course_backend_error_not_cached() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/courses/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(json.get("error").is_some());

    send(&app.router, "GET", "/courses/404", None).await;
    assert_eq!(app.backend.course_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_institute_endpoint() {
    let app = create_test_app();

    let (status, json) = send(&app.router, "GET", "/institutes/i-9", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["name"], "Skill Centre");

    let (_, stats) = send(&app.router, "GET", "/cache/stats", None).await;
    assert_eq!(stats["keys"], json!(["institute_i-9"]));
}

#[tokio::test]
async fn test_course_catalogue_cached_until_refresh() {
    let app = create_test_app();

    let (status, first) = send(&app.router, "GET", "/courses", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["fetch"], 1);

    let (_, cached) = send(&app.router, "GET", "/courses", None).await;
    assert_eq!(cached["fetch"], 1);

    let (_, refreshed) = send(&app.router, "GET", "/courses?refresh=true", None).await;
    assert_eq!(refreshed["fetch"], 2);
    assert_eq!(app.backend.catalogue_calls.load(Ordering::SeqCst), 2);
}

// == Cache Administration ==

#[tokio::test]
async fn test_clear_cache_key() {
    let app = create_test_app();
    send(&app.router, "GET", "/courses/7", None).await;

    let (status, json) = send(&app.router, "DELETE", "/cache/course_7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["message"].as_str().unwrap().contains("course_7"));

    let (status, _) = send(&app.router, "DELETE", "/cache/course_7", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Next read goes back to the backend
    send(&app.router, "GET", "/courses/7", None).await;
    assert_eq!(app.backend.course_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_clear_all() {
    let app = create_test_app();
    send(&app.router, "GET", "/courses/1", None).await;
    send(&app.router, "GET", "/institutes/2", None).await;

    let (status, _) = send(&app.router, "DELETE", "/cache", None).await;
    assert_eq!(status, StatusCode::OK);

    let (_, stats) = send(&app.router, "GET", "/cache/stats", None).await;
    assert_eq!(stats["size"], 0);
    assert_eq!(stats["keys"], json!([]));
}
