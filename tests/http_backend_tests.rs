//! Integration Tests for the HTTP backend client
//!
//! Runs a fake job-portal API on a loopback port and points `HttpBackend`
//! at it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Form, Json, Router,
};
use job_portal_cache::{backend::HttpBackend, backend::PortalBackend, PortalError};
use serde_json::{json, Value};

// == Fake Portal ==

type Seen = Arc<Mutex<Vec<HashMap<String, String>>>>;

async fn job_list(
    State(seen): State<Seen>,
    Form(form): Form<HashMap<String, String>>,
) -> Json<Value> {
    let page = form.get("page").cloned().unwrap_or_default();
    seen.lock().unwrap().push(form);
    let jobs = if page == "1" {
        json!([
            { "id": 1, "jobTitle": "Electrician", "companyName": "Acme" },
            { "jobId": "2", "title": "Plumber", "skills": "pipes, fittings" }
        ])
    } else {
        json!([])
    };
    Json(json!({ "status": true, "data": { "jobs": jobs } }))
}

async fn latest_jobs() -> StatusCode {
    StatusCode::UNAUTHORIZED
}

async fn occupations() -> Json<Value> {
    Json(json!({ "occupations": [ { "id": 3, "name": "Welder" }, { "name": "Mason" } ] }))
}

async fn course(Path(id): Path<String>) -> Result<Json<Value>, StatusCode> {
    match id.as_str() {
        "42" => Ok(Json(json!({ "id": 42, "name": "Welding Basics" }))),
        "boom" => Err(StatusCode::INTERNAL_SERVER_ERROR),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn spawn_portal() -> (String, Seen) {
    let seen: Seen = Arc::default();
    let app = Router::new()
        .route("/api/job-list", post(job_list))
        .route("/api/latest-job-list", get(latest_jobs))
        .route("/api/occupations", get(occupations))
        .route("/api/course/:id", get(course))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/api/", addr), seen)
}

// == Tests ==

#[tokio::test]
async fn test_job_page_posts_form_and_parses_envelope() {
    let (base, seen) = spawn_portal().await;
    let backend = HttpBackend::new(base, None).unwrap();

    let jobs = backend.job_page(1, 50).await.unwrap();

    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id.as_deref(), Some("1"));
    assert_eq!(jobs[0].title.as_deref(), Some("Electrician"));
    assert_eq!(jobs[0].company.as_deref(), Some("Acme"));
    assert_eq!(jobs[1].id.as_deref(), Some("2"));
    assert_eq!(jobs[1].skills, vec!["pipes", "fittings"]);

    let forms = seen.lock().unwrap().clone();
    assert_eq!(forms.len(), 1);
    assert_eq!(forms[0]["page"], "1");
    assert_eq!(forms[0]["per_page"], "50");
}

#[tokio::test]
async fn test_job_page_past_end_is_empty() {
    let (base, _) = spawn_portal().await;
    let backend = HttpBackend::new(base, None).unwrap();

    assert!(backend.job_page(2, 50).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_latest_jobs_auth_refusal_is_skipped() {
    let (base, _) = spawn_portal().await;
    let backend = HttpBackend::new(base, None).unwrap();

    assert!(backend.latest_jobs().await.unwrap().is_none());
}

#[tokio::test]
async fn test_occupations_parsed() {
    let (base, _) = spawn_portal().await;
    let backend = HttpBackend::new(base, None).unwrap();

    let names: Vec<String> = backend
        .occupations()
        .await
        .unwrap()
        .into_iter()
        .map(|o| o.name)
        .collect();
    assert_eq!(names, vec!["Welder", "Mason"]);
}

#[tokio::test]
async fn test_course_statuses() {
    let (base, _) = spawn_portal().await;
    let backend = HttpBackend::new(base, None).unwrap();

    let found = backend.course("42").await.unwrap();
    assert_eq!(found["name"], "Welding Basics");

    assert!(matches!(
        backend.course("7").await,
        Err(PortalError::NotFound(_))
    ));
    assert!(matches!(
        backend.course("boom").await,
        Err(PortalError::Backend { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    // Nothing listens on the discard port
    let backend = HttpBackend::new("http://127.0.0.1:9", None).unwrap();

    assert!(matches!(
        backend.all_courses().await,
        Err(PortalError::Http(_))
    ));
}
