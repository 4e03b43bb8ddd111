//! HTTP routes exercised in-process through the router

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use jobwatch::alerts::AlertDispatcher;
use jobwatch::api::{AppState, build_router};
use jobwatch::config::PaginationMode;
use jobwatch::models::{AlertChannel, AlertStatus, NewJobPosting};
use jobwatch::pipeline::Pipeline;
use jobwatch::store::JobStore;

mod common;
use common::{FakeCard, FakeFactory, FakeSite, fast_config};

async fn app_with(factory: FakeFactory) -> (Router, JobStore) {
    let store = JobStore::open_in_memory().await.unwrap();
    let pipeline = Pipeline::new(
        factory,
        store.clone(),
        AlertDispatcher::new(store.clone(), Vec::new()),
        fast_config(2, PaginationMode::Offset),
    );
    let state = Arc::new(AppState {
        store: store.clone(),
        pipeline: Arc::new(pipeline),
        default_max_pages: 2,
    });
    let router = build_router(state, &["http://localhost:3000".to_string()]);
    (router, store)
}

async fn app() -> (Router, JobStore) {
    app_with(FakeFactory::new(FakeSite::default())).await
}

async fn call(router: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

async fn seed(store: &JobStore) -> i64 {
    let mut last = 0;
    for (title, link, date) in [
        ("Backend Engineer", "https://jobs.example/1", "2024-03-01"),
        ("Rust Developer", "https://jobs.example/2", "2024-03-09"),
    ] {
        let job = NewJobPosting::new(title, link)
            .unwrap()
            .company(Some("Acme"))
            .keyword_tag(Some("rust"))
            .posted_on(Some(date))
            .unwrap();
        last = store.insert_if_absent(&job).await.unwrap().unwrap().id;
    }
    last
}

#[tokio::test]
async fn health_is_ok() {
    let (router, _) = app().await;
    let (status, body) = call(&router, Method::GET, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn list_and_count_apply_filters() {
    let (router, store) = app().await;
    seed(&store).await;

    let (status, body) = call(&router, Method::GET, "/api/jobs?date_from=2024-03-05").await;
    assert_eq!(status, StatusCode::OK);
    let jobs = body.as_array().unwrap();
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0]["title"], "Rust Developer");

    let (_, body) = call(&router, Method::GET, "/api/jobs/count?q=backend").await;
    assert_eq!(body["count"], 1);

    let (_, body) = call(&router, Method::GET, "/api/jobs?order_by=title&limit=1").await;
    assert_eq!(body[0]["title"], "Backend Engineer");
}

#[tokio::test]
async fn malformed_query_is_a_structured_bad_request() {
    let (router, _) = app().await;
    let (status, body) = call(&router, Method::GET, "/api/jobs?date_from=last-week").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "bad_request");
    assert_eq!(body["status"], 400);
    assert_eq!(body["path"], "/api/jobs");
}

#[tokio::test]
async fn get_job_and_refuse_deletion() {
    let (router, store) = app().await;
    let id = seed(&store).await;
    store
        .insert_alert(id, AlertChannel::Email, AlertStatus::Sent, Some("New Job: Rust Developer at Acme"))
        .await
        .unwrap();

    let (status, body) = call(&router, Method::GET, &format!("/api/jobs/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source_link"], "https://jobs.example/2");

    let (_, alerts) = call(&router, Method::GET, "/api/alerts").await;
    assert_eq!(alerts.as_array().unwrap().len(), 1);

    let (status, _) = call(&router, Method::DELETE, &format!("/api/jobs/{id}")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(store.get(id).await.unwrap().is_some());

    let (status, body) = call(&router, Method::GET, "/api/jobs/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["kind"], "not_found");
    assert_eq!(body["path"], "/api/jobs/9999");

    let (_, alerts) = call(&router, Method::GET, "/api/alerts").await;
    assert_eq!(alerts.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn suggestions_endpoint() {
    let (router, store) = app().await;
    seed(&store).await;

    let (status, body) = call(&router, Method::GET, "/api/jobs/suggestions?q=rust&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<&str> = body["titles"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert!(titles.contains(&"rust"));
    assert!(titles.contains(&"Rust Developer"));
}

#[tokio::test]
async fn scrape_trigger_returns_summary() {
    let factory = FakeFactory::new(FakeSite {
        pages: vec![vec![
            FakeCard::new("Backend Engineer", "Acme", "https://jobs.example/a"),
            FakeCard::new("Rust Developer", "Globex", "https://jobs.example/b"),
        ]],
        ..FakeSite::default()
    });
    let (router, store) = app_with(factory).await;

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/scrape?keywords=Backend%20Engineer&location=Berlin&max_pages=1",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["found"], 2);
    assert_eq!(body["created"], 2);
    assert!(store.exists("https://jobs.example/b").await.unwrap());
}

#[tokio::test]
async fn scrape_trigger_validates_input() {
    let (router, _) = app().await;

    let (status, _) = call(&router, Method::POST, "/api/scrape?location=Berlin").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call(&router, Method::POST, "/api/scrape?keywords=%20").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "keywords must not be empty");

    let (status, _) = call(&router, Method::POST, "/api/scrape?keywords=rust&max_pages=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn scrape_trigger_reports_browser_unavailable() {
    let (router, _) = app_with(FakeFactory::failing()).await;

    let (status, body) = call(&router, Method::POST, "/api/scrape?keywords=rust").await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["kind"], "browser_unavailable");
    assert_eq!(body["path"], "/api/scrape");
}
