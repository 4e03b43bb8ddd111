use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{ApiError, AppState};
use crate::browser::DriverFactory;
use crate::models::{AlertAuditRecord, JobPosting};
use crate::pipeline::RunSummary;
use crate::store::{JobFilter, Suggestions};

type ApiResult<T> = Result<Json<T>, ApiError>;
type AppStateRef<F> = State<Arc<AppState<F>>>;

fn query<T>(q: Result<Query<T>, QueryRejection>) -> Result<T, ApiError> {
    q.map(|Query(inner)| inner)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

pub(super) async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub(super) async fn list_jobs<F: DriverFactory>(
    State(state): AppStateRef<F>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Vec<JobPosting>> {
    let filter = query(filter)?;
    Ok(Json(state.store.list(&filter).await?))
}

pub(super) async fn count_jobs<F: DriverFactory>(
    State(state): AppStateRef<F>,
    filter: Result<Query<JobFilter>, QueryRejection>,
) -> ApiResult<Value> {
    let filter = query(filter)?;
    let count = state.store.count(&filter).await?;
    Ok(Json(json!({ "count": count })))
}

#[derive(Debug, Deserialize)]
pub(super) struct SuggestParams {
    #[serde(default)]
    q: String,
    limit: Option<usize>,
}

pub(super) async fn suggestions<F: DriverFactory>(
    State(state): AppStateRef<F>,
    params: Result<Query<SuggestParams>, QueryRejection>,
) -> ApiResult<Suggestions> {
    let params = query(params)?;
    let limit = params.limit.unwrap_or(10).clamp(1, 50);
    Ok(Json(state.store.suggestions(&params.q, limit).await?))
}

pub(super) async fn get_job<F: DriverFactory>(
    State(state): AppStateRef<F>,
    Path(id): Path<i64>,
) -> ApiResult<JobPosting> {
    state
        .store
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("job {id} not found")))
}

#[derive(Debug, Deserialize)]
pub(super) struct AlertParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

pub(super) async fn list_alerts<F: DriverFactory>(
    State(state): AppStateRef<F>,
    params: Result<Query<AlertParams>, QueryRejection>,
) -> ApiResult<Vec<AlertAuditRecord>> {
    let params = query(params)?;
    let alerts = state
        .store
        .list_alerts(params.limit.unwrap_or(100), params.offset.unwrap_or(0))
        .await?;
    Ok(Json(alerts))
}

#[derive(Debug, Deserialize)]
pub(super) struct ScrapeParams {
    keywords: String,
    #[serde(default)]
    location: String,
    max_pages: Option<u32>,
}

pub(super) async fn trigger_scrape<F: DriverFactory + 'static>(
    State(state): AppStateRef<F>,
    params: Result<Query<ScrapeParams>, QueryRejection>,
) -> ApiResult<RunSummary> {
    let params = query(params)?;
    let max_pages = params.max_pages.unwrap_or(state.default_max_pages);
    if max_pages == 0 {
        return Err(ApiError::BadRequest("max_pages must be at least 1".to_string()));
    }
    let summary = state
        .pipeline
        .run_pipeline(&params.keywords, &params.location, max_pages)
        .await?;
    Ok(Json(summary))
}
