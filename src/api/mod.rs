//! HTTP surface: job queries, alert history and the on-demand trigger.

mod error;
mod handlers;

pub use error::{ApiError, ErrorPayload};

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::browser::DriverFactory;
use crate::pipeline::Pipeline;
use crate::store::JobStore;

/// Shared handler state
pub struct AppState<F: DriverFactory> {
    pub store: JobStore,
    pub pipeline: Arc<Pipeline<F>>,
    /// Page cap for `POST /api/scrape` when the request gives none
    pub default_max_pages: u32,
}

pub fn build_router<F: DriverFactory + 'static>(
    state: Arc<AppState<F>>,
    cors_allow_origins: &[String],
) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/jobs", get(handlers::list_jobs::<F>))
        .route("/api/jobs/count", get(handlers::count_jobs::<F>))
        .route("/api/jobs/suggestions", get(handlers::suggestions::<F>))
        .route("/api/jobs/{id}", get(handlers::get_job::<F>))
        .route("/api/alerts", get(handlers::list_alerts::<F>))
        .route("/api/scrape", post(handlers::trigger_scrape::<F>))
        .layer(middleware::from_fn(error::attach_error_path))
        .layer(cors_layer(cors_allow_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {origin:?}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(Any)
        .allow_headers(Any)
}
