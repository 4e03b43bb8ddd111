use axum::Json;
use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;

use crate::pipeline::PipelineError;
use crate::store::StoreError;

/// Body of every error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub kind: &'static str,
    pub status: u16,
    pub detail: String,
    /// Filled in by the error middleware from the request URI
    pub path: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("browser session could not be started")]
    BrowserUnavailable,

    /// Unclassified; the detail is logged, never returned
    #[error("internal error")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BrowserUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::NotFound(_) => "not_found",
            Self::BrowserUnavailable => "browser_unavailable",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Internal(e.to_string())
    }
}

impl From<PipelineError> for ApiError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::EmptyQuery => Self::BadRequest(e.to_string()),
            PipelineError::Browser(inner) => {
                error!("Scrape trigger could not open a browser: {inner}");
                Self::BrowserUnavailable
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!("Internal API error: {detail}");
        }
        let status = self.status();
        let payload = ErrorPayload {
            kind: self.kind(),
            status: status.as_u16(),
            detail: self.to_string(),
            path: None,
        };
        let mut response = (status, Json(payload.clone())).into_response();
        response.extensions_mut().insert(payload);
        response
    }
}

/// Re-render error payloads with the originating request path
pub(super) async fn attach_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;
    match response.extensions_mut().remove::<ErrorPayload>() {
        Some(mut payload) => {
            payload.path = Some(path);
            (response.status(), Json(payload)).into_response()
        }
        None => response,
    }
}
