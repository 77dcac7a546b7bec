use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use uuid::Uuid;

use super::AppState;
use crate::errors::CrawlboardError;
use crate::models::{AuthRequest, CrawlRequest};

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Maps domain errors onto HTTP statuses; anything unrecognized is a 500.
fn map_error(err: anyhow::Error) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = match err.downcast_ref::<CrawlboardError>() {
        Some(CrawlboardError::Validation(_)) => (StatusCode::BAD_REQUEST, "validation_error"),
        Some(CrawlboardError::NotFound(_)) => (StatusCode::NOT_FOUND, "not_found"),
        Some(CrawlboardError::NoJobs) => (StatusCode::NOT_FOUND, "no_jobs"),
        _ => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!("Request failed: {:#}", err);
    } else {
        tracing::warn!("Request rejected: {:#}", err);
    }
    (
        status,
        Json(ErrorResponse {
            error: code.to_string(),
            message: format!("{}", err),
        }),
    )
}

// ---------------------------------------------------------------------------
// Query params
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobParams {
    pub job_id: Option<String>,
}

impl JobParams {
    /// A blank `jobId=` behaves as absent. Anything non-blank must name
    /// an actual job, so a malformed id is a lookup miss, not a 400.
    fn parsed_job_id(&self) -> anyhow::Result<Option<Uuid>> {
        match self.job_id.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => Uuid::parse_str(raw)
                .map(Some)
                .map_err(|_| CrawlboardError::NotFound(format!("Crawl job {}", raw)).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Crawl handlers
// ---------------------------------------------------------------------------

/// POST /api/crawl/start
pub async fn start_crawl(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CrawlRequest>,
) -> impl IntoResponse {
    match state.crawl.submit(&request).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => map_error(e).into_response(),
    }
}

/// GET /api/crawl/live?jobId=
pub async fn live_status(
    State(state): State<Arc<AppState>>,
    Query(params): Query<JobParams>,
) -> impl IntoResponse {
    let job_id = match params.parsed_job_id() {
        Ok(id) => id,
        Err(e) => return map_error(e).into_response(),
    };
    match state.crawl.live_status(job_id).await {
        Ok(view) => Json(view).into_response(),
        Err(e) => map_error(e).into_response(),
    }
}

/// GET /api/crawl/logs?jobId=
pub async fn live_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<JobParams>,
) -> impl IntoResponse {
    let job_id = match params.parsed_job_id() {
        Ok(id) => id,
        Err(e) => return map_error(e).into_response(),
    };
    match state.crawl.live_logs(job_id).await {
        Ok(lines) => Json(lines).into_response(),
        Err(e) => map_error(e).into_response(),
    }
}

/// GET /api/crawl/summary
pub async fn summary(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.crawl.summary().await {
        Ok(summary) => Json(summary).into_response(),
        Err(e) => map_error(e).into_response(),
    }
}

/// GET /api/crawl/graph?jobId= -- demo payload, the id is ignored.
pub async fn graph(Query(_params): Query<JobParams>) -> impl IntoResponse {
    Json(super::fixtures::demo_graph())
}

/// GET /api/crawl/analytics?jobId= -- demo payload, the id is ignored.
pub async fn analytics(Query(_params): Query<JobParams>) -> impl IntoResponse {
    Json(super::fixtures::demo_analytics())
}

/// GET /api/crawl/health
pub async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Auth handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/signup -- rejected credentials still get a 200 with
/// `success: false`; only infrastructure faults become HTTP errors.
pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> impl IntoResponse {
    match state.auth.signup(&request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => map_error(e).into_response(),
    }
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AuthRequest>,
) -> impl IntoResponse {
    match state.auth.login(&request).await {
        Ok(response) => Json(response).into_response(),
        Err(e) => map_error(e).into_response(),
    }
}

/// POST /api/auth/validate -- raw token in the body, boolean out.
pub async fn validate(State(state): State<Arc<AppState>>, token: String) -> impl IntoResponse {
    Json(state.auth.validate_token(token.trim()))
}
