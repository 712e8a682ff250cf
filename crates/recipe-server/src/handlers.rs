//! HTTP request handlers for the gateway API.

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use recipe_core::{InvocationArguments, NormalizedResult};
use serde::Serialize;
use tracing::instrument;

use crate::{
    error::ApiError,
    extractors::{JsonBody, RequestId},
    pipeline,
    state::AppState,
};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Version
    pub version: String,
    /// Configured model invoker
    pub invoker: String,
}

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        invoker: state.invoker.id().to_string(),
    })
}

/// Readiness check endpoint
pub async fn readiness_check(State(state): State<AppState>) -> Result<&'static str, ApiError> {
    if state.invoker.is_ready() {
        Ok("ready")
    } else {
        Err(ApiError::service_unavailable(format!(
            "model invoker {} is not ready",
            state.invoker.id()
        )))
    }
}

/// Liveness check endpoint
pub async fn liveness_check() -> impl IntoResponse {
    (StatusCode::OK, "alive")
}

/// Metrics endpoint (Prometheus format)
pub async fn metrics_endpoint(State(state): State<AppState>) -> impl IntoResponse {
    let metrics = state.metrics.gather();
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        metrics,
    )
}

/// `askBedrock`: always 200 with a `{ body, error }` result
#[instrument(skip_all, fields(request_id = %request_id))]
pub async fn ask_bedrock(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    JsonBody(args): JsonBody<InvocationArguments>,
) -> Json<NormalizedResult> {
    Json(pipeline::ask_bedrock(&state, &args, &request_id).await)
}
