use crate::startup::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use service_core::observability::render_metrics;

/// Liveness probe; never touches the upstream.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "service": "answer-service",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness probe: a provider must be configured and reachable.
pub async fn readiness_check(State(state): State<AppState>) -> impl IntoResponse {
    let Some(provider) = state.text_provider.as_ref() else {
        return StatusCode::SERVICE_UNAVAILABLE;
    };

    match provider.health_check().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(provider = provider.name(), error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

/// Prometheus metrics endpoint.
pub async fn metrics_endpoint() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        render_metrics(),
    )
}
