//! Prometheus metrics controller.

use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
};

/// Renders the Prometheus text exposition.
#[utoipa::path(
    get,
    path = "/api/metrics",
    tag = "observability",
    responses(
        (status = 200, description = "Prometheus text exposition", body = String, content_type = "text/plain"),
        (status = 404, description = "Metrics are disabled")
    )
)]
pub async fn render_metrics(State(state): State<AppState>) -> impl IntoResponse {
    if !state.config.observability.metrics_enabled {
        return StatusCode::NOT_FOUND.into_response();
    }

    match &state.metrics {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
