//! Client configuration and deployment endpoints.

use crate::responses::{ok, ApiResult};
use crate::state::AppState;
use axum::{extract::State, Json};
use quorum_config::{ClientConfig, DeploymentListing};

/// Serves the public client configuration.
///
/// Returned as a bare JSON object (no envelope); the frontend fetches it
/// before anything else is wired up.
#[utoipa::path(
    get,
    path = "/config.json",
    tag = "config",
    responses(
        (status = 200, description = "Public client configuration")
    )
)]
pub async fn client_config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(ClientConfig::from_app_config(&state.config))
}

/// Lists known contract deployments.
#[utoipa::path(
    get,
    path = "/api/deployments",
    tag = "config",
    responses(
        (status = 200, description = "Known deployments")
    )
)]
pub async fn deployments(State(state): State<AppState>) -> ApiResult<DeploymentListing> {
    ok(DeploymentListing::from_app_config(&state.config))
}
