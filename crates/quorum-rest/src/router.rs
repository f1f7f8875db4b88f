//! Main application router.

use crate::{
    controllers::{config_controller, health_controller, metrics_controller, proposal_controller},
    middleware::logging_middleware,
    openapi::ApiDoc,
    state::AppState,
};
use axum::{extract::DefaultBodyLimit, middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use quorum_cache::CacheStore;
use quorum_config::{AppConfig, ServerConfig};
use quorum_service::{Ledger, ProposalService};
use shaku::{HasComponent, Module};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

/// Creates the main application router from a Shaku module.
///
/// This is the preferred way to create the router, using Shaku for
/// dependency injection. The module must provide the proposal service,
/// the ledger, and the cache store.
pub fn create_router<M>(
    module: &M,
    config: Arc<AppConfig>,
    metrics: Option<PrometheusHandle>,
) -> Router
where
    M: Module
        + HasComponent<dyn ProposalService>
        + HasComponent<dyn Ledger>
        + HasComponent<dyn CacheStore>,
{
    let state = AppState::from_module(module, Arc::clone(&config), metrics);
    create_router_with_state(state, &config.server)
}

/// Creates the main application router from pre-built state.
pub fn create_router_with_state(state: AppState, server_config: &ServerConfig) -> Router {
    let cors = create_cors_layer(server_config);

    // JSON API under /api
    let api_router = Router::new()
        .nest("/proposals", proposal_controller::router())
        .nest("/voters", proposal_controller::voters_router())
        .route("/health", get(health_controller::readiness_check))
        .route("/metrics", get(metrics_controller::render_metrics))
        .route("/deployments", get(config_controller::deployments));

    let router = Router::new()
        // Health endpoints at the root (no envelope)
        .merge(health_controller::router())
        // Public client configuration
        .route("/config.json", get(config_controller::client_config))
        // API v1
        .nest("/api", api_router)
        .with_state(state)
        // Swagger UI and OpenAPI spec
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Static frontend
        .fallback_service(ServeDir::new(&server_config.static_dir))
        // Middleware layers
        .layer(DefaultBodyLimit::max(server_config.max_body_size))
        .layer(TimeoutLayer::new(server_config.request_timeout()))
        .layer(CompressionLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(logging_middleware));

    info!("Router created with REST endpoints and Swagger UI at /swagger-ui");
    router
}

/// Creates a CORS layer based on server configuration.
fn create_cors_layer(server_config: &ServerConfig) -> CorsLayer {
    if server_config.cors_enabled {
        if server_config.cors_origins.contains(&"*".to_string()) {
            CorsLayer::permissive()
        } else {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        }
    } else {
        CorsLayer::new()
    }
}
