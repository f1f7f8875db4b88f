//! # Quorum Server
//!
//! Main entry point for the Quorum confidential-voting demo backend.
//! Wires configuration, logging, metrics, the DI module, the cache
//! sweeper, and the REST router, then serves until shutdown.

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use quorum_cache::{CacheStore, Sweeper};
use quorum_config::{AppConfig, ConfigLoader};
use quorum_core::{QuorumError, QuorumResult};
use quorum_rest::create_router;
use quorum_service::Ledger;
use shaku::HasComponent;
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};

mod di;
mod startup;

#[tokio::main]
async fn main() {
    init_logging();

    info!("Starting Quorum server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> QuorumResult<()> {
    // Load configuration
    let config_loader = ConfigLoader::from_default_location()?;
    let config = Arc::new(config_loader.get().await);

    info!("Environment: {}", config.app.environment);
    info!("Network: {}", config.chain.network);

    // Install the Prometheus recorder before anything records a metric
    let metrics = init_metrics(&config)?;

    // Build DI module - centralized dependency injection
    let module = di::build_app_module(&config)?;

    // Background expiry sweep over the shared cache
    let cache: Arc<dyn CacheStore> = module.resolve();
    let sweeper = Sweeper::spawn(cache, config.cache.sweep_interval());

    seed_demo_data(&module, &config).await?;

    // Create REST router
    let router = create_router(module.as_ref(), Arc::clone(&config), metrics);

    startup::print_banner();
    startup::print_startup_info(&config);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| QuorumError::Internal(format!("Failed to bind {}: {}", addr, e)))?;

    info!("Listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| QuorumError::Internal(format!("Server error: {}", e)))?;

    sweeper.shutdown().await;
    info!("Server shutdown complete");
    Ok(())
}

fn init_metrics(config: &AppConfig) -> QuorumResult<Option<PrometheusHandle>> {
    if !config.observability.metrics_enabled {
        return Ok(None);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| QuorumError::Internal(format!("Failed to install metrics recorder: {}", e)))?;

    quorum_cache::metrics::register_metrics();

    Ok(Some(handle))
}

/// Seeds a demo proposal in development so a fresh instance is browsable.
async fn seed_demo_data(module: &di::AppModule, config: &AppConfig) -> QuorumResult<()> {
    if config.app.environment != "development" {
        return Ok(());
    }

    let ledger: Arc<dyn Ledger> = module.resolve();
    if ledger.proposal_count().await? > 0 {
        return Ok(());
    }

    let owner = ledger.owner().await?;
    let proposal = ledger
        .create_proposal(
            &owner,
            "Enable confidential voting rewards".to_string(),
            "Demo proposal seeded at startup.".to_string(),
            chrono::Utc::now() + chrono::Duration::days(7),
        )
        .await?;

    info!(proposal_id = %proposal.id, "Seeded demo proposal");
    Ok(())
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,quorum=debug,tower_http=debug"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
