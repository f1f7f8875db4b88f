//! Application state for Axum handlers.

use metrics_exporter_prometheus::PrometheusHandle;
use quorum_cache::CacheStore;
use quorum_config::AppConfig;
use quorum_core::HealthCheck;
use quorum_service::{CacheHealthCheck, Ledger, LedgerHealthCheck, ProposalService};
use shaku::{HasComponent, Module};
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub proposal_service: Arc<dyn ProposalService>,
    pub config: Arc<AppConfig>,
    pub metrics: Option<PrometheusHandle>,
    pub health_checks: Arc<Vec<Box<dyn HealthCheck>>>,
}

impl AppState {
    /// Creates application state from explicit components.
    #[must_use]
    pub fn new(
        proposal_service: Arc<dyn ProposalService>,
        config: Arc<AppConfig>,
        metrics: Option<PrometheusHandle>,
        health_checks: Vec<Box<dyn HealthCheck>>,
    ) -> Self {
        Self {
            proposal_service,
            config,
            metrics,
            health_checks: Arc::new(health_checks),
        }
    }

    /// Creates application state by resolving components from a Shaku module.
    pub fn from_module<M>(
        module: &M,
        config: Arc<AppConfig>,
        metrics: Option<PrometheusHandle>,
    ) -> Self
    where
        M: Module
            + HasComponent<dyn ProposalService>
            + HasComponent<dyn Ledger>
            + HasComponent<dyn CacheStore>,
    {
        let proposal_service: Arc<dyn ProposalService> = module.resolve();
        let ledger: Arc<dyn Ledger> = module.resolve();
        let cache: Arc<dyn CacheStore> = module.resolve();

        let health_checks: Vec<Box<dyn HealthCheck>> = vec![
            Box::new(CacheHealthCheck::new(cache)),
            Box::new(LedgerHealthCheck::new(ledger)),
        ];

        Self::new(proposal_service, config, metrics, health_checks)
    }
}
