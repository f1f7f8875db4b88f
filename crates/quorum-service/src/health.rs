//! Health checks for the cache and the ledger.

use crate::ledger::Ledger;
use async_trait::async_trait;
use quorum_cache::CacheStore;
use quorum_core::{HealthCheck, HealthStatus};
use std::sync::Arc;

/// Health check over the cache store.
pub struct CacheHealthCheck {
    cache: Arc<dyn CacheStore>,
}

impl CacheHealthCheck {
    /// Creates a new cache health check.
    #[must_use]
    pub fn new(cache: Arc<dyn CacheStore>) -> Self {
        Self { cache }
    }
}

#[async_trait]
impl HealthCheck for CacheHealthCheck {
    fn name(&self) -> &str {
        "cache"
    }

    async fn check(&self) -> HealthStatus {
        let stats = self.cache.stats();
        if stats.size > stats.capacity {
            return HealthStatus::Degraded(format!(
                "cache holds {} entries over its capacity of {}",
                stats.size, stats.capacity
            ));
        }
        HealthStatus::Healthy
    }
}

/// Health check over the ledger boundary.
pub struct LedgerHealthCheck {
    ledger: Arc<dyn Ledger>,
}

impl LedgerHealthCheck {
    /// Creates a new ledger health check.
    #[must_use]
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }
}

#[async_trait]
impl HealthCheck for LedgerHealthCheck {
    fn name(&self) -> &str {
        "ledger"
    }

    async fn check(&self) -> HealthStatus {
        match self.ledger.proposal_count().await {
            Ok(_) => HealthStatus::Healthy,
            Err(e) => HealthStatus::Unhealthy(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::InMemoryLedger;
    use quorum_cache::MemoryCache;
    use quorum_core::VoterAddress;

    #[tokio::test]
    async fn test_cache_health_check() {
        let check = CacheHealthCheck::new(Arc::new(MemoryCache::new(8)));
        assert_eq!(check.name(), "cache");
        assert!(check.check().await.is_healthy());
    }

    #[tokio::test]
    async fn test_ledger_health_check() {
        let check = LedgerHealthCheck::new(Arc::new(InMemoryLedger::new(VoterAddress::zero())));
        assert_eq!(check.name(), "ledger");
        assert!(check.check().await.is_healthy());
    }
}
