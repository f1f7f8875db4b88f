//! Dependency injection module using Shaku.
//!
//! Every process-wide component of the original design (cache, ledger,
//! proposal service) is constructed here once and handed to consumers as
//! `Arc<dyn Trait>`; nothing lives in ambient globals.

use quorum_cache::{MemoryCache, MemoryCacheParameters};
use quorum_config::AppConfig;
use quorum_core::{QuorumResult, VoterAddress};
use quorum_service::{
    InMemoryLedger, InMemoryLedgerParameters, ProposalServiceImpl, ProposalServiceImplParameters,
    ServiceSettings,
};
use shaku::module;
use std::sync::Arc;

module! {
    pub AppModule {
        components = [
            MemoryCache,
            InMemoryLedger,
            ProposalServiceImpl,
        ],
        providers = [],
    }
}

/// Builds the application module from configuration.
pub fn build_app_module(config: &AppConfig) -> QuorumResult<Arc<AppModule>> {
    let owner = VoterAddress::parse(&config.chain.owner_address)?;

    let module = AppModule::builder()
        .with_component_parameters::<MemoryCache>(MemoryCacheParameters {
            capacity: config.cache.max_entries,
        })
        .with_component_parameters::<InMemoryLedger>(InMemoryLedgerParameters { owner })
        .with_component_parameters::<ProposalServiceImpl>(ProposalServiceImplParameters {
            settings: ServiceSettings::from_config(config),
        })
        .build();

    Ok(Arc::new(module))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quorum_cache::CacheStore;
    use quorum_service::{Ledger, ProposalService};
    use shaku::HasComponent;

    #[test]
    fn test_module_provides_all_components() {
        fn _assert_has_cache<T: HasComponent<dyn CacheStore>>() {}
        fn _assert_has_ledger<T: HasComponent<dyn Ledger>>() {}
        fn _assert_has_service<T: HasComponent<dyn ProposalService>>() {}

        _assert_has_cache::<AppModule>();
        _assert_has_ledger::<AppModule>();
        _assert_has_service::<AppModule>();
    }

    #[tokio::test]
    async fn test_module_wiring_uses_config() {
        let config = AppConfig::default();
        let module = build_app_module(&config).unwrap();

        let ledger: Arc<dyn Ledger> = module.resolve();
        let owner = ledger.owner().await.unwrap();
        assert_eq!(owner.as_str(), config.chain.owner_address);

        let cache: Arc<dyn CacheStore> = module.resolve();
        assert_eq!(cache.stats().capacity, config.cache.max_entries);
    }

    #[test]
    fn test_bad_owner_address_is_configuration_error() {
        let mut config = AppConfig::default();
        config.chain.owner_address = "not-an-address".to_string();

        assert!(build_app_module(&config).is_err());
    }
}
