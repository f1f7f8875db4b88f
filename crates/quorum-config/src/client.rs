//! Public client-facing configuration.
//!
//! The frontend fetches this subset at `/config.json`; it must never leak
//! server-internal settings.

use crate::{AppConfig, DeploymentRecord};
use serde::{Deserialize, Serialize};

/// Configuration subset exposed to browser clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Network name.
    pub network: String,
    /// Chain ID.
    pub chain_id: u64,
    /// Deployed voting contract address.
    pub contract_address: String,
    /// Base path of the JSON API.
    pub api_base: String,
    /// Application version.
    pub version: String,
}

impl ClientConfig {
    /// Extracts the public subset from the full application config.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            network: config.chain.network.clone(),
            chain_id: config.chain.chain_id,
            contract_address: config.chain.contract_address.clone(),
            api_base: "/api".to_string(),
            version: config.app.version.clone(),
        }
    }
}

/// Deployment listing exposed at `/api/deployments`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentListing {
    /// Currently active network.
    pub active_network: String,
    /// Known deployments.
    pub deployments: Vec<DeploymentRecord>,
}

impl DeploymentListing {
    /// Builds the listing from the full application config.
    ///
    /// When no explicit deployment records are configured, the active
    /// contract itself is listed so the endpoint is never empty.
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        let mut deployments = config.chain.deployments.clone();
        if deployments.is_empty() {
            deployments.push(DeploymentRecord {
                network: config.chain.network.clone(),
                address: config.chain.contract_address.clone(),
                chain_id: config.chain.chain_id,
                deployed_at: String::new(),
            });
        }

        Self {
            active_network: config.chain.network.clone(),
            deployments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_config_subset() {
        let app = AppConfig::default();
        let client = ClientConfig::from_app_config(&app);

        assert_eq!(client.network, app.chain.network);
        assert_eq!(client.chain_id, app.chain.chain_id);
        assert_eq!(client.contract_address, app.chain.contract_address);
        assert_eq!(client.api_base, "/api");
    }

    #[test]
    fn test_client_config_does_not_leak_internals() {
        let client = ClientConfig::from_app_config(&AppConfig::default());
        let json = serde_json::to_value(&client).unwrap();

        assert!(json.get("owner_address").is_none());
        assert!(json.get("static_dir").is_none());
    }

    #[test]
    fn test_deployment_listing_falls_back_to_active_contract() {
        let app = AppConfig::default();
        let listing = DeploymentListing::from_app_config(&app);

        assert_eq!(listing.deployments.len(), 1);
        assert_eq!(listing.deployments[0].address, app.chain.contract_address);
    }

    #[test]
    fn test_deployment_listing_uses_configured_records() {
        let mut app = AppConfig::default();
        app.chain.deployments.push(DeploymentRecord {
            network: "sepolia".to_string(),
            address: "0x1111111111111111111111111111111111111111".to_string(),
            chain_id: 11155111,
            deployed_at: "2025-06-01T00:00:00Z".to_string(),
        });

        let listing = DeploymentListing::from_app_config(&app);
        assert_eq!(listing.deployments.len(), 1);
        assert_eq!(listing.deployments[0].network, "sepolia");
    }
}
