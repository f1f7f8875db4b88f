//! Server startup utilities.

use quorum_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
   ____
  / __ \__  ______  _______  ______ ___
 / / / / / / / __ \/ ___/ / / / __ `__ \
/ /_/ / /_/ / /_/ / /  / /_/ / / / / / /
\___\_\__,_/\____/_/   \__,_/_/ /_/ /_/

            Confidential Voting Demo
    "#
    );
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let addr = config.server.addr();
    info!("{}", separator);
    info!("REST API:    http://{}/api", addr);
    info!("Health:      http://{}/health", addr);
    info!("Client cfg:  http://{}/config.json", addr);
    info!("API Docs:    http://{}/swagger-ui", addr);
    if config.observability.metrics_enabled {
        info!("Metrics:     http://{}{}", addr, config.observability.metrics_path);
    }
    info!("Network:     {} (chain id {})", config.chain.network, config.chain.chain_id);
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_print_banner_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_startup_info(&AppConfig::default());
    }
}
