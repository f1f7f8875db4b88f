//! Application configuration structures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application name and metadata.
    #[serde(default)]
    pub app: AppMetadata,

    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,

    /// Cache configuration.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Chain/contract configuration.
    #[serde(default)]
    pub chain: ChainConfig,

    /// Retry configuration for chain calls.
    #[serde(default)]
    pub retry: RetrySettings,

    /// Observability configuration.
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Application metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMetadata {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: String,
    /// Environment (development, staging, production).
    pub environment: String,
}

impl Default for AppMetadata {
    fn default() -> Self {
        Self {
            name: "quorum".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host.
    pub host: String,
    /// HTTP server port.
    pub port: u16,
    /// Request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
    /// Enable CORS.
    pub cors_enabled: bool,
    /// CORS allowed origins.
    pub cors_origins: Vec<String>,
    /// Directory of static frontend assets served at `/`.
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            request_timeout_secs: 30,
            max_body_size: 1024 * 1024, // 1MB
            cors_enabled: true,
            cors_origins: vec!["*".to_string()],
            static_dir: "./public".to_string(),
        }
    }
}

impl ServerConfig {
    /// Returns the bind address.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the request timeout as a Duration.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Enable caching of chain reads.
    pub enabled: bool,
    /// Maximum number of cached entries.
    pub max_entries: usize,
    /// Default TTL for cached items in seconds.
    pub default_ttl_secs: u64,
    /// Short TTL for existence checks in seconds.
    pub short_ttl_secs: u64,
    /// Period of the background expiry sweep in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: 1024,
            default_ttl_secs: 300, // 5 minutes
            short_ttl_secs: 60,
            sweep_interval_secs: 30,
        }
    }
}

impl CacheSettings {
    /// Returns the default TTL as a Duration.
    #[must_use]
    pub const fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl_secs)
    }

    /// Returns the short TTL as a Duration.
    #[must_use]
    pub const fn short_ttl(&self) -> Duration {
        Duration::from_secs(self.short_ttl_secs)
    }

    /// Returns the sweep period as a Duration.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

/// Chain and contract configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Network name shown to clients.
    pub network: String,
    /// Chain ID.
    pub chain_id: u64,
    /// Deployed voting contract address.
    pub contract_address: String,
    /// Ledger owner address (may create proposals and authorize voters).
    pub owner_address: String,
    /// RPC call timeout in seconds.
    pub rpc_timeout_secs: u64,
    /// Known deployments surfaced at `/api/deployments`.
    #[serde(default)]
    pub deployments: Vec<DeploymentRecord>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            network: "fhevm-devnet".to_string(),
            chain_id: 9000,
            contract_address: "0x0000000000000000000000000000000000000000".to_string(),
            owner_address: "0x00000000000000000000000000000000000000a1".to_string(),
            rpc_timeout_secs: 10,
            deployments: Vec::new(),
        }
    }
}

impl ChainConfig {
    /// Returns the RPC timeout as a Duration.
    #[must_use]
    pub const fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

/// A known contract deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentRecord {
    /// Network name.
    pub network: String,
    /// Contract address on that network.
    pub address: String,
    /// Chain ID.
    pub chain_id: u64,
    /// Deployment timestamp (RFC 3339).
    pub deployed_at: String,
}

/// Retry configuration for chain calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Initial backoff delay in milliseconds.
    pub initial_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff.
    pub multiplier: f64,
    /// Whether to add jitter to delays.
    pub jitter: bool,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 100,
            max_delay_ms: 5_000,
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetrySettings {
    /// Returns the initial delay as a Duration.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms)
    }

    /// Returns the maximum delay as a Duration.
    #[must_use]
    pub const fn max_delay(&self) -> Duration {
        Duration::from_millis(self.max_delay_ms)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
    /// Log format (json, pretty).
    pub log_format: String,
    /// Enable metrics.
    pub metrics_enabled: bool,
    /// Metrics endpoint path.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
            metrics_enabled: true,
            metrics_path: "/api/metrics".to_string(),
        }
    }
}
