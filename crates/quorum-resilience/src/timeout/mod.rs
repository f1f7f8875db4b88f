//! Timeout wrapper for async operations.

use quorum_core::QuorumError;
use std::time::Duration;

/// Wraps an async operation with a timeout.
///
/// An elapsed deadline maps to [`QuorumError::Timeout`], which classifies
/// as retryable.
pub async fn with_timeout<F, Fut, T>(duration: Duration, f: F) -> Result<T, QuorumError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, QuorumError>>,
{
    tokio::time::timeout(duration, f())
        .await
        .map_err(|_| QuorumError::Timeout(format!("Operation timed out after {:?}", duration)))?
}

/// Timeout configuration.
#[derive(Debug, Clone)]
pub struct TimeoutConfig {
    /// Default timeout duration.
    pub default_timeout: Duration,
    /// Timeout for chain RPC calls.
    pub chain_timeout: Duration,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_timeout: Duration::from_secs(30),
            chain_timeout: Duration::from_secs(10),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_timeout_success() {
        let result =
            with_timeout(Duration::from_secs(1), || async { Ok::<_, QuorumError>(42) }).await;
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_timeout_exceeded() {
        let result = with_timeout(Duration::from_millis(10), || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, QuorumError>(42)
        })
        .await;

        assert!(matches!(result, Err(QuorumError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_timeout_error_is_retryable() {
        let result = with_timeout(Duration::from_millis(10), || async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            Ok::<_, QuorumError>(())
        })
        .await;

        assert!(result.unwrap_err().is_retryable());
    }

    #[test]
    fn test_timeout_config_default() {
        let config = TimeoutConfig::default();
        assert_eq!(config.default_timeout, Duration::from_secs(30));
        assert_eq!(config.chain_timeout, Duration::from_secs(10));
    }
}
