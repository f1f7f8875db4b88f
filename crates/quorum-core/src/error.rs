//! Unified error types for all layers of the application.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use thiserror::Error;

/// Coarse error category used for retry decisions and client reporting.
///
/// Errors arriving from the chain boundary are opaque strings; they are
/// sorted into a category by keyword matching on the message. Errors raised
/// inside this codebase map to a category directly from their variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Transport-level failures (connection refused, DNS, reset).
    Network,
    /// The contract rejected the operation (revert, out of gas).
    Contract,
    /// Wallet-side failures (user rejection, missing signer).
    Wallet,
    /// Malformed or out-of-range input.
    Validation,
    /// Caller lacks authorization for the operation.
    Permission,
    /// The operation did not complete within its deadline.
    Timeout,
    /// Anything that could not be classified.
    Unknown,
}

impl ErrorCategory {
    /// Classifies an opaque error message by keyword matching.
    ///
    /// Timeout keywords are checked before network ones so that
    /// "connection timed out" lands in `Timeout`.
    #[must_use]
    pub fn from_message(message: &str) -> Self {
        let msg = message.to_lowercase();

        const TIMEOUT: &[&str] = &["timeout", "timed out", "deadline exceeded"];
        const NETWORK: &[&str] = &[
            "network",
            "connection",
            "connect",
            "unreachable",
            "dns",
            "socket",
            "fetch",
        ];
        const WALLET: &[&str] = &[
            "wallet",
            "user rejected",
            "user denied",
            "signature",
            "signer",
        ];
        const PERMISSION: &[&str] = &[
            "unauthorized",
            "permission",
            "forbidden",
            "not authorized",
            "access denied",
            "only owner",
        ];
        const CONTRACT: &[&str] = &["revert", "contract", "gas", "nonce", "execution"];
        const VALIDATION: &[&str] = &["invalid", "validation", "malformed", "required"];

        let matches = |keywords: &[&str]| keywords.iter().any(|k| msg.contains(k));

        if matches(TIMEOUT) {
            Self::Timeout
        } else if matches(NETWORK) {
            Self::Network
        } else if matches(WALLET) {
            Self::Wallet
        } else if matches(PERMISSION) {
            Self::Permission
        } else if matches(CONTRACT) {
            Self::Contract
        } else if matches(VALIDATION) {
            Self::Validation
        } else {
            Self::Unknown
        }
    }

    /// Whether errors of this category are worth retrying.
    ///
    /// Transient categories (network, wallet, timeout, unknown) retry;
    /// deterministic rejections (contract, validation, permission) do not.
    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Network | Self::Wallet | Self::Timeout | Self::Unknown
        )
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Network => "network",
            Self::Contract => "contract",
            Self::Wallet => "wallet",
            Self::Validation => "validation",
            Self::Permission => "permission",
            Self::Timeout => "timeout",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// Unified error type for all layers of Quorum.
#[derive(Error, Debug)]
pub enum QuorumError {
    /// Resource not found
    #[error("Resource not found: {resource_type} with id {id}")]
    NotFound {
        resource_type: &'static str,
        id: String,
    },

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Conflict error (e.g., duplicate vote)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Caller is not authorized for the operation
    #[error("Permission denied: {0}")]
    Permission(String),

    /// Wallet-side failure (rejection, missing signer)
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Transport-level failure reaching the chain
    #[error("Network error: {0}")]
    Network(String),

    /// The contract rejected the operation
    #[error("Contract error: {0}")]
    Contract(String),

    /// Timeout error
    #[error("Operation timed out: {0}")]
    Timeout(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl QuorumError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Validation(_) | Self::Wallet(_) => 400,
            Self::Conflict(_) => 409,
            Self::Permission(_) => 403,
            Self::Network(_) | Self::Contract(_) => 502,
            Self::Timeout(_) => 503,
            Self::Cache(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => 500,
        }
    }

    /// Returns a machine-readable error code.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::Permission(_) => "PERMISSION_DENIED",
            Self::Wallet(_) => "WALLET_ERROR",
            Self::Network(_) => "NETWORK_ERROR",
            Self::Contract(_) => "CONTRACT_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) | Self::Other(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the category of this error.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Network(_) => ErrorCategory::Network,
            Self::Contract(_) | Self::Conflict(_) => ErrorCategory::Contract,
            Self::Wallet(_) => ErrorCategory::Wallet,
            Self::Validation(_) | Self::NotFound { .. } => ErrorCategory::Validation,
            Self::Permission(_) => ErrorCategory::Permission,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::Cache(_) | Self::Configuration(_) | Self::Internal(_) | Self::Other(_) => {
                ErrorCategory::Unknown
            }
        }
    }

    /// Checks if this error is worth retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }

    /// Builds an error from an opaque message, classifying it by keywords.
    #[must_use]
    pub fn from_message(message: impl Into<String>) -> Self {
        let message = message.into();
        match ErrorCategory::from_message(&message) {
            ErrorCategory::Network => Self::Network(message),
            ErrorCategory::Contract => Self::Contract(message),
            ErrorCategory::Wallet => Self::Wallet(message),
            ErrorCategory::Validation => Self::Validation(message),
            ErrorCategory::Permission => Self::Permission(message),
            ErrorCategory::Timeout => Self::Timeout(message),
            ErrorCategory::Unknown => Self::Internal(message),
        }
    }

    /// Creates a not found error for a resource.
    #[must_use]
    pub fn not_found<T: ToString>(resource_type: &'static str, id: T) -> Self {
        Self::NotFound {
            resource_type,
            id: id.to_string(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation<T: Into<String>>(message: T) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict(message.into())
    }

    /// Creates a permission error.
    #[must_use]
    pub fn permission<T: Into<String>>(message: T) -> Self {
        Self::Permission(message.into())
    }

    /// Creates a network error.
    #[must_use]
    pub fn network<T: Into<String>>(message: T) -> Self {
        Self::Network(message.into())
    }

    /// Creates a contract error.
    #[must_use]
    pub fn contract<T: Into<String>>(message: T) -> Self {
        Self::Contract(message.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal<T: Into<String>>(message: T) -> Self {
        Self::Internal(message.into())
    }
}

impl From<serde_json::Error> for QuorumError {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Serializable error response for API responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional field-level errors for validation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level validation error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct FieldError {
    /// Field name
    pub field: String,
    /// Error message
    pub message: String,
    /// Error code
    pub code: String,
}

impl ErrorResponse {
    /// Creates a new error response from a `QuorumError`.
    #[must_use]
    pub fn from_error(error: &QuorumError) -> Self {
        Self {
            code: error.error_code().to_string(),
            message: error.to_string(),
            details: None,
        }
    }

    /// Sets field-level validation errors.
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<&QuorumError> for ErrorResponse {
    fn from(error: &QuorumError) -> Self {
        Self::from_error(error)
    }
}
