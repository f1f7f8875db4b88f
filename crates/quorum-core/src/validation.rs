//! Validation utilities.

use crate::{FieldError, QuorumError};
use validator::{Validate, ValidationErrors};

/// Extension trait for validation.
pub trait ValidateExt: Validate {
    /// Validates the struct and returns a `QuorumError` on failure.
    fn validate_request(&self) -> Result<(), QuorumError> {
        self.validate().map_err(validation_errors_to_quorum_error)
    }
}

impl<T: Validate> ValidateExt for T {}

/// Converts `validator::ValidationErrors` to `QuorumError`.
#[must_use]
pub fn validation_errors_to_quorum_error(errors: ValidationErrors) -> QuorumError {
    let field_errors: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: (*field).to_string(),
                message: error
                    .message
                    .as_ref()
                    .map_or_else(|| error.code.to_string(), |m| m.to_string()),
                code: error.code.to_string(),
            })
        })
        .collect();

    let message = field_errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ");

    QuorumError::Validation(message)
}

/// Common validation functions.
pub mod rules {
    use validator::ValidationError;

    /// Validates that a string is not blank (not empty after trimming).
    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(ValidationError::new("not_blank"));
        }
        Ok(())
    }

    /// Validates a `0x`-prefixed 40-hex-digit address.
    pub fn valid_address(value: &str) -> Result<(), ValidationError> {
        let hex = value
            .trim()
            .strip_prefix("0x")
            .or_else(|| value.trim().strip_prefix("0X"));

        match hex {
            Some(h) if h.len() == 40 && h.chars().all(|c| c.is_ascii_hexdigit()) => Ok(()),
            _ => Err(ValidationError::new("invalid_address")),
        }
    }

    /// Validates a proposal title: non-blank, bounded length.
    pub fn valid_title(value: &str) -> Result<(), ValidationError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::new("title_blank"));
        }
        if trimmed.len() > 200 {
            return Err(ValidationError::new("title_too_long"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::rules::*;

    #[test]
    fn test_not_blank() {
        assert!(not_blank("hello").is_ok());
        assert!(not_blank("   ").is_err());
        assert!(not_blank("").is_err());
    }

    #[test]
    fn test_valid_address() {
        assert!(valid_address("0x1111111111111111111111111111111111111111").is_ok());
        assert!(valid_address("0X1111111111111111111111111111111111111111").is_ok());
        assert!(valid_address("1111111111111111111111111111111111111111").is_err());
        assert!(valid_address("0x1234").is_err());
        assert!(valid_address("0xgggggggggggggggggggggggggggggggggggggggg").is_err());
    }

    #[test]
    fn test_valid_title() {
        assert!(valid_title("Fund the treasury").is_ok());
        assert!(valid_title("  ").is_err());
        assert!(valid_title(&"x".repeat(201)).is_err());
    }
}
