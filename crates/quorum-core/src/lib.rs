//! # Quorum Core
//!
//! Core types, traits, and error definitions for the Quorum voting demo.
//! This crate provides the foundational abstractions shared by every layer:
//! the unified error taxonomy, typed identifiers, validation helpers,
//! pagination, and the health-check contract.

pub mod error;
pub mod health;
pub mod id;
pub mod pagination;
pub mod result;
pub mod validation;

pub use error::*;
pub use health::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
