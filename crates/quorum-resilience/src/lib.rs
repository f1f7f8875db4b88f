//! # Quorum Resilience
//!
//! Resilience patterns for the Quorum voting demo: retry with exponential
//! backoff and error classification, and timeout wrapping for chain calls.

pub mod retry;
pub mod timeout;

pub use retry::*;
pub use timeout::*;
