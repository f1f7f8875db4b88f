//! # Quorum REST
//!
//! REST API layer using Axum for the Quorum voting demo.
//! Serves the proposal/vote JSON API, health and metrics endpoints, the
//! public client configuration, and the static frontend.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
