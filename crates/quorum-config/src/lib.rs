//! # Quorum Config
//!
//! Configuration management for the Quorum voting demo.
//! Supports layered configuration from files and environment variables,
//! plus the public client-facing configuration subset.

mod app_config;
mod client;
mod loader;

pub use app_config::*;
pub use client::*;
pub use loader::*;
