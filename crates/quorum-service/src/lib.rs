//! # Quorum Service
//!
//! Business logic service layer for the Quorum voting demo.
//! Contains the ledger simulation, the proposal service with cache-aside
//! reads, and request/response DTOs.

pub mod dto;
pub mod health;
pub mod ledger;
pub mod proposal_service;
pub mod singleflight;

pub use dto::*;
pub use health::*;
pub use ledger::*;
pub use proposal_service::*;
pub use singleflight::*;
