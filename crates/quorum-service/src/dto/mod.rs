//! Request and response DTOs.

mod proposal_dto;

pub use proposal_dto::*;
