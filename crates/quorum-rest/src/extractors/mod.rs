//! Request extractors.

mod pagination;
mod validated;

pub use pagination::*;
pub use validated::*;
