//! Result type aliases for Quorum.

use crate::QuorumError;

/// A specialized `Result` type for Quorum operations.
pub type QuorumResult<T> = Result<T, QuorumError>;

/// A boxed future returning a `QuorumResult`.
pub type BoxFuture<'a, T> =
    std::pin::Pin<Box<dyn std::future::Future<Output = QuorumResult<T>> + Send + 'a>>;
