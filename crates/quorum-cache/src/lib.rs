//! # Quorum Cache
//!
//! In-memory TTL cache with bounded capacity for the Quorum voting demo.
//! Entries carry independent expiry, a priority tier, and invalidation tags;
//! under capacity pressure the entry with the lowest blended
//! recency/frequency/priority score is evicted. A background sweeper reaps
//! expired entries between accesses.
//!
//! Values are stored as serialized copies, so the cache owns its contents
//! exclusively and callers can never alias cached state.

pub mod entry;
pub mod keys;
pub mod memory;
pub mod metrics;
pub mod store;
pub mod sweeper;

pub use entry::*;
pub use memory::*;
pub use store::*;
pub use sweeper::*;
