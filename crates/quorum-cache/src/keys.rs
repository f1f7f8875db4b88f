//! Cache key generators for consistent key naming.

use quorum_core::{ProposalId, VoterAddress};

/// Prefix for all cache keys to namespace them.
const CACHE_PREFIX: &str = "quorum:cache";

/// Tag carried by every proposal-derived entry.
pub const PROPOSAL_TAG: &str = "proposals";

/// Generate a cache key for a proposal by ID.
#[must_use]
pub fn proposal_by_id(id: ProposalId) -> String {
    format!("{}:proposal:id:{}", CACHE_PREFIX, id)
}

/// Generate a cache key for a page of the proposal list.
#[must_use]
pub fn proposal_page(page: usize, size: usize) -> String {
    format!("{}:proposal:page:{}:{}", CACHE_PREFIX, page, size)
}

/// Generate a cache key for a has-voted check.
#[must_use]
pub fn has_voted(id: ProposalId, voter: &VoterAddress) -> String {
    format!("{}:voted:{}:{}", CACHE_PREFIX, id, voter)
}

/// Pattern matching every proposal-derived key.
#[must_use]
pub fn proposal_pattern() -> String {
    format!("^{}:proposal:", CACHE_PREFIX)
}
