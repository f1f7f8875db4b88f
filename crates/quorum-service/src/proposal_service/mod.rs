//! Proposal service trait definition.

mod service_impl;

pub use service_impl::*;

use crate::dto::{
    AuthorizeVoterRequest, CastVoteRequest, CreateProposalRequest, HasVotedResponse,
    ProposalListResponse, ProposalResponse, TallyResponse, VoteReceiptResponse,
};
use async_trait::async_trait;
use quorum_core::{Interface, PageRequest, ProposalId, QuorumResult};

/// Proposal service trait.
///
/// Orchestrates the ledger behind the cache: reads are cache-aside with
/// single-flight de-duplication, writes invalidate the affected entries.
#[async_trait]
pub trait ProposalService: Interface + Send + Sync {
    /// Lists proposals with pagination.
    async fn list_proposals(&self, page: PageRequest) -> QuorumResult<ProposalListResponse>;

    /// Gets a proposal by ID.
    async fn get_proposal(&self, id: ProposalId) -> QuorumResult<ProposalResponse>;

    /// Creates a new proposal. Owner-only.
    async fn create_proposal(
        &self,
        request: CreateProposalRequest,
    ) -> QuorumResult<ProposalResponse>;

    /// Casts a ballot on a proposal.
    async fn cast_vote(
        &self,
        id: ProposalId,
        request: CastVoteRequest,
    ) -> QuorumResult<VoteReceiptResponse>;

    /// Checks whether an address already voted on a proposal.
    async fn has_voted(&self, id: ProposalId, voter: &str) -> QuorumResult<HasVotedResponse>;

    /// Reveals the tally of a closed proposal.
    async fn tally(&self, id: ProposalId) -> QuorumResult<TallyResponse>;

    /// Authorizes a voter. Owner-only.
    async fn authorize_voter(&self, request: AuthorizeVoterRequest) -> QuorumResult<()>;
}
