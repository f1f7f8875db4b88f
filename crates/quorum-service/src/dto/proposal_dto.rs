//! Proposal-related DTOs.

use crate::ledger::{Proposal, TallyResult, VoteChoice, VoteReceipt};
use chrono::{DateTime, Utc};
use quorum_core::Page;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request to create a new proposal.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateProposalRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,

    #[validate(length(max = 2000, message = "Description cannot exceed 2000 characters"))]
    #[serde(default)]
    pub description: String,

    /// Voting deadline (RFC 3339).
    pub deadline: DateTime<Utc>,

    /// Address of the creator; must be the ledger owner.
    #[validate(length(min = 42, max = 42, message = "Creator must be a 0x-prefixed address"))]
    pub creator: String,
}

/// Request to cast a ballot.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CastVoteRequest {
    /// Address of the voter.
    #[validate(length(min = 42, max = 42, message = "Voter must be a 0x-prefixed address"))]
    pub voter: String,

    /// Ballot choice.
    pub choice: VoteChoice,
}

/// Revealed tally of a closed proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TallyResponse {
    pub yes: u64,
    pub no: u64,
}

impl From<TallyResult> for TallyResponse {
    fn from(tally: TallyResult) -> Self {
        Self {
            yes: tally.yes,
            no: tally.no,
        }
    }
}

/// Proposal response DTO.
///
/// The tally is only present once the proposal is closed; while voting is
/// open, only the ballot count is public.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProposalResponse {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub creator: String,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    pub open: bool,
    pub total_votes: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<TallyResponse>,
}

impl ProposalResponse {
    /// Builds the response as seen at `now`.
    #[must_use]
    pub fn from_proposal(proposal: &Proposal, now: DateTime<Utc>) -> Self {
        let tally = proposal.reveal(now).ok().map(TallyResponse::from);

        Self {
            id: proposal.id.into_inner(),
            title: proposal.title.clone(),
            description: proposal.description.clone(),
            creator: proposal.creator.to_string(),
            created_at: proposal.created_at,
            deadline: proposal.deadline,
            open: proposal.is_open(now),
            total_votes: proposal.total_votes(),
            tally,
        }
    }
}

/// Paginated proposal listing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProposalListResponse {
    pub proposals: Vec<ProposalResponse>,
    pub page: usize,
    pub size: usize,
    pub total_elements: u64,
    pub total_pages: u64,
}

impl From<Page<ProposalResponse>> for ProposalListResponse {
    fn from(page: Page<ProposalResponse>) -> Self {
        Self {
            proposals: page.content,
            page: page.page,
            size: page.size,
            total_elements: page.total_elements,
            total_pages: page.total_pages,
        }
    }
}

/// Receipt response for a cast ballot.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VoteReceiptResponse {
    pub receipt_id: String,
    pub proposal_id: u64,
    pub voter: String,
    pub cast_at: DateTime<Utc>,
}

impl From<VoteReceipt> for VoteReceiptResponse {
    fn from(receipt: VoteReceipt) -> Self {
        Self {
            receipt_id: receipt.id.to_string(),
            proposal_id: receipt.proposal_id.into_inner(),
            voter: receipt.voter.to_string(),
            cast_at: receipt.cast_at,
        }
    }
}

/// Request to authorize a voter.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct AuthorizeVoterRequest {
    /// Address of the caller; must be the ledger owner.
    #[validate(length(min = 42, max = 42, message = "Caller must be a 0x-prefixed address"))]
    pub caller: String,

    /// Address being authorized.
    #[validate(length(min = 42, max = 42, message = "Voter must be a 0x-prefixed address"))]
    pub voter: String,
}

/// Response for a has-voted check.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HasVotedResponse {
    pub proposal_id: u64,
    pub voter: String,
    pub has_voted: bool,
}
