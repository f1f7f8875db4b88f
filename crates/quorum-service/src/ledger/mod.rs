//! The voting ledger: domain types and the chain-boundary trait.
//!
//! The real system delegates tallying to an external FHE runtime; this
//! crate models that boundary as the [`Ledger`] trait and ships an
//! in-process simulation ([`InMemoryLedger`]) that keeps tallies behind a
//! sealed wrapper until the proposal deadline passes.

mod memory;

pub use memory::*;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quorum_core::{ProposalId, QuorumError, QuorumResult, ReceiptId, VoterAddress};
use serde::{Deserialize, Serialize};
use shaku::Interface;

/// A ballot choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VoteChoice {
    Yes,
    No,
}

/// Revealed tally of a closed proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyResult {
    pub yes: u64,
    pub no: u64,
}

/// Vote counters that stay sealed until the proposal deadline.
///
/// The counts are plain integers behind a wrapper that refuses to reveal
/// them early; only the total number of ballots is public while voting is
/// open.
#[derive(Debug, Clone, Default)]
pub struct SealedTally {
    yes: u64,
    no: u64,
}

impl SealedTally {
    pub(crate) fn record(&mut self, choice: VoteChoice) {
        match choice {
            VoteChoice::Yes => self.yes += 1,
            VoteChoice::No => self.no += 1,
        }
    }

    /// Total number of ballots cast. Public while voting is open.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.yes + self.no
    }

    /// Reveals the counts once `now` is past `deadline`.
    pub fn reveal(&self, deadline: DateTime<Utc>, now: DateTime<Utc>) -> QuorumResult<TallyResult> {
        if now <= deadline {
            return Err(QuorumError::contract(
                "tally is sealed until the proposal deadline",
            ));
        }
        Ok(TallyResult {
            yes: self.yes,
            no: self.no,
        })
    }
}

/// A governance proposal.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub id: ProposalId,
    pub title: String,
    pub description: String,
    pub creator: VoterAddress,
    pub created_at: DateTime<Utc>,
    pub deadline: DateTime<Utc>,
    tally: SealedTally,
}

impl Proposal {
    pub(crate) fn new(
        id: ProposalId,
        title: String,
        description: String,
        creator: VoterAddress,
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            creator,
            created_at: now,
            deadline,
            tally: SealedTally::default(),
        }
    }

    /// Whether ballots are still being accepted at `now`.
    #[must_use]
    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        now <= self.deadline
    }

    /// Total number of ballots cast so far.
    #[must_use]
    pub fn total_votes(&self) -> u64 {
        self.tally.total()
    }

    /// Reveals the tally once the proposal is closed.
    pub fn reveal(&self, now: DateTime<Utc>) -> QuorumResult<TallyResult> {
        self.tally.reveal(self.deadline, now)
    }

    pub(crate) fn record(&mut self, choice: VoteChoice) {
        self.tally.record(choice);
    }
}

/// Receipt returned for a cast ballot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteReceipt {
    pub id: ReceiptId,
    pub proposal_id: ProposalId,
    pub voter: VoterAddress,
    pub cast_at: DateTime<Utc>,
}

/// The chain boundary: everything the voting contract exposes.
///
/// Consumed as an opaque RPC surface; callers treat every method as
/// potentially slow and fallible.
#[async_trait]
pub trait Ledger: Interface + Send + Sync {
    /// The ledger owner (may create proposals and authorize voters).
    async fn owner(&self) -> QuorumResult<VoterAddress>;

    /// Number of proposals ever created.
    async fn proposal_count(&self) -> QuorumResult<u64>;

    /// Authorizes a voter. Owner-only.
    async fn authorize_voter(
        &self,
        caller: &VoterAddress,
        voter: VoterAddress,
    ) -> QuorumResult<()>;

    /// Whether the address may cast ballots.
    async fn is_authorized(&self, voter: &VoterAddress) -> QuorumResult<bool>;

    /// Creates a proposal. Owner-only; the deadline must be in the future.
    async fn create_proposal(
        &self,
        caller: &VoterAddress,
        title: String,
        description: String,
        deadline: DateTime<Utc>,
    ) -> QuorumResult<Proposal>;

    /// Fetches a proposal by ID.
    async fn get_proposal(&self, id: ProposalId) -> QuorumResult<Option<Proposal>>;

    /// Lists all proposals in creation order.
    async fn list_proposals(&self) -> QuorumResult<Vec<Proposal>>;

    /// Casts a ballot. One ballot per voter per proposal.
    async fn cast_vote(
        &self,
        id: ProposalId,
        voter: &VoterAddress,
        choice: VoteChoice,
    ) -> QuorumResult<VoteReceipt>;

    /// Whether the voter already cast a ballot on the proposal.
    async fn has_voted(&self, id: ProposalId, voter: &VoterAddress) -> QuorumResult<bool>;

    /// Reveals the tally of a closed proposal.
    async fn tally(&self, id: ProposalId) -> QuorumResult<TallyResult>;
}
