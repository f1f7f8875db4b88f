//! In-process ledger simulation.

use super::{Ledger, Proposal, TallyResult, VoteChoice, VoteReceipt};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use quorum_core::{ProposalId, QuorumError, QuorumResult, ReceiptId, VoterAddress};
use shaku::Component;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, info};

#[derive(Default)]
struct LedgerState {
    proposals: BTreeMap<u64, Proposal>,
    voted: HashSet<(u64, VoterAddress)>,
    authorized: HashSet<VoterAddress>,
    next_id: u64,
}

/// In-memory simulation of the voting contract.
///
/// Enforces the contract's rules: only the owner creates proposals and
/// authorizes voters, only authorized addresses vote, one ballot per voter
/// per proposal, ballots only while the proposal is open, and tallies stay
/// sealed until the deadline.
#[derive(Component)]
#[shaku(interface = Ledger)]
pub struct InMemoryLedger {
    /// Ledger owner address.
    owner: VoterAddress,
    #[shaku(force_default)]
    state: RwLock<LedgerState>,
}

impl InMemoryLedger {
    /// Creates a ledger owned by `owner`.
    #[must_use]
    pub fn new(owner: VoterAddress) -> Self {
        Self {
            owner,
            state: RwLock::default(),
        }
    }

    fn require_owner(&self, caller: &VoterAddress) -> QuorumResult<()> {
        if *caller != self.owner {
            return Err(QuorumError::permission(
                "only owner may perform this operation",
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for InMemoryLedger {
    async fn owner(&self) -> QuorumResult<VoterAddress> {
        Ok(self.owner.clone())
    }

    async fn proposal_count(&self) -> QuorumResult<u64> {
        Ok(self.state.read().next_id)
    }

    async fn authorize_voter(
        &self,
        caller: &VoterAddress,
        voter: VoterAddress,
    ) -> QuorumResult<()> {
        self.require_owner(caller)?;

        let mut state = self.state.write();
        if state.authorized.insert(voter.clone()) {
            info!(voter = %voter, "Voter authorized");
        }
        Ok(())
    }

    async fn is_authorized(&self, voter: &VoterAddress) -> QuorumResult<bool> {
        // The owner is implicitly authorized.
        if *voter == self.owner {
            return Ok(true);
        }
        Ok(self.state.read().authorized.contains(voter))
    }

    async fn create_proposal(
        &self,
        caller: &VoterAddress,
        title: String,
        description: String,
        deadline: DateTime<Utc>,
    ) -> QuorumResult<Proposal> {
        self.require_owner(caller)?;

        let now = Utc::now();
        if deadline <= now {
            return Err(QuorumError::validation(
                "proposal deadline must be in the future",
            ));
        }

        let mut state = self.state.write();
        state.next_id += 1;
        let id = ProposalId::new(state.next_id);

        let proposal = Proposal::new(id, title, description, caller.clone(), deadline, now);
        state.proposals.insert(id.into_inner(), proposal.clone());

        info!(proposal_id = %id, deadline = %deadline, "Proposal created");
        Ok(proposal)
    }

    async fn get_proposal(&self, id: ProposalId) -> QuorumResult<Option<Proposal>> {
        Ok(self.state.read().proposals.get(&id.into_inner()).cloned())
    }

    async fn list_proposals(&self) -> QuorumResult<Vec<Proposal>> {
        Ok(self.state.read().proposals.values().cloned().collect())
    }

    async fn cast_vote(
        &self,
        id: ProposalId,
        voter: &VoterAddress,
        choice: VoteChoice,
    ) -> QuorumResult<VoteReceipt> {
        if !self.is_authorized(voter).await? {
            return Err(QuorumError::permission(format!(
                "address {} is not authorized to vote",
                voter
            )));
        }

        let now = Utc::now();
        let mut state = self.state.write();

        let proposal = state
            .proposals
            .get(&id.into_inner())
            .ok_or_else(|| QuorumError::not_found("Proposal", id))?;

        if !proposal.is_open(now) {
            return Err(QuorumError::contract(format!(
                "voting is closed for proposal {}",
                id
            )));
        }

        let ballot_key = (id.into_inner(), voter.clone());
        if state.voted.contains(&ballot_key) {
            return Err(QuorumError::conflict(format!(
                "address {} already voted on proposal {}",
                voter, id
            )));
        }

        state.voted.insert(ballot_key);
        if let Some(proposal) = state.proposals.get_mut(&id.into_inner()) {
            proposal.record(choice);
        }

        let receipt = VoteReceipt {
            id: ReceiptId::new(),
            proposal_id: id,
            voter: voter.clone(),
            cast_at: now,
        };

        debug!(proposal_id = %id, voter = %voter, "Ballot recorded");
        Ok(receipt)
    }

    async fn has_voted(&self, id: ProposalId, voter: &VoterAddress) -> QuorumResult<bool> {
        Ok(self
            .state
            .read()
            .voted
            .contains(&(id.into_inner(), voter.clone())))
    }

    async fn tally(&self, id: ProposalId) -> QuorumResult<TallyResult> {
        let state = self.state.read();
        let proposal = state
            .proposals
            .get(&id.into_inner())
            .ok_or_else(|| QuorumError::not_found("Proposal", id))?;

        proposal.reveal(Utc::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    fn addr(suffix: u8) -> VoterAddress {
        VoterAddress::parse(&format!("0x{:040x}", suffix)).unwrap()
    }

    fn ledger() -> InMemoryLedger {
        InMemoryLedger::new(addr(0xa1))
    }

    fn future_deadline() -> DateTime<Utc> {
        Utc::now() + ChronoDuration::hours(1)
    }

    #[tokio::test]
    async fn test_owner_creates_proposal() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        let proposal = ledger
            .create_proposal(
                &owner,
                "Fund the treasury".to_string(),
                "Move 100 tokens".to_string(),
                future_deadline(),
            )
            .await
            .unwrap();

        assert_eq!(proposal.id, ProposalId::new(1));
        assert_eq!(ledger.proposal_count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_non_owner_cannot_create_proposal() {
        let ledger = ledger();

        let result = ledger
            .create_proposal(
                &addr(0xb2),
                "Sneaky".to_string(),
                String::new(),
                future_deadline(),
            )
            .await;

        assert!(matches!(result, Err(QuorumError::Permission(_))));
    }

    #[tokio::test]
    async fn test_past_deadline_rejected() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        let result = ledger
            .create_proposal(
                &owner,
                "Too late".to_string(),
                String::new(),
                Utc::now() - ChronoDuration::hours(1),
            )
            .await;

        assert!(matches!(result, Err(QuorumError::Validation(_))));
    }

    #[tokio::test]
    async fn test_authorized_voter_can_vote_once() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();
        let voter = addr(0xb2);

        let proposal = ledger
            .create_proposal(&owner, "P".to_string(), String::new(), future_deadline())
            .await
            .unwrap();
        ledger.authorize_voter(&owner, voter.clone()).await.unwrap();

        let receipt = ledger
            .cast_vote(proposal.id, &voter, VoteChoice::Yes)
            .await
            .unwrap();
        assert_eq!(receipt.proposal_id, proposal.id);
        assert!(ledger.has_voted(proposal.id, &voter).await.unwrap());

        // A second ballot from the same voter is a conflict.
        let second = ledger.cast_vote(proposal.id, &voter, VoteChoice::No).await;
        assert!(matches!(second, Err(QuorumError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unauthorized_voter_rejected() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        let proposal = ledger
            .create_proposal(&owner, "P".to_string(), String::new(), future_deadline())
            .await
            .unwrap();

        let result = ledger
            .cast_vote(proposal.id, &addr(0xdd), VoteChoice::Yes)
            .await;
        assert!(matches!(result, Err(QuorumError::Permission(_))));
    }

    #[tokio::test]
    async fn test_owner_is_implicitly_authorized() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        let proposal = ledger
            .create_proposal(&owner, "P".to_string(), String::new(), future_deadline())
            .await
            .unwrap();

        assert!(ledger
            .cast_vote(proposal.id, &owner, VoteChoice::No)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_vote_on_unknown_proposal() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        let result = ledger
            .cast_vote(ProposalId::new(99), &owner, VoteChoice::Yes)
            .await;
        assert!(matches!(result, Err(QuorumError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_tally_sealed_while_open() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        let proposal = ledger
            .create_proposal(&owner, "P".to_string(), String::new(), future_deadline())
            .await
            .unwrap();
        ledger
            .cast_vote(proposal.id, &owner, VoteChoice::Yes)
            .await
            .unwrap();

        let result = ledger.tally(proposal.id).await;
        assert!(matches!(result, Err(QuorumError::Contract(_))));

        // The ballot count is public even while sealed.
        let fetched = ledger.get_proposal(proposal.id).await.unwrap().unwrap();
        assert_eq!(fetched.total_votes(), 1);
    }

    #[tokio::test]
    async fn test_tally_revealed_after_deadline() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();
        let voter = addr(0xb2);
        ledger.authorize_voter(&owner, voter.clone()).await.unwrap();

        let proposal = ledger
            .create_proposal(
                &owner,
                "P".to_string(),
                String::new(),
                Utc::now() + ChronoDuration::milliseconds(40),
            )
            .await
            .unwrap();
        ledger
            .cast_vote(proposal.id, &owner, VoteChoice::Yes)
            .await
            .unwrap();
        ledger
            .cast_vote(proposal.id, &voter, VoteChoice::No)
            .await
            .unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(80)).await;

        let tally = ledger.tally(proposal.id).await.unwrap();
        assert_eq!(tally, TallyResult { yes: 1, no: 1 });

        // Voting is closed now.
        let late = ledger.cast_vote(proposal.id, &addr(0xee), VoteChoice::Yes).await;
        assert!(late.is_err());
    }

    #[tokio::test]
    async fn test_list_proposals_in_creation_order() {
        let ledger = ledger();
        let owner = ledger.owner().await.unwrap();

        for title in ["first", "second", "third"] {
            ledger
                .create_proposal(&owner, title.to_string(), String::new(), future_deadline())
                .await
                .unwrap();
        }

        let listed = ledger.list_proposals().await.unwrap();
        let titles: Vec<&str> = listed.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
    }
}
