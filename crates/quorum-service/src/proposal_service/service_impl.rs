//! Proposal service implementation.

use crate::dto::{
    AuthorizeVoterRequest, CastVoteRequest, CreateProposalRequest, HasVotedResponse,
    ProposalListResponse, ProposalResponse, TallyResponse, VoteReceiptResponse,
};
use crate::ledger::{Ledger, Proposal};
use crate::proposal_service::ProposalService;
use crate::singleflight::Singleflight;
use async_trait::async_trait;
use chrono::Utc;
use quorum_cache::{keys, CacheStore, CacheStoreExt, WriteOptions};
use quorum_config::AppConfig;
use quorum_core::{
    Page, PageRequest, ProposalId, QuorumError, QuorumResult, ValidateExt, VoterAddress,
};
use quorum_resilience::{with_timeout, RetryPolicy};
use shaku::Component;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Tunables for the service layer.
#[derive(Debug, Clone)]
pub struct ServiceSettings {
    /// Whether chain reads go through the cache.
    pub cache_enabled: bool,
    /// TTL for proposal reads.
    pub default_ttl: Duration,
    /// TTL for existence checks.
    pub short_ttl: Duration,
    /// Timeout applied to each chain call.
    pub rpc_timeout: Duration,
    /// Retry policy for chain calls.
    pub retry: RetryPolicy,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            default_ttl: Duration::from_secs(300),
            short_ttl: Duration::from_secs(60),
            rpc_timeout: Duration::from_secs(10),
            retry: RetryPolicy::default(),
        }
    }
}

impl ServiceSettings {
    /// Builds settings from the application configuration.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            cache_enabled: config.cache.enabled,
            default_ttl: config.cache.default_ttl(),
            short_ttl: config.cache.short_ttl(),
            rpc_timeout: config.chain.rpc_timeout(),
            retry: RetryPolicy {
                max_attempts: config.retry.max_attempts,
                initial_delay: config.retry.initial_delay(),
                max_delay: config.retry.max_delay(),
                multiplier: config.retry.multiplier,
                jitter: config.retry.jitter,
            },
        }
    }
}

/// Proposal service backed by the ledger and the cache.
#[derive(Component)]
#[shaku(interface = ProposalService)]
pub struct ProposalServiceImpl {
    #[shaku(inject)]
    ledger: Arc<dyn Ledger>,
    #[shaku(inject)]
    cache: Arc<dyn CacheStore>,
    settings: ServiceSettings,
    #[shaku(force_default)]
    flights: Singleflight,
}

impl ProposalServiceImpl {
    /// Creates a new proposal service.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn Ledger>,
        cache: Arc<dyn CacheStore>,
        settings: ServiceSettings,
    ) -> Self {
        Self {
            ledger,
            cache,
            settings,
            flights: Singleflight::new(),
        }
    }

    async fn chain_list(&self) -> QuorumResult<Vec<Proposal>> {
        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;
        self.settings
            .retry
            .execute_classified(move |_| {
                let ledger = Arc::clone(&ledger);
                async move { with_timeout(timeout, || async move { ledger.list_proposals().await }).await }
            })
            .await
    }

    async fn chain_get(&self, id: ProposalId) -> QuorumResult<Option<Proposal>> {
        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;
        self.settings
            .retry
            .execute_classified(move |_| {
                let ledger = Arc::clone(&ledger);
                async move {
                    with_timeout(timeout, || async move { ledger.get_proposal(id).await }).await
                }
            })
            .await
    }

    /// Drops every cached entry derived from proposal state.
    async fn invalidate_proposals(&self) {
        let removed = self.cache.clear_tags(&[keys::PROPOSAL_TAG.to_string()]).await;
        debug!(removed, "Invalidated proposal cache entries");
    }
}

#[async_trait]
impl ProposalService for ProposalServiceImpl {
    async fn list_proposals(&self, page: PageRequest) -> QuorumResult<ProposalListResponse> {
        let key = keys::proposal_page(page.page, page.size);

        if self.settings.cache_enabled {
            if let Some(cached) = self.cache.get::<ProposalListResponse>(&key).await? {
                return Ok(cached);
            }
        }

        // Only the first arrival for this page pays for the chain fetch.
        let _flight = self.flights.acquire(&key).await;

        if self.settings.cache_enabled {
            if let Some(cached) = self.cache.get::<ProposalListResponse>(&key).await? {
                return Ok(cached);
            }
        }

        let proposals = self.chain_list().await?;
        let now = Utc::now();
        let total = proposals.len() as u64;
        let content: Vec<ProposalResponse> = proposals
            .iter()
            .skip(page.offset())
            .take(page.size)
            .map(|p| ProposalResponse::from_proposal(p, now))
            .collect();

        let response = ProposalListResponse::from(Page::new(content, page, total));

        if self.settings.cache_enabled {
            self.cache
                .set_opts(
                    &key,
                    &response,
                    WriteOptions::new(self.settings.default_ttl).with_tag(keys::PROPOSAL_TAG),
                )
                .await?;
        }

        Ok(response)
    }

    async fn get_proposal(&self, id: ProposalId) -> QuorumResult<ProposalResponse> {
        let key = keys::proposal_by_id(id);

        if self.settings.cache_enabled {
            if let Some(cached) = self.cache.get::<ProposalResponse>(&key).await? {
                return Ok(cached);
            }
        }

        let _flight = self.flights.acquire(&key).await;

        if self.settings.cache_enabled {
            if let Some(cached) = self.cache.get::<ProposalResponse>(&key).await? {
                return Ok(cached);
            }
        }

        let proposal = self
            .chain_get(id)
            .await?
            .ok_or_else(|| QuorumError::not_found("Proposal", id))?;
        let response = ProposalResponse::from_proposal(&proposal, Utc::now());

        if self.settings.cache_enabled {
            self.cache
                .set_opts(
                    &key,
                    &response,
                    WriteOptions::new(self.settings.default_ttl).with_tag(keys::PROPOSAL_TAG),
                )
                .await?;
        }

        Ok(response)
    }

    async fn create_proposal(
        &self,
        request: CreateProposalRequest,
    ) -> QuorumResult<ProposalResponse> {
        debug!("Creating proposal: {}", request.title);
        request.validate_request()?;

        let creator = VoterAddress::parse(&request.creator)?;

        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;
        let title = request.title.clone();
        let description = request.description.clone();
        let deadline = request.deadline;

        let proposal = self
            .settings
            .retry
            .execute_classified(move |_| {
                let ledger = Arc::clone(&ledger);
                let creator = creator.clone();
                let title = title.clone();
                let description = description.clone();
                async move {
                    with_timeout(timeout, || async move {
                        ledger
                            .create_proposal(&creator, title, description, deadline)
                            .await
                    })
                    .await
                }
            })
            .await?;

        self.invalidate_proposals().await;

        info!(proposal_id = %proposal.id, "Proposal created");
        Ok(ProposalResponse::from_proposal(&proposal, Utc::now()))
    }

    async fn cast_vote(
        &self,
        id: ProposalId,
        request: CastVoteRequest,
    ) -> QuorumResult<VoteReceiptResponse> {
        debug!(proposal_id = %id, "Casting vote");
        request.validate_request()?;

        let voter = VoterAddress::parse(&request.voter)?;
        let choice = request.choice;

        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;
        let receipt = {
            let voter = voter.clone();
            self.settings
                .retry
                .execute_classified(move |_| {
                    let ledger = Arc::clone(&ledger);
                    let voter = voter.clone();
                    async move {
                        with_timeout(timeout, || async move {
                            ledger.cast_vote(id, &voter, choice).await
                        })
                        .await
                    }
                })
                .await?
        };

        // The voter's existence check and every proposal read are stale now.
        self.cache.delete(&keys::has_voted(id, &voter)).await;
        self.invalidate_proposals().await;

        info!(proposal_id = %id, voter = %voter, "Vote cast");
        Ok(VoteReceiptResponse::from(receipt))
    }

    async fn has_voted(&self, id: ProposalId, voter: &str) -> QuorumResult<HasVotedResponse> {
        let voter = VoterAddress::parse(voter)?;
        let key = keys::has_voted(id, &voter);

        if self.settings.cache_enabled {
            if let Some(cached) = self.cache.get::<HasVotedResponse>(&key).await? {
                return Ok(cached);
            }
        }

        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;
        let voted = {
            let voter = voter.clone();
            self.settings
                .retry
                .execute_classified(move |_| {
                    let ledger = Arc::clone(&ledger);
                    let voter = voter.clone();
                    async move {
                        with_timeout(timeout, || async move {
                            ledger.has_voted(id, &voter).await
                        })
                        .await
                    }
                })
                .await?
        };

        let response = HasVotedResponse {
            proposal_id: id.into_inner(),
            voter: voter.to_string(),
            has_voted: voted,
        };

        if self.settings.cache_enabled {
            self.cache
                .set(&key, &response, self.settings.short_ttl)
                .await?;
        }

        Ok(response)
    }

    async fn tally(&self, id: ProposalId) -> QuorumResult<TallyResponse> {
        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;

        // Reveals flip exactly at the deadline, so tallies are never cached.
        let tally = self
            .settings
            .retry
            .execute_classified(move |_| {
                let ledger = Arc::clone(&ledger);
                async move {
                    with_timeout(timeout, || async move { ledger.tally(id).await }).await
                }
            })
            .await?;

        Ok(TallyResponse::from(tally))
    }

    async fn authorize_voter(&self, request: AuthorizeVoterRequest) -> QuorumResult<()> {
        request.validate_request()?;

        let caller = VoterAddress::parse(&request.caller)?;
        let voter = VoterAddress::parse(&request.voter)?;

        let ledger = Arc::clone(&self.ledger);
        let timeout = self.settings.rpc_timeout;
        self.settings
            .retry
            .execute_classified(move |_| {
                let ledger = Arc::clone(&ledger);
                let caller = caller.clone();
                let voter = voter.clone();
                async move {
                    with_timeout(timeout, || async move {
                        ledger.authorize_voter(&caller, voter).await
                    })
                    .await
                }
            })
            .await
    }
}
