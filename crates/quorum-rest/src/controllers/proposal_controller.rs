//! Proposal and voting controller.

use crate::{
    extractors::{PaginationQuery, ValidatedJson},
    responses::{created, no_content, ok, ApiResponse, ApiResult, AppError},
    state::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use quorum_core::ProposalId;
use quorum_service::{
    AuthorizeVoterRequest, CastVoteRequest, CreateProposalRequest, HasVotedResponse,
    ProposalListResponse, ProposalResponse, TallyResponse, VoteReceiptResponse,
};
use tracing::debug;

/// Creates the proposal router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_proposals).post(create_proposal))
        .route("/:id", get(get_proposal))
        .route("/:id/votes", post(cast_vote))
        .route("/:id/tally", get(get_tally))
        .route("/:id/voters/:address", get(has_voted))
}

/// Creates the voter administration router.
pub fn voters_router() -> Router<AppState> {
    Router::new().route("/", post(authorize_voter))
}

/// List proposals with pagination.
#[utoipa::path(
    get,
    path = "/api/proposals",
    tag = "proposals",
    params(
        ("page" = Option<usize>, Query, description = "Page number (0-indexed)"),
        ("size" = Option<usize>, Query, description = "Items per page"),
    ),
    responses(
        (status = 200, description = "Paginated proposal listing", body = ProposalListResponse)
    )
)]
pub async fn list_proposals(
    State(state): State<AppState>,
    Query(pagination): Query<PaginationQuery>,
) -> ApiResult<ProposalListResponse> {
    debug!("List proposals request");

    let response = state.proposal_service.list_proposals(pagination.into()).await?;
    ok(response)
}

/// Get a proposal by ID.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}",
    tag = "proposals",
    params(("id" = u64, Path, description = "Proposal ID")),
    responses(
        (status = 200, description = "The proposal", body = ProposalResponse),
        (status = 404, description = "Unknown proposal")
    )
)]
pub async fn get_proposal(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<ProposalResponse> {
    debug!("Get proposal request: {}", id);

    let response = state.proposal_service.get_proposal(ProposalId::new(id)).await?;
    ok(response)
}

/// Create a new proposal (ledger owner only).
#[utoipa::path(
    post,
    path = "/api/proposals",
    tag = "proposals",
    request_body = CreateProposalRequest,
    responses(
        (status = 201, description = "Proposal created", body = ProposalResponse),
        (status = 403, description = "Caller is not the owner"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn create_proposal(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateProposalRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ProposalResponse>>), AppError> {
    debug!("Create proposal request: {}", request.title);

    let response = state.proposal_service.create_proposal(request).await?;
    Ok(created(response))
}

/// Cast a ballot on a proposal.
#[utoipa::path(
    post,
    path = "/api/proposals/{id}/votes",
    tag = "proposals",
    params(("id" = u64, Path, description = "Proposal ID")),
    request_body = CastVoteRequest,
    responses(
        (status = 201, description = "Ballot recorded", body = VoteReceiptResponse),
        (status = 403, description = "Voter is not authorized"),
        (status = 404, description = "Unknown proposal"),
        (status = 409, description = "Voter already voted")
    )
)]
pub async fn cast_vote(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    ValidatedJson(request): ValidatedJson<CastVoteRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VoteReceiptResponse>>), AppError> {
    debug!("Cast vote request on proposal {}", id);

    let response = state
        .proposal_service
        .cast_vote(ProposalId::new(id), request)
        .await?;
    Ok(created(response))
}

/// Reveal the tally of a closed proposal.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}/tally",
    tag = "proposals",
    params(("id" = u64, Path, description = "Proposal ID")),
    responses(
        (status = 200, description = "Revealed tally", body = TallyResponse),
        (status = 404, description = "Unknown proposal"),
        (status = 502, description = "Tally is still sealed")
    )
)]
pub async fn get_tally(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<TallyResponse> {
    debug!("Tally request for proposal {}", id);

    let response = state.proposal_service.tally(ProposalId::new(id)).await?;
    ok(response)
}

/// Check whether an address already voted on a proposal.
#[utoipa::path(
    get,
    path = "/api/proposals/{id}/voters/{address}",
    tag = "proposals",
    params(
        ("id" = u64, Path, description = "Proposal ID"),
        ("address" = String, Path, description = "Voter address"),
    ),
    responses(
        (status = 200, description = "Has-voted flag", body = HasVotedResponse),
        (status = 400, description = "Malformed address")
    )
)]
pub async fn has_voted(
    State(state): State<AppState>,
    Path((id, address)): Path<(u64, String)>,
) -> ApiResult<HasVotedResponse> {
    debug!("Has-voted request for proposal {}", id);

    let response = state
        .proposal_service
        .has_voted(ProposalId::new(id), &address)
        .await?;
    ok(response)
}

/// Authorize a voter (ledger owner only).
#[utoipa::path(
    post,
    path = "/api/voters",
    tag = "proposals",
    request_body = AuthorizeVoterRequest,
    responses(
        (status = 204, description = "Voter authorized"),
        (status = 403, description = "Caller is not the owner"),
        (status = 422, description = "Validation failed")
    )
)]
pub async fn authorize_voter(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AuthorizeVoterRequest>,
) -> Result<StatusCode, AppError> {
    debug!("Authorize voter request: {}", request.voter);

    state.proposal_service.authorize_voter(request).await?;
    Ok(no_content())
}
