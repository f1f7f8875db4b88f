//! OpenAPI documentation.

use crate::controllers::{config_controller, health_controller, metrics_controller, proposal_controller};
use utoipa::OpenApi;

/// OpenAPI document for the Quorum API.
#[derive(OpenApi)]
#[openapi(
    paths(
        health_controller::health_check,
        health_controller::readiness_check,
        health_controller::liveness_check,
        metrics_controller::render_metrics,
        config_controller::client_config,
        config_controller::deployments,
        proposal_controller::list_proposals,
        proposal_controller::get_proposal,
        proposal_controller::create_proposal,
        proposal_controller::cast_vote,
        proposal_controller::get_tally,
        proposal_controller::has_voted,
        proposal_controller::authorize_voter,
    ),
    components(schemas(
        health_controller::HealthResponse,
        health_controller::ReadinessResponse,
        health_controller::ComponentHealth,
        quorum_service::CreateProposalRequest,
        quorum_service::CastVoteRequest,
        quorum_service::AuthorizeVoterRequest,
        quorum_service::ProposalResponse,
        quorum_service::ProposalListResponse,
        quorum_service::VoteReceiptResponse,
        quorum_service::HasVotedResponse,
        quorum_service::TallyResponse,
        quorum_service::VoteChoice,
        quorum_core::ErrorResponse,
        quorum_core::FieldError,
    )),
    tags(
        (name = "proposals", description = "Proposal and voting endpoints"),
        (name = "health", description = "Health and readiness endpoints"),
        (name = "config", description = "Client configuration endpoints"),
        (name = "observability", description = "Metrics endpoints"),
    )
)]
pub struct ApiDoc;
