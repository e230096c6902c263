//! Invitation inbox and invite-flow handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::models::{Invitation, InvitationAction, SendInviteRequest};
use crate::state::AppState;

/// GET /views/invitations - the member's invitation inbox
pub async fn list_invitations(
    State(state): State<AppState>,
) -> Result<Json<Vec<Invitation>>, ApiError> {
    let invitations = state.invitation_service.list().await?;
    Ok(Json(invitations))
}

#[derive(Debug, Deserialize)]
pub struct RespondInvitationRequest {
    pub action: InvitationAction,
}

/// POST /views/invitations/:invitation_id/respond - accept or decline
pub async fn respond_invitation(
    State(state): State<AppState>,
    Path(invitation_id): Path<String>,
    Json(request): Json<RespondInvitationRequest>,
) -> Result<Json<Value>, ApiError> {
    let response = state
        .invitation_service
        .respond(&invitation_id, request.action)
        .await?;
    Ok(Json(response))
}

/// POST /views/groups/:group_id/invitations - send an invite
pub async fn send_invite(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<SendInviteRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request.validate().map_err(ApiError::Validation)?;
    let response = state.invitation_service.send(&group_id, &request).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[derive(Debug, Deserialize)]
pub struct InviteSearchParams {
    #[serde(default)]
    pub query: String,
}

/// GET /views/groups/:group_id/invite-search?query=... - member search
pub async fn invite_search(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Query(params): Query<InviteSearchParams>,
) -> Result<Json<Vec<Value>>, ApiError> {
    let results = state
        .invitation_service
        .search(&group_id, &params.query)
        .await?;
    Ok(Json(results))
}
