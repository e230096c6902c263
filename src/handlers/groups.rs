//! Group view and lifecycle handlers.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;
use crate::handlers::CurrentUser;
use crate::models::{
    CreateGroupRequest, GenerateCyclesRequest, GroupSummary, RecordContributionRequest,
};
use crate::services::groups::GroupView;
use crate::state::AppState;

/// GET /views/groups - the member's groups as dashboard summaries
pub async fn list_groups(State(state): State<AppState>) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let groups = state.group_service.list().await?;
    Ok(Json(groups))
}

/// GET /views/groups/:group_id - reconciled group detail view
pub async fn group_view(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(group_id): Path<String>,
) -> Result<Json<GroupView>, ApiError> {
    let view = state
        .group_service
        .view(&group_id, user_id.as_deref())
        .await?;
    view.map(Json)
        .ok_or_else(|| ApiError::NotFound("Group not found".to_string()))
}

/// POST /views/groups - create a group
pub async fn create_group(
    State(state): State<AppState>,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request
        .validate()
        .map_err(|error| ApiError::Validation(error.to_string()))?;
    let created = state.group_service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// POST /views/groups/:group_id/cycles/generate - generate rotation cycles
pub async fn generate_cycles(
    State(state): State<AppState>,
    Path(group_id): Path<String>,
    Json(request): Json<GenerateCyclesRequest>,
) -> Result<Json<Value>, ApiError> {
    let generated = state
        .group_service
        .generate_cycles(&group_id, &request)
        .await?;
    Ok(Json(generated))
}

/// POST /views/groups/:group_id/contributions - record a contribution
pub async fn record_contribution(
    State(state): State<AppState>,
    CurrentUser(user_id): CurrentUser,
    Path(group_id): Path<String>,
    Json(request): Json<RecordContributionRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let response = state
        .contribution_service
        .record(&group_id, user_id.as_deref(), &request)
        .await?;
    Ok((StatusCode::CREATED, Json(response)))
}
