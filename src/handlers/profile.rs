//! Profile bootstrap handler.

use axum::{extract::State, Json};
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;
use crate::models::ProfileSyncRequest;
use crate::state::AppState;

/// PUT /views/profile/sync - push auth-provider profile fields upstream.
/// Failures here are expected to be non-fatal for callers; they surface as
/// normal errors and the client moves on.
pub async fn sync_profile(
    State(state): State<AppState>,
    Json(request): Json<ProfileSyncRequest>,
) -> Result<Json<Value>, ApiError> {
    request
        .validate()
        .map_err(|error| ApiError::Validation(error.to_string()))?;
    let response = state.profile_service.sync(&request).await?;
    Ok(Json(response))
}
