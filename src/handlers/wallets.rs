//! Wallet handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::error::ApiError;
use crate::models::{CreateWalletRequest, WalletActivity, WalletBalance};
use crate::state::AppState;

/// GET /views/wallets - the member's wallets
pub async fn list_wallets(
    State(state): State<AppState>,
) -> Result<Json<Vec<WalletBalance>>, ApiError> {
    let wallets = state.wallet_service.list().await?;
    Ok(Json(wallets))
}

/// GET /views/wallets/:wallet_id/transactions - one wallet's activity feed
pub async fn wallet_activity(
    State(state): State<AppState>,
    Path(wallet_id): Path<String>,
) -> Result<Json<WalletActivity>, ApiError> {
    let activity = state.wallet_service.activity(&wallet_id).await?;
    Ok(Json(activity))
}

#[derive(Debug, Deserialize)]
pub struct WalletPageParams {
    pub selected: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletPage {
    pub wallets: Vec<WalletBalance>,
    pub activity: Option<WalletActivity>,
}

/// GET /views/wallets/page?selected=... - list plus the selected wallet's
/// activity, fetched concurrently
pub async fn wallet_page(
    State(state): State<AppState>,
    Query(params): Query<WalletPageParams>,
) -> Result<Json<WalletPage>, ApiError> {
    let (wallets, activity) = state
        .wallet_service
        .page(params.selected.as_deref())
        .await?;
    Ok(Json(WalletPage { wallets, activity }))
}

/// POST /views/wallets - create a wallet
pub async fn create_wallet(
    State(state): State<AppState>,
    Json(request): Json<CreateWalletRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    request
        .validate()
        .map_err(|error| ApiError::Validation(error.to_string()))?;
    let created = state.wallet_service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
