//! Dashboard view handlers.

use axum::{extract::State, Json};
use chrono::Utc;

use crate::error::ApiError;
use crate::models::Overview;
use crate::services::dashboard::DashboardView;
use crate::state::AppState;

/// GET /views/dashboard - assembled rotation/wallet/ledger view
pub async fn dashboard_view(State(state): State<AppState>) -> Result<Json<DashboardView>, ApiError> {
    let view = state.dashboard_service.view(Utc::now()).await?;
    Ok(Json(view))
}

/// GET /views/dashboard/overview - normalized snapshot only
pub async fn dashboard_overview(State(state): State<AppState>) -> Result<Json<Overview>, ApiError> {
    let overview = state.dashboard_service.overview().await?;
    Ok(Json(overview))
}
