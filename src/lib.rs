//! Kinvest Gateway Library
//!
//! Backend-for-frontend gateway for a rotating-savings product: proxies the
//! upstream ledger API, reconciles its payloads into a canonical model,
//! derives the rotation/settlement view, and performs the contribution and
//! invitation mutations with cache invalidation.

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod normalize;
pub mod proxy;
pub mod rotation;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

use axum::{routing::get, Router};

use crate::state::AppState;

/// Build the full gateway router (views + proxy + health) over `state`.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(routes::dashboard_routes())
        .merge(routes::group_routes())
        .merge(routes::invitation_routes())
        .merge(routes::wallet_routes())
        .merge(routes::profile_routes())
        .merge(routes::proxy_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
}

async fn root() -> &'static str {
    "Kinvest Gateway"
}

/// Health check response
#[derive(serde::Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

/// Health check endpoint
async fn health_check() -> axum::Json<HealthResponse> {
    axum::Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
