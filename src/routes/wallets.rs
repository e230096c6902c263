use axum::{routing::get, Router};

use crate::handlers::wallets;
use crate::state::AppState;

pub fn wallet_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/views/wallets",
            get(wallets::list_wallets).post(wallets::create_wallet),
        )
        .route("/views/wallets/page", get(wallets::wallet_page))
        .route(
            "/views/wallets/:wallet_id/transactions",
            get(wallets::wallet_activity),
        )
}
