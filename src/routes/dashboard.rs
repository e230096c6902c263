use axum::{routing::get, Router};

use crate::handlers::dashboard;
use crate::state::AppState;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/views/dashboard", get(dashboard::dashboard_view))
        .route("/views/dashboard/overview", get(dashboard::dashboard_overview))
}
