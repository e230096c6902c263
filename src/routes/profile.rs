use axum::{routing::put, Router};

use crate::handlers::profile;
use crate::state::AppState;

pub fn profile_routes() -> Router<AppState> {
    Router::new().route("/views/profile/sync", put(profile::sync_profile))
}
