use axum::{routing::any, Router};

use crate::proxy::proxy_request;
use crate::state::AppState;

pub fn proxy_routes() -> Router<AppState> {
    Router::new().route("/api/*path", any(proxy_request))
}
