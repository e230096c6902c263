use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::invitations;
use crate::state::AppState;

pub fn invitation_routes() -> Router<AppState> {
    Router::new()
        .route("/views/invitations", get(invitations::list_invitations))
        .route(
            "/views/invitations/:invitation_id/respond",
            post(invitations::respond_invitation),
        )
}
