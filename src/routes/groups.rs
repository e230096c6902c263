use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{groups, invitations};
use crate::state::AppState;

pub fn group_routes() -> Router<AppState> {
    Router::new()
        .route("/views/groups", get(groups::list_groups).post(groups::create_group))
        .route("/views/groups/:group_id", get(groups::group_view))
        .route(
            "/views/groups/:group_id/cycles/generate",
            post(groups::generate_cycles),
        )
        .route(
            "/views/groups/:group_id/contributions",
            post(groups::record_contribution),
        )
        .route(
            "/views/groups/:group_id/invitations",
            post(invitations::send_invite),
        )
        .route(
            "/views/groups/:group_id/invite-search",
            get(invitations::invite_search),
        )
}
