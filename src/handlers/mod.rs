//! HTTP handlers for the gateway's view endpoints.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;

pub mod dashboard;
pub mod groups;
pub mod invitations;
pub mod profile;
pub mod wallets;

/// The signed-in member, as asserted by the auth layer in front of the
/// gateway via the `x-user-id` header. Absent for anonymous traffic; the
/// derivations that key off the member (contribution gate, cycle options)
/// degrade to their signed-out behavior.
pub struct CurrentUser(pub Option<String>);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(CurrentUser(user_id))
    }
}
