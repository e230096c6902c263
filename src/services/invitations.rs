//! Invitation list, response, send, and member search.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use crate::cache::{QueryCache, QueryKey};
use crate::client::{ApiClient, ClientError};
use crate::models::{Invitation, InvitationAction, SendInviteRequest};
use crate::normalize::normalize_invitations;

pub const USER_INVITATIONS_PATH: &str = "/api/users/me/invitations";

/// Queries shorter than this never hit the upstream search endpoint.
pub const MIN_SEARCH_LENGTH: usize = 2;

const SEARCH_TTL: Duration = Duration::from_secs(30);

pub struct InvitationService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl InvitationService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        InvitationService { client, cache }
    }

    /// The signed-in member's invitations, canonicalized.
    pub async fn list(&self) -> Result<Vec<Invitation>, ClientError> {
        let raw = self
            .cache
            .get_or_fetch(QueryKey::invitations(), || async move {
                self.client.get(USER_INVITATIONS_PATH).await
            })
            .await?;
        Ok(normalize_invitations(Some(&raw)))
    }

    /// Accept or decline an invitation, then invalidate the inbox.
    pub async fn respond(
        &self,
        invitation_id: &str,
        action: InvitationAction,
    ) -> Result<Value, ClientError> {
        let path = format!("{USER_INVITATIONS_PATH}/{invitation_id}/respond");
        let response = self
            .client
            .post(&path, &json!({"action": action.as_str()}))
            .await?;
        self.cache.invalidate_prefix(&["notifications", "invitations"]);
        Ok(response)
    }

    /// Send a group invitation, then invalidate that group's search results.
    pub async fn send(
        &self,
        group_id: &str,
        request: &SendInviteRequest,
    ) -> Result<Value, ClientError> {
        let path = format!("/api/groups/{group_id}/invitations");
        let response = self.client.post(&path, &request.to_payload()).await?;
        self.cache
            .invalidate_prefix(&["groups", group_id, "invite-search"]);
        Ok(response)
    }

    /// Search for invitable members. Queries are trimmed and lowercased;
    /// short queries short-circuit to an empty result.
    pub async fn search(&self, group_id: &str, query: &str) -> Result<Vec<Value>, ClientError> {
        let normalized_query = query.trim().to_lowercase();
        if normalized_query.chars().count() < MIN_SEARCH_LENGTH {
            return Ok(Vec::new());
        }

        let path = format!(
            "/api/groups/{group_id}/invite/search?query={}",
            encode_query(&normalized_query)
        );
        let raw = self
            .cache
            .get_or_fetch_with_ttl(
                QueryKey::invite_search(group_id, &normalized_query),
                SEARCH_TTL,
                || async move { self.client.get(&path).await },
            )
            .await?;

        Ok(raw.as_array().cloned().unwrap_or_default())
    }
}

/// Percent-encode a query-string value.
fn encode_query(value: &str) -> String {
    let mut encoded = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'a'..=b'z' | b'A'..=b'Z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(byte as char)
            }
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}
