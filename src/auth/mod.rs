//! Token resolution.
//!
//! The auth provider itself is an external collaborator; the gateway only
//! needs "a bearer token for this request". Inbound requests that already
//! carry an `Authorization` header keep their own token; otherwise the
//! configured provider supplies one.

use async_trait::async_trait;

/// Source of bearer tokens for upstream calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// The current token, or `None` when the caller is effectively signed
    /// out (surfaced as 401, never retried).
    async fn token(&self) -> Option<String>;
}

/// Fixed service token from configuration.
pub struct StaticTokenProvider {
    token: Option<String>,
}

impl StaticTokenProvider {
    pub fn new(token: Option<String>) -> Self {
        StaticTokenProvider {
            token: token.filter(|t| !t.is_empty()),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn token(&self) -> Option<String> {
        self.token.clone()
    }
}

/// Strip a `Bearer ` prefix from an inbound Authorization header value.
pub fn bearer_token(header_value: &str) -> Option<String> {
    let trimmed = header_value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?;
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_string())
}
