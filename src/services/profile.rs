//! Profile bootstrap sync.
//!
//! Pushes the auth provider's display fields to the upstream once per
//! session. Failures are non-fatal: the caller logs and moves on, and an
//! in-flight sync is simply abandoned when its future is dropped.

use std::sync::Arc;

use serde_json::Value;

use crate::client::{ApiClient, ClientError};
use crate::models::ProfileSyncRequest;

pub const PROFILE_SYNC_PATH: &str = "/api/bootstrap/user";

pub struct ProfileService {
    client: Arc<ApiClient>,
}

impl ProfileService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        ProfileService { client }
    }

    pub async fn sync(&self, request: &ProfileSyncRequest) -> Result<Value, ClientError> {
        let payload = serde_json::to_value(request).unwrap_or(Value::Null);
        self.client.put(PROFILE_SYNC_PATH, &payload).await
    }
}
