//! Contribution recorder.
//!
//! Validates locally, refuses duplicate contributions before any network
//! call, and on success optimistically patches the cached group detail
//! before invalidating the dashboard and that group's cached views. The
//! local duplicate gate is advisory; the upstream enforces the real
//! at-most-once-per-cycle constraint and its rejection is an expected,
//! recoverable outcome.

use std::sync::Arc;

use serde_json::{json, Value};
use thiserror::Error;

use crate::cache::{QueryCache, QueryKey};
use crate::client::{ApiClient, ClientError};
use crate::models::RecordContributionRequest;
use crate::rotation;
use crate::services::groups::GroupService;

#[derive(Error, Debug)]
pub enum ContributionError {
    #[error("Enter a contribution amount greater than 0.")]
    InvalidAmount,

    #[error("No cycle is available for recording this contribution.")]
    NoCycleAvailable,

    /// Raised locally, before any network call, when the member's own
    /// record for the target cycle is already settled.
    #[error("You have already contributed to this cycle.")]
    AlreadyRecorded,

    #[error(transparent)]
    Client(#[from] ClientError),
}

pub struct ContributionService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    groups: Arc<GroupService>,
}

impl ContributionService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>, groups: Arc<GroupService>) -> Self {
        ContributionService {
            client,
            cache,
            groups,
        }
    }

    /// Record one contribution for the signed-in member.
    pub async fn record(
        &self,
        group_id: &str,
        user_id: Option<&str>,
        request: &RecordContributionRequest,
    ) -> Result<Value, ContributionError> {
        request
            .validate()
            .map_err(|_| ContributionError::InvalidAmount)?;

        // Resolve the target cycle from the group's (cached) rotation:
        // the explicit selection when it is known, else the first option.
        let group = self.groups.detail(group_id).await?;
        let options = group
            .as_ref()
            .map(|group| {
                let ordered = rotation::ordered_cycles(group);
                rotation::cycle_options(&ordered, user_id)
            })
            .unwrap_or_default();

        let target = request
            .cycle_id
            .as_ref()
            .and_then(|cycle_id| options.iter().find(|option| &option.id == cycle_id))
            .or_else(|| options.first())
            .ok_or(ContributionError::NoCycleAvailable)?;

        if target.has_contributed {
            return Err(ContributionError::AlreadyRecorded);
        }

        let payload = json!({
            "cycleId": target.id,
            "amount": request.amount,
            "walletId": request.wallet_id,
            "status": "SUCCEEDED",
        });
        let path = format!("/api/groups/{group_id}/contributions");
        let response = self.client.post(&path, &payload).await?;

        // Optimistic patch first, then invalidation, so a background
        // refetch cannot be overwritten by the patch out of order.
        let detail_key = QueryKey::group_detail(group_id);
        self.cache
            .patch(&detail_key, |cached| apply_contribution_patch(cached, &response));
        self.cache.invalidate_prefix(&["dashboard"]);
        self.cache.invalidate_prefix(&["groups", group_id]);

        Ok(response)
    }
}

/// Merge the membership/cycle data a successful contribution returns into
/// a cached raw group payload.
pub fn apply_contribution_patch(cached: &mut Value, response: &Value) {
    if let Some(cycles) = response.get("cycles").and_then(Value::as_array) {
        cached["cycles"] = Value::Array(cycles.clone());
    } else if let Some(cycle) = response.get("cycle").filter(|value| value.is_object()) {
        upsert_by_id(cached, "cycles", cycle);
    }

    if let Some(membership) = response
        .get("membership")
        .or_else(|| response.get("member"))
        .filter(|value| value.is_object())
    {
        upsert_by_id(cached, "members", membership);
    }

    if let Some(group) = response.get("group").and_then(Value::as_object) {
        if let Some(target) = cached.as_object_mut() {
            for (key, value) in group {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn upsert_by_id(cached: &mut Value, list_key: &str, incoming: &Value) {
    let incoming_id = incoming.get("id").cloned();
    let list = cached
        .as_object_mut()
        .map(|object| object.entry(list_key).or_insert_with(|| Value::Array(Vec::new())));
    let Some(Value::Array(list)) = list else { return };

    let existing = incoming_id.as_ref().and_then(|id| {
        list.iter_mut()
            .find(|entry| entry.get("id") == Some(id))
    });

    match existing {
        Some(entry) => *entry = incoming.clone(),
        None => list.push(incoming.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_replaces_a_matching_cycle() {
        let mut cached = json!({
            "id": "grp_1",
            "cycles": [
                {"id": "c1", "totalReceived": 0},
                {"id": "c2", "totalReceived": 0}
            ]
        });
        apply_contribution_patch(
            &mut cached,
            &json!({"cycle": {"id": "c1", "totalReceived": 50}}),
        );
        assert_eq!(cached["cycles"][0]["totalReceived"], 50);
        assert_eq!(cached["cycles"][1]["totalReceived"], 0);
    }

    #[test]
    fn patch_appends_unknown_cycles_and_upserts_membership() {
        let mut cached = json!({"id": "grp_1"});
        apply_contribution_patch(
            &mut cached,
            &json!({
                "cycle": {"id": "c9", "totalReceived": 50},
                "membership": {"id": "m1", "status": "ACTIVE"}
            }),
        );
        assert_eq!(cached["cycles"][0]["id"], "c9");
        assert_eq!(cached["members"][0]["status"], "ACTIVE");
    }

    #[test]
    fn patch_replaces_the_whole_cycle_list_when_one_is_returned() {
        let mut cached = json!({"id": "grp_1", "cycles": [{"id": "c1"}]});
        apply_contribution_patch(
            &mut cached,
            &json!({"cycles": [{"id": "c1"}, {"id": "c2"}]}),
        );
        assert_eq!(cached["cycles"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn patch_merges_group_level_fields() {
        let mut cached = json!({"id": "grp_1", "status": "ACTIVE"});
        apply_contribution_patch(&mut cached, &json!({"group": {"status": "COLLECTING"}}));
        assert_eq!(cached["status"], "COLLECTING");
        assert_eq!(cached["id"], "grp_1");
    }

    #[test]
    fn patch_ignores_unrelated_response_shapes() {
        let mut cached = json!({"id": "grp_1"});
        let before = cached.clone();
        apply_contribution_patch(&mut cached, &json!({"ok": true}));
        assert_eq!(cached, before);
    }
}
