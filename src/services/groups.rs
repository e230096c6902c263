//! Group detail and group lifecycle operations.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::client::{ApiClient, ClientError};
use crate::models::{CreateGroupRequest, GenerateCyclesRequest, Group, GroupSummary, Member};
use crate::normalize::overview::normalize_group_summaries;
use crate::normalize::normalize_group;
use crate::rotation::{
    self, CollectionSummary, CycleOption,
};
use crate::utils::formatters::{format_currency, format_date, format_enum_label};

/// Reconciled group view: the normalized group plus every derived value
/// the detail page renders.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupView {
    pub group: Group,
    pub current_cycle_number: Option<i64>,
    pub current_cycle_fully_paid: bool,
    pub next_cycle_number: Option<i64>,
    pub next_cycle_receiver: String,
    pub next_cycle_date: String,
    pub cycle_options: Vec<CycleOption>,
    pub collection_summary: CollectionSummary,
    pub projected_payout: f64,
    pub timeline: Vec<CycleTimelineEntry>,
}

/// One rotation turn as the payout timeline renders it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CycleTimelineEntry {
    pub id: String,
    pub number: Option<i64>,
    pub receiver: String,
    pub date: String,
    pub status_label: String,
    pub expected: Option<f64>,
    pub received: Option<f64>,
    pub collected_label: String,
    pub participants: Vec<ParticipantStatus>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStatus {
    pub name: String,
    pub expected: Option<f64>,
    pub paid: Option<f64>,
    pub settled: bool,
}

pub struct GroupService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl GroupService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        GroupService { client, cache }
    }

    /// Raw (cached) group detail payload.
    pub async fn raw_detail(&self, group_id: &str) -> Result<Value, ClientError> {
        let path = format!("/api/groups/{group_id}");
        self.cache
            .get_or_fetch(QueryKey::group_detail(group_id), || async move {
                self.client.get(&path).await
            })
            .await
    }

    /// Normalized group detail; `None` when the upstream returned nothing.
    pub async fn detail(&self, group_id: &str) -> Result<Option<Group>, ClientError> {
        let raw = self.raw_detail(group_id).await?;
        Ok(normalize_group(Some(&raw)))
    }

    /// The member's group list, normalized to dashboard summaries.
    pub async fn list(&self) -> Result<Vec<GroupSummary>, ClientError> {
        let raw = self
            .cache
            .get_or_fetch(QueryKey::group_list(), || async move {
                self.client.get("/api/groups").await
            })
            .await?;
        Ok(normalize_group_summaries(Some(&raw)))
    }

    /// The reconciled detail view for the signed-in member.
    pub async fn view(
        &self,
        group_id: &str,
        user_id: Option<&str>,
    ) -> Result<Option<GroupView>, ClientError> {
        let Some(group) = self.detail(group_id).await? else {
            return Ok(None);
        };
        Ok(Some(assemble_view(group, user_id)))
    }

    /// Create a group, then invalidate every view that lists groups.
    pub async fn create(&self, request: &CreateGroupRequest) -> Result<Value, ClientError> {
        let payload = serde_json::to_value(request).unwrap_or(Value::Null);
        let created = self.client.post("/api/groups", &payload).await?;
        self.cache.invalidate_prefix(&["groups"]);
        self.cache.invalidate_prefix(&["dashboard"]);
        Ok(created)
    }

    /// Ask the upstream to generate the group's cycles, then invalidate
    /// that group's cached views.
    pub async fn generate_cycles(
        &self,
        group_id: &str,
        request: &GenerateCyclesRequest,
    ) -> Result<Value, ClientError> {
        let path = format!("/api/groups/{group_id}/cycles/generate");
        let generated = self.client.post(&path, &request.to_payload()).await?;
        self.cache.invalidate_prefix(&["groups", group_id]);
        self.cache.invalidate_prefix(&["dashboard"]);
        Ok(generated)
    }
}

/// Pure view assembly over a normalized group; separated from the service
/// so the derivation is testable without I/O.
pub fn assemble_view(group: Group, user_id: Option<&str>) -> GroupView {
    let ordered = rotation::ordered_cycles(&group);
    let current = rotation::current_cycle(&group, &ordered);
    let next = rotation::next_cycle(&group, &ordered, current);

    let current_cycle_fully_paid = current.map(rotation::cycle_fully_paid).unwrap_or(false);
    let cycle_options = rotation::cycle_options(&ordered, user_id);
    let collection_summary = rotation::collection_summary(&ordered);
    let projected_payout = rotation::projected_payout(&group, &ordered);

    let next_cycle_receiver = next
        .map(|cycle| rotation::receiver_label(cycle, &group.members))
        .unwrap_or_else(|| "TBD".to_string());

    let timeline = ordered
        .iter()
        .map(|cycle| timeline_entry(cycle, &group.members, &group.currency))
        .collect();

    GroupView {
        current_cycle_number: current.and_then(|cycle| cycle.number),
        current_cycle_fully_paid,
        next_cycle_number: next.and_then(|cycle| cycle.number),
        next_cycle_receiver,
        next_cycle_date: format_date(next.and_then(|cycle| cycle.scheduled_date)),
        cycle_options,
        collection_summary,
        projected_payout,
        timeline,
        group,
    }
}

fn timeline_entry(
    cycle: &crate::models::Cycle,
    members: &[Member],
    currency: &str,
) -> CycleTimelineEntry {
    let expected = rotation::per_cycle_expected(cycle);
    let received = rotation::per_cycle_received(cycle);

    let participants = cycle
        .participants
        .iter()
        .map(|participant| ParticipantStatus {
            name: participant_name(participant, members),
            expected: participant.amount_expected,
            paid: participant.amount_paid,
            settled: rotation::is_settled(participant),
        })
        .collect();

    CycleTimelineEntry {
        id: cycle.id.clone(),
        number: cycle.number,
        receiver: rotation::receiver_label(cycle, members),
        date: format_date(cycle.scheduled_date),
        status_label: format_enum_label(Some(cycle.status.as_str())),
        expected,
        received,
        collected_label: format!(
            "Collected {} of {}",
            format_currency(received, currency),
            format_currency(expected, currency)
        ),
        participants,
    }
}

fn participant_name(participant: &crate::models::Participant, members: &[Member]) -> String {
    let own = participant
        .user
        .as_ref()
        .and_then(|user| user.display_name.as_deref().or(user.name.as_deref()));

    let from_roster = participant.user_id.as_deref().and_then(|user_id| {
        members
            .iter()
            .find(|member| member.user_id.as_deref() == Some(user_id))
            .and_then(|member| member.user.as_ref())
            .and_then(|user| user.display_name.as_deref().or(user.name.as_deref()))
    });

    own.or(from_roster).unwrap_or("Member").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_group() -> Group {
        normalize_group(Some(&json!({
            "id": "grp_1",
            "name": "Osu traders",
            "currency": "GHS",
            "contributionAmount": 50,
            "members": [
                {"id": "m1", "userId": "u1", "role": "OWNER", "status": "ACTIVE",
                 "user": {"id": "u1", "displayName": "Ama"}},
                {"id": "m2", "userId": "u2", "role": "MEMBER", "status": "ACTIVE",
                 "user": {"id": "u2", "name": "Kofi"}}
            ],
            "cycles": [
                {"id": "c2", "cycleNumber": 2, "status": "PENDING", "receiverUserId": "u2",
                 "participants": [
                    {"id": "p3", "userId": "u1", "amountExpected": 50, "amountPaid": 0},
                    {"id": "p4", "userId": "u2", "amountExpected": 50, "amountPaid": 0}
                 ]},
                {"id": "c1", "cycleNumber": 1, "status": "PAID_OUT", "receiverUserId": "u1",
                 "totalExpected": 100, "totalReceived": 100,
                 "participants": [
                    {"id": "p1", "userId": "u1", "amountExpected": 50, "amountPaid": 50},
                    {"id": "p2", "userId": "u2", "amountExpected": 50, "amountPaid": 50}
                 ]}
            ]
        })))
        .unwrap()
    }

    #[test]
    fn view_orders_cycles_and_resolves_current_and_next() {
        let view = assemble_view(sample_group(), Some("u1"));

        assert_eq!(view.current_cycle_number, Some(2));
        assert_eq!(view.next_cycle_number, Some(2));
        assert!(!view.current_cycle_fully_paid);
        assert_eq!(view.next_cycle_receiver, "Kofi");

        let numbers: Vec<Option<i64>> = view.timeline.iter().map(|entry| entry.number).collect();
        assert_eq!(numbers, vec![Some(1), Some(2)]);
    }

    #[test]
    fn view_flags_the_members_contributed_cycles() {
        let view = assemble_view(sample_group(), Some("u1"));
        assert_eq!(view.cycle_options.len(), 2);
        assert!(view.cycle_options[0].has_contributed);
        assert!(!view.cycle_options[1].has_contributed);
    }

    #[test]
    fn view_aggregates_collection_totals() {
        let view = assemble_view(sample_group(), None);
        assert_eq!(view.collection_summary.total_expected, 200.0);
        assert_eq!(view.collection_summary.total_received, 100.0);
        assert_eq!(view.collection_summary.outstanding, 100.0);
    }

    #[test]
    fn timeline_labels_unknown_totals_with_a_placeholder() {
        let group = normalize_group(Some(&json!({
            "id": "grp_2",
            "cycles": [{"id": "c1", "cycleNumber": 1}]
        })))
        .unwrap();
        let view = assemble_view(group, None);
        assert_eq!(view.timeline[0].collected_label, "Collected — of —");
        assert_eq!(view.timeline[0].expected, None);
    }

    #[test]
    fn participant_names_fall_back_to_roster_then_member() {
        let view = assemble_view(sample_group(), None);
        let names: Vec<&str> = view.timeline[0]
            .participants
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ama", "Kofi"]);
    }
}
