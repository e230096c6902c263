//! Dashboard overview: fetch, normalize, and assemble the rotation view.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::client::{ApiClient, ClientError};
use crate::models::{GroupSummary, NextCycleHint, Overview};
use crate::normalize::coerce::as_array;
use crate::normalize::normalize_overview;
use crate::normalize::overview::normalize_group_summary;
use crate::rotation::{self, CycleOption};
use crate::utils::formatters::{format_currency, format_cycle_date};

pub const DASHBOARD_OVERVIEW_PATH: &str = "/api/dashboard/overview";

/// One row of the dashboard's rotation panel.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotationRow {
    pub id: Option<String>,
    pub name: String,
    pub contribution: String,
    pub contribution_value: f64,
    pub next_cycle_label: String,
    pub next_cycle_id: Option<String>,
    pub next_cycle_date: Option<DateTime<Utc>>,
    pub cycle_options: Vec<CycleOption>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummaryView {
    pub available: f64,
    pub pending: f64,
    pub note: String,
}

/// The assembled dashboard view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub overview: Overview,
    pub preferred_currency: String,
    pub rotation_rows: Vec<RotationRow>,
    pub wallet_summary: WalletSummaryView,
    pub upcoming_total: f64,
    pub next_cycle_descriptor: String,
    pub countdown_label: Option<String>,
}

pub struct DashboardService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl DashboardService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        DashboardService { client, cache }
    }

    /// Raw (cached) dashboard snapshot.
    pub async fn raw_overview(&self) -> Result<Value, ClientError> {
        self.cache
            .get_or_fetch(QueryKey::dashboard_overview(), || async move {
                self.client.get(DASHBOARD_OVERVIEW_PATH).await
            })
            .await
    }

    /// Normalized snapshot.
    pub async fn overview(&self) -> Result<Overview, ClientError> {
        let raw = self.raw_overview().await?;
        Ok(normalize_overview(Some(&raw)))
    }

    /// Assembled dashboard view. `now` feeds the countdown label.
    pub async fn view(&self, now: DateTime<Utc>) -> Result<DashboardView, ClientError> {
        let overview = self.overview().await?;
        Ok(assemble_view(overview, now))
    }
}

/// Pure assembly over a normalized overview.
pub fn assemble_view(overview: Overview, now: DateTime<Utc>) -> DashboardView {
    let preferred_currency = preferred_currency(&overview);

    // When the snapshot carries no group list, fall back to the profile's
    // membership records so the rotation panel is not empty.
    let groups: Vec<GroupSummary> = if overview.groups.is_empty() {
        membership_fallback(overview.profile.as_ref())
    } else {
        overview.groups.clone()
    };

    let rotation_rows: Vec<RotationRow> = groups
        .iter()
        .map(|group| rotation_row(group, &preferred_currency))
        .collect();

    let wallet_summary = wallet_summary(&overview);
    let upcoming_total: f64 = rotation_rows.iter().map(|row| row.contribution_value).sum();

    let next_cycle_descriptor = rotation_rows
        .first()
        .map(|row| row.next_cycle_label.clone())
        .unwrap_or_else(|| "No cycles scheduled".to_string());

    let upcoming_dates: Vec<DateTime<Utc>> = rotation_rows
        .iter()
        .filter_map(|row| row.next_cycle_date)
        .collect();
    let countdown_label = rotation::nearest_upcoming(&upcoming_dates, now)
        .map(|next| rotation::countdown_label(next, now));

    DashboardView {
        overview,
        preferred_currency,
        rotation_rows,
        wallet_summary,
        upcoming_total,
        next_cycle_descriptor,
        countdown_label,
    }
}

/// Currency preference: profile nested or flat, else the first wallet,
/// else USD.
fn preferred_currency(overview: &Overview) -> String {
    let from_profile = overview.profile.as_ref().and_then(|profile| {
        profile
            .pointer("/profile/currency")
            .or_else(|| profile.get("currency"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });

    from_profile
        .or_else(|| overview.wallets.first().and_then(|wallet| wallet.currency.clone()))
        .unwrap_or_else(|| "USD".to_string())
}

/// Membership records live under `memberships` or `groups` on the profile
/// payload and reuse the group-summary field conventions.
fn membership_fallback(profile: Option<&Value>) -> Vec<GroupSummary> {
    let Some(profile) = profile else { return Vec::new() };
    let list = profile
        .get("memberships")
        .and_then(Value::as_array)
        .map(|memberships| memberships.as_slice())
        .unwrap_or_else(|| as_array(profile.get("groups")));
    list.iter().map(normalize_group_summary).collect()
}

fn rotation_row(group: &GroupSummary, preferred_currency: &str) -> RotationRow {
    let currency = group.currency.as_deref().unwrap_or(preferred_currency);
    let contribution = if group.contribution_amount != 0.0 {
        format_currency(Some(group.contribution_amount), currency)
    } else {
        "—".to_string()
    };

    let (next_cycle_label, next_cycle_id, next_cycle_date, cycle_option) =
        match &group.next_cycle {
            NextCycleHint::Unknown => ("TBD".to_string(), None, None, None),
            NextCycleHint::Label(label) => (label.clone(), None, None, None),
            NextCycleHint::Number(number) => (format!("Cycle {number}"), None, None, None),
            NextCycleHint::Cycle(stub) => {
                let mut parts = Vec::new();
                if let Some(number) = stub.number {
                    parts.push(format!("Cycle {number}"));
                }
                if let Some(date) = format_cycle_date(stub.scheduled_date) {
                    parts.push(date);
                } else if let Some(status) = &stub.status {
                    parts.push(status.clone());
                }
                let label = if parts.is_empty() {
                    "Scheduled".to_string()
                } else {
                    parts.join(" • ")
                };

                let option = CycleOption {
                    id: stub.id.clone().unwrap_or_else(|| {
                        let group_id = group.id.as_deref().unwrap_or("group");
                        match stub.number {
                            Some(number) => format!("{group_id}-{number}"),
                            None => format!("{group_id}-next"),
                        }
                    }),
                    number: stub.number,
                    date: format_cycle_date(stub.scheduled_date)
                        .unwrap_or_else(|| "Next cycle".to_string()),
                    has_contributed: false,
                };

                (label, stub.id.clone(), stub.scheduled_date, Some(option))
            }
        };

    // The dashboard only knows the next turn; the detail view carries the
    // full option list.
    let cycle_options = vec![cycle_option.unwrap_or(CycleOption {
        id: format!("{}-next", group.id.as_deref().unwrap_or("group")),
        number: None,
        date: "Next cycle".to_string(),
        has_contributed: false,
    })];

    RotationRow {
        id: group.id.clone(),
        name: group.name.clone(),
        contribution,
        contribution_value: group.contribution_amount,
        next_cycle_label,
        next_cycle_id,
        next_cycle_date,
        cycle_options,
    }
}

/// Wallet totals with the metrics fallback: when no wallet reports an
/// available balance, the metrics figure stands in.
fn wallet_summary(overview: &Overview) -> WalletSummaryView {
    let available: f64 = overview.wallets.iter().map(|w| w.available_balance).sum();
    let pending: f64 = overview.wallets.iter().map(|w| w.pending_balance).sum();

    let metrics_balance = overview
        .metrics
        .as_ref()
        .map(|metrics| metrics.wallet_balance)
        .unwrap_or(0.0);

    let note = if overview.wallets.len() > 1 {
        format!("{} wallets", overview.wallets.len())
    } else {
        overview
            .metrics
            .as_ref()
            .and_then(|metrics| metrics.wallet_note.clone())
            .unwrap_or_else(|| {
                if overview.wallets.len() == 1 {
                    "Single wallet".to_string()
                } else {
                    "Wallets unavailable".to_string()
                }
            })
    };

    WalletSummaryView {
        available: if available != 0.0 { available } else { metrics_balance },
        pending,
        note,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn empty_overview_assembles_an_empty_view() {
        let view = assemble_view(normalize_overview(None), now());
        assert!(view.rotation_rows.is_empty());
        assert_eq!(view.upcoming_total, 0.0);
        assert_eq!(view.next_cycle_descriptor, "No cycles scheduled");
        assert_eq!(view.wallet_summary.note, "Wallets unavailable");
        assert!(view.countdown_label.is_none());
    }

    #[test]
    fn rotation_rows_carry_labels_and_totals() {
        let overview = normalize_overview(Some(&json!({
            "groups": [
                {"id": "g1", "name": "Osu traders", "contributionAmount": 50, "currency": "GHS",
                 "nextCycle": {"id": "c4", "cycleNumber": 4, "scheduledDate": "2026-03-05"}},
                {"id": "g2", "name": "Lagos circle", "contributionAmount": 25,
                 "nextCycle": 3}
            ]
        })));
        let view = assemble_view(overview, now());

        assert_eq!(view.rotation_rows.len(), 2);
        let first = &view.rotation_rows[0];
        assert_eq!(first.contribution, "GH₵50.00");
        assert_eq!(first.next_cycle_label, "Cycle 4 • Mar 5");
        assert_eq!(first.next_cycle_id.as_deref(), Some("c4"));
        assert_eq!(first.cycle_options[0].id, "c4");

        let second = &view.rotation_rows[1];
        assert_eq!(second.next_cycle_label, "Cycle 3");
        assert_eq!(second.cycle_options[0].id, "g2-next");

        assert_eq!(view.upcoming_total, 75.0);
        assert_eq!(view.next_cycle_descriptor, "Cycle 4 • Mar 5");
        assert_eq!(
            view.countdown_label.as_deref(),
            Some("Next cycle in 4d 00h 00m")
        );
    }

    #[test]
    fn memberships_fill_in_when_the_group_list_is_empty() {
        let overview = normalize_overview(Some(&json!({
            "profile": {
                "memberships": [
                    {"groupName": "Backup circle", "contributionAmount": 10, "members": 5}
                ]
            }
        })));
        let view = assemble_view(overview, now());

        assert_eq!(view.rotation_rows.len(), 1);
        assert_eq!(view.rotation_rows[0].name, "Backup circle");
        assert_eq!(view.rotation_rows[0].contribution, "$10.00");
        assert_eq!(view.rotation_rows[0].next_cycle_label, "TBD");
    }

    #[test]
    fn wallet_summary_falls_back_to_metrics_balance() {
        let overview = normalize_overview(Some(&json!({
            "metrics": {"walletBalance": 320, "walletNote": "Synced hourly"},
            "wallets": [{"id": "w1", "availableBalance": 0, "pendingBalance": 12}]
        })));
        let view = assemble_view(overview, now());
        assert_eq!(view.wallet_summary.available, 320.0);
        assert_eq!(view.wallet_summary.pending, 12.0);
        assert_eq!(view.wallet_summary.note, "Synced hourly");
    }

    #[test]
    fn preferred_currency_prefers_profile_then_wallet() {
        let overview = normalize_overview(Some(&json!({
            "profile": {"profile": {"currency": "NGN"}},
            "wallets": [{"id": "w1", "currency": "KES"}]
        })));
        assert_eq!(assemble_view(overview, now()).preferred_currency, "NGN");

        let overview = normalize_overview(Some(&json!({
            "wallets": [{"id": "w1", "currency": "KES"}]
        })));
        assert_eq!(assemble_view(overview, now()).preferred_currency, "KES");
    }
}
