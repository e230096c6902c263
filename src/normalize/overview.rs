//! Overview normalizer: reshapes the raw dashboard snapshot into the
//! canonical [`Overview`] model.
//!
//! Pure and total: any input, including `None` and malformed payloads,
//! produces the fixed shape; the worst case is the all-default value.

use serde_json::Value;

use crate::models::{
    CycleStub, GroupSummary, LedgerEntry, Metrics, NextCycleHint, Overview, WalletBalance,
};
use crate::normalize::coerce::{
    as_array, pick, pick_amount, pick_i64, pick_str, to_amount, to_count, to_datetime, to_id,
    to_string_value,
};

// Alias tables for fields the backend has renamed over time. First present
// wins; order is the documented precedence.
const TOTAL_CONTRIBUTIONS: &[&str] = &["totalContributions", "totalContribution", "totalContributed"];
const TOTAL_RECEIVED: &[&str] = &["totalReceived", "totalPayouts", "totalPayout"];
const WALLET_BALANCE: &[&str] = &["walletBalance", "totalWallet", "primaryWalletBalance"];
const PAYOUT_POSITION: &[&str] = &["payoutPosition", "rotationPosition"];
const SLOT_COUNT: &[&str] = &["slotCount", "rotationSize"];
const CONTRIBUTION_DELTA: &[&str] = &["contributionDelta", "delta"];
const NEXT_PAYOUT_ETA: &[&str] = &["nextPayoutEta", "nextPayout"];
const WALLET_NOTE: &[&str] = &["walletNote", "walletMessage"];
const ACTIVE_GROUPS: &[&str] = &["activeGroups", "groupCount"];
const GROUPS_SECTION: &[&str] = &["groupSnapshots", "groups"];
const WALLETS_SECTION: &[&str] = &["walletSummary", "wallets"];
const LEDGER_SECTION: &[&str] = &["ledger", "ledgerEntries"];

/// Normalize a raw dashboard snapshot.
pub fn normalize_overview(raw: Option<&Value>) -> Overview {
    let Some(base) = raw.filter(|value| value.is_object()) else {
        return Overview::default();
    };

    Overview {
        synced_at: pick_str(base, &["syncedAt"]),
        profile: base.get("profile").filter(|v| !v.is_null()).cloned(),
        metrics: normalize_metrics(pick(base, &["metrics"])),
        groups: normalize_group_summaries(pick(base, GROUPS_SECTION)),
        wallets: normalize_wallet_summaries(pick(base, WALLETS_SECTION)),
        ledger_entries: normalize_ledger(pick(base, LEDGER_SECTION)),
        alerts: base
            .get("alerts")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
    }
}

fn normalize_metrics(raw: Option<&Value>) -> Option<Metrics> {
    let metrics = raw.filter(|value| value.is_object())?;

    Some(Metrics {
        total_contributions: pick_amount(metrics, TOTAL_CONTRIBUTIONS),
        total_received: pick_amount(metrics, TOTAL_RECEIVED),
        wallet_balance: pick_amount(metrics, WALLET_BALANCE),
        payout_position: pick_i64(metrics, PAYOUT_POSITION),
        slot_count: pick_i64(metrics, SLOT_COUNT),
        contribution_delta: pick(metrics, CONTRIBUTION_DELTA)
            .and_then(|value| crate::normalize::coerce::to_amount_opt(Some(value))),
        next_payout_eta: pick_str(metrics, NEXT_PAYOUT_ETA),
        wallet_note: pick_str(metrics, WALLET_NOTE),
        pending_contributions: pick_amount(metrics, &["pendingContributions"]),
        pending_payouts: pick_amount(metrics, &["pendingPayouts"]),
        active_groups: pick_i64(metrics, ACTIVE_GROUPS).unwrap_or(0),
    })
}

pub(crate) fn normalize_group_summaries(raw: Option<&Value>) -> Vec<GroupSummary> {
    as_array(raw).iter().map(normalize_group_summary).collect()
}

pub(crate) fn normalize_group_summary(group: &Value) -> GroupSummary {
    let first_member = group
        .get("members")
        .and_then(Value::as_array)
        .and_then(|members| members.first());

    GroupSummary {
        id: to_id(group.get("id")),
        name: pick_str(group, &["name", "groupName"]).unwrap_or_else(|| "Untitled group".to_string()),
        status: pick_str(group, &["status", "state"]).unwrap_or_else(|| "ACTIVE".to_string()),
        currency: pick_str(group, &["currency"]),
        contribution_amount: pick_amount(group, &["contributionAmount", "contribution"]),
        role: pick_str(group, &["role"])
            .or_else(|| first_member.and_then(|m| pick_str(m, &["role"])))
            .unwrap_or_else(|| "MEMBER".to_string()),
        membership_status: pick_str(group, &["membershipStatus"])
            .or_else(|| first_member.and_then(|m| pick_str(m, &["status"])))
            .unwrap_or_else(|| "INVITED".to_string()),
        member_count: to_count(pick(group, &["members", "memberCount", "membershipCount"])),
        next_cycle: next_cycle_hint(group),
    }
}

/// Resolve the snapshot's next-cycle hint: `nextCycle` (any shape), then a
/// date-valued `nextCycleDate`/`nextCycleAt`, then the first raw cycle.
fn next_cycle_hint(group: &Value) -> NextCycleHint {
    let candidate = pick(group, &["nextCycle", "nextCycleDate", "nextCycleAt"]).or_else(|| {
        group
            .get("cycles")
            .and_then(Value::as_array)
            .and_then(|cycles| cycles.first())
    });

    let Some(candidate) = candidate else {
        return NextCycleHint::Unknown;
    };

    match candidate {
        Value::String(raw) => NextCycleHint::Label(raw.clone()),
        Value::Number(number) => number
            .as_i64()
            .map(NextCycleHint::Number)
            .unwrap_or(NextCycleHint::Unknown),
        Value::Object(_) => NextCycleHint::Cycle(CycleStub {
            id: to_id(pick(candidate, &["id", "cycleId"])),
            number: pick_i64(candidate, &["cycleNumber", "number"]),
            scheduled_date: to_datetime(pick(candidate, &["scheduledDate", "date", "startsAt"])),
            status: pick_str(candidate, &["status"]),
        }),
        _ => NextCycleHint::Unknown,
    }
}

fn normalize_wallet_summaries(raw: Option<&Value>) -> Vec<WalletBalance> {
    let Some(payload) = raw else { return Vec::new() };

    // A plain list of wallets.
    if let Some(list) = payload.as_array() {
        return list
            .iter()
            .map(|wallet| normalize_wallet_balance(wallet, &["availableBalance"], &["pendingBalance"]))
            .collect();
    }

    // A summary object: either `{wallets: [...]}` or a `primaryWallet`
    // singleton treated as a one-element list. Summary wallets may report
    // balances under their aggregate names.
    if payload.is_object() {
        if let Some(wallets) = payload.get("wallets").and_then(Value::as_array) {
            return wallets
                .iter()
                .map(|wallet| {
                    normalize_wallet_balance(
                        wallet,
                        &["availableBalance", "totalAvailableBalance"],
                        &["pendingBalance", "totalPendingBalance"],
                    )
                })
                .collect();
        }
        if let Some(primary) = payload.get("primaryWallet").filter(|v| v.is_object()) {
            return vec![normalize_wallet_balance(
                primary,
                &["availableBalance", "totalAvailableBalance"],
                &["pendingBalance", "totalPendingBalance"],
            )];
        }
    }

    Vec::new()
}

fn normalize_wallet_balance(
    wallet: &Value,
    available_aliases: &[&str],
    pending_aliases: &[&str],
) -> WalletBalance {
    WalletBalance {
        id: to_id(wallet.get("id")).unwrap_or_else(|| "primary".to_string()),
        currency: pick_str(wallet, &["currency"]),
        available_balance: pick_amount(wallet, available_aliases),
        pending_balance: pick_amount(wallet, pending_aliases),
        status: pick_str(wallet, &["status"]).unwrap_or_else(|| "ACTIVE".to_string()),
        created_at: to_datetime(wallet.get("createdAt")),
    }
}

fn normalize_ledger(raw: Option<&Value>) -> Vec<LedgerEntry> {
    as_array(raw)
        .iter()
        .map(|entry| LedgerEntry {
            id: to_id(entry.get("id")),
            entry_type: pick_str(entry, &["type", "direction"]).unwrap_or_else(|| "ENTRY".to_string()),
            amount: to_amount(entry.get("amount")),
            status: pick_str(entry, &["status"]),
            created_at: pick(entry, &["createdAt", "date"]).and_then(to_string_value),
            label: pick_str(entry, &["label"]),
            description: pick_str(entry, &["description"]),
            group: entry.get("group").filter(|v| !v.is_null()).cloned(),
            cycle_number: pick_i64(entry, &["cycleNumber"]),
            currency: pick_str(entry, &["currency"]),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_input_yields_the_all_default_shape() {
        for raw in [None, Some(json!(null)), Some(json!("junk")), Some(json!([1, 2]))] {
            let overview = normalize_overview(raw.as_ref());
            assert!(overview.synced_at.is_none());
            assert!(overview.profile.is_none());
            assert!(overview.metrics.is_none());
            assert!(overview.groups.is_empty());
            assert!(overview.wallets.is_empty());
            assert!(overview.ledger_entries.is_empty());
            assert!(overview.alerts.is_empty());
        }
    }

    #[test]
    fn metric_aliases_resolve_in_order() {
        let overview = normalize_overview(Some(&json!({
            "metrics": {
                "totalContribution": 120,
                "totalContributed": 999,
                "totalPayout": "75.5",
                "groupCount": 3
            }
        })));
        let metrics = overview.metrics.unwrap();
        assert_eq!(metrics.total_contributions, 120.0);
        assert_eq!(metrics.total_received, 75.5);
        assert_eq!(metrics.wallet_balance, 0.0);
        assert_eq!(metrics.active_groups, 3);
    }

    #[test]
    fn group_section_accepts_snapshots_alias_and_wrapped_arrays() {
        let overview = normalize_overview(Some(&json!({
            "groupSnapshots": {"data": [{"groupName": "Lagos circle", "contribution": "25"}]}
        })));
        assert_eq!(overview.groups.len(), 1);
        assert_eq!(overview.groups[0].name, "Lagos circle");
        assert_eq!(overview.groups[0].contribution_amount, 25.0);
        assert_eq!(overview.groups[0].status, "ACTIVE");
        assert_eq!(overview.groups[0].role, "MEMBER");
    }

    #[test]
    fn group_falls_back_to_first_member_for_role_and_status() {
        let overview = normalize_overview(Some(&json!({
            "groups": [{
                "name": "Accra pool",
                "members": [{"role": "OWNER", "status": "ACTIVE"}]
            }]
        })));
        let group = &overview.groups[0];
        assert_eq!(group.role, "OWNER");
        assert_eq!(group.membership_status, "ACTIVE");
        assert_eq!(group.member_count, Some(1));
    }

    #[test]
    fn next_cycle_hint_handles_all_shapes() {
        let from_string = normalize_overview(Some(&json!({
            "groups": [{"nextCycle": "2026-09-01"}]
        })));
        assert_eq!(
            from_string.groups[0].next_cycle,
            NextCycleHint::Label("2026-09-01".to_string())
        );

        let from_number = normalize_overview(Some(&json!({
            "groups": [{"nextCycle": 4}]
        })));
        assert_eq!(from_number.groups[0].next_cycle, NextCycleHint::Number(4));

        let from_cycles = normalize_overview(Some(&json!({
            "groups": [{"cycles": [{"id": "cyc_1", "cycleNumber": 2, "scheduledDate": "2026-04-01"}]}]
        })));
        match &from_cycles.groups[0].next_cycle {
            NextCycleHint::Cycle(stub) => {
                assert_eq!(stub.id.as_deref(), Some("cyc_1"));
                assert_eq!(stub.number, Some(2));
                assert!(stub.scheduled_date.is_some());
            }
            other => panic!("expected cycle stub, got {other:?}"),
        }

        let absent = normalize_overview(Some(&json!({"groups": [{}]})));
        assert_eq!(absent.groups[0].next_cycle, NextCycleHint::Unknown);
    }

    #[test]
    fn wallet_summary_accepts_list_object_and_singleton() {
        let from_list = normalize_overview(Some(&json!({
            "wallets": [{"id": "w1", "availableBalance": "10.50", "pendingBalance": 2}]
        })));
        assert_eq!(from_list.wallets[0].available_balance, 10.5);
        assert_eq!(from_list.wallets[0].pending_balance, 2.0);

        let from_summary = normalize_overview(Some(&json!({
            "walletSummary": {"wallets": [{"id": "w2", "totalAvailableBalance": 80}]}
        })));
        assert_eq!(from_summary.wallets[0].available_balance, 80.0);

        let from_singleton = normalize_overview(Some(&json!({
            "walletSummary": {"primaryWallet": {"totalAvailableBalance": 55, "currency": "GHS"}}
        })));
        assert_eq!(from_singleton.wallets.len(), 1);
        assert_eq!(from_singleton.wallets[0].id, "primary");
        assert_eq!(from_singleton.wallets[0].available_balance, 55.0);
        assert_eq!(from_singleton.wallets[0].currency.as_deref(), Some("GHS"));
    }

    #[test]
    fn ledger_tolerates_wrapped_arrays_and_legacy_fields() {
        let overview = normalize_overview(Some(&json!({
            "ledger": {"items": [{
                "id": 91,
                "direction": "CREDIT",
                "amount": {"value": "30"},
                "date": "2026-02-02"
            }]}
        })));
        let entry = &overview.ledger_entries[0];
        assert_eq!(entry.id.as_deref(), Some("91"));
        assert_eq!(entry.entry_type, "CREDIT");
        assert_eq!(entry.amount, 30.0);
        assert_eq!(entry.created_at.as_deref(), Some("2026-02-02"));
    }
}
