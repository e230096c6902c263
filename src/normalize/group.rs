//! Group detail normalizer: reshapes a raw group payload into the
//! canonical [`Group`] model.
//!
//! Money totals here preserve the unknown/zero distinction (`None` means
//! the upstream did not report a value) because the rotation resolver's
//! participant-sum fallback only activates on unknown, not on zero.

use serde_json::Value;

use crate::models::{
    Cycle, Group, GroupInsights, Member, MonthlyPayout, Participant, PayoutRecord, UserRef,
};
use crate::normalize::coerce::{
    pick, pick_amount_opt, pick_i64, pick_str, to_amount, to_datetime, to_id,
};

/// Normalize a raw group detail payload. `None` in, `None` out.
pub fn normalize_group(raw: Option<&Value>) -> Option<Group> {
    let group = raw.filter(|value| value.is_object())?;
    let template = group.get("template").filter(|value| value.is_object());

    // Group-level values always win; the template sub-object only fills
    // the gaps a sparse payload leaves.
    let with_template = |aliases: &[&str]| -> Option<String> {
        pick_str(group, aliases).or_else(|| template.and_then(|t| pick_str(t, aliases)))
    };

    Some(Group {
        id: to_id(group.get("id")).unwrap_or_default(),
        name: pick_str(group, &["name"]).unwrap_or_else(|| "Untitled group".to_string()),
        description: pick_str(group, &["description"]).unwrap_or_default(),
        status: pick_str(group, &["status"]).unwrap_or_else(|| "ACTIVE".to_string()),
        contribution_amount: pick_amount_opt(group, &["contributionAmount"])
            .or_else(|| template.and_then(|t| pick_amount_opt(t, &["contributionAmount"]))),
        currency: with_template(&["currency"]).unwrap_or_else(|| "USD".to_string()),
        frequency: with_template(&["frequency"]).unwrap_or_else(|| "MONTHLY".to_string()),
        rotation_strategy: with_template(&["rotationStrategy"])
            .unwrap_or_else(|| "FIXED_ORDER".to_string()),
        slot_count: pick_i64(group, &["slotCount"])
            .or_else(|| template.and_then(|t| pick_i64(t, &["slotCount"])))
            .unwrap_or(0),
        auto_payout_enabled: group
            .get("autoPayoutEnabled")
            .and_then(Value::as_bool)
            .unwrap_or(true),
        late_fee_percent: pick_amount_opt(group, &["lateFeePercent"]),
        grace_period_days: pick_i64(group, &["gracePeriodDays"]),
        members: map_list(group.get("members"), map_member),
        cycles: map_list(group.get("cycles"), map_cycle),
        insights: map_insights(group.get("insights")),
    })
}

fn map_list<T>(raw: Option<&Value>, map: impl Fn(&Value) -> T) -> Vec<T> {
    raw.and_then(Value::as_array)
        .map(|list| list.iter().map(map).collect())
        .unwrap_or_default()
}

fn map_member(member: &Value) -> Member {
    Member {
        id: to_id(member.get("id")).unwrap_or_default(),
        role: pick_str(member, &["role"]).unwrap_or_else(|| "MEMBER".to_string()),
        status: pick_str(member, &["status"]).unwrap_or_else(|| "INVITED".to_string()),
        joined_at: to_datetime(pick(member, &["joinedAt", "createdAt"])),
        user_id: to_id(member.get("userId"))
            .or_else(|| member.get("user").and_then(|user| to_id(user.get("id")))),
        user: map_user_ref(member.get("user")),
    }
}

pub(crate) fn map_cycle(cycle: &Value) -> Cycle {
    Cycle {
        id: to_id(cycle.get("id")).unwrap_or_default(),
        number: pick_i64(cycle, &["cycleNumber", "number"]),
        scheduled_date: to_datetime(pick(cycle, &["scheduledDate", "date"])),
        status: pick_str(cycle, &["status"]).unwrap_or_else(|| "PENDING".to_string()),
        receiver_user_id: to_id(cycle.get("receiverUserId"))
            .or_else(|| cycle.get("receiver").and_then(|r| to_id(r.get("id")))),
        receiver: map_user_ref(cycle.get("receiver")),
        total_expected: pick_amount_opt(cycle, &["totalExpected"]),
        total_received: pick_amount_opt(cycle, &["totalReceived"]),
        participants: map_list(cycle.get("participants"), map_participant),
        contribution_status: pick_str(cycle, &["contributionStatus"]),
    }
}

fn map_participant(participant: &Value) -> Participant {
    Participant {
        id: to_id(participant.get("id")).unwrap_or_default(),
        user_id: to_id(participant.get("userId")),
        status: pick_str(participant, &["status"]).unwrap_or_else(|| "PENDING".to_string()),
        amount_expected: pick_amount_opt(participant, &["amountExpected"]),
        amount_paid: pick_amount_opt(participant, &["amountPaid"]),
        paid_at: to_datetime(participant.get("paidAt")),
        user: map_user_ref(participant.get("user")),
    }
}

fn map_user_ref(raw: Option<&Value>) -> Option<UserRef> {
    let user = raw.filter(|value| value.is_object())?;
    Some(UserRef {
        id: to_id(user.get("id")),
        display_name: pick_str(user, &["displayName"]),
        full_name: pick_str(user, &["fullName"]),
        name: pick_str(user, &["name"]),
        email: pick_str(user, &["email"]),
    })
}

fn map_insights(raw: Option<&Value>) -> Option<GroupInsights> {
    let insights = raw.filter(|value| value.is_object())?;
    Some(GroupInsights {
        current_cycle: insights
            .get("currentCycle")
            .filter(|v| v.is_object())
            .map(map_cycle),
        next_cycle: insights
            .get("nextCycle")
            .filter(|v| v.is_object())
            .map(map_cycle),
        payouts_by_month: map_list(insights.get("payoutsByMonth"), |entry| MonthlyPayout {
            month: pick_str(entry, &["month"]),
            total: to_amount(entry.get("total")),
        }),
        payout_history: map_list(insights.get("payoutHistory"), |payout| PayoutRecord {
            id: to_id(payout.get("id")),
            cycle_number: pick_i64(payout, &["cycleNumber"]),
            scheduled_date: to_datetime(payout.get("scheduledDate")),
            paid_at: to_datetime(payout.get("paidAt")),
            amount: to_amount(payout.get("amount")),
            status: pick_str(payout, &["status"]),
            receiver: map_user_ref(payout.get("receiver")),
        }),
    })
}
