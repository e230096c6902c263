//! Rotation cycle resolver.
//!
//! Pure derivations over a normalized [`Group`]: the ordered rotation, the
//! current and next cycles, per-participant settlement, and the aggregate
//! collection totals. Everything here is recomputed on demand and is O(n)
//! in cycles and participants.
//!
//! The current/next fallbacks are spelled out as named strategies in
//! [`strategy`], tried in a fixed order. The terminal-edge behavior (all
//! cycles paid out -> current is the last cycle, next resolves to the same
//! cycle) is intentional and pinned by the integration tests.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Cycle, Group, Member, Participant};
use crate::utils::formatters::format_date;

/// Terminal status marker: a cycle whose pot has been paid out.
pub const PAID_OUT_STATUS: &str = "PAID_OUT";

/// One selectable cycle in the contribution form.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleOption {
    pub id: String,
    pub number: Option<i64>,
    pub date: String,
    pub has_contributed: bool,
}

/// Collection totals across the tracked cycles. Unknown per-cycle totals
/// count as zero at this aggregation boundary.
#[derive(Debug, Clone, Copy, Serialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub total_expected: f64,
    pub total_received: f64,
    pub outstanding: f64,
}

pub fn is_terminal(cycle: &Cycle) -> bool {
    cycle.status == PAID_OUT_STATUS
}

/// A participant is settled iff they were expected to pay something and
/// have paid at least that much. Zero-expected participants are never
/// settled, so incomplete data cannot read as paid.
pub fn is_settled(participant: &Participant) -> bool {
    let expected = participant.amount_expected.unwrap_or(0.0);
    let paid = participant.amount_paid.unwrap_or(0.0);
    expected > 0.0 && paid >= expected
}

/// Whether a participant's own contribution for the cycle is done: settled
/// by amounts, or marked `PAID` by the upstream while still expected > 0.
pub fn has_contributed(participant: &Participant) -> bool {
    let expected = participant.amount_expected.unwrap_or(0.0);
    let paid = participant.amount_paid.unwrap_or(0.0);
    expected > 0.0 && (paid >= expected || participant.status == "PAID")
}

/// The rotation: cycles with a real sequence number, ascending. Synthetic
/// null-numbered cycles are dropped before ordering.
pub fn ordered_cycles(group: &Group) -> Vec<&Cycle> {
    let mut cycles: Vec<&Cycle> = group
        .cycles
        .iter()
        .filter(|cycle| cycle.number.is_some())
        .collect();
    cycles.sort_by_key(|cycle| cycle.number.unwrap_or(0));
    cycles
}

/// The individual fallback steps for current/next resolution. Each is a
/// total function of the ordered rotation, so each is testable on its own.
pub mod strategy {
    use super::*;

    /// First cycle, in rotation order, that has not been paid out.
    pub fn first_open<'a>(ordered: &[&'a Cycle]) -> Option<&'a Cycle> {
        ordered.iter().find(|cycle| !is_terminal(cycle)).copied()
    }

    /// The last cycle of the rotation, regardless of status.
    pub fn last_overall<'a>(ordered: &[&'a Cycle]) -> Option<&'a Cycle> {
        ordered.last().copied()
    }

    /// First non-terminal cycle strictly after the cycle with `current_id`.
    /// When the current cycle is not in the rotation (an insights override
    /// can reference one), the scan starts from the beginning.
    pub fn first_open_after<'a>(ordered: &[&'a Cycle], current_id: &str) -> Option<&'a Cycle> {
        let start = ordered
            .iter()
            .position(|cycle| cycle.id == current_id)
            .map(|index| index + 1)
            .unwrap_or(0);
        ordered[start..].iter().find(|cycle| !is_terminal(cycle)).copied()
    }
}

/// The cycle the group is currently collecting for: a server-side insights
/// override when present, else the first open cycle, else (when every
/// cycle is terminal) the last cycle so the UI still has a value.
pub fn current_cycle<'a>(group: &'a Group, ordered: &[&'a Cycle]) -> Option<&'a Cycle> {
    if let Some(current) = group.insights.as_ref().and_then(|i| i.current_cycle.as_ref()) {
        return Some(current);
    }
    strategy::first_open(ordered).or_else(|| strategy::last_overall(ordered))
}

/// The upcoming cycle relative to `current`: insights override, else first
/// open strictly after current, else first open anywhere, else the last
/// cycle overall.
pub fn next_cycle<'a>(
    group: &'a Group,
    ordered: &[&'a Cycle],
    current: Option<&'a Cycle>,
) -> Option<&'a Cycle> {
    if let Some(next) = group.insights.as_ref().and_then(|i| i.next_cycle.as_ref()) {
        return Some(next);
    }
    if ordered.is_empty() {
        return None;
    }
    if let Some(current) = current {
        if let Some(upcoming) = strategy::first_open_after(ordered, &current.id) {
            return Some(upcoming);
        }
    }
    strategy::first_open(ordered).or_else(|| strategy::last_overall(ordered))
}

/// A cycle with zero participants is never fully paid; vacuous truth on
/// incomplete data would light the "all paid" badge spuriously.
pub fn cycle_fully_paid(cycle: &Cycle) -> bool {
    !cycle.participants.is_empty() && cycle.participants.iter().all(is_settled)
}

/// Expected total for one cycle: the upstream's own figure when reported,
/// else the participant sum, else unknown. Callers render unknown as "—",
/// never as a zero amount.
pub fn per_cycle_expected(cycle: &Cycle) -> Option<f64> {
    if let Some(total) = cycle.total_expected {
        return Some(total);
    }
    if cycle.participants.is_empty() {
        return None;
    }
    Some(
        cycle
            .participants
            .iter()
            .map(|p| p.amount_expected.unwrap_or(0.0))
            .sum(),
    )
}

/// Received total for one cycle; same fallback order as expected.
pub fn per_cycle_received(cycle: &Cycle) -> Option<f64> {
    if let Some(total) = cycle.total_received {
        return Some(total);
    }
    if cycle.participants.is_empty() {
        return None;
    }
    Some(
        cycle
            .participants
            .iter()
            .map(|p| p.amount_paid.unwrap_or(0.0))
            .sum(),
    )
}

/// Build the contribution form's cycle options for the signed-in member.
pub fn cycle_options(ordered: &[&Cycle], current_user_id: Option<&str>) -> Vec<CycleOption> {
    ordered
        .iter()
        .map(|cycle| {
            let own_record = current_user_id.and_then(|user_id| {
                cycle
                    .participants
                    .iter()
                    .find(|p| p.user_id.as_deref() == Some(user_id))
            });
            CycleOption {
                id: cycle.id.clone(),
                number: cycle.number,
                date: format_date(cycle.scheduled_date),
                has_contributed: own_record.map(has_contributed).unwrap_or(false),
            }
        })
        .collect()
}

/// Receiver display for a cycle: the embedded receiver object, then a
/// member-roster lookup by user id, then the literal "Unassigned".
pub fn receiver_label(cycle: &Cycle, members: &[Member]) -> String {
    let from_receiver = cycle
        .receiver
        .as_ref()
        .and_then(|receiver| receiver.display_name.as_deref().or(receiver.name.as_deref()));

    let from_roster = cycle.receiver_user_id.as_deref().and_then(|user_id| {
        members
            .iter()
            .find(|member| member.user_id.as_deref() == Some(user_id))
            .and_then(|member| member.user.as_ref())
            .and_then(|user| {
                user.display_name
                    .as_deref()
                    .or(user.full_name.as_deref())
                    .or(user.name.as_deref())
            })
    });

    from_receiver.or(from_roster).unwrap_or("Unassigned").to_string()
}

/// Aggregate collection totals across the rotation; outstanding never goes
/// negative even when received overshoots expected.
pub fn collection_summary(ordered: &[&Cycle]) -> CollectionSummary {
    let total_expected: f64 = ordered
        .iter()
        .map(|cycle| per_cycle_expected(cycle).unwrap_or(0.0))
        .sum();
    let total_received: f64 = ordered
        .iter()
        .map(|cycle| per_cycle_received(cycle).unwrap_or(0.0))
        .sum();
    CollectionSummary {
        total_expected,
        total_received,
        outstanding: (total_expected - total_received).max(0.0),
    }
}

/// Projected pot for one turn: the insights month total when available,
/// else the first cycle's reported expected total, else contribution
/// amount times the participant count.
pub fn projected_payout(group: &Group, ordered: &[&Cycle]) -> f64 {
    if let Some(first_month) = group
        .insights
        .as_ref()
        .and_then(|i| i.payouts_by_month.first())
    {
        return first_month.total;
    }
    if let Some(total) = ordered
        .first()
        .and_then(|cycle| cycle.total_expected)
        .filter(|total| *total != 0.0)
    {
        return total;
    }
    let base = group.contribution_amount.unwrap_or(0.0);
    let participant_count = match ordered.first() {
        Some(cycle) => cycle.participants.len(),
        None => group.members.len(),
    };
    base * participant_count as f64
}

/// The soonest strictly-future date among the rotation rows.
pub fn nearest_upcoming(dates: &[DateTime<Utc>], now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    dates.iter().copied().filter(|date| *date > now).min()
}

/// Countdown label for the nearest upcoming cycle, e.g. "Next cycle in 2d 04h 30m".
pub fn countdown_label(next: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = next - now;
    if diff.num_seconds() <= 0 {
        return "Cycle is starting".to_string();
    }
    let total_seconds = diff.num_seconds();
    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3_600;
    let minutes = (total_seconds % 3_600) / 60;
    if days > 0 {
        format!("Next cycle in {days}d {hours:02}h {minutes:02}m")
    } else {
        format!("Next cycle in {hours:02}h {minutes:02}m")
    }
}
