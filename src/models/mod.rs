//! Data models for the Kinvest gateway
//!
//! Canonical shapes the normalizers produce from raw upstream payloads.
//! The gateway owns none of these entities; they are typed views over the
//! ledger API's state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub mod requests;
pub use requests::*;

/// Normalized dashboard snapshot. Every field is present in the output;
/// missing upstream data degrades to `None` or an empty list, never to a
/// missing key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub synced_at: Option<String>,
    /// Profile payload is owned by the user service; passed through as-is.
    pub profile: Option<Value>,
    pub metrics: Option<Metrics>,
    pub groups: Vec<GroupSummary>,
    pub wallets: Vec<WalletBalance>,
    pub ledger_entries: Vec<LedgerEntry>,
    pub alerts: Vec<Value>,
}

/// Aggregate metrics for the dashboard. Unknown and zero are conflated
/// here; the group-detail path is the one that preserves the distinction.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub total_contributions: f64,
    pub total_received: f64,
    pub wallet_balance: f64,
    pub payout_position: Option<i64>,
    pub slot_count: Option<i64>,
    pub contribution_delta: Option<f64>,
    pub next_payout_eta: Option<String>,
    pub wallet_note: Option<String>,
    pub pending_contributions: f64,
    pub pending_payouts: f64,
    pub active_groups: i64,
}

/// A group as it appears in the dashboard snapshot (not the detail model).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: Option<String>,
    pub name: String,
    pub status: String,
    pub currency: Option<String>,
    pub contribution_amount: f64,
    pub role: String,
    pub membership_status: String,
    pub member_count: Option<i64>,
    pub next_cycle: NextCycleHint,
}

/// The snapshot's "next cycle" field has shipped in several shapes over
/// time: a date string, a bare cycle number, or an embedded cycle object.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum NextCycleHint {
    #[default]
    Unknown,
    Label(String),
    Number(i64),
    Cycle(CycleStub),
}

/// Minimal cycle reference carried by a [`NextCycleHint`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CycleStub {
    pub id: Option<String>,
    pub number: Option<i64>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
}

/// Full group detail model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Backend-defined; treated as an opaque string.
    pub status: String,
    pub contribution_amount: Option<f64>,
    pub currency: String,
    pub frequency: String,
    pub rotation_strategy: String,
    pub slot_count: i64,
    pub auto_payout_enabled: bool,
    pub late_fee_percent: Option<f64>,
    pub grace_period_days: Option<i64>,
    pub members: Vec<Member>,
    /// Not guaranteed pre-sorted by the upstream; see `rotation::ordered_cycles`.
    pub cycles: Vec<Cycle>,
    pub insights: Option<GroupInsights>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub role: String,
    pub status: String,
    pub joined_at: Option<DateTime<Utc>>,
    pub user_id: Option<String>,
    pub user: Option<UserRef>,
}

/// One rotation turn. `number` is the 1-based ordering key; a cycle with
/// no number is synthetic and excluded from the rotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cycle {
    pub id: String,
    pub number: Option<i64>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub status: String,
    pub receiver_user_id: Option<String>,
    pub receiver: Option<UserRef>,
    /// `None` means the upstream did not report a total (unknown != zero).
    pub total_expected: Option<f64>,
    pub total_received: Option<f64>,
    pub participants: Vec<Participant>,
    pub contribution_status: Option<String>,
}

/// A member's expected/actual contribution record within one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub id: String,
    pub user_id: Option<String>,
    pub status: String,
    pub amount_expected: Option<f64>,
    pub amount_paid: Option<f64>,
    pub paid_at: Option<DateTime<Utc>>,
    pub user: Option<UserRef>,
}

/// Loose reference to a user profile the gateway does not own. Display
/// code falls through these fields in order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub id: Option<String>,
    pub display_name: Option<String>,
    pub full_name: Option<String>,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl UserRef {
    /// First usable display field, if any.
    pub fn label(&self) -> Option<&str> {
        self.display_name
            .as_deref()
            .or(self.full_name.as_deref())
            .or(self.name.as_deref())
            .or(self.email.as_deref())
    }
}

/// Server-computed insights embedded in a group detail payload. When
/// present, its current/next cycle take precedence over the derived ones.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GroupInsights {
    pub current_cycle: Option<Cycle>,
    pub next_cycle: Option<Cycle>,
    pub payouts_by_month: Vec<MonthlyPayout>,
    pub payout_history: Vec<PayoutRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPayout {
    pub month: Option<String>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PayoutRecord {
    pub id: Option<String>,
    pub cycle_number: Option<i64>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub paid_at: Option<DateTime<Utc>>,
    pub amount: f64,
    pub status: Option<String>,
    pub receiver: Option<UserRef>,
}

/// Wallet balance row from the dashboard snapshot or the wallet list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    pub id: String,
    pub currency: Option<String>,
    pub available_balance: f64,
    pub pending_balance: f64,
    pub status: String,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletTransaction {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub tx_type: Option<String>,
    pub direction: Option<String>,
    pub amount: f64,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub related_type: Option<String>,
    pub related_id: Option<String>,
}

/// Wallet detail view: the wallet object is passed through as the upstream
/// shaped it, transactions are normalized.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct WalletActivity {
    pub wallet: Option<Value>,
    pub transactions: Vec<WalletTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub entry_type: String,
    pub amount: f64,
    pub status: Option<String>,
    pub created_at: Option<String>,
    pub label: Option<String>,
    pub description: Option<String>,
    pub group: Option<Value>,
    pub cycle_number: Option<i64>,
    pub currency: Option<String>,
}

/// Canonical invitation status vocabulary. The upstream historically
/// reported `PENDING`; normalization folds it into `Invited`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    #[default]
    Invited,
    Accepted,
    Declined,
    Expired,
}

impl InvitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationStatus::Invited => "INVITED",
            InvitationStatus::Accepted => "ACCEPTED",
            InvitationStatus::Declined => "DECLINED",
            InvitationStatus::Expired => "EXPIRED",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invitation {
    pub id: String,
    pub status: InvitationStatus,
    pub group: InvitationGroup,
    pub inviter: Option<UserRef>,
    pub invited_at: Option<DateTime<Utc>>,
    pub responded_at: Option<DateTime<Utc>>,
    pub invitee: Option<UserRef>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct InvitationGroup {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
}
