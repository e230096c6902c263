//! Request DTOs accepted by the gateway's own endpoints.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Request DTO for recording a contribution against a cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordContributionRequest {
    /// Explicit target cycle; when absent the first available cycle is used.
    pub cycle_id: Option<String>,
    pub amount: f64,
    pub wallet_id: Option<String>,
}

impl RecordContributionRequest {
    /// Client-side precondition: the amount must parse to a finite number
    /// greater than zero. This never reaches the network when it fails.
    pub fn validate(&self) -> Result<(), String> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err("Enter a contribution amount greater than 0.".to_string());
        }
        Ok(())
    }
}

/// Request DTO for creating a group.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateGroupRequest {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    pub description: Option<String>,
    #[validate(range(min = 0.01))]
    pub contribution_amount: f64,
    #[validate(length(equal = 3))]
    pub currency: String,
    pub frequency: Option<String>,
    pub rotation_strategy: Option<String>,
    #[validate(range(min = 2, max = 64))]
    pub slot_count: Option<i64>,
    pub auto_payout_enabled: Option<bool>,
}

/// Request DTO for generating a group's cycles. All fields optional; the
/// upstream fills in defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCyclesRequest {
    pub start_date: Option<String>,
    pub iterations: Option<u32>,
    pub receiver_order: Option<Vec<String>>,
}

impl GenerateCyclesRequest {
    /// Only the provided fields are forwarded upstream.
    pub fn to_payload(&self) -> Value {
        let mut payload = serde_json::Map::new();
        if let Some(start) = &self.start_date {
            payload.insert("startDate".to_string(), Value::String(start.clone()));
        }
        if let Some(iterations) = self.iterations {
            payload.insert("iterations".to_string(), Value::from(iterations));
        }
        if let Some(order) = &self.receiver_order {
            payload.insert(
                "receiverOrder".to_string(),
                Value::Array(order.iter().cloned().map(Value::String).collect()),
            );
        }
        Value::Object(payload)
    }
}

/// Request DTO for sending a group invitation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendInviteRequest {
    pub invitee_user_id: Option<String>,
    pub invitee_contact: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<Value>,
}

impl SendInviteRequest {
    pub fn validate(&self) -> Result<(), String> {
        if self.invitee_user_id.is_none() && self.invitee_contact.is_none() {
            return Err("Provide either inviteeUserId or inviteeContact".to_string());
        }
        Ok(())
    }

    pub fn to_payload(&self) -> Value {
        serde_json::json!({
            "inviteeUserId": self.invitee_user_id,
            "inviteeContact": self.invitee_contact,
            "role": self.role.as_deref().unwrap_or("MEMBER"),
            "metadata": self.metadata.clone().unwrap_or_else(|| Value::Object(Default::default())),
        })
    }
}

/// An invitation response action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationAction {
    Accept,
    Decline,
}

impl InvitationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvitationAction::Accept => "ACCEPT",
            InvitationAction::Decline => "DECLINE",
        }
    }
}

/// Request DTO for the profile bootstrap sync.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSyncRequest {
    #[validate(length(min = 1, max = 200))]
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub locale: Option<String>,
}

/// Request DTO for creating a wallet.
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateWalletRequest {
    #[validate(length(equal = 3))]
    pub currency: String,
    pub label: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contribution_amount_must_be_positive_and_finite() {
        let mut request = RecordContributionRequest {
            cycle_id: None,
            amount: 50.0,
            wallet_id: None,
        };
        assert!(request.validate().is_ok());

        request.amount = 0.0;
        assert!(request.validate().is_err());

        request.amount = -25.0;
        assert!(request.validate().is_err());

        request.amount = f64::NAN;
        assert!(request.validate().is_err());

        request.amount = f64::INFINITY;
        assert!(request.validate().is_err());
    }

    #[test]
    fn create_group_request_enforces_field_bounds() {
        let valid = CreateGroupRequest {
            name: "Osu traders".to_string(),
            description: None,
            contribution_amount: 50.0,
            currency: "GHS".to_string(),
            frequency: Some("MONTHLY".to_string()),
            rotation_strategy: None,
            slot_count: Some(8),
            auto_payout_enabled: Some(true),
        };
        assert!(valid.validate().is_ok());

        let empty_name = CreateGroupRequest {
            name: String::new(),
            ..valid.clone()
        };
        assert!(empty_name.validate().is_err());

        let bad_currency = CreateGroupRequest {
            currency: "CEDIS".to_string(),
            ..valid.clone()
        };
        assert!(bad_currency.validate().is_err());

        let one_slot = CreateGroupRequest {
            slot_count: Some(1),
            ..valid
        };
        assert!(one_slot.validate().is_err());
    }

    #[test]
    fn invite_requires_a_target() {
        let request = SendInviteRequest {
            invitee_user_id: None,
            invitee_contact: None,
            role: None,
            metadata: None,
        };
        assert!(request.validate().is_err());

        let request = SendInviteRequest {
            invitee_user_id: Some("user_1".to_string()),
            invitee_contact: None,
            role: None,
            metadata: None,
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn generate_cycles_payload_skips_absent_fields() {
        let payload = GenerateCyclesRequest::default().to_payload();
        assert_eq!(payload, serde_json::json!({}));

        let payload = GenerateCyclesRequest {
            start_date: Some("2026-01-01".to_string()),
            iterations: Some(6),
            receiver_order: None,
        }
        .to_payload();
        assert_eq!(payload["startDate"], "2026-01-01");
        assert_eq!(payload["iterations"], 6);
        assert!(payload.get("receiverOrder").is_none());
    }
}
