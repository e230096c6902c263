//! Invitation normalizer and status canonicalization.
//!
//! Two call sites in an earlier iteration of this product disagreed on how
//! to treat the legacy `PENDING` status; [`canonical_invitation_status`] is
//! the single source of truth every inbound read goes through.

use serde_json::Value;

use crate::models::{Invitation, InvitationGroup, InvitationStatus, UserRef};
use crate::normalize::coerce::{pick, pick_str, to_datetime, to_id};

/// Map a raw invitation status onto the canonical vocabulary. `PENDING` is
/// a historical synonym for `INVITED`; anything outside the canonical set
/// falls back to `INVITED`.
pub fn canonical_invitation_status(raw: Option<&str>) -> InvitationStatus {
    let Some(raw) = raw else {
        return InvitationStatus::Invited;
    };
    match raw.trim().to_ascii_uppercase().as_str() {
        "PENDING" | "INVITED" => InvitationStatus::Invited,
        "ACCEPTED" => InvitationStatus::Accepted,
        "DECLINED" => InvitationStatus::Declined,
        "EXPIRED" => InvitationStatus::Expired,
        _ => InvitationStatus::Invited,
    }
}

/// Normalize the invitation list payload, which arrives either as
/// `{invitations: [...]}` or as a bare array.
pub fn normalize_invitations(raw: Option<&Value>) -> Vec<Invitation> {
    let Some(raw) = raw else { return Vec::new() };
    let list = raw
        .get("invitations")
        .and_then(Value::as_array)
        .or_else(|| raw.as_array());
    list.map(|invitations| invitations.iter().map(map_invitation).collect())
        .unwrap_or_default()
}

pub fn map_invitation(invite: &Value) -> Invitation {
    Invitation {
        id: to_id(invite.get("id")).unwrap_or_default(),
        status: canonical_invitation_status(pick_str(invite, &["status"]).as_deref()),
        group: map_invitation_group(invite.get("group")),
        inviter: map_user_ref(invite.get("inviter")),
        invited_at: to_datetime(pick(invite, &["invitedAt", "createdAt"])),
        responded_at: to_datetime(pick(
            invite,
            &["respondedAt", "acceptedAt", "declinedAt", "expiredAt", "updatedAt"],
        )),
        invitee: map_invitee(invite),
        message: pick_str(invite, &["message", "note"]),
    }
}

fn map_invitation_group(raw: Option<&Value>) -> InvitationGroup {
    let Some(group) = raw.filter(|value| value.is_object()) else {
        return InvitationGroup {
            id: None,
            name: "Untitled group".to_string(),
            description: None,
        };
    };
    InvitationGroup {
        id: to_id(group.get("id")),
        name: pick_str(group, &["name"]).unwrap_or_else(|| "Untitled group".to_string()),
        description: pick_str(group, &["description"]),
    }
}

/// The invitee may be embedded, may live under the legacy `recipient`
/// field, or may only exist as a bare contact email on the invite itself.
fn map_invitee(invite: &Value) -> Option<UserRef> {
    if let Some(invitee) = map_user_ref(pick(invite, &["invitee", "recipient"])) {
        return Some(invitee);
    }
    let email = pick_str(invite, &["email"])?;
    Some(UserRef {
        email: Some(email),
        display_name: pick_str(invite, &["name"]),
        ..Default::default()
    })
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pending_and_invited_canonicalize_identically() {
        assert_eq!(
            canonical_invitation_status(Some("PENDING")),
            canonical_invitation_status(Some("INVITED"))
        );
        assert_eq!(
            canonical_invitation_status(Some("pending")),
            InvitationStatus::Invited
        );
    }

    #[test]
    fn unknown_statuses_fall_back_to_invited() {
        assert_eq!(canonical_invitation_status(Some("FOO")), InvitationStatus::Invited);
        assert_eq!(canonical_invitation_status(Some("")), InvitationStatus::Invited);
        assert_eq!(canonical_invitation_status(None), InvitationStatus::Invited);
    }

    #[test]
    fn canonical_members_map_to_themselves() {
        assert_eq!(canonical_invitation_status(Some("ACCEPTED")), InvitationStatus::Accepted);
        assert_eq!(canonical_invitation_status(Some("DECLINED")), InvitationStatus::Declined);
        assert_eq!(canonical_invitation_status(Some("EXPIRED")), InvitationStatus::Expired);
    }

    #[test]
    fn list_accepts_wrapped_and_bare_shapes() {
        let wrapped = normalize_invitations(Some(&json!({
            "invitations": [{"id": "inv_1", "status": "PENDING"}]
        })));
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].status, InvitationStatus::Invited);

        let bare = normalize_invitations(Some(&json!([{"id": "inv_2", "status": "ACCEPTED"}])));
        assert_eq!(bare[0].status, InvitationStatus::Accepted);

        assert!(normalize_invitations(Some(&json!({"rows": []}))).is_empty());
        assert!(normalize_invitations(None).is_empty());
    }

    #[test]
    fn responded_at_falls_through_legacy_timestamps() {
        let invite = map_invitation(&json!({
            "id": "inv_1",
            "declinedAt": "2026-05-01T12:00:00Z"
        }));
        assert!(invite.responded_at.is_some());
    }

    #[test]
    fn invitee_falls_back_to_bare_contact_fields() {
        let invite = map_invitation(&json!({
            "id": "inv_1",
            "email": "ama@example.com",
            "name": "Ama"
        }));
        let invitee = invite.invitee.unwrap();
        assert_eq!(invitee.email.as_deref(), Some("ama@example.com"));
        assert_eq!(invitee.display_name.as_deref(), Some("Ama"));

        let invite = map_invitation(&json!({
            "id": "inv_2",
            "recipient": {"id": "u1", "email": "kofi@example.com"}
        }));
        assert_eq!(invite.invitee.unwrap().id.as_deref(), Some("u1"));
    }
}
