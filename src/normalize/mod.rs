//! Normalizers: defensive reshaping of raw upstream payloads into the
//! canonical models.
//!
//! Every function in this module tree is pure and total — malformed input
//! degrades to defaults, it never panics and never errors.

pub mod coerce;
pub mod group;
pub mod invitation;
pub mod overview;
pub mod wallet;

pub use group::normalize_group;
pub use invitation::{canonical_invitation_status, normalize_invitations};
pub use overview::normalize_overview;
pub use wallet::{normalize_wallet_activity, normalize_wallets};
