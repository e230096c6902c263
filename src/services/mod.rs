//! Service layer: fetch, normalize, derive, and mutate with cache
//! invalidation. One service per upstream domain.

pub mod contributions;
pub mod dashboard;
pub mod groups;
pub mod invitations;
pub mod profile;
pub mod wallets;

pub use contributions::{ContributionError, ContributionService};
pub use dashboard::DashboardService;
pub use groups::GroupService;
pub use invitations::InvitationService;
pub use profile::ProfileService;
pub use wallets::WalletService;
