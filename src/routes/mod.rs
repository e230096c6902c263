//! Route definitions for the Kinvest gateway

mod dashboard;
mod groups;
mod invitations;
mod profile;
mod proxy;
mod wallets;

pub use dashboard::dashboard_routes;
pub use groups::group_routes;
pub use invitations::invitation_routes;
pub use profile::profile_routes;
pub use proxy::proxy_routes;
pub use wallets::wallet_routes;
