//! Application state shared across handlers

use std::sync::Arc;
use std::time::Duration;

use axum::extract::FromRef;

use crate::auth::{StaticTokenProvider, TokenProvider};
use crate::cache::QueryCache;
use crate::client::ApiClient;
use crate::config::Config;
use crate::services::{
    ContributionService, DashboardService, GroupService, InvitationService, ProfileService,
    WalletService,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub cache: Arc<QueryCache>,
    pub tokens: Arc<dyn TokenProvider>,
    pub http: reqwest::Client,
    pub dashboard_service: Arc<DashboardService>,
    pub group_service: Arc<GroupService>,
    pub contribution_service: Arc<ContributionService>,
    pub invitation_service: Arc<InvitationService>,
    pub wallet_service: Arc<WalletService>,
    pub profile_service: Arc<ProfileService>,
}

impl AppState {
    /// Wire the full service graph from configuration.
    pub fn from_config(config: Config) -> Self {
        let tokens: Arc<dyn TokenProvider> =
            Arc::new(StaticTokenProvider::new(config.service_api_token.clone()));
        Self::with_token_provider(config, tokens)
    }

    /// Same wiring with an injected token source (tests, embedding).
    pub fn with_token_provider(config: Config, tokens: Arc<dyn TokenProvider>) -> Self {
        let timeout = Duration::from_secs(config.request_timeout_seconds);
        let cache = Arc::new(QueryCache::new(Duration::from_secs(config.cache_ttl_seconds)));
        let client = Arc::new(ApiClient::new(
            config.api_base_url.clone(),
            timeout,
            tokens.clone(),
        ));

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        let dashboard_service = Arc::new(DashboardService::new(client.clone(), cache.clone()));
        let group_service = Arc::new(GroupService::new(client.clone(), cache.clone()));
        let contribution_service = Arc::new(ContributionService::new(
            client.clone(),
            cache.clone(),
            group_service.clone(),
        ));
        let invitation_service = Arc::new(InvitationService::new(client.clone(), cache.clone()));
        let wallet_service = Arc::new(WalletService::new(client.clone(), cache.clone()));
        let profile_service = Arc::new(ProfileService::new(client.clone()));

        AppState {
            config: Arc::new(config),
            cache,
            tokens,
            http,
            dashboard_service,
            group_service,
            contribution_service,
            invitation_service,
            wallet_service,
            profile_service,
        }
    }
}

impl FromRef<AppState> for Arc<DashboardService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.dashboard_service.clone()
    }
}

impl FromRef<AppState> for Arc<GroupService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.group_service.clone()
    }
}

impl FromRef<AppState> for Arc<ContributionService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.contribution_service.clone()
    }
}

impl FromRef<AppState> for Arc<InvitationService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.invitation_service.clone()
    }
}

impl FromRef<AppState> for Arc<WalletService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.wallet_service.clone()
    }
}

impl FromRef<AppState> for Arc<ProfileService> {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.profile_service.clone()
    }
}
