//! Wallet list, activity feed, and creation.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::cache::{QueryCache, QueryKey};
use crate::client::{ApiClient, ClientError};
use crate::models::{CreateWalletRequest, WalletActivity, WalletBalance};
use crate::normalize::{normalize_wallet_activity, normalize_wallets};

/// Balances move often; the wallet list goes stale faster than the rest.
const WALLETS_TTL: Duration = Duration::from_secs(30);

pub struct WalletService {
    client: Arc<ApiClient>,
    cache: Arc<QueryCache>,
}

impl WalletService {
    pub fn new(client: Arc<ApiClient>, cache: Arc<QueryCache>) -> Self {
        WalletService { client, cache }
    }

    pub async fn list(&self) -> Result<Vec<WalletBalance>, ClientError> {
        let raw = self
            .cache
            .get_or_fetch_with_ttl(QueryKey::wallets(), WALLETS_TTL, || async move {
                self.client.get("/api/wallets").await
            })
            .await?;
        Ok(normalize_wallets(Some(&raw)))
    }

    pub async fn activity(&self, wallet_id: &str) -> Result<WalletActivity, ClientError> {
        let path = format!("/api/wallets/{wallet_id}/transactions");
        let raw = self
            .cache
            .get_or_fetch(QueryKey::wallet_transactions(wallet_id), || async move {
                self.client.get(&path).await
            })
            .await?;
        Ok(normalize_wallet_activity(Some(&raw)))
    }

    /// Wallet page bundle. Once a wallet is selected, its activity feed
    /// and the wallet list fetch concurrently.
    pub async fn page(
        &self,
        selected_wallet_id: Option<&str>,
    ) -> Result<(Vec<WalletBalance>, Option<WalletActivity>), ClientError> {
        match selected_wallet_id {
            Some(wallet_id) => {
                let (wallets, activity) =
                    futures_util::future::try_join(self.list(), self.activity(wallet_id)).await?;
                Ok((wallets, Some(activity)))
            }
            None => Ok((self.list().await?, None)),
        }
    }

    pub async fn create(&self, request: &CreateWalletRequest) -> Result<Value, ClientError> {
        let payload = serde_json::to_value(request).unwrap_or(Value::Null);
        let created = self.client.post("/api/wallets", &payload).await?;
        self.cache.invalidate_prefix(&["wallets"]);
        self.cache.invalidate_prefix(&["dashboard"]);
        Ok(created)
    }
}
