//! Query cache for upstream payloads.
//!
//! Mirrors the query-cache semantics the product depends on: entries are
//! addressed by ordered key segments, identical in-flight fetches for the
//! same key are coalesced into one upstream request, and mutations
//! invalidate by marking entries stale (forcing a refetch) rather than
//! dropping them, so a patched value stays servable until fresh data lands.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::client::ClientError;

/// An ordered-segment cache key, e.g. `["groups", "grp_1", "detail"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        QueryKey(segments.into_iter().map(Into::into).collect())
    }

    pub fn dashboard_overview() -> Self {
        QueryKey::new(["dashboard", "overview"])
    }

    pub fn group_detail(group_id: &str) -> Self {
        QueryKey::new(["groups", group_id, "detail"])
    }

    pub fn group_list() -> Self {
        QueryKey::new(["groups", "list"])
    }

    pub fn invitations() -> Self {
        QueryKey::new(["notifications", "invitations"])
    }

    pub fn invite_search(group_id: &str, query: &str) -> Self {
        QueryKey::new(["groups", group_id, "invite-search", query])
    }

    pub fn wallets() -> Self {
        QueryKey::new(["wallets"])
    }

    pub fn wallet_transactions(wallet_id: &str) -> Self {
        QueryKey::new(["wallets", wallet_id, "transactions"])
    }

    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        prefix.len() <= self.0.len()
            && prefix.iter().zip(self.0.iter()).all(|(want, have)| want == have)
    }
}

struct CacheEntry {
    value: Value,
    fetched_at: Instant,
    ttl: Duration,
    stale: bool,
}

impl CacheEntry {
    fn is_fresh(&self) -> bool {
        !self.stale && self.fetched_at.elapsed() < self.ttl
    }
}

/// Concurrent query cache with per-key fetch coalescing.
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
    locks: DashMap<QueryKey, Arc<Mutex<()>>>,
    default_ttl: Duration,
}

impl QueryCache {
    pub fn new(default_ttl: Duration) -> Self {
        QueryCache {
            entries: DashMap::new(),
            locks: DashMap::new(),
            default_ttl,
        }
    }

    /// Return the cached value for `key` if fresh, otherwise run `fetch`
    /// and store its result under the default TTL.
    ///
    /// Concurrent callers for the same key coalesce: one fetch runs, the
    /// rest wait on the per-key lock and then observe the stored value.
    pub async fn get_or_fetch<F, Fut>(&self, key: QueryKey, fetch: F) -> Result<Value, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ClientError>>,
    {
        self.get_or_fetch_with_ttl(key, self.default_ttl, fetch).await
    }

    /// Same as [`get_or_fetch`](Self::get_or_fetch) with an explicit TTL.
    pub async fn get_or_fetch_with_ttl<F, Fut>(
        &self,
        key: QueryKey,
        ttl: Duration,
        fetch: F,
    ) -> Result<Value, ClientError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, ClientError>>,
    {
        if let Some(value) = self.fresh_value(&key) {
            return Ok(value);
        }

        let lock = self
            .locks
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        // A coalesced leader may have refreshed the entry while this caller
        // waited on the lock.
        if let Some(value) = self.fresh_value(&key) {
            return Ok(value);
        }

        let value = fetch().await?;
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                fetched_at: Instant::now(),
                ttl,
                stale: false,
            },
        );
        Ok(value)
    }

    fn fresh_value(&self, key: &QueryKey) -> Option<Value> {
        self.entries
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.value.clone())
    }

    /// Current cached value regardless of freshness.
    pub fn peek(&self, key: &QueryKey) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Store a value directly (server-side prefetch, test setup).
    pub fn put(&self, key: QueryKey, value: Value) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
                ttl: self.default_ttl,
                stale: false,
            },
        );
    }

    /// Mark one entry stale; the next read refetches.
    pub fn mark_stale(&self, key: &QueryKey) {
        if let Some(mut entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    /// Mark every entry under `prefix` stale. `["groups", "grp_1"]` touches
    /// that group's detail and searches but no sibling group.
    pub fn invalidate_prefix(&self, prefix: &[&str]) {
        for mut entry in self.entries.iter_mut() {
            if entry.key().starts_with(prefix) {
                entry.value_mut().stale = true;
            }
        }
    }

    /// Apply an in-place patch to a cached value, keeping its freshness.
    /// Returns false when there is nothing cached to patch.
    pub fn patch<F: FnOnce(&mut Value)>(&self, key: &QueryKey, apply: F) -> bool {
        match self.entries.get_mut(key) {
            Some(mut entry) => {
                apply(&mut entry.value_mut().value);
                true
            }
            None => false,
        }
    }

    /// Whether the entry exists and is fresh (test hook).
    pub fn is_fresh(&self, key: &QueryKey) -> bool {
        self.entries
            .get(key)
            .map(|entry| entry.is_fresh())
            .unwrap_or(false)
    }
}
