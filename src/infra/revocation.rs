//! Revocation list for session tokens invalidated before expiry.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::cache::Cache;
use crate::config::CACHE_PREFIX_REVOKED;
use crate::errors::AppResult;
use domain::RevocationEntry;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Store of revoked token identifiers.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RevocationList: Send + Sync {
    /// Record a revocation. A token revoked twice keeps its first entry.
    async fn revoke(&self, entry: RevocationEntry) -> AppResult<()>;

    /// Whether the token with this identifier has been revoked.
    async fn is_revoked(&self, token_id: &str) -> AppResult<bool>;

    /// Drop entries whose token has expired, returning how many were removed.
    async fn prune(&self, now: DateTime<Utc>) -> AppResult<usize>;
}

/// Redis-backed revocation list.
///
/// Each entry is a key that expires together with its token, so Redis does
/// the pruning.
#[derive(Clone)]
pub struct RedisRevocationList {
    cache: Cache,
}

impl RedisRevocationList {
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    fn key(token_id: &str) -> String {
        format!("{}{}", CACHE_PREFIX_REVOKED, token_id)
    }

    /// Seconds the key must live to outlast its token, rounded up and never zero.
    fn key_ttl(entry: &RevocationEntry) -> u64 {
        let millis = (entry.expires_at - entry.revoked_at).num_milliseconds();
        let seconds = (millis + 999).div_euclid(1000);
        seconds.max(1) as u64
    }
}

#[async_trait]
impl RevocationList for RedisRevocationList {
    async fn revoke(&self, entry: RevocationEntry) -> AppResult<()> {
        let created = self
            .cache
            .set_nx_with_ttl(
                &Self::key(&entry.token_id),
                &entry.revoked_at.to_rfc3339(),
                Self::key_ttl(&entry),
            )
            .await?;

        if !created {
            tracing::debug!(token_id = %entry.token_id, "Token already revoked");
        }
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> AppResult<bool> {
        self.cache.exists(&Self::key(token_id)).await
    }

    async fn prune(&self, _now: DateTime<Utc>) -> AppResult<usize> {
        Ok(0)
    }
}

/// In-process revocation list.
#[derive(Default)]
pub struct MemoryRevocationList {
    entries: RwLock<HashMap<String, RevocationEntry>>,
}

impl MemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry recorded for a token, if any.
    pub async fn entry(&self, token_id: &str) -> Option<RevocationEntry> {
        self.entries.read().await.get(token_id).cloned()
    }

    /// Number of entries currently held.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl RevocationList for MemoryRevocationList {
    async fn revoke(&self, entry: RevocationEntry) -> AppResult<()> {
        let mut entries = self.entries.write().await;
        entries.entry(entry.token_id.clone()).or_insert(entry);
        Ok(())
    }

    async fn is_revoked(&self, token_id: &str) -> AppResult<bool> {
        Ok(self.entries.read().await.contains_key(token_id))
    }

    async fn prune(&self, now: DateTime<Utc>) -> AppResult<usize> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_prunable(now));
        Ok(before - entries.len())
    }
}
