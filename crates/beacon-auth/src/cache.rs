//! The process-wide digest cache.
//!
//! Holds two maps: tenant → active secret (provisioning paths) and
//! digest → tenant (the request hot path). A reload computes a complete
//! replacement outside the lock, then swaps both maps under one write
//! lock, so readers observe either the fully-old or fully-new contents and
//! never a mix. A failed reload leaves the previous contents in effect.

use crate::digest::{compute_digest, current_hour_bucket, next_hour_bucket};
use crate::source::KeySource;
use crate::AuthError;
use beacon_core::TenantId;
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Default)]
struct CacheState {
    /// tenant identifier → active secret. One slot per tenant; when a
    /// tenant holds several enabled keys the last-loaded one wins.
    tenant_keys: HashMap<TenantId, String>,
    /// digest → tenant identifier. Two entries per enabled key: the
    /// current and the next UTC hour bucket.
    digest_index: HashMap<String, TenantId>,
}

/// In-memory cache mapping rotating digests to tenant identities.
///
/// Constructed once at process start, shared via `Arc`, reloaded on demand
/// and on the hourly clock boundary (see
/// [`spawn_hourly_reload`](crate::spawn_hourly_reload)).
pub struct DigestCache {
    state: RwLock<CacheState>,
}

impl DigestCache {
    /// Create an empty cache.
    ///
    /// Until the first [`reload`](Self::reload) every lookup misses.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
        }
    }

    /// Rebuild the cache from the credential source.
    ///
    /// Reads all non-disabled credentials, computes digests for the current
    /// and next UTC hour bucket, and atomically replaces both internal maps.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::SourceUnavailable`] if the source cannot be
    /// read; the previous cache contents remain in effect.
    pub async fn reload(&self, source: &dyn KeySource) -> Result<(), AuthError> {
        let records = source.load_enabled_keys().await?;

        // Build the replacement outside the lock; the write lock is held
        // only for the swap below.
        let current = current_hour_bucket();
        let next = next_hour_bucket();

        let mut fresh = CacheState {
            tenant_keys: HashMap::with_capacity(records.len()),
            digest_index: HashMap::with_capacity(records.len() * 2),
        };
        for record in records {
            fresh
                .digest_index
                .insert(compute_digest(&record.secret, &current), record.tenant.clone());
            fresh
                .digest_index
                .insert(compute_digest(&record.secret, &next), record.tenant.clone());
            fresh.tenant_keys.insert(record.tenant, record.secret);
        }

        let (tenants, digests) = (fresh.tenant_keys.len(), fresh.digest_index.len());
        *self.state.write().await = fresh;

        tracing::info!(
            tenants,
            digests,
            hour_bucket = %current,
            "Digest cache reloaded"
        );
        Ok(())
    }

    /// Resolve a digest to its tenant. O(1), hot path.
    pub async fn lookup_tenant_by_digest(&self, digest: &str) -> Option<TenantId> {
        self.state.read().await.digest_index.get(digest).cloned()
    }

    /// Look up a tenant's active secret. Provisioning paths only.
    pub async fn lookup_key_for_tenant(&self, tenant: &TenantId) -> Option<String> {
        self.state.read().await.tenant_keys.get(tenant).cloned()
    }

    /// Number of tenants with an active key in the cache.
    pub async fn tenant_count(&self) -> usize {
        self.state.read().await.tenant_keys.len()
    }

    /// Number of digest entries (two per enabled key).
    pub async fn digest_count(&self) -> usize {
        self.state.read().await.digest_index.len()
    }
}

impl Default for DigestCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::hour_bucket_at;
    use crate::source::CredentialRecord;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    struct StaticSource {
        records: Vec<CredentialRecord>,
        fail: AtomicBool,
    }

    impl StaticSource {
        fn new(records: Vec<(&str, &str)>) -> Self {
            Self {
                records: records
                    .into_iter()
                    .map(|(tenant, secret)| CredentialRecord {
                        tenant: tenant.parse().unwrap(),
                        secret: secret.to_string(),
                    })
                    .collect(),
                fail: AtomicBool::new(false),
            }
        }
    }

    #[async_trait]
    impl KeySource for StaticSource {
        async fn load_enabled_keys(&self) -> Result<Vec<CredentialRecord>, AuthError> {
            if self.fail.load(Ordering::Acquire) {
                return Err(AuthError::SourceUnavailable {
                    detail: "simulated outage".to_string(),
                });
            }
            Ok(self.records.clone())
        }
    }

    #[tokio::test]
    async fn test_reload_resolves_current_and_next_bucket() {
        let cache = DigestCache::new();
        let source = StaticSource::new(vec![("acme", "secret-1")]);
        cache.reload(&source).await.unwrap();

        let acme: TenantId = "acme".parse().unwrap();
        let current = compute_digest("secret-1", &current_hour_bucket());
        let next = compute_digest("secret-1", &next_hour_bucket());

        assert_eq!(cache.lookup_tenant_by_digest(&current).await, Some(acme.clone()));
        assert_eq!(cache.lookup_tenant_by_digest(&next).await, Some(acme));
    }

    #[tokio::test]
    async fn test_stale_bucket_does_not_resolve() {
        let cache = DigestCache::new();
        let source = StaticSource::new(vec![("acme", "secret-1")]);
        cache.reload(&source).await.unwrap();

        let stale_bucket = hour_bucket_at(Utc::now() - Duration::hours(2));
        let stale = compute_digest("secret-1", &stale_bucket);
        assert_eq!(cache.lookup_tenant_by_digest(&stale).await, None);
    }

    #[tokio::test]
    async fn test_reload_replaces_rather_than_merges() {
        let cache = DigestCache::new();
        let first = StaticSource::new(vec![("acme", "old-secret")]);
        cache.reload(&first).await.unwrap();

        let second = StaticSource::new(vec![("acme", "new-secret")]);
        cache.reload(&second).await.unwrap();

        let old = compute_digest("old-secret", &current_hour_bucket());
        let new = compute_digest("new-secret", &current_hour_bucket());
        assert_eq!(cache.lookup_tenant_by_digest(&old).await, None);
        assert!(cache.lookup_tenant_by_digest(&new).await.is_some());
        assert_eq!(cache.tenant_count().await, 1);
        assert_eq!(cache.digest_count().await, 2);
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_previous_contents() {
        let cache = DigestCache::new();
        let source = StaticSource::new(vec![("acme", "secret-1")]);
        cache.reload(&source).await.unwrap();

        source.fail.store(true, Ordering::Release);
        let err = cache.reload(&source).await.unwrap_err();
        assert!(matches!(err, AuthError::SourceUnavailable { .. }));

        let digest = compute_digest("secret-1", &current_hour_bucket());
        assert!(cache.lookup_tenant_by_digest(&digest).await.is_some());
    }

    #[tokio::test]
    async fn test_last_loaded_key_wins_tenant_slot() {
        let cache = DigestCache::new();
        let source = StaticSource::new(vec![("acme", "older-key"), ("acme", "newer-key")]);
        cache.reload(&source).await.unwrap();

        let acme: TenantId = "acme".parse().unwrap();
        assert_eq!(
            cache.lookup_key_for_tenant(&acme).await.as_deref(),
            Some("newer-key")
        );

        // Both enabled keys still authenticate through the digest index.
        let older = compute_digest("older-key", &current_hour_bucket());
        let newer = compute_digest("newer-key", &current_hour_bucket());
        assert_eq!(cache.lookup_tenant_by_digest(&older).await, Some(acme.clone()));
        assert_eq!(cache.lookup_tenant_by_digest(&newer).await, Some(acme));
    }

    #[tokio::test]
    async fn test_disabled_key_resolves_only_after_reenable_and_reload() {
        let cache = DigestCache::new();

        // Key starts disabled: the source simply does not return it.
        let empty = StaticSource::new(vec![]);
        cache.reload(&empty).await.unwrap();
        let digest = compute_digest("rotating-secret", &current_hour_bucket());
        assert_eq!(cache.lookup_tenant_by_digest(&digest).await, None);

        // Re-enabled and reloaded: the same digest now resolves.
        let enabled = StaticSource::new(vec![("acme", "rotating-secret")]);
        cache.reload(&enabled).await.unwrap();
        assert!(cache.lookup_tenant_by_digest(&digest).await.is_some());
    }

    #[tokio::test]
    async fn test_concurrent_readers_see_old_or_new_never_a_mix() {
        let cache = Arc::new(DigestCache::new());
        let first = StaticSource::new(vec![("acme", "gen-0")]);
        cache.reload(&first).await.unwrap();

        let reader = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for _ in 0..500 {
                    // Recomputed each iteration so a wall-clock hour rollover
                    // mid-test cannot invalidate both generations at once.
                    let bucket = current_hour_bucket();
                    let old_hit = cache
                        .lookup_tenant_by_digest(&compute_digest("gen-0", &bucket))
                        .await
                        .is_some();
                    let new_hit = cache
                        .lookup_tenant_by_digest(&compute_digest("gen-1", &bucket))
                        .await
                        .is_some();
                    // Exactly one generation is visible at any instant.
                    assert!(old_hit ^ new_hit, "observed a half-populated cache");
                    tokio::task::yield_now().await;
                }
            })
        };

        let writer = {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                for generation in 0..50 {
                    let secret = format!("gen-{}", generation % 2);
                    let source = StaticSource::new(vec![("acme", secret.as_str())]);
                    cache.reload(&source).await.unwrap();
                    tokio::task::yield_now().await;
                }
            })
        };

        reader.await.unwrap();
        writer.await.unwrap();
    }
}
