//! The keyed resource pool.

use beacon_core::TenantId;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
// tokio's Instant (a thin wrapper over std's) so the paused test clock
// drives expiry deterministically.
use tokio::time::Instant;

/// A pooled client plus its last-used timestamp.
///
/// Timestamps are milliseconds relative to the pool's construction instant,
/// stored as an atomic so a shared-lock read can touch them. Relaxed
/// ordering suffices: the sweep tolerates a stale timestamp by at most one
/// touch, which only delays eviction.
struct Entry<T> {
    client: Arc<T>,
    last_used_ms: AtomicU64,
}

/// Lazily populated, tenant-keyed cache of live backend clients.
///
/// Entries are exclusively owned by the pool; callers receive a transient
/// `Arc` handle for the duration of one delivery attempt. Once built, an
/// entry persists regardless of delivery outcomes until the TTL sweep
/// removes it.
pub struct ClientPool<T> {
    entries: RwLock<HashMap<TenantId, Entry<T>>>,
    /// Per-tenant build gates. Short-lived: a gate exists only while a
    /// build for that tenant is in flight.
    building: Mutex<HashMap<TenantId, Arc<Mutex<()>>>>,
    epoch: Instant,
}

impl<T> ClientPool<T>
where
    T: Send + Sync,
{
    /// Create an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            building: Mutex::new(HashMap::new()),
            epoch: Instant::now(),
        }
    }

    fn now_ms(&self) -> u64 {
        u64::try_from(self.epoch.elapsed().as_millis()).unwrap_or(u64::MAX)
    }

    /// Return the live client for `tenant`, touching its timestamp.
    async fn get(&self, tenant: &TenantId) -> Option<Arc<T>> {
        let entries = self.entries.read().await;
        entries.get(tenant).map(|entry| {
            entry.last_used_ms.store(self.now_ms(), Ordering::Relaxed);
            Arc::clone(&entry.client)
        })
    }

    /// Return the client for `tenant`, building it on first use.
    ///
    /// The builder performs the slow work (configuration lookup, credential
    /// fetch, client construction) and runs outside every pool lock.
    /// Concurrent first-time callers for the same tenant serialize on a
    /// per-tenant gate, so the builder runs at most once per miss; callers
    /// that lose the race receive the winner's client. A failed build
    /// inserts nothing — the next call simply retries.
    pub async fn get_or_build<E, F, Fut>(&self, tenant: &TenantId, build: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(client) = self.get(tenant).await {
            return Ok(client);
        }

        let gate = {
            let mut building = self.building.lock().await;
            Arc::clone(
                building
                    .entry(tenant.clone())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        let _guard = gate.lock().await;

        // Re-check under the gate: another caller may have finished the
        // build while this one waited.
        if let Some(client) = self.get(tenant).await {
            return Ok(client);
        }

        let built = build().await;
        let client = match built {
            Ok(client) => Arc::new(client),
            Err(err) => {
                self.building.lock().await.remove(tenant);
                return Err(err);
            }
        };

        {
            let mut entries = self.entries.write().await;
            entries.insert(
                tenant.clone(),
                Entry {
                    client: Arc::clone(&client),
                    last_used_ms: AtomicU64::new(self.now_ms()),
                },
            );
        }
        self.building.lock().await.remove(tenant);

        tracing::debug!(tenant = %tenant, "Pooled client built");
        Ok(client)
    }

    /// Remove every entry whose last use is older than `now - ttl`.
    ///
    /// Returns the number of evicted entries.
    pub async fn sweep_expired(&self, ttl: Duration) -> usize {
        self.sweep_at(self.now_ms(), ttl).await
    }

    async fn sweep_at(&self, now_ms: u64, ttl: Duration) -> usize {
        let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|tenant, entry| {
            let age_ms = now_ms.saturating_sub(entry.last_used_ms.load(Ordering::Relaxed));
            let keep = age_ms <= ttl_ms;
            if !keep {
                tracing::info!(tenant = %tenant, age_ms, "Evicting idle pooled client");
            }
            keep
        });
        before - entries.len()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check whether the pool has no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Check whether a live entry exists for `tenant` (without touching it).
    pub async fn contains(&self, tenant: &TenantId) -> bool {
        self.entries.read().await.contains_key(tenant)
    }
}

impl<T> Default for ClientPool<T>
where
    T: Send + Sync,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::sync::atomic::AtomicUsize;

    fn tenant(raw: &str) -> TenantId {
        raw.parse().unwrap()
    }

    #[derive(Debug)]
    struct FakeClient {
        generation: usize,
    }

    #[tokio::test]
    async fn test_builder_runs_once_for_repeated_calls() {
        let pool = ClientPool::<FakeClient>::new();
        let builds = AtomicUsize::new(0);
        let acme = tenant("acme");

        for _ in 0..3 {
            let client = pool
                .get_or_build::<Infallible, _, _>(&acme, || async {
                    let generation = builds.fetch_add(1, Ordering::SeqCst);
                    Ok(FakeClient { generation })
                })
                .await
                .unwrap();
            assert_eq!(client.generation, 0);
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
        assert_eq!(pool.len().await, 1);
    }

    #[tokio::test]
    async fn test_distinct_tenants_build_independently() {
        let pool = ClientPool::<FakeClient>::new();
        let builds = AtomicUsize::new(0);

        for name in ["acme", "globex"] {
            pool.get_or_build::<Infallible, _, _>(&tenant(name), || async {
                let generation = builds.fetch_add(1, Ordering::SeqCst);
                Ok(FakeClient { generation })
            })
            .await
            .unwrap();
        }
        assert_eq!(builds.load(Ordering::SeqCst), 2);
        assert_eq!(pool.len().await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_first_use_is_single_flight() {
        let pool = Arc::new(ClientPool::<FakeClient>::new());
        let builds = Arc::new(AtomicUsize::new(0));
        let acme = tenant("acme");

        let mut handles = Vec::new();
        for _ in 0..16 {
            let pool = Arc::clone(&pool);
            let builds = Arc::clone(&builds);
            let acme = acme.clone();
            handles.push(tokio::spawn(async move {
                pool.get_or_build::<Infallible, _, _>(&acme, || async move {
                    let generation = builds.fetch_add(1, Ordering::SeqCst);
                    // Widen the race window: a non-serialized pool would
                    // run many builders through here concurrently.
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    Ok(FakeClient { generation })
                })
                .await
                .unwrap()
                .generation
            }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap(), 0);
        }
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failed_build_inserts_nothing_and_retries() {
        let pool = ClientPool::<FakeClient>::new();
        let acme = tenant("acme");

        let err = pool
            .get_or_build::<&str, _, _>(&acme, || async { Err("config missing") })
            .await
            .unwrap_err();
        assert_eq!(err, "config missing");
        assert!(pool.is_empty().await);
        assert!(!pool.contains(&acme).await);

        // The pool is not poisoned: the next call builds successfully.
        let client = pool
            .get_or_build::<&str, _, _>(&acme, || async { Ok(FakeClient { generation: 7 }) })
            .await
            .unwrap();
        assert_eq!(client.generation, 7);
    }

    #[tokio::test]
    async fn test_sweep_removes_old_and_retains_recent() {
        let pool = ClientPool::<FakeClient>::new();
        let ttl = Duration::from_secs(3600);
        let old = tenant("old");
        let fresh = tenant("fresh");

        for t in [&old, &fresh] {
            pool.get_or_build::<Infallible, _, _>(t, || async {
                Ok(FakeClient { generation: 0 })
            })
            .await
            .unwrap();
        }

        // Backdate the entries, then sweep from a fixed vantage point:
        // `old` is ttl+1s stale, `fresh` is ttl-1s stale.
        let now_ms = 2 * 3600 * 1000;
        {
            let entries = pool.entries.read().await;
            entries[&old]
                .last_used_ms
                .store(now_ms - (ttl.as_millis() as u64 + 1000), Ordering::Relaxed);
            entries[&fresh]
                .last_used_ms
                .store(now_ms - (ttl.as_millis() as u64 - 1000), Ordering::Relaxed);
        }

        let evicted = pool.sweep_at(now_ms, ttl).await;
        assert_eq!(evicted, 1);
        assert!(!pool.contains(&old).await);
        assert!(pool.contains(&fresh).await);
    }

    #[tokio::test]
    async fn test_hit_touches_timestamp_and_defers_eviction() {
        let pool = ClientPool::<FakeClient>::new();
        let ttl = Duration::from_secs(3600);
        let acme = tenant("acme");

        pool.get_or_build::<Infallible, _, _>(&acme, || async {
            Ok(FakeClient { generation: 0 })
        })
        .await
        .unwrap();

        // Backdate past the TTL, then touch via a hit: the entry must
        // survive the following sweep without rebuilding.
        {
            let entries = pool.entries.read().await;
            entries[&acme].last_used_ms.store(0, Ordering::Relaxed);
        }
        let rebuilds = AtomicUsize::new(0);
        pool.get_or_build::<Infallible, _, _>(&acme, || async {
            rebuilds.fetch_add(1, Ordering::SeqCst);
            Ok(FakeClient { generation: 1 })
        })
        .await
        .unwrap();
        assert_eq!(rebuilds.load(Ordering::SeqCst), 0);

        assert_eq!(pool.sweep_expired(ttl).await, 0);
        assert!(pool.contains(&acme).await);
    }

    #[tokio::test]
    async fn test_sweep_on_empty_pool_is_a_noop() {
        let pool = ClientPool::<FakeClient>::new();
        assert_eq!(pool.sweep_expired(Duration::from_secs(1)).await, 0);
    }
}
