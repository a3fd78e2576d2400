//! Periodic pool-expiry sweep task.
//!
//! One sweeper per pool, on its own cadence, unsynchronized with the digest
//! reload. Each task carries its own cancellation token so shutdown (and
//! tests) can stop it deterministically.

use crate::ClientPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Spawn a sweep loop for `pool`.
///
/// Every `interval`, entries idle for longer than `ttl` are evicted. The
/// task exits when `shutdown` is cancelled.
pub fn spawn_sweeper<T>(
    pool: Arc<ClientPool<T>>,
    backend: &'static str,
    ttl: Duration,
    interval: Duration,
    shutdown: CancellationToken,
) -> JoinHandle<()>
where
    T: Send + Sync + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick fires immediately; skip it so a fresh pool is not
        // swept at startup.
        ticker.tick().await;
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::debug!(backend, "Pool sweeper stopping");
                    break;
                }
                _ = ticker.tick() => {
                    let evicted = pool.sweep_expired(ttl).await;
                    if evicted > 0 {
                        tracing::info!(backend, evicted, "Pool sweep evicted idle clients");
                    }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use beacon_core::TenantId;
    use std::convert::Infallible;

    #[tokio::test]
    async fn test_shutdown_stops_the_sweeper() {
        let pool = Arc::new(ClientPool::<u32>::new());
        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(
            Arc::clone(&pool),
            "apns",
            Duration::from_secs(3600),
            Duration::from_secs(3600),
            shutdown.clone(),
        );
        shutdown.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_evicts_idle_entries() {
        tokio::time::pause();

        let pool = Arc::new(ClientPool::<u32>::new());
        let tenant: TenantId = "acme".parse().unwrap();
        pool.get_or_build::<Infallible, _, _>(&tenant, || async { Ok(1) })
            .await
            .unwrap();

        let shutdown = CancellationToken::new();
        let handle = spawn_sweeper(
            Arc::clone(&pool),
            "fcm",
            Duration::from_millis(10),
            Duration::from_millis(50),
            shutdown.clone(),
        );

        // Advance paused time past both the entry TTL and the sweep tick.
        for _ in 0..5 {
            tokio::time::advance(Duration::from_millis(60)).await;
            tokio::task::yield_now().await;
        }

        assert!(pool.is_empty().await);
        shutdown.cancel();
        handle.await.unwrap();
    }
}
