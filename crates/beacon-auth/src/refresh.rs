//! Hourly digest-cache refresh task.
//!
//! The cache must be re-derived whenever the UTC hour advances, otherwise
//! digests for the new hour would not resolve. The task sleeps until the
//! next hour boundary, reloads, and repeats; reload failures are logged and
//! never terminate the loop. Each task carries its own cancellation token
//! so shutdown (and tests) can stop it deterministically.

use crate::cache::DigestCache;
use crate::source::KeySource;
use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Time remaining until the next UTC hour boundary.
///
/// Never zero: exactly on a boundary the full next hour is returned, which
/// keeps the refresh loop from spinning.
#[must_use]
pub fn duration_until_next_hour(now: DateTime<Utc>) -> Duration {
    let Ok(truncated) = now.duration_trunc(TimeDelta::hours(1)) else {
        return Duration::from_secs(3600);
    };
    let next = truncated + TimeDelta::hours(1);
    (next - now).to_std().unwrap_or(Duration::from_secs(3600))
}

/// Spawn the hourly reload loop.
///
/// The task exits when `shutdown` is cancelled. The returned handle is only
/// needed when the caller wants to await task completion during shutdown.
pub fn spawn_hourly_reload(
    cache: Arc<DigestCache>,
    source: Arc<dyn KeySource>,
    shutdown: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = duration_until_next_hour(Utc::now());
            tokio::select! {
                () = shutdown.cancelled() => {
                    tracing::debug!("Digest refresh task stopping");
                    break;
                }
                () = tokio::time::sleep(wait) => {
                    if let Err(err) = cache.reload(source.as_ref()).await {
                        tracing::error!(error = %err, "Hourly digest reload failed; keeping previous cache");
                    }
                }
            }
        }
    })
}
