//! Hour buckets and digest computation.
//!
//! A digest is the hex SHA-256 of `secret ++ hour_bucket`, where the hour
//! bucket is the UTC timestamp truncated to whole-hour resolution. Clients
//! and the gateway must agree on the bucket format exactly — it is part of
//! the authentication contract.

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};

/// Format of an hour bucket: `YYYY-MM-DD-HH`, UTC.
const HOUR_BUCKET_FORMAT: &str = "%Y-%m-%d-%H";

/// Hour bucket for an arbitrary instant.
#[must_use]
pub fn hour_bucket_at(at: DateTime<Utc>) -> String {
    at.format(HOUR_BUCKET_FORMAT).to_string()
}

/// Hour bucket for the current UTC hour.
#[must_use]
pub fn current_hour_bucket() -> String {
    hour_bucket_at(Utc::now())
}

/// Hour bucket for the next UTC hour.
///
/// Precomputed alongside the current bucket so a client that derived its
/// digest just before an hour boundary is still accepted just after.
#[must_use]
pub fn next_hour_bucket() -> String {
    hour_bucket_at(Utc::now() + Duration::hours(1))
}

/// Compute the digest for a secret and an hour bucket.
///
/// Returns 64 lowercase hex characters.
#[must_use]
pub fn compute_digest(secret: &str, hour_bucket: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(hour_bucket.as_bytes());
    hex::encode(hasher.finalize())
}
