//! Rotating digest authentication for the Beacon push gateway.
//!
//! Callers authenticate with a short-lived bearer token: the hex SHA-256 of
//! their shared secret concatenated with the current UTC hour bucket. The
//! [`DigestCache`] precomputes every valid digest for the current and next
//! hour so the hot path resolves a token to a tenant with one in-memory map
//! lookup — no database round trip and no signature verification.
//!
//! The cache is a single explicitly-owned instance constructed at process
//! start and handed to the components that need it; [`spawn_hourly_reload`]
//! re-derives it as time advances.

mod cache;
mod digest;
mod error;
mod refresh;
mod source;

pub use cache::DigestCache;
pub use digest::{compute_digest, current_hour_bucket, hour_bucket_at, next_hour_bucket};
pub use error::AuthError;
pub use refresh::{duration_until_next_hour, spawn_hourly_reload};
pub use source::{CredentialRecord, KeySource, PgKeySource};
