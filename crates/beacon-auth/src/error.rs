//! Error types for digest authentication.

use thiserror::Error;

/// Errors from the digest cache and its credential source.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The backing credential store could not be read.
    ///
    /// A reload that fails with this error leaves the previous cache
    /// contents in effect.
    #[error("credential source unavailable: {detail}")]
    SourceUnavailable {
        /// Human-readable cause, suitable for logging.
        detail: String,
    },
}

impl From<beacon_db::DbError> for AuthError {
    fn from(err: beacon_db::DbError) -> Self {
        AuthError::SourceUnavailable {
            detail: err.to_string(),
        }
    }
}
