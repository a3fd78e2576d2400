//! Error types for blob storage.

use thiserror::Error;

/// Blob storage operation errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// No blob exists under the requested key.
    #[error("blob not found: {key}")]
    NotFound {
        /// The requested key.
        key: String,
    },

    /// The store could not be reached or the operation failed in transit.
    ///
    /// Covers timeouts: every operation is bounded, and a deadline that
    /// expires is a normal per-call failure, not fatal to the process.
    #[error("blob store unavailable: {detail}")]
    Unavailable {
        /// Human-readable cause, suitable for logging.
        detail: String,
    },
}

impl StorageError {
    /// Check if this error indicates a missing blob.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound { .. })
    }
}
