//! Error types for push delivery.
//!
//! Build errors ((c) configuration absence, (d) transient I/O, key/document
//! parse failures) and delivery errors ((e) backend rejection) share one
//! enum: a pooled-client build and a delivery attempt fail to the same
//! caller, and neither class is retried internally.

use beacon_core::TenantId;
use thiserror::Error;

/// Errors from building a push client or delivering a notification.
#[derive(Debug, Error)]
pub enum PushError {
    /// No active provider configuration row exists for the tenant.
    #[error("no active {backend} configuration for tenant {tenant}")]
    ConfigNotFound {
        /// Backend name (`"apns"` or `"fcm"`).
        backend: &'static str,
        /// The tenant that lacks configuration.
        tenant: TenantId,
    },

    /// The configuration row could not be read.
    #[error(transparent)]
    Database(#[from] beacon_db::DbError),

    /// The credential blob could not be fetched.
    #[error("credential fetch failed: {0}")]
    Credential(#[from] beacon_storage::StorageError),

    /// Staging the credential to (or removing it from) the transient local
    /// location failed.
    #[error("credential staging failed: {0}")]
    Staging(#[from] std::io::Error),

    /// The fetched credential is not a usable signing key.
    #[error("invalid signing key: {0}")]
    KeyParse(#[source] jsonwebtoken::errors::Error),

    /// The fetched service-account document is malformed.
    #[error("invalid service account document: {0}")]
    ServiceAccount(#[source] serde_json::Error),

    /// Signing an auth token for the backend failed.
    #[error("token signing failed: {0}")]
    TokenSign(#[source] jsonwebtoken::errors::Error),

    /// The backend (or its token endpoint) could not be reached.
    #[error("{backend} request failed: {source}")]
    Transport {
        /// Backend name.
        backend: &'static str,
        /// Underlying HTTP error (includes timeouts).
        #[source]
        source: reqwest::Error,
    },

    /// The backend's OAuth token endpoint declined the credential exchange.
    #[error("{backend} auth exchange failed with status {status}: {detail}")]
    AuthExchange {
        /// Backend name.
        backend: &'static str,
        /// HTTP status from the token endpoint.
        status: u16,
        /// Response body excerpt.
        detail: String,
    },

    /// The backend explicitly declined the delivery.
    ///
    /// Terminal for this attempt; the pooled client stays live.
    #[error("{backend} rejected delivery (status {status}): {reason}")]
    Rejected {
        /// Backend name.
        backend: &'static str,
        /// HTTP status from the push endpoint.
        status: u16,
        /// Backend-provided reason.
        reason: String,
    },
}

impl PushError {
    /// Check if this error means the tenant has no usable configuration.
    #[must_use]
    pub fn is_config_not_found(&self) -> bool {
        matches!(self, PushError::ConfigNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_not_found_display() {
        let err = PushError::ConfigNotFound {
            backend: "apns",
            tenant: "acme".parse().unwrap(),
        };
        assert_eq!(
            err.to_string(),
            "no active apns configuration for tenant acme"
        );
        assert!(err.is_config_not_found());
    }

    #[test]
    fn test_rejected_carries_status_and_reason() {
        let err = PushError::Rejected {
            backend: "apns",
            status: 400,
            reason: "BadDeviceToken".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("400"));
        assert!(display.contains("BadDeviceToken"));
        assert!(!err.is_config_not_found());
    }
}
