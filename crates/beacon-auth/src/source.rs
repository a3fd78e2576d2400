//! Credential source abstraction.
//!
//! The digest cache reloads from a [`KeySource`] rather than a concrete
//! store so a reload cycle can be driven deterministically in tests. The
//! production implementation is [`PgKeySource`] over the `api_keys` table.

use crate::AuthError;
use async_trait::async_trait;
use beacon_core::TenantId;
use beacon_db::models::ApiKey;
use sqlx::PgPool;

/// One enabled credential as seen by the digest cache.
#[derive(Debug, Clone)]
pub struct CredentialRecord {
    /// Owning tenant.
    pub tenant: TenantId,
    /// The shared secret.
    pub secret: String,
}

/// Source of enabled credential records.
#[async_trait]
pub trait KeySource: Send + Sync {
    /// Load every non-disabled credential, oldest first.
    async fn load_enabled_keys(&self) -> Result<Vec<CredentialRecord>, AuthError>;
}

/// [`KeySource`] backed by the `api_keys` table.
#[derive(Clone)]
pub struct PgKeySource {
    pool: PgPool,
}

impl PgKeySource {
    /// Create a source over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeySource for PgKeySource {
    async fn load_enabled_keys(&self) -> Result<Vec<CredentialRecord>, AuthError> {
        let rows = ApiKey::list_enabled(&self.pool).await?;
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            match row.tenant_id.parse::<TenantId>() {
                Ok(tenant) => records.push(CredentialRecord {
                    tenant,
                    secret: row.api_key,
                }),
                Err(err) => {
                    // A malformed identifier in the store must not take the
                    // rest of the cache down with it.
                    tracing::warn!(
                        key_id = row.id,
                        error = %err,
                        "Skipping API key with invalid tenant identifier"
                    );
                }
            }
        }
        Ok(records)
    }
}
