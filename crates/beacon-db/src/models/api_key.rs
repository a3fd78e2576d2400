//! API credential record model.
//!
//! Each row holds one shared secret for one tenant. A tenant may hold
//! several rows (key rotation); only non-disabled rows participate in the
//! digest cache. Secret values are globally unique and serve as the natural
//! key for seed upserts.

use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// An API key row.
#[derive(Debug, Clone, FromRow)]
pub struct ApiKey {
    /// Internal surrogate key.
    pub id: i64,

    /// Owning tenant's external identifier.
    pub tenant_id: String,

    /// Human-readable label (e.g. `"Production API Key"`).
    pub label: String,

    /// The shared secret value. Globally unique.
    pub api_key: String,

    /// Disabled keys are excluded from the digest cache.
    pub disabled: bool,

    /// When the key was created.
    pub created_at: DateTime<Utc>,
}

impl ApiKey {
    /// Load every non-disabled key, oldest first.
    ///
    /// The digest cache consumes this ordering: when a tenant holds several
    /// enabled keys, the last-loaded (newest) one wins the tenant→key slot.
    pub async fn list_enabled(pool: &PgPool) -> Result<Vec<Self>, DbError> {
        let keys =
            sqlx::query_as::<_, Self>("SELECT * FROM api_keys WHERE disabled = FALSE ORDER BY id")
                .fetch_all(pool)
                .await?;
        Ok(keys)
    }

    /// Insert a new key for a tenant.
    pub async fn insert(
        pool: &PgPool,
        tenant_id: &str,
        label: &str,
        api_key: &str,
    ) -> Result<Self, DbError> {
        let key = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO api_keys (tenant_id, label, api_key, disabled)
            VALUES ($1, $2, $3, FALSE)
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(label)
        .bind(api_key)
        .fetch_one(pool)
        .await?;
        Ok(key)
    }

    /// Create or refresh a key keyed by its secret value.
    ///
    /// Used by the seed loader: re-seeding an existing secret updates its
    /// label and re-enables it rather than inserting a duplicate.
    pub async fn upsert_by_value(
        pool: &PgPool,
        tenant_id: &str,
        label: &str,
        api_key: &str,
    ) -> Result<Self, DbError> {
        let key = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO api_keys (tenant_id, label, api_key, disabled)
            VALUES ($1, $2, $3, FALSE)
            ON CONFLICT (api_key) DO UPDATE
                SET label = EXCLUDED.label,
                    disabled = FALSE
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(label)
        .bind(api_key)
        .fetch_one(pool)
        .await?;
        Ok(key)
    }
}
