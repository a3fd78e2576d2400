//! APNS provider configuration model.
//!
//! One row per tenant. The signing key itself is not stored here — it lives
//! in the blob store under `"apns/<tenant>.p8"` and is fetched when the
//! tenant's client is built.

use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// An APNS configuration row.
#[derive(Debug, Clone, FromRow)]
pub struct ApnsConfig {
    /// Internal surrogate key.
    pub id: i64,

    /// Owning tenant's external identifier.
    pub tenant_id: String,

    /// Apple Developer Team ID.
    pub team_id: String,

    /// Key ID of the tenant's p8 signing key.
    pub key_id: String,

    /// App bundle identifier, used as the `apns-topic`.
    pub bundle_id: String,

    /// `"production"` or `"sandbox"` — selects the APNS endpoint.
    pub environment: String,

    /// Inactive configurations reject client builds.
    pub active: bool,

    /// When the configuration was created.
    pub created_at: DateTime<Utc>,

    /// When the configuration was last updated.
    pub updated_at: DateTime<Utc>,
}

impl ApnsConfig {
    /// Find the active configuration for a tenant, if any.
    pub async fn find_active(pool: &PgPool, tenant_id: &str) -> Result<Option<Self>, DbError> {
        let config = sqlx::query_as::<_, Self>(
            "SELECT * FROM apns_configs WHERE tenant_id = $1 AND active = TRUE",
        )
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;
        Ok(config)
    }

    /// Create or update a tenant's configuration.
    pub async fn upsert(
        pool: &PgPool,
        tenant_id: &str,
        team_id: &str,
        key_id: &str,
        bundle_id: &str,
        environment: &str,
    ) -> Result<Self, DbError> {
        let config = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO apns_configs (tenant_id, team_id, key_id, bundle_id, environment, active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            ON CONFLICT (tenant_id) DO UPDATE
                SET team_id = EXCLUDED.team_id,
                    key_id = EXCLUDED.key_id,
                    bundle_id = EXCLUDED.bundle_id,
                    environment = EXCLUDED.environment,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(team_id)
        .bind(key_id)
        .bind(bundle_id)
        .bind(environment)
        .fetch_one(pool)
        .await?;
        Ok(config)
    }
}
