//! FCM provider configuration model.
//!
//! One row per tenant. The service-account document is not stored here — it
//! lives in the blob store under `"fcm/<tenant>.json"` and is fetched when
//! the tenant's client is built.

use crate::DbError;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};

/// An FCM configuration row.
#[derive(Debug, Clone, FromRow)]
pub struct FcmConfig {
    /// Internal surrogate key.
    pub id: i64,

    /// Owning tenant's external identifier.
    pub tenant_id: String,

    /// Firebase project identifier, part of the send endpoint path.
    pub project_id: String,

    /// Inactive configurations reject client builds.
    pub active: bool,

    /// When the configuration was created.
    pub created_at: DateTime<Utc>,

    /// When the configuration was last updated.
    pub updated_at: DateTime<Utc>,
}

impl FcmConfig {
    /// Find the active configuration for a tenant, if any.
    pub async fn find_active(pool: &PgPool, tenant_id: &str) -> Result<Option<Self>, DbError> {
        let config = sqlx::query_as::<_, Self>(
            "SELECT * FROM fcm_configs WHERE tenant_id = $1 AND active = TRUE",
        )
        .bind(tenant_id)
        .fetch_optional(pool)
        .await?;
        Ok(config)
    }

    /// Create or update a tenant's configuration.
    ///
    /// The seed loader drives the active flag from the seed file so a
    /// tenant's FCM path can be provisioned but disabled.
    pub async fn upsert(
        pool: &PgPool,
        tenant_id: &str,
        project_id: &str,
        active: bool,
    ) -> Result<Self, DbError> {
        let config = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO fcm_configs (tenant_id, project_id, active)
            VALUES ($1, $2, $3)
            ON CONFLICT (tenant_id) DO UPDATE
                SET project_id = EXCLUDED.project_id,
                    active = EXCLUDED.active,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(project_id)
        .bind(active)
        .fetch_one(pool)
        .await?;
        Ok(config)
    }
}
