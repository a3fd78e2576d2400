//! Device registration model.
//!
//! One row per (tenant, user, platform) target. Registration is an upsert:
//! re-registering the same target replaces its device token instead of
//! accumulating duplicates. Rows are never deleted by the gateway.

use crate::DbError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// A registered device row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeviceToken {
    /// Internal surrogate key.
    pub id: i64,

    /// Owning tenant's external identifier.
    pub tenant_id: String,

    /// Backend-issued device token.
    pub device_token: String,

    /// Application-level user identifier.
    pub user_id: String,

    /// Target platform (e.g. `"ios"`, `"android"`).
    pub platform: String,

    /// When the registration was first created.
    pub created_at: DateTime<Utc>,

    /// When the registration was last refreshed.
    pub updated_at: DateTime<Utc>,
}

impl DeviceToken {
    /// Register or refresh a device, keyed by (tenant, user, platform).
    pub async fn upsert(
        pool: &PgPool,
        tenant_id: &str,
        user_id: &str,
        platform: &str,
        device_token: &str,
    ) -> Result<Self, DbError> {
        let device = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO device_tokens (tenant_id, device_token, user_id, platform)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (tenant_id, user_id, platform) DO UPDATE
                SET device_token = EXCLUDED.device_token,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(device_token)
        .bind(user_id)
        .bind(platform)
        .fetch_one(pool)
        .await?;
        Ok(device)
    }

    /// List a tenant's registered devices, optionally filtered by user.
    pub async fn list_for_tenant(
        pool: &PgPool,
        tenant_id: &str,
        user_id: Option<&str>,
    ) -> Result<Vec<Self>, DbError> {
        let devices = match user_id {
            Some(user) => {
                sqlx::query_as::<_, Self>(
                    "SELECT * FROM device_tokens WHERE tenant_id = $1 AND user_id = $2 ORDER BY id",
                )
                .bind(tenant_id)
                .bind(user)
                .fetch_all(pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, Self>(
                    "SELECT * FROM device_tokens WHERE tenant_id = $1 ORDER BY id",
                )
                .bind(tenant_id)
                .fetch_all(pool)
                .await?
            }
        };
        Ok(devices)
    }
}
