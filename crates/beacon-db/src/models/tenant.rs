//! Tenant entity model.
//!
//! Tenants are isolated customer namespaces keyed by an externally assigned
//! string identifier. They are created by the provisioning flow or the seed
//! loader and deactivated (never deleted) by an administrator.

use crate::DbError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// A tenant row.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    /// Internal surrogate key.
    pub id: i64,

    /// Externally assigned unique identifier (e.g. `"acme"`).
    pub tenant_id: String,

    /// Human-readable name.
    pub name: String,

    /// Free-form description.
    pub description: String,

    /// Whether the tenant may authenticate and receive deliveries.
    pub active: bool,

    /// When the tenant was created.
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Find a tenant by its external identifier.
    pub async fn find_by_tenant_id(
        pool: &PgPool,
        tenant_id: &str,
    ) -> Result<Option<Self>, DbError> {
        let tenant = sqlx::query_as::<_, Self>("SELECT * FROM tenants WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_optional(pool)
            .await?;
        Ok(tenant)
    }

    /// List all active tenants.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<Self>, DbError> {
        let tenants =
            sqlx::query_as::<_, Self>("SELECT * FROM tenants WHERE active = TRUE ORDER BY id")
                .fetch_all(pool)
                .await?;
        Ok(tenants)
    }

    /// Create a tenant if no row with this identifier exists yet.
    ///
    /// Returns the existing row unchanged when the tenant is already present,
    /// so repeated provisioning runs are idempotent.
    pub async fn create_if_not_exists(
        pool: &PgPool,
        tenant_id: &str,
        name: &str,
    ) -> Result<Self, DbError> {
        if let Some(existing) = Self::find_by_tenant_id(pool, tenant_id).await? {
            return Ok(existing);
        }

        let tenant = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tenants (tenant_id, name, description, active)
            VALUES ($1, $2, '', TRUE)
            ON CONFLICT (tenant_id) DO UPDATE SET updated_at = now()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .fetch_one(pool)
        .await?;
        Ok(tenant)
    }

    /// Create or update a tenant keyed by its external identifier.
    ///
    /// Used by the seed loader: name and description follow the seed file,
    /// the active flag is reset to true.
    pub async fn upsert(
        pool: &PgPool,
        tenant_id: &str,
        name: &str,
        description: &str,
    ) -> Result<Self, DbError> {
        let tenant = sqlx::query_as::<_, Self>(
            r#"
            INSERT INTO tenants (tenant_id, name, description, active)
            VALUES ($1, $2, $3, TRUE)
            ON CONFLICT (tenant_id) DO UPDATE
                SET name = EXCLUDED.name,
                    description = EXCLUDED.description,
                    updated_at = now()
            RETURNING *
            "#,
        )
        .bind(tenant_id)
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;
        Ok(tenant)
    }
}
