//! Startup seeding of tenants from a JSON file.
//!
//! Local and test deployments describe their tenants — identifier, name,
//! API key, provider configuration — in a JSON file loaded once at boot.
//! Every write is an idempotent upsert keyed by a natural identifier, so
//! re-seeding the same file is a no-op. A missing file is skipped; a
//! tenant that fails to seed is logged and does not abort the rest.

use beacon_db::models::{ApiKey, ApnsConfig, FcmConfig, Tenant};
use serde::Deserialize;
use sqlx::PgPool;
use std::path::Path;
use thiserror::Error;

/// Errors from the seed loader.
#[derive(Debug, Error)]
pub enum SeedError {
    /// The seed file exists but could not be read.
    #[error("failed to read seed file: {0}")]
    Io(#[from] std::io::Error),

    /// The seed file is not valid JSON.
    #[error("failed to parse seed file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// One tenant's entry in the seed file.
#[derive(Debug, Deserialize)]
pub struct TenantSeed {
    /// External tenant identifier.
    pub tenant_id: String,
    /// Display name.
    pub name: String,
    /// Label for the seeded API key.
    #[serde(default)]
    pub label: String,
    /// Shared secret; omit to seed a tenant without credentials.
    #[serde(default)]
    pub api_key: Option<String>,
    /// APNS configuration, if the tenant uses that backend.
    #[serde(default)]
    pub apns_config: Option<ApnsConfigSeed>,
    /// FCM configuration, if the tenant uses that backend.
    #[serde(default)]
    pub fcm_config: Option<FcmConfigSeed>,
}

/// Seeded APNS configuration.
#[derive(Debug, Deserialize)]
pub struct ApnsConfigSeed {
    pub team_id: String,
    pub key_id: String,
    pub bundle_id: String,
    #[serde(default = "default_environment")]
    pub environment: String,
}

fn default_environment() -> String {
    "production".to_string()
}

/// Seeded FCM configuration.
#[derive(Debug, Deserialize)]
pub struct FcmConfigSeed {
    pub project_id: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Seeds initial tenant data at startup.
pub struct SeedService {
    pool: PgPool,
}

impl SeedService {
    /// Create a seed service over a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Seed tenants from a JSON file, returning how many were applied.
    ///
    /// A missing file is not an error — local deployments without seed
    /// data simply skip this step.
    pub async fn seed_from_file(&self, path: &Path) -> Result<usize, SeedError> {
        if !path.exists() {
            tracing::info!(path = %path.display(), "Seed file not found, skipping seeding");
            return Ok(0);
        }

        let raw = tokio::fs::read(path).await?;
        let tenants: Vec<TenantSeed> = serde_json::from_slice(&raw)?;

        tracing::info!(count = tenants.len(), path = %path.display(), "Seeding tenants");

        let mut applied = 0;
        for seed in &tenants {
            match self.seed_tenant(seed).await {
                Ok(()) => {
                    applied += 1;
                    tracing::info!(tenant = %seed.tenant_id, name = %seed.name, "Seeded tenant");
                }
                Err(err) => {
                    tracing::error!(tenant = %seed.tenant_id, error = %err, "Failed to seed tenant");
                }
            }
        }
        Ok(applied)
    }

    /// Seed a single tenant with its key and provider configuration.
    async fn seed_tenant(&self, seed: &TenantSeed) -> Result<(), beacon_db::DbError> {
        let description = format!("Seeded tenant: {}", seed.name);
        Tenant::upsert(&self.pool, &seed.tenant_id, &seed.name, &description).await?;

        if let Some(api_key) = seed.api_key.as_deref() {
            ApiKey::upsert_by_value(&self.pool, &seed.tenant_id, &seed.label, api_key).await?;
        }

        if let Some(apns) = &seed.apns_config {
            ApnsConfig::upsert(
                &self.pool,
                &seed.tenant_id,
                &apns.team_id,
                &apns.key_id,
                &apns.bundle_id,
                &apns.environment,
            )
            .await?;
        }

        if let Some(fcm) = &seed.fcm_config {
            FcmConfig::upsert(&self.pool, &seed.tenant_id, &fcm.project_id, fcm.enabled).await?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_file_parses() {
        let raw = r#"[
            {
                "tenant_id": "acme",
                "name": "Acme Corp",
                "label": "Production API Key",
                "api_key": "acme-secret",
                "apns_config": {
                    "team_id": "TEAM123456",
                    "key_id": "KEY123456",
                    "bundle_id": "com.acme.app",
                    "environment": "sandbox"
                },
                "fcm_config": {
                    "project_id": "acme-project"
                }
            },
            {
                "tenant_id": "globex",
                "name": "Globex"
            }
        ]"#;

        let tenants: Vec<TenantSeed> = serde_json::from_str(raw).unwrap();
        assert_eq!(tenants.len(), 2);

        let acme = &tenants[0];
        assert_eq!(acme.api_key.as_deref(), Some("acme-secret"));
        assert_eq!(
            acme.apns_config.as_ref().unwrap().environment,
            "sandbox"
        );
        // FCM enabled defaults to true when omitted.
        assert!(acme.fcm_config.as_ref().unwrap().enabled);

        let globex = &tenants[1];
        assert!(globex.api_key.is_none());
        assert!(globex.apns_config.is_none());
    }

    #[test]
    fn test_environment_defaults_to_production() {
        let raw = r#"{"team_id": "T", "key_id": "K", "bundle_id": "B"}"#;
        let apns: ApnsConfigSeed = serde_json::from_str(raw).unwrap();
        assert_eq!(apns.environment, "production");
    }

    #[tokio::test]
    async fn test_missing_seed_file_is_skipped() {
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/unused")
            .unwrap();
        let service = SeedService::new(pool);
        let applied = service
            .seed_from_file(Path::new("/nonexistent/tenants.json"))
            .await
            .unwrap();
        assert_eq!(applied, 0);
    }
}
