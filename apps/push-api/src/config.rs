//! Server configuration from environment variables.
//!
//! Required values fail fast at startup; everything else carries a default
//! suitable for local development.

use std::path::PathBuf;
use std::time::Duration;

/// Default TTL for pooled push clients.
const DEFAULT_CLIENT_TTL_SECS: u64 = 3600;

/// Default interval between pool sweeps.
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 3600;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Postgres connection string. Required.
    pub database_url: String,
    /// S3 bucket holding per-tenant push credentials.
    pub s3_bucket: String,
    /// Log filter directive.
    pub rust_log: String,
    /// Optional tenant seed file applied at startup.
    pub seed_file: PathBuf,
    /// Idle TTL for pooled push clients.
    pub client_ttl: Duration,
    /// Cadence of the pool-expiry sweeps.
    pub sweep_interval: Duration,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when a required variable is missing
    /// or a value fails to parse.
    pub fn from_env() -> Result<Self, String> {
        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| "DATABASE_URL is required".to_string())?;

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = parse_var("PORT", 8080)?;
        let s3_bucket = std::env::var("S3_BUCKET").unwrap_or_else(|_| "beacon".to_string());
        let rust_log = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let seed_file = std::env::var("SEED_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./config/tenants.json"));
        let client_ttl = Duration::from_secs(parse_var("CLIENT_TTL_SECS", DEFAULT_CLIENT_TTL_SECS)?);
        let sweep_interval =
            Duration::from_secs(parse_var("SWEEP_INTERVAL_SECS", DEFAULT_SWEEP_INTERVAL_SECS)?);

        Ok(Self {
            host,
            port,
            database_url,
            s3_bucket,
            rust_log,
            seed_file,
            client_ttl,
            sweep_interval,
        })
    }
}

/// Read an environment variable and parse it, falling back to a default
/// when unset.
fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, String> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| format!("invalid {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}
