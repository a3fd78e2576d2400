//! Provisioning CLI for the Beacon push gateway.
//!
//! Creates (or reuses) a tenant and attaches an API key to it. The secret
//! can be caller-supplied for migrations, or generated. Clients derive
//! their hourly bearer token from the secret: hex SHA-256 of the secret
//! concatenated with the UTC hour bucket.

use beacon_auth::{compute_digest, current_hour_bucket};
use beacon_db::models::{ApiKey, Tenant};
use clap::{Parser, Subcommand};
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;

/// Prefix for generated API keys.
const API_KEY_PREFIX: &str = "bcn_sk_";

#[derive(Parser)]
#[command(name = "beacon", about = "Beacon push gateway provisioning", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a tenant (if needed) and attach an API key to it.
    CreateKey {
        /// Tenant identifier (created on first use).
        #[arg(long)]
        tenant_id: String,

        /// Label for the API key.
        #[arg(long)]
        label: String,

        /// API key value; generated when omitted.
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    let database_url = match std::env::var("DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("Error: DATABASE_URL is required");
            std::process::exit(1);
        }
    };

    let pool = match PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&database_url)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = beacon_db::run_migrations(&pool).await {
        eprintln!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    match cli.command {
        Commands::CreateKey {
            tenant_id,
            label,
            api_key,
        } => {
            let secret = api_key.unwrap_or_else(generate_api_key);

            let tenant = match Tenant::create_if_not_exists(&pool, &tenant_id, &tenant_id).await {
                Ok(tenant) => tenant,
                Err(e) => {
                    eprintln!("Failed to create tenant: {e}");
                    std::process::exit(1);
                }
            };

            let record = match ApiKey::insert(&pool, &tenant.tenant_id, &label, &secret).await {
                Ok(record) => record,
                Err(e) => {
                    eprintln!("Failed to create API key: {e}");
                    std::process::exit(1);
                }
            };

            println!("API key created successfully");
            println!("  Tenant ID: {}", record.tenant_id);
            println!("  Label:     {}", record.label);
            println!("  API Key:   {}", record.api_key);
            println!("  ID:        {}", record.id);
            println!();
            println!("Authentication format:");
            println!("  Authorization: Digest <sha256-hex(api_key + YYYY-MM-DD-HH)>");
            println!(
                "  Current hour example: Digest {}",
                compute_digest(&record.api_key, &current_hour_bucket())
            );
        }
    }
}

/// Generate a fresh API key: prefix plus 32 hex characters from the OS
/// CSPRNG.
fn generate_api_key() -> String {
    use rand::rngs::OsRng;
    use rand::RngCore;

    let mut random_bytes = [0u8; 16];
    OsRng.fill_bytes(&mut random_bytes);
    format!("{API_KEY_PREFIX}{}", hex::encode(random_bytes))
}
