//! Beacon push gateway server.
//!
//! Wires the shared state together — database pool, digest cache, blob
//! store, per-backend client pools — starts the two background task
//! categories (hourly digest reload, hourly pool sweeps), and serves the
//! authenticated gateway routes plus an unauthenticated health probe.

mod config;
mod logging;

use axum::{routing::get, Router};
use beacon_api::seed::SeedService;
use beacon_api::{gateway_router, AppState};
use beacon_auth::{spawn_hourly_reload, DigestCache, KeySource, PgKeySource};
use beacon_pool::spawn_sweeper;
use beacon_storage::S3BlobStore;
use config::Config;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::info;

#[tokio::main]
async fn main() {
    // Load .env if present (local development), then fail fast on config.
    let _ = dotenvy::dotenv();
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.rust_log);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        host = %config.host,
        port = config.port,
        "Starting Beacon push gateway"
    );

    // Database pool with a short acquire deadline: a slow store surfaces as
    // a per-request failure, never a hung request.
    let pool = match PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.database_url)
        .await
    {
        Ok(pool) => {
            info!("Database connection established");
            pool
        }
        Err(e) => {
            eprintln!("Failed to connect to database: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = beacon_db::run_migrations(&pool).await {
        eprintln!("Failed to run migrations: {e}");
        std::process::exit(1);
    }

    // Seed tenants before the first cache load so seeded keys resolve
    // immediately.
    let seeder = SeedService::new(pool.clone());
    match seeder.seed_from_file(&config.seed_file).await {
        Ok(applied) if applied > 0 => info!(applied, "Tenant seeding complete"),
        Ok(_) => {}
        Err(e) => tracing::warn!(error = %e, "Tenant seeding failed"),
    }

    // The digest cache: one explicit instance for the whole process.
    let digest_cache = Arc::new(DigestCache::new());
    let key_source: Arc<dyn KeySource> = Arc::new(PgKeySource::new(pool.clone()));
    if let Err(e) = digest_cache.reload(key_source.as_ref()).await {
        eprintln!("Failed to initialize digest cache: {e}");
        std::process::exit(1);
    }

    let blobs = Arc::new(S3BlobStore::new(config.s3_bucket.clone()).await);
    let state = AppState::new(pool, digest_cache.clone(), blobs);

    // Background tasks: hourly digest reload plus one expiry sweep per
    // backend pool. Independent cadences, one cancellation token each so
    // shutdown stops them all.
    let shutdown = CancellationToken::new();
    let refresh_task = spawn_hourly_reload(
        Arc::clone(&digest_cache),
        key_source,
        shutdown.child_token(),
    );
    let apns_sweeper = spawn_sweeper(
        Arc::clone(&state.apns_clients),
        "apns",
        config.client_ttl,
        config.sweep_interval,
        shutdown.child_token(),
    );
    let fcm_sweeper = spawn_sweeper(
        Arc::clone(&state.fcm_clients),
        "fcm",
        config.client_ttl,
        config.sweep_interval,
        shutdown.child_token(),
    );

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .merge(gateway_router(state))
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Invalid bind address: {e}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            eprintln!("Failed to bind {addr}: {e}");
            std::process::exit(1);
        }
    };

    info!(%addr, "Server running");
    info!("  GET  /health     - Health check (no auth required)");
    info!("  POST /register   - Register device token (auth required)");
    info!("  POST /push       - Simulated fan-out push (auth required)");
    info!("  POST /push/apns  - Send APNS push notification (auth required)");
    info!("  POST /push/fcm   - Send FCM push notification (auth required)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "Server error");
    }

    // Stop background tasks and let them wind down.
    shutdown.cancel();
    for (name, task) in [
        ("digest-refresh", refresh_task),
        ("apns-sweeper", apns_sweeper),
        ("fcm-sweeper", fcm_sweeper),
    ] {
        if let Err(e) = task.await {
            tracing::warn!(task = name, error = %e, "Background task did not stop cleanly");
        }
    }
    info!("Shutdown complete");
}

/// Resolve when the process receives Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown"),
        () = terminate => info!("Received SIGTERM, initiating graceful shutdown"),
    }
}
