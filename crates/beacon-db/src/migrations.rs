//! Embedded database migrations.

use crate::DbError;
use sqlx::PgPool;

/// Apply all pending migrations from `crates/beacon-db/migrations`.
///
/// Safe to run on every startup; already-applied migrations are skipped.
///
/// # Errors
///
/// Returns [`DbError::MigrationFailed`] if a migration cannot be applied.
pub async fn run_migrations(pool: &PgPool) -> Result<(), DbError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DbError::MigrationFailed)?;
    tracing::info!("Database migrations applied");
    Ok(())
}
