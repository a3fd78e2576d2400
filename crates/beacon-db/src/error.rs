//! Error types for the beacon-db crate.

use thiserror::Error;

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A database migration failed to apply.
    #[error("migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A database query failed to execute.
    #[error("query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl DbError {
    /// Check if this error indicates a missing resource.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, DbError::NotFound(_))
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DbError::ConnectionFailed(err)
            }
            other => DbError::QueryFailed(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DbError::NotFound("tenant acme".to_string());
        assert_eq!(err.to_string(), "not found: tenant acme");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_pool_errors_map_to_connection_failed() {
        let err: DbError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }

    #[test]
    fn test_row_not_found_maps_to_query_failed() {
        let err: DbError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, DbError::QueryFailed(_)));
        assert!(!err.is_not_found());
    }
}
