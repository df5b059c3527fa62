//! Error types for the kardex-db crate.
//!
//! Provides a unified error type that wraps `SQLx` errors with additional context.

use thiserror::Error;

/// Postgres error code for unique constraint violations.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Database operation errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// Failed to establish or acquire a database connection.
    #[error("Database connection failed: {0}")]
    ConnectionFailed(#[source] sqlx::Error),

    /// A database migration failed to apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(#[source] sqlx::migrate::MigrateError),

    /// A database query failed to execute.
    ///
    /// This can indicate SQL syntax errors, constraint violations,
    /// or issues with the query parameters.
    #[error("Query failed: {0}")]
    QueryFailed(#[source] sqlx::Error),

    /// The store is unavailable.
    ///
    /// Produced by non-Postgres store implementations (e.g. test doubles
    /// simulating an outage) where no underlying `sqlx::Error` exists.
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl DbError {
    /// Check if this error indicates a connection problem.
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(self, DbError::ConnectionFailed(_))
    }

    /// Check if this error is a store-level unique constraint violation.
    ///
    /// The unique constraint on `students.boleta` is the backstop for the
    /// check-then-act race between concurrent batch submissions; callers
    /// use this to report the collision instead of a generic query failure.
    #[must_use]
    pub fn is_unique_violation(&self) -> bool {
        match self {
            DbError::QueryFailed(sqlx::Error::Database(db_err)) => db_err
                .code()
                .is_some_and(|code| code == PG_UNIQUE_VIOLATION),
            _ => false,
        }
    }
}
