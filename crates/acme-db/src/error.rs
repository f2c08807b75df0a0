//! # Database Errors
//!
//! ```text
//! sqlx::Error ──► DbError ──► acme-dashboard
//!                               ├── reads:  DataError ("Database Error: Failed to fetch …")
//!                               └── writes: FormState.message
//! ```
//!
//! The variant and its text are for logs. Nothing here is shown to users.

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A statement that must touch exactly one row touched none.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// e.g. a second user with the same email.
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// e.g. an invoice naming a customer that does not exist.
    #[error("Foreign key violated: {0}")]
    ForeignKeyViolation(String),

    /// e.g. a non-positive amount or an unknown status.
    #[error("Check constraint violated: {0}")]
    CheckViolation(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// The pool was closed (shutdown, or a test closing it on purpose).
    #[error("Connection pool closed")]
    PoolClosed,

    #[error("Migration failed: {0}")]
    MigrationFailed(#[from] sqlx::migrate::MigrateError),

    #[error("Query failed: {0}")]
    Query(String),
}

impl DbError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        DbError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let message = db_err.message().to_string();
                match db_err.kind() {
                    ErrorKind::UniqueViolation => DbError::UniqueViolation(message),
                    ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation(message),
                    ErrorKind::CheckViolation => DbError::CheckViolation(message),
                    _ => DbError::Query(message),
                }
            }
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::PoolClosed,
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            other => DbError::Query(other.to_string()),
        }
    }
}

pub type DbResult<T> = Result<T, DbError>;
