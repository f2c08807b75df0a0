//! # Store Handle
//!
//! Opening the SQLite store and handing out repositories.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  DbConfig::file("./acme_dashboard.db")      DbConfig::in_memory()       │
//! │        .pool_size(5)                          (tests, one connection)  │
//! │             │                                        │                  │
//! │             └──────────────┬─────────────────────────┘                  │
//! │                            ▼                                            │
//! │                 Database::new(config)                                   │
//! │                   • foreign_keys = ON                                   │
//! │                   • WAL journal (file stores)                          │
//! │                   • apply migrations/sqlite                             │
//! │                            │                                            │
//! │        ┌───────────┬───────┴─────┬──────────────┐                       │
//! │        ▼           ▼             ▼              ▼                       │
//! │   .invoices()  .customers()  .revenue()     .users()                    │
//! │                                                                         │
//! │  One Database lives in the HTTP state; clones share the same pool.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::customer::CustomerRepository;
use crate::repository::invoice::InvoiceRepository;
use crate::repository::revenue::RevenueRepository;
use crate::repository::user::UserRepository;

// =============================================================================
// Configuration
// =============================================================================

/// Where the store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to the pool; gone once the pool closes.
    Memory,
}

/// How to open the store.
///
/// ```rust,ignore
/// let config = DbConfig::file("./acme_dashboard.db").pool_size(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,

    /// Upper bound on open connections.
    pub pool_size: u32,

    /// How long a query waits for a free connection before failing with
    /// `DbError::PoolExhausted`.
    pub acquire_timeout: Duration,

    pub migrate_on_open: bool,
}

impl DbConfig {
    /// A store backed by the file at `path`, created on first open.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        DbConfig {
            location: DbLocation::File(path.into()),
            pool_size: 5,
            acquire_timeout: Duration::from_secs(10),
            migrate_on_open: true,
        }
    }

    /// A throwaway store for tests.
    ///
    /// Every connection to `:memory:` is a different database, so the pool
    /// is pinned to a single connection.
    pub fn in_memory() -> Self {
        DbConfig {
            location: DbLocation::Memory,
            pool_size: 1,
            acquire_timeout: Duration::from_secs(5),
            migrate_on_open: true,
        }
    }

    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    /// Open without applying migrations (the schema must already exist).
    pub fn skip_migrations(mut self) -> Self {
        self.migrate_on_open = false;
        self
    }

    fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::File(path) => SqliteConnectOptions::new()
                .filename(path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal),
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
        };

        // invoices.customer_id must name an existing customer
        Ok(options.foreign_keys(true))
    }
}

// =============================================================================
// Database
// =============================================================================

/// Handle to the store. Cheap to clone.
///
/// Query and mutation functions take it explicitly:
///
/// ```rust,ignore
/// async fn fetch_customers(db: &Database) -> Result<Vec<CustomerField>, DataError> {
///     db.customers().list_fields().await.map_err(...)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the pool described by `config` and, unless disabled, brings the
    /// schema up to date.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, pool_size = config.pool_size, "Opening database");

        let options = config.connect_options()?;
        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size)
            .min_connections(1)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;
        debug!("Pool connected");

        let db = Database { pool };
        if config.migrate_on_open {
            db.run_migrations().await?;
        }

        Ok(db)
    }

    /// Applies any embedded migration not yet recorded in the store.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn invoices(&self) -> InvoiceRepository {
        InvoiceRepository::new(self.pool.clone())
    }

    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.pool.clone())
    }

    pub fn revenue(&self) -> RevenueRepository {
        RevenueRepository::new(self.pool.clone())
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    /// Closes every connection. Later queries fail.
    pub async fn close(&self) {
        info!("Closing database");
        self.pool.close().await;
    }

    /// `true` if a trivial query round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        assert!(db.health_check().await);
        let (embedded, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_closed_store_is_unhealthy() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        assert!(!db.health_check().await);
    }

    #[test]
    fn test_config_builders() {
        let config = DbConfig::file("/tmp/acme.db")
            .pool_size(8)
            .acquire_timeout(Duration::from_secs(2))
            .skip_migrations();

        assert_eq!(config.location, DbLocation::File(PathBuf::from("/tmp/acme.db")));
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.acquire_timeout, Duration::from_secs(2));
        assert!(!config.migrate_on_open);

        assert_eq!(DbConfig::in_memory().pool_size, 1);
    }
}
