//! # Revenue Repository
//!
//! Monthly revenue reference data for the overview chart. Rows come back in
//! insertion order, which the seed keeps as calendar order.

use acme_core::Revenue;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// Repository for the `revenue` table.
#[derive(Debug, Clone)]
pub struct RevenueRepository {
    pool: SqlitePool,
}

impl RevenueRepository {
    /// Creates a new RevenueRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RevenueRepository { pool }
    }

    /// Returns every month in insertion order.
    pub async fn all(&self) -> DbResult<Vec<Revenue>> {
        let rows = sqlx::query_as::<_, Revenue>("SELECT month, revenue FROM revenue ORDER BY rowid")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Fetched revenue");
        Ok(rows)
    }

    /// Inserts one month.
    ///
    /// ## Errors
    /// * `DbError::UniqueViolation` - The month already exists
    pub async fn insert(&self, revenue: &Revenue) -> DbResult<()> {
        sqlx::query("INSERT INTO revenue (month, revenue) VALUES (?1, ?2)")
            .bind(&revenue.month)
            .bind(revenue.revenue)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts stored months.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM revenue")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
