//! # Invoice Repository
//!
//! Database operations for invoices.
//!
//! ## Key Operations
//! - Latest invoices for the overview
//! - "Contains" search with fixed-size pages
//! - Aggregates for the statistic cards
//! - Single-statement create, update and delete
//!
//! ## Search
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    How Invoice Search Works                             │
//! │                                                                         │
//! │  User types: "lee"             pattern = "%lee%"                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  invoices JOIN customers, LIKE (ASCII case-insensitive) against:       │
//! │    customers.name · customers.email · amount · date · status           │
//! │  Non-ASCII letters compare exactly: "öl" does not find "Ölaf".         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ORDER BY date DESC  LIMIT 6  OFFSET (page - 1) * 6                    │
//! │                                                                         │
//! │  count_filtered runs the same WHERE clause without LIMIT, so           │
//! │  ceil(count / 6) pages always covers every row `filtered` can return.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acme_core::{Invoice, InvoiceStatus, InvoiceTableRow, ITEMS_PER_PAGE};
use sqlx::SqlitePool;
use tracing::debug;

use super::contains_pattern;
use crate::error::{DbError, DbResult};

/// Shared WHERE clause of the invoice search; `?1` is the LIKE pattern.
const SEARCH_FILTER: &str = r#"
    customers.name LIKE ?1 OR
    customers.email LIKE ?1 OR
    CAST(invoices.amount AS TEXT) LIKE ?1 OR
    invoices.date LIKE ?1 OR
    invoices.status LIKE ?1
"#;

// =============================================================================
// Row Types
// =============================================================================

/// One of the most recent invoices, joined with its customer.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct LatestInvoiceRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Cents.
    pub amount: i64,
}

/// Sum of invoice amounts per status, in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, sqlx::FromRow)]
pub struct InvoiceTotals {
    pub paid: i64,
    pub pending: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for invoice database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.invoices();
///
/// let page = repo.filtered("lee", 2).await?;
/// let total = repo.count_filtered("lee").await?;
/// ```
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Returns the `limit` most recent invoices with customer details.
    pub async fn latest(&self, limit: i64) -> DbResult<Vec<LatestInvoiceRow>> {
        let rows = sqlx::query_as::<_, LatestInvoiceRow>(
            r#"
            SELECT
                invoices.id,
                customers.name,
                customers.email,
                customers.image_url,
                invoices.amount
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            ORDER BY invoices.date DESC, invoices.rowid DESC
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Fetched latest invoices");
        Ok(rows)
    }

    /// Returns one page of invoices matching `query`.
    ///
    /// ## Arguments
    /// * `query` - Substring to look for; empty matches everything
    /// * `page` - 1-based page number; anything below 1 is treated as 1
    ///
    /// A page whose offset does not fit in an `i64` lies past every row and
    /// comes back empty.
    pub async fn filtered(&self, query: &str, page: i64) -> DbResult<Vec<InvoiceTableRow>> {
        let page = page.max(1);
        let Some(offset) = (page - 1).checked_mul(ITEMS_PER_PAGE) else {
            debug!(page, "Page beyond any offset, returning no invoices");
            return Ok(Vec::new());
        };

        debug!(query = %query, page, offset, "Searching invoices");

        let sql = format!(
            r#"
            SELECT
                invoices.id,
                invoices.customer_id,
                customers.name,
                customers.email,
                customers.image_url,
                invoices.date,
                invoices.amount,
                invoices.status
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {}
            ORDER BY invoices.date DESC, invoices.rowid DESC
            LIMIT ?2 OFFSET ?3
            "#,
            SEARCH_FILTER
        );

        let rows = sqlx::query_as::<_, InvoiceTableRow>(&sql)
            .bind(contains_pattern(query))
            .bind(ITEMS_PER_PAGE)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Search returned invoices");
        Ok(rows)
    }

    /// Counts every invoice matching `query` (same filter as [`filtered`](Self::filtered)).
    pub async fn count_filtered(&self, query: &str) -> DbResult<i64> {
        let sql = format!(
            r#"
            SELECT COUNT(*)
            FROM invoices
            JOIN customers ON invoices.customer_id = customers.id
            WHERE {}
            "#,
            SEARCH_FILTER
        );

        let count: i64 = sqlx::query_scalar(&sql)
            .bind(contains_pattern(query))
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Gets an invoice by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Invoice))` - Invoice found
    /// * `Ok(None)` - No invoice with that id
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Invoice>> {
        let invoice = sqlx::query_as::<_, Invoice>(
            r#"
            SELECT id, customer_id, amount, status, date
            FROM invoices
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    /// Counts all invoices.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Sums paid and pending amounts in one pass.
    pub async fn totals_by_status(&self) -> DbResult<InvoiceTotals> {
        let totals = sqlx::query_as::<_, InvoiceTotals>(
            r#"
            SELECT
                COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0) AS paid,
                COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0) AS pending
            FROM invoices
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(totals)
    }

    /// Inserts a new invoice.
    pub async fn insert(&self, invoice: &Invoice) -> DbResult<()> {
        debug!(
            id = %invoice.id,
            customer_id = %invoice.customer_id,
            amount = invoice.amount,
            "Inserting invoice"
        );

        sqlx::query(
            r#"
            INSERT INTO invoices (id, customer_id, amount, status, date)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(&invoice.id)
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status)
        .bind(invoice.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Updates customer, amount and status of an existing invoice.
    ///
    /// The issue date is left untouched.
    ///
    /// ## Errors
    /// * `DbError::NotFound` - No invoice with that id
    pub async fn update(
        &self,
        id: &str,
        customer_id: &str,
        amount: i64,
        status: InvoiceStatus,
    ) -> DbResult<()> {
        debug!(id = %id, amount, status = %status, "Updating invoice");

        let result = sqlx::query(
            r#"
            UPDATE invoices
            SET customer_id = ?2, amount = ?3, status = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(customer_id)
        .bind(amount)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }

        Ok(())
    }

    /// Deletes an invoice.
    ///
    /// ## Returns
    /// `true` if a row was removed, `false` if the id did not exist.
    pub async fn delete(&self, id: &str) -> DbResult<bool> {
        debug!(id = %id, "Deleting invoice");

        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::fixtures::{customer, invoice, test_db};
    use crate::Database;
    use InvoiceStatus::{Paid, Pending};

    async fn seed_two_customers(db: &Database) {
        db.customers()
            .insert(&customer("c1", "Lee Robinson", "lee@robinson.com"))
            .await
            .unwrap();
        db.customers()
            .insert(&customer("c2", "Delba de Oliveira", "delba@oliveira.com"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_insert_and_get_by_id() {
        let db = test_db().await;
        seed_two_customers(&db).await;

        let inv = invoice("i1", "c1", 15795, Pending, "2022-12-06");
        db.invoices().insert(&inv).await.unwrap();

        let fetched = db.invoices().get_by_id("i1").await.unwrap().unwrap();
        assert_eq!(fetched, inv);
        assert!(db.invoices().get_by_id("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_insert_rejects_unknown_customer() {
        let db = test_db().await;

        let err = db
            .invoices()
            .insert(&invoice("i1", "nobody", 100, Paid, "2023-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::ForeignKeyViolation { .. }));
    }

    #[tokio::test]
    async fn test_insert_rejects_non_positive_amount() {
        let db = test_db().await;
        seed_two_customers(&db).await;

        let err = db
            .invoices()
            .insert(&invoice("i1", "c1", 0, Paid, "2023-01-01"))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }

    #[tokio::test]
    async fn test_latest_orders_by_date_and_limits() {
        let db = test_db().await;
        seed_two_customers(&db).await;

        for (i, date) in ["2023-01-01", "2023-03-01", "2023-02-01"].iter().enumerate() {
            db.invoices()
                .insert(&invoice(&format!("i{}", i), "c1", 100 + i as i64, Paid, date))
                .await
                .unwrap();
        }

        let latest = db.invoices().latest(2).await.unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].id, "i1");
        assert_eq!(latest[1].id, "i2");
        assert_eq!(latest[0].name, "Lee Robinson");
    }

    #[tokio::test]
    async fn test_filtered_pages_through_matches() {
        let db = test_db().await;
        seed_two_customers(&db).await;

        // 13 invoices for Lee, one per day, plus one for Delba
        for day in 1..=13 {
            db.invoices()
                .insert(&invoice(
                    &format!("lee-{:02}", day),
                    "c1",
                    1000 + day,
                    Pending,
                    &format!("2023-05-{:02}", day),
                ))
                .await
                .unwrap();
        }
        db.invoices()
            .insert(&invoice("delba-1", "c2", 777, Paid, "2023-05-20"))
            .await
            .unwrap();

        let repo = db.invoices();
        assert_eq!(repo.count_filtered("lee").await.unwrap(), 13);

        let page1 = repo.filtered("lee", 1).await.unwrap();
        let page2 = repo.filtered("lee", 2).await.unwrap();
        let page3 = repo.filtered("lee", 3).await.unwrap();
        assert_eq!(page1.len(), 6);
        assert_eq!(page2.len(), 6);
        assert_eq!(page3.len(), 1);

        // Newest first; page 2 starts at the 7th newest
        assert_eq!(page1[0].id, "lee-13");
        assert_eq!(page2[0].id, "lee-07");
        assert_eq!(page3[0].id, "lee-01");
    }

    #[tokio::test]
    async fn test_filtered_clamps_page_below_one() {
        let db = test_db().await;
        seed_two_customers(&db).await;
        db.invoices()
            .insert(&invoice("i1", "c1", 100, Paid, "2023-01-01"))
            .await
            .unwrap();

        assert_eq!(db.invoices().filtered("", 0).await.unwrap().len(), 1);
        assert_eq!(db.invoices().filtered("", -4).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_filtered_page_past_any_offset_is_empty() {
        let db = test_db().await;
        seed_two_customers(&db).await;
        db.invoices()
            .insert(&invoice("i1", "c1", 100, Paid, "2023-01-01"))
            .await
            .unwrap();

        assert!(db.invoices().filtered("", i64::MAX).await.unwrap().is_empty());
        assert!(db.invoices().filtered("", i64::MAX / 2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_filtered_matches_every_searchable_column() {
        let db = test_db().await;
        seed_two_customers(&db).await;
        db.invoices()
            .insert(&invoice("i1", "c1", 15795, Pending, "2022-12-06"))
            .await
            .unwrap();
        db.invoices()
            .insert(&invoice("i2", "c2", 20348, Paid, "2023-08-19"))
            .await
            .unwrap();

        let repo = db.invoices();
        assert_eq!(repo.count_filtered("LEE").await.unwrap(), 1); // name, any case
        assert_eq!(repo.count_filtered("oliveira.com").await.unwrap(), 1); // email
        assert_eq!(repo.count_filtered("157").await.unwrap(), 1); // amount
        assert_eq!(repo.count_filtered("2023-08").await.unwrap(), 1); // date
        assert_eq!(repo.count_filtered("paid").await.unwrap(), 1); // status
        assert_eq!(repo.count_filtered("").await.unwrap(), 2);
        assert_eq!(repo.count_filtered("zzz").await.unwrap(), 0);
        assert!(repo.filtered("zzz", 1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_count_and_totals() {
        let db = test_db().await;

        assert_eq!(db.invoices().count().await.unwrap(), 0);
        assert_eq!(
            db.invoices().totals_by_status().await.unwrap(),
            InvoiceTotals::default()
        );

        seed_two_customers(&db).await;
        db.invoices().insert(&invoice("i1", "c1", 1000, Paid, "2023-01-01")).await.unwrap();
        db.invoices().insert(&invoice("i2", "c1", 250, Paid, "2023-01-02")).await.unwrap();
        db.invoices().insert(&invoice("i3", "c2", 99, Pending, "2023-01-03")).await.unwrap();

        assert_eq!(db.invoices().count().await.unwrap(), 3);
        assert_eq!(
            db.invoices().totals_by_status().await.unwrap(),
            InvoiceTotals { paid: 1250, pending: 99 }
        );
    }

    #[tokio::test]
    async fn test_update_and_delete() {
        let db = test_db().await;
        seed_two_customers(&db).await;
        db.invoices()
            .insert(&invoice("i1", "c1", 1000, Pending, "2023-01-01"))
            .await
            .unwrap();

        db.invoices().update("i1", "c2", 4200, Paid).await.unwrap();
        let updated = db.invoices().get_by_id("i1").await.unwrap().unwrap();
        assert_eq!(updated.customer_id, "c2");
        assert_eq!(updated.amount, 4200);
        assert_eq!(updated.status, Paid);
        assert_eq!(updated.date.to_string(), "2023-01-01");

        let err = db.invoices().update("missing", "c1", 1, Paid).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        assert!(db.invoices().delete("i1").await.unwrap());
        assert!(!db.invoices().delete("i1").await.unwrap());
        assert!(db.invoices().get_by_id("i1").await.unwrap().is_none());
    }
}
