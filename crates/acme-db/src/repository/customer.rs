//! # Customer Repository
//!
//! Customer lookups: the id/name list behind the invoice form dropdown and
//! the searchable customers table with per-customer invoice totals.
//!
//! ## Aggregation
//! ```text
//! customers LEFT JOIN invoices
//!   └── GROUP BY customer
//!         ├── COUNT(invoices.id)                        → total_invoices
//!         ├── SUM(amount) WHERE status = 'pending'      → total_pending
//!         └── SUM(amount) WHERE status = 'paid'         → total_paid
//! ```
//! A customer with no invoices still appears, with zero totals.

use acme_core::{Customer, CustomerField};
use sqlx::SqlitePool;
use tracing::debug;

use super::contains_pattern;
use crate::error::DbResult;

/// A customer with invoice totals in cents.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct CustomerTotalsRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    pub total_pending: i64,
    pub total_paid: i64,
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Lists every customer as `{id, name}`, ordered by name.
    pub async fn list_fields(&self) -> DbResult<Vec<CustomerField>> {
        let customers = sqlx::query_as::<_, CustomerField>(
            r#"
            SELECT id, name
            FROM customers
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(customers)
    }

    /// Customers whose name or email contains `query`, with invoice totals.
    ///
    /// Case folding is SQLite's `LIKE`: ASCII only, so "öl" misses "Ölaf".
    pub async fn filtered(&self, query: &str) -> DbResult<Vec<CustomerTotalsRow>> {
        debug!(query = %query, "Searching customers");

        let rows = sqlx::query_as::<_, CustomerTotalsRow>(
            r#"
            SELECT
                customers.id,
                customers.name,
                customers.email,
                customers.image_url,
                COUNT(invoices.id) AS total_invoices,
                COALESCE(SUM(CASE WHEN invoices.status = 'pending' THEN invoices.amount ELSE 0 END), 0) AS total_pending,
                COALESCE(SUM(CASE WHEN invoices.status = 'paid' THEN invoices.amount ELSE 0 END), 0) AS total_paid
            FROM customers
            LEFT JOIN invoices ON customers.id = invoices.customer_id
            WHERE
                customers.name LIKE ?1 OR
                customers.email LIKE ?1
            GROUP BY customers.id, customers.name, customers.email, customers.image_url
            ORDER BY customers.name ASC
            "#,
        )
        .bind(contains_pattern(query))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = rows.len(), "Search returned customers");
        Ok(rows)
    }

    /// Counts all customers.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Inserts a new customer.
    pub async fn insert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, name = %customer.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, image_url)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.image_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
