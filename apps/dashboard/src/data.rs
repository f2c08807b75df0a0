//! # Query Layer
//!
//! Every read the dashboard pages need. Each function takes the database
//! handle explicitly, maps repository rows into the read shapes, and turns
//! any database failure into a [`DataError`] naming the read.
//!
//! ## Read Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Page                      Function                   Repository call   │
//! │  ───────────────────────   ────────────────────────   ───────────────── │
//! │  /dashboard                fetch_revenue              revenue.all       │
//! │                            fetch_latest_invoices      invoices.latest   │
//! │                            fetch_card_data            3 queries, joined │
//! │  /dashboard/invoices       fetch_filtered_invoices    invoices.filtered │
//! │                            fetch_invoices_pages       count_filtered    │
//! │  /dashboard/invoices/…     fetch_invoice_by_id        get_by_id         │
//! │                            fetch_customers            list_fields       │
//! │  /dashboard/customers      fetch_filtered_customers   customers.filtered│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acme_core::money::format_currency;
use acme_core::{
    CardData, CustomerField, CustomerTableRow, InvoiceForm, InvoiceTableRow, LatestInvoice,
    Revenue, ITEMS_PER_PAGE, LATEST_INVOICES_LIMIT,
};
use acme_db::Database;

use crate::error::DataError;

/// Monthly revenue, January first.
pub async fn fetch_revenue(db: &Database) -> Result<Vec<Revenue>, DataError> {
    db.revenue()
        .all()
        .await
        .map_err(|e| DataError::Revenue.caused_by(e))
}

/// The five most recent invoices with customer details and a formatted amount.
pub async fn fetch_latest_invoices(db: &Database) -> Result<Vec<LatestInvoice>, DataError> {
    let rows = db
        .invoices()
        .latest(LATEST_INVOICES_LIMIT)
        .await
        .map_err(|e| DataError::LatestInvoices.caused_by(e))?;

    Ok(rows
        .into_iter()
        .map(|row| LatestInvoice {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            amount: format_currency(row.amount),
        })
        .collect())
}

/// Invoice and customer counts plus paid/pending totals.
///
/// The three aggregate queries run concurrently; the first failure wins.
pub async fn fetch_card_data(db: &Database) -> Result<CardData, DataError> {
    let invoices = db.invoices();
    let customers = db.customers();

    let (number_of_invoices, number_of_customers, totals) = tokio::try_join!(
        invoices.count(),
        customers.count(),
        invoices.totals_by_status(),
    )
    .map_err(|e| DataError::CardData.caused_by(e))?;

    Ok(CardData {
        number_of_customers,
        number_of_invoices,
        total_paid_invoices: format_currency(totals.paid),
        total_pending_invoices: format_currency(totals.pending),
    })
}

/// One page of invoices matching `query`, newest first.
pub async fn fetch_filtered_invoices(
    db: &Database,
    query: &str,
    current_page: i64,
) -> Result<Vec<InvoiceTableRow>, DataError> {
    db.invoices()
        .filtered(query, current_page)
        .await
        .map_err(|e| DataError::Invoices.caused_by(e))
}

/// Number of pages `fetch_filtered_invoices` can return for `query`.
pub async fn fetch_invoices_pages(db: &Database, query: &str) -> Result<i64, DataError> {
    let count = db
        .invoices()
        .count_filtered(query)
        .await
        .map_err(|e| DataError::InvoicePages.caused_by(e))?;

    Ok(total_pages(count))
}

/// The edit form's values for invoice `id`, amount in dollars.
///
/// A missing invoice is `Ok(None)`, never an error.
pub async fn fetch_invoice_by_id(db: &Database, id: &str) -> Result<Option<InvoiceForm>, DataError> {
    let invoice = db
        .invoices()
        .get_by_id(id)
        .await
        .map_err(|e| DataError::Invoice.caused_by(e))?;

    Ok(invoice.map(InvoiceForm::from))
}

/// Every customer as `{id, name}`, ordered by name.
pub async fn fetch_customers(db: &Database) -> Result<Vec<CustomerField>, DataError> {
    db.customers()
        .list_fields()
        .await
        .map_err(|e| DataError::Customers.caused_by(e))
}

/// Customers matching `query` with invoice count and formatted totals.
pub async fn fetch_filtered_customers(
    db: &Database,
    query: &str,
) -> Result<Vec<CustomerTableRow>, DataError> {
    let rows = db
        .customers()
        .filtered(query)
        .await
        .map_err(|e| DataError::CustomerTable.caused_by(e))?;

    Ok(rows
        .into_iter()
        .map(|row| CustomerTableRow {
            id: row.id,
            name: row.name,
            email: row.email,
            image_url: row.image_url,
            total_invoices: row.total_invoices,
            total_pending: format_currency(row.total_pending),
            total_paid: format_currency(row.total_paid),
        })
        .collect())
}

/// `ceil(count / ITEMS_PER_PAGE)`.
fn total_pages(count: i64) -> i64 {
    (count + ITEMS_PER_PAGE - 1) / ITEMS_PER_PAGE
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use acme_core::{Customer, Invoice, InvoiceStatus};
    use acme_db::DbConfig;
    use chrono::NaiveDate;

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    async fn add_customer(db: &Database, id: &str, name: &str) {
        db.customers()
            .insert(&Customer {
                id: id.into(),
                name: name.into(),
                email: format!("{}@example.com", id),
                image_url: format!("/customers/{}.png", id),
            })
            .await
            .unwrap();
    }

    async fn add_invoice(db: &Database, id: &str, customer_id: &str, amount: i64, status: InvoiceStatus, day: u32) {
        db.invoices()
            .insert(&Invoice {
                id: id.into(),
                customer_id: customer_id.into(),
                amount,
                status,
                date: NaiveDate::from_ymd_opt(2023, 6, day).unwrap(),
            })
            .await
            .unwrap();
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(6), 1);
        assert_eq!(total_pages(7), 2);
        assert_eq!(total_pages(13), 3);
    }

    #[tokio::test]
    async fn test_fetch_invoices_pages() {
        let db = test_db().await;
        add_customer(&db, "c1", "Lee Robinson").await;
        for day in 1..=13 {
            add_invoice(&db, &format!("i{}", day), "c1", 100, InvoiceStatus::Paid, day).await;
        }

        assert_eq!(fetch_invoices_pages(&db, "").await.unwrap(), 3);
        assert_eq!(fetch_invoices_pages(&db, "nothing-matches").await.unwrap(), 0);

        let page2 = fetch_filtered_invoices(&db, "", 2).await.unwrap();
        assert_eq!(page2.len(), 6);
        assert_eq!(page2[0].id, "i7");
    }

    #[tokio::test]
    async fn test_fetch_latest_invoices_formats_amount() {
        let db = test_db().await;
        add_customer(&db, "c1", "Lee Robinson").await;
        add_invoice(&db, "i1", "c1", 123456, InvoiceStatus::Pending, 1).await;

        let latest = fetch_latest_invoices(&db).await.unwrap();
        assert_eq!(latest.len(), 1);
        assert_eq!(latest[0].amount, "$1,234.56");
        assert_eq!(latest[0].name, "Lee Robinson");
    }

    #[tokio::test]
    async fn test_fetch_card_data() {
        let db = test_db().await;
        add_customer(&db, "c1", "Lee Robinson").await;
        add_customer(&db, "c2", "Amy Burns").await;
        add_invoice(&db, "i1", "c1", 100_000, InvoiceStatus::Paid, 1).await;
        add_invoice(&db, "i2", "c2", 550, InvoiceStatus::Pending, 2).await;

        let cards = fetch_card_data(&db).await.unwrap();
        assert_eq!(
            cards,
            CardData {
                number_of_customers: 2,
                number_of_invoices: 2,
                total_paid_invoices: "$1,000.00".into(),
                total_pending_invoices: "$5.50".into(),
            }
        );
    }

    #[tokio::test]
    async fn test_fetch_invoice_by_id() {
        let db = test_db().await;
        add_customer(&db, "c1", "Lee Robinson").await;
        add_invoice(&db, "i1", "c1", 15795, InvoiceStatus::Pending, 6).await;

        let form = fetch_invoice_by_id(&db, "i1").await.unwrap().unwrap();
        assert_eq!(form.amount, 157.95);
        assert_eq!(form.status, InvoiceStatus::Pending);

        assert_eq!(fetch_invoice_by_id(&db, "missing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_fetch_filtered_customers_formats_totals() {
        let db = test_db().await;
        add_customer(&db, "c1", "Lee Robinson").await;
        add_invoice(&db, "i1", "c1", 2000, InvoiceStatus::Paid, 1).await;
        add_invoice(&db, "i2", "c1", 150, InvoiceStatus::Pending, 2).await;

        let rows = fetch_filtered_customers(&db, "lee").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].total_invoices, 2);
        assert_eq!(rows[0].total_paid, "$20.00");
        assert_eq!(rows[0].total_pending, "$1.50");

        let customers = fetch_customers(&db).await.unwrap();
        assert_eq!(customers[0].name, "Lee Robinson");
    }

    #[tokio::test]
    async fn test_read_failures_are_generic() {
        let db = test_db().await;
        db.close().await;

        assert_eq!(fetch_revenue(&db).await.unwrap_err(), DataError::Revenue);
        assert_eq!(fetch_card_data(&db).await.unwrap_err(), DataError::CardData);
        assert_eq!(
            fetch_invoices_pages(&db, "").await.unwrap_err().to_string(),
            "Database Error: Failed to fetch total number of invoices."
        );
    }
}
