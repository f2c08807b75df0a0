//! # Repository Module
//!
//! One repository per table. Repositories return raw rows (amounts in
//! cents, dates as `NaiveDate`); formatting and error wording belong to the
//! dashboard's `data` module.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  data::fetch_filtered_invoices(db, "lee", 2)                           │
//! │       │                                                                 │
//! │       │  db.invoices().filtered("lee", 2)                              │
//! │       ▼                                                                 │
//! │  InvoiceRepository                                                     │
//! │  ├── latest(limit)                                                     │
//! │  ├── filtered(query, page) / count_filtered(query)                     │
//! │  ├── get_by_id(id)                                                     │
//! │  ├── count() / totals_by_status()                                      │
//! │  └── insert / update / delete                                          │
//! │       │                                                                 │
//! │       │  Parameterized SQL (bind, never string-spliced)                │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InvoiceRepository`](invoice::InvoiceRepository) - Invoice search, aggregates and writes
//! - [`CustomerRepository`](customer::CustomerRepository) - Dropdown list and per-customer totals
//! - [`RevenueRepository`](revenue::RevenueRepository) - Monthly revenue series
//! - [`UserRepository`](user::UserRepository) - Login lookup

pub mod customer;
pub mod invoice;
pub mod revenue;
pub mod user;

/// Wraps a search term for a `LIKE` "contains" match.
pub(crate) fn contains_pattern(query: &str) -> String {
    format!("%{}%", query)
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared rows for repository tests.

    use acme_core::{Customer, Invoice, InvoiceStatus};
    use chrono::NaiveDate;

    use crate::{Database, DbConfig};

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn customer(id: &str, name: &str, email: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            image_url: format!("/customers/{}.png", id),
        }
    }

    pub fn invoice(id: &str, customer_id: &str, amount: i64, status: InvoiceStatus, date: &str) -> Invoice {
        Invoice {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            amount,
            status,
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        }
    }
}
