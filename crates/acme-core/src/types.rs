//! # Domain Types
//!
//! Table records and the read shapes built from them.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Table records (one row = one value)                                   │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Invoice      │   │    Customer     │   │    Revenue      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  month          │       │
//! │  │  customer_id FK │   │  name, email    │   │  revenue        │       │
//! │  │  amount (cents) │   │  image_url      │   └─────────────────┘       │
//! │  │  status, date   │   └─────────────────┘                             │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  Read shapes (joins / aggregates, built per query)                     │
//! │  LatestInvoice · InvoiceTableRow · InvoiceForm · CustomerField ·        │
//! │  CustomerTableRow · CardData                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;

/// Generates a primary key for a new row (UUID v4, hyphenated).
///
/// Ids are always minted here, never by the database.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Invoice Status
// =============================================================================

/// Payment state of an invoice. Stored lowercase (`'pending'`, `'paid'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    /// Issued, not yet paid.
    Pending,
    /// Settled.
    Paid,
}

impl InvoiceStatus {
    /// Database / form representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            _ => Err(ValidationError::StatusInvalid),
        }
    }
}

// =============================================================================
// Table Records
// =============================================================================

/// A row of the `invoices` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// Amount in cents, always positive.
    pub amount: i64,
    pub status: InvoiceStatus,
    /// Issue date (date only, no time zone).
    #[ts(as = "String")]
    pub date: NaiveDate,
}

impl Invoice {
    /// Returns the amount as Money.
    #[inline]
    pub fn amount(&self) -> Money {
        Money::from_cents(self.amount)
    }
}

/// A row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Revenue for one calendar month (reference data for the chart).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Revenue {
    /// Short month name, e.g. `"Jan"`.
    pub month: String,
    /// Whole dollars.
    pub revenue: i64,
}

/// A dashboard login. Only read by the credentials check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// argon2 PHC string. Never serialized.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password: String,
}

// =============================================================================
// Read Shapes
// =============================================================================

/// Overview card: one of the five most recent invoices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Pre-formatted, e.g. `"$1,234.56"`.
    pub amount: String,
}

/// A row of the searchable invoices table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct InvoiceTableRow {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    #[ts(as = "String")]
    pub date: NaiveDate,
    /// Cents; the table formats it.
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Values used to pre-fill the edit-invoice form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct InvoiceForm {
    pub id: String,
    pub customer_id: String,
    /// Decimal dollars, e.g. `157.95`.
    pub amount: f64,
    pub status: InvoiceStatus,
}

impl From<Invoice> for InvoiceForm {
    fn from(invoice: Invoice) -> Self {
        InvoiceForm {
            amount: invoice.amount().to_dollars(),
            id: invoice.id,
            customer_id: invoice.customer_id,
            status: invoice.status,
        }
    }
}

/// Customer option in the invoice form's dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

/// A row of the customers table with per-customer invoice totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerTableRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: i64,
    /// Pre-formatted currency.
    pub total_pending: String,
    /// Pre-formatted currency.
    pub total_paid: String,
}

/// The four statistic cards at the top of the overview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CardData {
    pub number_of_customers: i64,
    pub number_of_invoices: i64,
    /// Pre-formatted currency.
    pub total_paid_invoices: String,
    /// Pre-formatted currency.
    pub total_pending_invoices: String,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_id_is_unique_uuid() {
        let a = new_id();
        let b = new_id();
        assert_eq!(a.len(), 36);
        assert!(Uuid::parse_str(&a).is_ok());
        assert_ne!(a, b);
    }

    #[test]
    fn test_status_round_trips_through_str() {
        assert_eq!("paid".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Paid));
        assert_eq!("pending".parse::<InvoiceStatus>(), Ok(InvoiceStatus::Pending));
        assert_eq!(InvoiceStatus::Paid.to_string(), "paid");
    }

    #[test]
    fn test_status_rejects_unknown_and_wrong_case() {
        assert_eq!(
            "overdue".parse::<InvoiceStatus>(),
            Err(ValidationError::StatusInvalid)
        );
        assert!("Paid".parse::<InvoiceStatus>().is_err());
    }

    #[test]
    fn test_invoice_form_converts_cents_to_dollars() {
        let invoice = Invoice {
            id: "inv-1".into(),
            customer_id: "cust-1".into(),
            amount: 15795,
            status: InvoiceStatus::Pending,
            date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap(),
        };

        let form = InvoiceForm::from(invoice);
        assert_eq!(form.amount, 157.95);
        assert_eq!(form.customer_id, "cust-1");
    }

    #[test]
    fn test_user_password_is_not_serialized() {
        let user = User {
            id: "u1".into(),
            name: "User".into(),
            email: "user@nextmail.com".into(),
            password: "$argon2id$...".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["email"], "user@nextmail.com");
    }
}
