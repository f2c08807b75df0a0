//! # Money
//!
//! Invoice amounts are stored as INTEGER cents and typed by people as
//! decimal dollars. Conversion happens exactly once at each edge:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  form "49.99" ──► Money::from_dollars ──► 4999 ──► invoices.amount      │
//! │                                                                         │
//! │  invoices.amount ─┬─► InvoiceTableRow.amount   4999 (raw cents)         │
//! │                   ├─► InvoiceForm.amount       49.99 (to_dollars)       │
//! │                   └─► LatestInvoice, CardData  "$49.99" (Display)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```rust
//! use acme_core::money::Money;
//!
//! let amount = Money::from_dollars(49.99);
//! assert_eq!(amount.cents(), 4999);
//! assert_eq!(amount.to_string(), "$49.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// A USD amount in cents. Negative values only arise from arithmetic on
/// stored rows, never from a form.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// `round(dollars * 100)`.
    ///
    /// ```rust
    /// use acme_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(0.1 + 0.2).cents(), 30);
    /// assert_eq!(Money::from_dollars(156.78).cents(), 15678);
    /// ```
    pub fn from_dollars(dollars: f64) -> Self {
        Money((dollars * 100.0).round() as i64)
    }

    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Decimal dollars, for pre-filling the edit form.
    #[inline]
    pub fn to_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

/// `$1,234.56` / `-$5.50`, the only currency format the dashboard shows.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let abs = self.0.unsigned_abs();
        if self.0 < 0 {
            f.write_str("-")?;
        }
        write!(f, "${}.{:02}", group_thousands(abs / 100), abs % 100)
    }
}

/// Formats raw cents from a row without naming the type.
///
/// ```rust
/// use acme_core::money::format_currency;
///
/// assert_eq!(format_currency(123456), "$1,234.56");
/// assert_eq!(format_currency(0), "$0.00");
/// ```
pub fn format_currency(cents: i64) -> String {
    Money::from_cents(cents).to_string()
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    grouped
}
