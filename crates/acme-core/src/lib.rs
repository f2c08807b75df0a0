//! # acme-core: Pure Business Logic for the Acme Dashboard
//!
//! This crate holds the parts of the dashboard that do not need a database
//! connection: money handling, display formatting, form validation and the
//! domain types the other crates pass around.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Acme Dashboard Architecture                      │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Browser / page renderer                      │   │
//! │  │    Overview ──► Invoices table ──► Create/Edit form ──► Login   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP (JSON page data, form posts)      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 acme-dashboard (axum app)                       │   │
//! │  │    data::fetch_*, actions::create_invoice, auth::authorize     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ acme-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  format   │  │ validation│  │   │
//! │  │   │  Invoice  │  │   Money   │  │   dates   │  │   forms   │  │   │
//! │  │   │ Customer  │  │  $1,234   │  │ pagination│  │credentials│  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO DATABASE • NO NETWORK • NO HTTP                           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    acme-db (Database Layer)                     │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records and read shapes (Invoice, Customer, CardData, ...)
//! - [`money`] - Money type with integer cents and en-US currency formatting
//! - [`format`] - Date formatting, pagination and revenue chart helpers
//! - [`error`] - Validation and core error types
//! - [`validation`] - Invoice form and credential validation
//! - [`password`] - Salted password hashing and verification
//!
//! ## Example Usage
//!
//! ```rust
//! use acme_core::money::Money;
//!
//! // Amounts are stored in cents and only formatted at the edge
//! let total = Money::from_cents(123456);
//! assert_eq!(total.to_string(), "$1,234.56");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod money;
pub mod password;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, FieldErrors, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Rows shown per page of the invoices table.
///
/// Also the divisor for the total page count, so the two can never drift.
pub const ITEMS_PER_PAGE: i64 = 6;

/// Largest invoice amount a form may submit, in cents ($1,000,000,000.00).
///
/// Keeps `SUM(amount)` over any realistic table inside an `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 100_000_000_000;

/// Number of invoices shown in the overview's "latest invoices" card.
pub const LATEST_INVOICES_LIMIT: i64 = 5;

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LENGTH: usize = 6;
