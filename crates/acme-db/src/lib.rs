//! # acme-db: Database Layer for the Acme Dashboard
//!
//! This crate provides database access for the dashboard.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Acme Dashboard Data Flow                           │
//! │                                                                         │
//! │  HTTP handler (GET /dashboard/invoices?query=lee&page=2)               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  data::fetch_filtered_invoices (acme-dashboard)                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     acme-db (THIS CRATE)                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ InvoiceRepo   │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ CustomerRepo  │    │ 001_initial_ │  │   │
//! │  │   │               │    │ RevenueRepo   │    │   schema.sql │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   ./acme_dashboard.db (DATABASE_PATH)                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per table
//!
//! ## Usage
//!
//! ```rust,ignore
//! use acme_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::file("./acme_dashboard.db")).await?;
//!
//! let rows = db.invoices().filtered("lee", 1).await?;
//! let pages = db.invoices().count_filtered("lee").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig, DbLocation};

// Repository re-exports for convenience
pub use repository::customer::{CustomerRepository, CustomerTotalsRow};
pub use repository::invoice::{InvoiceRepository, InvoiceTotals, LatestInvoiceRow};
pub use repository::revenue::RevenueRepository;
pub use repository::user::UserRepository;
