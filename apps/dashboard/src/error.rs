//! # Error Types
//!
//! Errors the dashboard's handlers can return, and how each becomes an HTTP
//! response.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Dashboard                          │
//! │                                                                         │
//! │  DbError (acme-db)                                                      │
//! │     │  full cause                                                       │
//! │     ▼                                                                   │
//! │  DataError::X.caused_by(err) ── tracing::error!(cause) ──► log only     │
//! │     │  generic text: "Database Error: Failed to fetch …"                │
//! │     ▼                                                                   │
//! │  ApiError::Data ──► 500 { "message": "Database Error: …" }              │
//! │                                                                         │
//! │  Validation never appears here; it travels in FormState.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acme_db::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::session::SessionError;

// =============================================================================
// Data Error
// =============================================================================

/// A read that failed. The message names the read, never the cause.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("Database Error: Failed to fetch revenue data.")]
    Revenue,

    #[error("Database Error: Failed to fetch the latest invoices.")]
    LatestInvoices,

    #[error("Database Error: Failed to fetch card data.")]
    CardData,

    #[error("Database Error: Failed to fetch invoices.")]
    Invoices,

    #[error("Database Error: Failed to fetch total number of invoices.")]
    InvoicePages,

    #[error("Database Error: Failed to fetch invoice.")]
    Invoice,

    #[error("Database Error: Failed to fetch all customers.")]
    Customers,

    #[error("Database Error: Failed to fetch customer table.")]
    CustomerTable,

    #[error("Database Error: Failed to fetch user.")]
    User,
}

impl DataError {
    /// Logs the underlying database error and returns `self` in its place.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// db.revenue().all().await.map_err(|e| DataError::Revenue.caused_by(e))?;
    /// ```
    pub fn caused_by(self, err: DbError) -> Self {
        tracing::error!(error = %err, "{}", self);
        self
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Everything a handler can fail with.
///
/// ## Serialization
/// ```json
/// { "message": "Database Error: Failed to fetch invoices." }
/// ```
#[derive(Debug, Error)]
pub enum ApiError {
    /// A read failed (500).
    #[error(transparent)]
    Data(#[from] DataError),

    /// The requested record does not exist (404).
    #[error("{0} not found.")]
    NotFound(&'static str),

    /// Session machinery failed outside the credentials check (500).
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let message = match &self {
            ApiError::Session(e) => {
                tracing::error!(error = %e, "Session error");
                "Something went wrong.".to_string()
            }
            other => other.to_string(),
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
