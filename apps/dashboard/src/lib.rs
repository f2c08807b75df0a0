//! # Acme Dashboard
//!
//! axum application serving the invoices dashboard: page data, invoice
//! form actions and cookie sessions over the SQLite store.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Dashboard Application                           │
//! │                                                                         │
//! │  request ──► TraceLayer ──► require_session ──► routes::*              │
//! │                                                   │                     │
//! │               ┌───────────────────────────────────┼──────────────┐      │
//! │               ▼                 ▼                 ▼              ▼      │
//! │  ┌────────────────┐  ┌────────────────┐  ┌──────────────┐  ┌─────────┐ │
//! │  │  data          │  │  actions       │  │  session     │  │  cache  │ │
//! │  │ • fetch_*      │  │ • create       │  │ • sign_in    │  │ • get   │ │
//! │  │                │  │ • update       │  │ • validate   │  │ • reval │ │
//! │  │                │  │ • delete       │  │ • cookies    │  │         │ │
//! │  │                │  │ • authenticate │  │   (auth)     │  │         │ │
//! │  └───────┬────────┘  └───────┬────────┘  └──────┬───────┘  └─────────┘ │
//! │          └───────────────────┴──────────────────┘                       │
//! │                              │                                          │
//! │                       acme-db Database                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 3000)
//! - `DATABASE_PATH` - SQLite file (default: ./acme_dashboard.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `AUTH_SECRET` - secret for signing session tokens
//! - `SESSION_LIFETIME_SECS` - session lifetime (default: 30 days)
//! - `SECURE_COOKIES` - mark the session cookie `Secure` (default: false)

pub mod actions;
pub mod auth;
pub mod cache;
pub mod config;
pub mod data;
pub mod error;
pub mod routes;
pub mod session;

use std::sync::Arc;

use acme_db::Database;
use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

// Re-exports
pub use cache::PageCache;
pub use config::DashboardConfig;
pub use error::{ApiError, DataError};
pub use session::SessionManager;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub cache: PageCache,
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    pub fn new(db: Database, sessions: SessionManager) -> Self {
        AppState {
            db,
            cache: PageCache::new(),
            sessions: Arc::new(sessions),
        }
    }
}

/// Builds the application router with the session guard in front of every
/// route.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(routes::health))
        .route("/login", get(routes::login_page).post(routes::login))
        .route("/logout", post(routes::logout))
        .route("/dashboard", get(routes::overview))
        .route(
            "/dashboard/invoices",
            get(routes::list_invoices).post(routes::create_invoice),
        )
        .route("/dashboard/invoices/create", get(routes::create_invoice_page))
        .route("/dashboard/invoices/{id}", post(routes::update_invoice))
        .route("/dashboard/invoices/{id}/edit", get(routes::edit_invoice_page))
        .route("/dashboard/invoices/{id}/delete", post(routes::delete_invoice))
        .route("/dashboard/customers", get(routes::list_customers))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            session::require_session,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
