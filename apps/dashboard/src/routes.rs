//! # HTTP Handlers
//!
//! Page data as JSON for the GET routes, form posts for the actions.
//!
//! ## Route Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  GET  /health                          liveness + database check        │
//! │  GET  /login                           login page                       │
//! │  POST /login                           authenticate → 303 + cookie      │
//! │  POST /logout                          clear cookie → 303 /login        │
//! │  GET  /dashboard                       overview (cards, chart, latest)  │
//! │  GET  /dashboard/invoices              table + pager (cached)           │
//! │  POST /dashboard/invoices              create_invoice                   │
//! │  GET  /dashboard/invoices/create       customers for the form           │
//! │  GET  /dashboard/invoices/{id}/edit    invoice + customers              │
//! │  POST /dashboard/invoices/{id}         update_invoice                   │
//! │  POST /dashboard/invoices/{id}/delete  delete_invoice                   │
//! │  GET  /dashboard/customers             customer table                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acme_core::format::{generate_pagination, generate_y_axis};
use acme_core::validation::InvoiceFormData;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode, Uri};
use axum::response::{IntoResponse, Redirect, Response};
use axum::{Extension, Form, Json};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use crate::actions::{self, ActionOutcome, LoginForm, LoginOutcome};
use crate::data;
use crate::error::ApiError;
use crate::session::{Claims, LOGIN_PATH};
use crate::AppState;

/// `?query=&page=` on the listing pages.
///
/// `page` stays a string so a malformed value falls back to page 1 instead
/// of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub query: String,
    pub page: Option<String>,
}

impl SearchParams {
    pub fn current_page(&self) -> i64 {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .max(1)
    }
}

// =============================================================================
// Health
// =============================================================================

pub async fn health(State(state): State<AppState>) -> Response {
    let (status, body) = if state.db.health_check().await {
        (StatusCode::OK, "serving")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "not_serving")
    };

    let payload = json!({
        "status": body,
        "server_time": Utc::now().to_rfc3339(),
    });
    (status, Json(payload)).into_response()
}

// =============================================================================
// Login / Logout
// =============================================================================

pub async fn login_page() -> Json<Value> {
    Json(json!({ "title": "Log in" }))
}

pub async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    match actions::authenticate(&state.db, &state.sessions, &form).await? {
        LoginOutcome::SignedIn { session, redirect_to } => {
            let cookie = state.sessions.session_cookie(&session.token);
            Ok((
                StatusCode::SEE_OTHER,
                [(header::LOCATION, redirect_to), (header::SET_COOKIE, cookie)],
            )
                .into_response())
        }
        LoginOutcome::Rejected(message) => Ok((
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": message })),
        )
            .into_response()),
    }
}

pub async fn logout(State(state): State<AppState>) -> Response {
    (
        StatusCode::SEE_OTHER,
        [
            (header::LOCATION, LOGIN_PATH.to_string()),
            (header::SET_COOKIE, state.sessions.clear_cookie()),
        ],
    )
        .into_response()
}

// =============================================================================
// Dashboard Pages
// =============================================================================

/// Overview: cards, revenue chart and latest invoices, fetched concurrently.
pub async fn overview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Value>, ApiError> {
    let db = &state.db;
    let (cards, revenue, latest_invoices) = tokio::try_join!(
        data::fetch_card_data(db),
        data::fetch_revenue(db),
        data::fetch_latest_invoices(db),
    )?;

    let y_axis = generate_y_axis(&revenue);

    Ok(Json(json!({
        "user": { "name": claims.name, "email": claims.email },
        "cards": cards,
        "revenue": revenue,
        "y_axis": y_axis,
        "latest_invoices": latest_invoices,
    })))
}

/// Invoices table. Served from the page cache when the same path and query
/// string was rendered since the last invoice mutation.
pub async fn list_invoices(
    State(state): State<AppState>,
    uri: Uri,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let key = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    if let Some(page) = state.cache.get(&key).await {
        debug!(key = %key, "Page cache hit");
        return Ok(Json(page));
    }

    let current_page = params.current_page();
    let db = &state.db;
    let (invoices, total_pages) = tokio::try_join!(
        data::fetch_filtered_invoices(db, &params.query, current_page),
        data::fetch_invoices_pages(db, &params.query),
    )?;

    let page = json!({
        "query": params.query,
        "current_page": current_page,
        "invoices": invoices,
        "total_pages": total_pages,
        "pagination": generate_pagination(current_page, total_pages),
    });

    state.cache.insert(key, page.clone()).await;
    Ok(Json(page))
}

pub async fn create_invoice_page(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let customers = data::fetch_customers(&state.db).await?;
    Ok(Json(json!({ "customers": customers })))
}

pub async fn edit_invoice_page(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let db = &state.db;
    let (invoice, customers) = tokio::try_join!(
        data::fetch_invoice_by_id(db, &id),
        data::fetch_customers(db),
    )?;

    let invoice = invoice.ok_or(ApiError::NotFound("Invoice"))?;
    Ok(Json(json!({ "invoice": invoice, "customers": customers })))
}

pub async fn list_customers(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, ApiError> {
    let customers = data::fetch_filtered_customers(&state.db, &params.query).await?;
    Ok(Json(json!({ "query": params.query, "customers": customers })))
}

// =============================================================================
// Invoice Actions
// =============================================================================

pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceFormData>,
) -> Response {
    action_response(actions::create_invoice(&state.db, &state.cache, &form).await)
}

pub async fn update_invoice(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Form(form): Form<InvoiceFormData>,
) -> Response {
    action_response(actions::update_invoice(&state.db, &state.cache, &id, &form).await)
}

pub async fn delete_invoice(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    action_response(actions::delete_invoice(&state.db, &state.cache, &id).await)
}

/// Redirects become 303s; every other outcome is the form state as JSON.
fn action_response(outcome: ActionOutcome) -> Response {
    match outcome {
        ActionOutcome::Redirect(path) => Redirect::to(&path).into_response(),
        ActionOutcome::Completed(state) => (StatusCode::OK, Json(state)).into_response(),
        ActionOutcome::Invalid(state) => {
            (StatusCode::UNPROCESSABLE_ENTITY, Json(state)).into_response()
        }
        ActionOutcome::Failed(state) => {
            (StatusCode::INTERNAL_SERVER_ERROR, Json(state)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::FormState;

    fn params(page: Option<&str>) -> SearchParams {
        SearchParams {
            query: String::new(),
            page: page.map(str::to_string),
        }
    }

    #[test]
    fn test_current_page_defaults_and_clamps() {
        assert_eq!(params(None).current_page(), 1);
        assert_eq!(params(Some("3")).current_page(), 3);
        assert_eq!(params(Some("0")).current_page(), 1);
        assert_eq!(params(Some("-4")).current_page(), 1);
        assert_eq!(params(Some("two")).current_page(), 1);
    }

    #[test]
    fn test_action_response_status_codes() {
        let redirect = action_response(ActionOutcome::Redirect("/dashboard/invoices".into()));
        assert_eq!(redirect.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            redirect.headers().get(header::LOCATION).unwrap(),
            "/dashboard/invoices"
        );

        let invalid = action_response(ActionOutcome::Invalid(FormState::default()));
        assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let failed = action_response(ActionOutcome::Failed(FormState::default()));
        assert_eq!(failed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
