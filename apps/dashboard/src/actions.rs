//! # Form Actions
//!
//! The invoice mutations and the login action. Actions never return an
//! error for bad input or a failed write: they return a [`FormState`] the
//! form can render, or a redirect.
//!
//! ## Action Outcomes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  create_invoice / update_invoice                                       │
//! │       │                                                                 │
//! │       ├── validation fails ──► Invalid(FormState { errors, message })  │
//! │       ├── write fails      ──► Failed(FormState { message })           │
//! │       └── written          ──► revalidate cache ──► Redirect(invoices) │
//! │                                                                         │
//! │  delete_invoice                                                        │
//! │       ├── write fails      ──► Failed("Database Error: …")             │
//! │       └── deleted          ──► revalidate cache ──► Completed(message) │
//! │                                                                         │
//! │  authenticate                                                          │
//! │       ├── CredentialsSignin ──► Rejected("Invalid credentials.")       │
//! │       ├── other AuthError   ──► Rejected("Something went wrong.")      │
//! │       ├── token signing     ──► Err(SessionError::Token)               │
//! │       └── signed in         ──► SignedIn { session, redirect_to }      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acme_core::validation::{validate_invoice, Credentials, InvoiceFormData};
use acme_core::{new_id, FieldErrors, Invoice};
use acme_db::Database;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::cache::PageCache;
use crate::session::{AuthError, Session, SessionError, SessionManager, DASHBOARD_PATH};

/// Listing every invoice mutation invalidates and redirects to.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

// =============================================================================
// Form State
// =============================================================================

/// What a form shows after a submission that did not redirect.
///
/// ## Serialization
/// ```json
/// {
///   "errors": { "amount": ["Please enter an amount greater than $0."] },
///   "message": "Missing Fields. Failed to Create Invoice."
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FormState {
    #[serde(skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    pub message: Option<String>,
}

impl FormState {
    pub fn message(message: impl Into<String>) -> Self {
        FormState {
            errors: FieldErrors::new(),
            message: Some(message.into()),
        }
    }

    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        FormState {
            errors,
            message: Some(message.into()),
        }
    }
}

/// Result of an invoice action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    /// Success; navigate to this path.
    Redirect(String),
    /// Success without navigation.
    Completed(FormState),
    /// The submission did not validate; nothing was written.
    Invalid(FormState),
    /// The write failed.
    Failed(FormState),
}

// =============================================================================
// Invoice Actions
// =============================================================================

/// Validates the form and inserts a new invoice dated today (UTC).
pub async fn create_invoice(
    db: &Database,
    cache: &PageCache,
    form: &InvoiceFormData,
) -> ActionOutcome {
    let valid = match validate_invoice(form) {
        Ok(valid) => valid,
        Err(errors) => {
            return ActionOutcome::Invalid(FormState::invalid(
                errors,
                "Missing Fields. Failed to Create Invoice.",
            ))
        }
    };

    let invoice = Invoice {
        id: new_id(),
        customer_id: valid.customer_id,
        amount: valid.amount.cents(),
        status: valid.status,
        date: Utc::now().date_naive(),
    };

    if let Err(e) = db.invoices().insert(&invoice).await {
        error!(error = %e, "Failed to create invoice");
        return ActionOutcome::Failed(FormState::message(
            "Database Error: Failed to Create Invoice.",
        ));
    }

    info!(id = %invoice.id, amount = invoice.amount, "Invoice created");
    cache.revalidate_path(INVOICES_PATH).await;
    ActionOutcome::Redirect(INVOICES_PATH.to_string())
}

/// Validates the form and rewrites customer, amount and status of invoice `id`.
///
/// An unknown `id` is reported as a failed write.
pub async fn update_invoice(
    db: &Database,
    cache: &PageCache,
    id: &str,
    form: &InvoiceFormData,
) -> ActionOutcome {
    let valid = match validate_invoice(form) {
        Ok(valid) => valid,
        Err(errors) => {
            return ActionOutcome::Invalid(FormState::invalid(
                errors,
                "Missing Fields. Failed to Update Invoice.",
            ))
        }
    };

    let result = db
        .invoices()
        .update(id, &valid.customer_id, valid.amount.cents(), valid.status)
        .await;

    if let Err(e) = result {
        error!(id = %id, error = %e, "Failed to update invoice");
        return ActionOutcome::Failed(FormState::message(
            "Database Error: Failed to Update Invoice.",
        ));
    }

    info!(id = %id, "Invoice updated");
    cache.revalidate_path(INVOICES_PATH).await;
    ActionOutcome::Redirect(INVOICES_PATH.to_string())
}

/// Deletes invoice `id`. Deleting an id that does not exist still succeeds.
pub async fn delete_invoice(db: &Database, cache: &PageCache, id: &str) -> ActionOutcome {
    match db.invoices().delete(id).await {
        Ok(removed) => {
            info!(id = %id, removed, "Invoice deleted");
            cache.revalidate_path(INVOICES_PATH).await;
            ActionOutcome::Completed(FormState::message("Deleted Invoice."))
        }
        Err(e) => {
            error!(id = %id, error = %e, "Failed to delete invoice");
            ActionOutcome::Failed(FormState::message(
                "Database Error: Failed to Delete Invoice.",
            ))
        }
    }
}

// =============================================================================
// Login
// =============================================================================

/// Login form body.
#[derive(Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, rename = "redirectTo")]
    pub redirect_to: Option<String>,
}

impl std::fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("redirect_to", &self.redirect_to)
            .finish()
    }
}

impl LoginForm {
    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }

    /// Where to go after signing in. Only same-site absolute paths are
    /// honoured; anything else falls back to the dashboard.
    pub fn redirect_target(&self) -> String {
        match self.redirect_to.as_deref() {
            Some(target) if target.starts_with('/') && !target.starts_with("//") => {
                target.to_string()
            }
            _ => DASHBOARD_PATH.to_string(),
        }
    }
}

/// Result of a login attempt that did not hit an internal error.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    SignedIn { session: Session, redirect_to: String },
    Rejected(String),
}

/// Signs the user in, wording authentication failures for the login form.
///
/// ## Errors
/// * `SessionError::Token` - The session token could not be signed
pub async fn authenticate(
    db: &Database,
    sessions: &SessionManager,
    form: &LoginForm,
) -> Result<LoginOutcome, SessionError> {
    match sessions.sign_in(db, &form.credentials()).await {
        Ok(session) => Ok(LoginOutcome::SignedIn {
            session,
            redirect_to: form.redirect_target(),
        }),
        Err(SessionError::Auth(AuthError::CredentialsSignin)) => {
            Ok(LoginOutcome::Rejected("Invalid credentials.".to_string()))
        }
        Err(SessionError::Auth(_)) => {
            Ok(LoginOutcome::Rejected("Something went wrong.".to_string()))
        }
        Err(e) => Err(e),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use acme_core::password::hash_password;
    use acme_core::{Customer, InvoiceStatus, User};
    use acme_db::DbConfig;
    use chrono::NaiveDate;
    use serde_json::json;

    async fn test_db() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers()
            .insert(&Customer {
                id: "c1".into(),
                name: "Delba de Oliveira".into(),
                email: "delba@oliveira.com".into(),
                image_url: "/customers/delba-de-oliveira.png".into(),
            })
            .await
            .unwrap();
        db
    }

    fn form(customer_id: &str, amount: &str, status: &str) -> InvoiceFormData {
        InvoiceFormData {
            customer_id: Some(customer_id.into()),
            amount: Some(amount.into()),
            status: Some(status.into()),
        }
    }

    #[tokio::test]
    async fn test_create_invoice_stores_cents_and_today() {
        let db = test_db().await;
        let cache = PageCache::new();
        cache.insert("/dashboard/invoices?page=1", json!({})).await;

        let outcome = create_invoice(&db, &cache, &form("c1", "157.95", "pending")).await;
        assert_eq!(outcome, ActionOutcome::Redirect("/dashboard/invoices".into()));
        assert!(cache.is_empty().await);

        let rows = db.invoices().filtered("", 1).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].amount, 15795);
        assert_eq!(rows[0].status, InvoiceStatus::Pending);
        assert_eq!(rows[0].date, Utc::now().date_naive());
    }

    #[tokio::test]
    async fn test_create_invoice_collects_field_errors() {
        let db = test_db().await;
        let cache = PageCache::new();

        let outcome = create_invoice(&db, &cache, &InvoiceFormData::default()).await;
        let ActionOutcome::Invalid(state) = outcome else {
            panic!("expected Invalid, got {:?}", outcome);
        };
        assert_eq!(state.message.as_deref(), Some("Missing Fields. Failed to Create Invoice."));
        assert_eq!(state.errors.len(), 3);
        assert_eq!(
            state.errors.get("customerId"),
            Some(&["Please select a customer.".to_string()][..])
        );
        assert_eq!(db.invoices().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_invoice_rejects_oversized_amount() {
        let db = test_db().await;
        let cache = PageCache::new();

        for _ in 0..2 {
            let outcome = create_invoice(&db, &cache, &form("c1", "1e300", "paid")).await;
            let ActionOutcome::Invalid(state) = outcome else {
                panic!("expected Invalid, got {:?}", outcome);
            };
            assert_eq!(
                state.errors.get("amount"),
                Some(&["Please enter an amount no greater than $1,000,000,000.".to_string()][..])
            );
        }
        assert_eq!(db.invoices().count().await.unwrap(), 0);

        let cards = crate::data::fetch_card_data(&db).await.unwrap();
        assert_eq!(cards.number_of_invoices, 0);
    }

    #[tokio::test]
    async fn test_create_invoice_unknown_customer_is_database_error() {
        let db = test_db().await;
        let cache = PageCache::new();

        let outcome = create_invoice(&db, &cache, &form("nobody", "10", "paid")).await;
        assert_eq!(
            outcome,
            ActionOutcome::Failed(FormState::message("Database Error: Failed to Create Invoice."))
        );
    }

    #[tokio::test]
    async fn test_update_invoice() {
        let db = test_db().await;
        let cache = PageCache::new();
        db.invoices()
            .insert(&Invoice {
                id: "i1".into(),
                customer_id: "c1".into(),
                amount: 100,
                status: InvoiceStatus::Pending,
                date: NaiveDate::from_ymd_opt(2022, 12, 6).unwrap(),
            })
            .await
            .unwrap();

        let outcome = update_invoice(&db, &cache, "i1", &form("c1", "20.5", "paid")).await;
        assert_eq!(outcome, ActionOutcome::Redirect("/dashboard/invoices".into()));

        let invoice = db.invoices().get_by_id("i1").await.unwrap().unwrap();
        assert_eq!(invoice.amount, 2050);
        assert_eq!(invoice.status, InvoiceStatus::Paid);
        assert_eq!(invoice.date, NaiveDate::from_ymd_opt(2022, 12, 6).unwrap());

        let missing = update_invoice(&db, &cache, "missing", &form("c1", "1", "paid")).await;
        assert_eq!(
            missing,
            ActionOutcome::Failed(FormState::message("Database Error: Failed to Update Invoice."))
        );

        let invalid = update_invoice(&db, &cache, "i1", &form("c1", "0", "paid")).await;
        assert!(matches!(invalid, ActionOutcome::Invalid(ref s)
            if s.message.as_deref() == Some("Missing Fields. Failed to Update Invoice.")));
    }

    #[tokio::test]
    async fn test_delete_invoice() {
        let db = test_db().await;
        let cache = PageCache::new();
        cache.insert("/dashboard/invoices", json!({})).await;

        let outcome = delete_invoice(&db, &cache, "whatever").await;
        assert_eq!(outcome, ActionOutcome::Completed(FormState::message("Deleted Invoice.")));
        assert!(cache.is_empty().await);

        db.close().await;
        let failed = delete_invoice(&db, &cache, "whatever").await;
        assert_eq!(
            failed,
            ActionOutcome::Failed(FormState::message("Database Error: Failed to Delete Invoice."))
        );
    }

    #[test]
    fn test_form_state_serialization() {
        let state = FormState::message("Deleted Invoice.");
        assert_eq!(
            serde_json::to_value(&state).unwrap(),
            json!({ "message": "Deleted Invoice." })
        );
    }

    #[test]
    fn test_redirect_target() {
        let mut form = LoginForm::default();
        assert_eq!(form.redirect_target(), "/dashboard");

        form.redirect_to = Some("/dashboard/invoices".into());
        assert_eq!(form.redirect_target(), "/dashboard/invoices");

        form.redirect_to = Some("//evil.example".into());
        assert_eq!(form.redirect_target(), "/dashboard");

        form.redirect_to = Some("https://evil.example".into());
        assert_eq!(form.redirect_target(), "/dashboard");
    }

    async fn db_with_user() -> Database {
        let db = test_db().await;
        db.users()
            .insert(&User {
                id: "u1".into(),
                name: "User".into(),
                email: "user@nextmail.com".into(),
                password: hash_password("123456").unwrap(),
            })
            .await
            .unwrap();
        db
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: email.into(),
            password: password.into(),
            redirect_to: None,
        }
    }

    #[tokio::test]
    async fn test_authenticate() {
        let db = db_with_user().await;
        let sessions = SessionManager::new("test-secret", 3600, false);

        let outcome = authenticate(&db, &sessions, &login("user@nextmail.com", "123456"))
            .await
            .unwrap();
        let LoginOutcome::SignedIn { session, redirect_to } = outcome else {
            panic!("expected SignedIn");
        };
        assert_eq!(session.claims.email, "user@nextmail.com");
        assert_eq!(redirect_to, "/dashboard");

        let rejected = authenticate(&db, &sessions, &login("user@nextmail.com", "wrong-password"))
            .await
            .unwrap();
        assert!(matches!(rejected, LoginOutcome::Rejected(ref m) if m == "Invalid credentials."));
    }

    #[tokio::test]
    async fn test_authenticate_lookup_failure() {
        let db = db_with_user().await;
        db.close().await;
        let sessions = SessionManager::new("test-secret", 3600, false);

        let outcome = authenticate(&db, &sessions, &login("user@nextmail.com", "123456"))
            .await
            .unwrap();
        assert!(matches!(outcome, LoginOutcome::Rejected(ref m) if m == "Something went wrong."));
    }
}
