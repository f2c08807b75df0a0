//! # Validation Module
//!
//! Shape checks for the two forms the dashboard accepts: the invoice
//! create/edit form and the login form.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser                                                      │
//! │  ├── required / type=number attributes                                 │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Form action (Rust)                                           │
//! │  ├── THIS MODULE: every field checked, all errors collected            │
//! │  └── Result<ValidInvoice, FieldErrors>, no database access             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (amount > 0), CHECK (status IN ...)                         │
//! │  └── customer_id foreign key                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use acme_core::validation::{validate_invoice, InvoiceFormData};
//!
//! let form = InvoiceFormData {
//!     customer_id: Some("3958dc9e-712f-4377-85e9-fec4b6a6442a".into()),
//!     amount: Some("49.99".into()),
//!     status: Some("paid".into()),
//! };
//! let invoice = validate_invoice(&form).unwrap();
//! assert_eq!(invoice.amount.cents(), 4999);
//! ```

use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{FieldErrors, ValidationError};
use crate::money::Money;
use crate::types::InvoiceStatus;
use crate::{MAX_AMOUNT_CENTS, MIN_PASSWORD_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Invoice Form
// =============================================================================

/// Raw invoice form submission. Every field may be absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormData {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// An invoice form that passed validation, amount already in cents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidInvoice {
    pub customer_id: String,
    pub amount: Money,
    pub status: InvoiceStatus,
}

/// Validates the whole invoice form, collecting every field error.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Create Invoice                                                         │
/// │                                                                         │
/// │  customerId=""  amount="-5"  status="paid"                              │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_invoice ← THIS FUNCTION                                       │
/// │       │                                                                 │
/// │       ├── customerId → "Please select a customer."                      │
/// │       ├── amount     → "Please enter an amount greater than $0."        │
/// │       └── status     → ok                                               │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  Err(FieldErrors) → form re-renders with both messages                  │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_invoice(form: &InvoiceFormData) -> Result<ValidInvoice, FieldErrors> {
    let mut errors = FieldErrors::new();

    let customer_id = validate_customer_id(form.customer_id.as_deref())
        .map_err(|e| errors.push(e))
        .ok();
    let amount = validate_amount(form.amount.as_deref())
        .map_err(|e| errors.push(e))
        .ok();
    let status = validate_status(form.status.as_deref())
        .map_err(|e| errors.push(e))
        .ok();

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) => Ok(ValidInvoice {
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}

/// Validates the selected customer.
///
/// ## Rules
/// - Must be present and not blank
///
/// Whether the id exists is left to the foreign key.
pub fn validate_customer_id(customer_id: Option<&str>) -> ValidationResult<String> {
    match customer_id.map(str::trim) {
        Some(id) if !id.is_empty() => Ok(id.to_string()),
        _ => Err(ValidationError::CustomerRequired),
    }
}

/// Coerces the amount text to dollars and converts it to cents.
///
/// ## Rules
/// - Blank counts as zero and is rejected
/// - Must parse as a finite number greater than zero
/// - Must still be at least one cent after rounding
/// - Must not exceed [`MAX_AMOUNT_CENTS`]
///
/// ## Example
/// ```rust
/// use acme_core::validation::validate_amount;
///
/// assert_eq!(validate_amount(Some("156.78")).unwrap().cents(), 15678);
/// assert!(validate_amount(Some("0")).is_err());
/// assert!(validate_amount(Some("0.001")).is_err());
/// assert!(validate_amount(Some("abc")).is_err());
/// assert!(validate_amount(Some("1e300")).is_err());
/// ```
pub fn validate_amount(amount: Option<&str>) -> ValidationResult<Money> {
    let text = amount.map(str::trim).unwrap_or("");

    let dollars = if text.is_empty() {
        0.0
    } else {
        text.parse::<f64>()
            .map_err(|_| ValidationError::AmountNotPositive)?
    };

    if !dollars.is_finite() || dollars <= 0.0 {
        return Err(ValidationError::AmountNotPositive);
    }

    // Checked in dollars first: the cast to cents saturates
    if dollars > (MAX_AMOUNT_CENTS / 100) as f64 {
        return Err(ValidationError::AmountTooLarge);
    }

    let money = Money::from_dollars(dollars);
    if !money.is_positive() {
        return Err(ValidationError::AmountNotPositive);
    }

    Ok(money)
}

/// Validates the invoice status radio button.
///
/// ## Rules
/// - Must be exactly `pending` or `paid`
pub fn validate_status(status: Option<&str>) -> ValidationResult<InvoiceStatus> {
    status
        .ok_or(ValidationError::StatusInvalid)?
        .parse::<InvoiceStatus>()
}

// =============================================================================
// Credentials
// =============================================================================

/// Email + password submitted by the login form.
#[derive(Clone, Default, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Redacts the password so credentials can be logged safely.
impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Checks the credential envelope before any lookup happens.
///
/// ## Rules
/// - `email` must look like an address
/// - `password` must be at least [`MIN_PASSWORD_LENGTH`] characters
pub fn validate_credentials(credentials: &Credentials) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();

    if let Err(e) = validate_email(&credentials.email) {
        errors.push(e);
    }
    if let Err(e) = validate_password(&credentials.password) {
        errors.push(e);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates an email address format.
///
/// ## Example
/// ```rust
/// use acme_core::validation::validate_email;
///
/// assert!(validate_email("user@nextmail.com").is_ok());
/// assert!(validate_email("not-an-email").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<()> {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    let regex = EMAIL_REGEX.get_or_init(|| {
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
            .expect("email pattern is valid")
    });

    if regex.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Validates password length (counted in characters, not bytes).
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort {
            min: MIN_PASSWORD_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
