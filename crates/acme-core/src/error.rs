//! # Error Types
//!
//! Domain-specific error types for acme-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  acme-core errors (this file)                                          │
//! │  ├── ValidationError  - One rejected form field                        │
//! │  ├── FieldErrors      - All rejected fields, keyed by form name        │
//! │  └── CoreError        - Failures inside pure helpers (hashing)         │
//! │                                                                         │
//! │  acme-db errors (separate crate)                                       │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  acme-dashboard errors (in app)                                        │
//! │  ├── DataError        - Generic "Database Error: ..." for reads        │
//! │  ├── AuthError        - Sign-in taxonomy                               │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Validation never becomes a DbError: it is returned to the form.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Failures raised by pure helpers.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Password hashing failed (malformed salt or parameters).
    #[error("Failed to hash password: {0}")]
    PasswordHash(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single rejected input field.
///
/// The `Display` text is exactly what the form shows next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No customer was chosen in the invoice form.
    #[error("Please select a customer.")]
    CustomerRequired,

    /// Amount missing, not a number, or not above zero.
    #[error("Please enter an amount greater than $0.")]
    AmountNotPositive,

    /// Amount above [`MAX_AMOUNT_CENTS`](crate::MAX_AMOUNT_CENTS).
    #[error("Please enter an amount no greater than $1,000,000,000.")]
    AmountTooLarge,

    /// Status missing or not one of pending/paid.
    #[error("Please select an invoice status.")]
    StatusInvalid,

    /// Email does not look like an address.
    #[error("Invalid email address.")]
    InvalidEmail,

    /// Password shorter than the allowed minimum.
    #[error("Password must be at least {min} characters.")]
    PasswordTooShort { min: usize },
}

impl ValidationError {
    /// Form field this error belongs to (the name used by the HTML form).
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::CustomerRequired => "customerId",
            ValidationError::AmountNotPositive | ValidationError::AmountTooLarge => "amount",
            ValidationError::StatusInvalid => "status",
            ValidationError::InvalidEmail => "email",
            ValidationError::PasswordTooShort { .. } => "password",
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Field-keyed validation messages, serialized as `{ "amount": ["..."] }`.
///
/// Keys are the form's input names (`customerId`, `amount`, `status`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Creates an empty error set.
    pub fn new() -> Self {
        FieldErrors::default()
    }

    /// Records a rejected field.
    pub fn push(&mut self, error: ValidationError) {
        self.0
            .entry(error.field().to_string())
            .or_default()
            .push(error.to_string());
    }

    /// Returns the messages for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// True when no field was rejected.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of rejected fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<ValidationError> for FieldErrors {
    fn from(error: ValidationError) -> Self {
        let mut errors = FieldErrors::new();
        errors.push(error);
        errors
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(
            ValidationError::CustomerRequired.to_string(),
            "Please select a customer."
        );
        assert_eq!(
            ValidationError::AmountNotPositive.to_string(),
            "Please enter an amount greater than $0."
        );
        assert_eq!(ValidationError::AmountTooLarge.field(), "amount");
        assert_eq!(
            ValidationError::PasswordTooShort { min: 6 }.to_string(),
            "Password must be at least 6 characters."
        );
    }

    #[test]
    fn test_field_errors_group_by_field() {
        let mut errors = FieldErrors::new();
        errors.push(ValidationError::AmountNotPositive);
        errors.push(ValidationError::StatusInvalid);

        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("amount"),
            Some(&["Please enter an amount greater than $0.".to_string()][..])
        );
        assert!(errors.get("customerId").is_none());
    }

    #[test]
    fn test_field_errors_serialize_as_map() {
        let errors = FieldErrors::from(ValidationError::CustomerRequired);
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "customerId": ["Please select a customer."] })
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::InvalidEmail.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
