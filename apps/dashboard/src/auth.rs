//! # Credentials Check
//!
//! The `authorize` callback behind sign-in: shape check, user lookup,
//! password comparison.
//!
//! ```text
//! Credentials { email, password }
//!      │
//!      ├── invalid email / password < 6 chars ──► None
//!      ▼
//! users WHERE email = ? ── lookup fails ──► Err(DataError::User)
//!      │
//!      ├── no row ──────────────────────────────► None
//!      ▼
//! argon2 verify ── mismatch ───────────────────► None
//!      │
//!      ▼
//! Some(User)
//! ```

use acme_core::password::verify_password;
use acme_core::validation::{validate_credentials, Credentials};
use acme_core::User;
use acme_db::Database;
use tracing::{debug, warn};

use crate::error::DataError;

/// Returns the user only when the credentials are well formed, the email is
/// known and the password matches.
pub async fn authorize(db: &Database, credentials: &Credentials) -> Result<Option<User>, DataError> {
    if let Err(errors) = validate_credentials(credentials) {
        debug!(fields = errors.len(), "Rejected malformed credentials");
        return Ok(None);
    }

    let user = db
        .users()
        .get_by_email(&credentials.email)
        .await
        .map_err(|e| DataError::User.caused_by(e))?;

    let Some(user) = user else {
        warn!(email = %credentials.email, "Sign-in for unknown email");
        return Ok(None);
    };

    if verify_password(&credentials.password, &user.password) {
        Ok(Some(user))
    } else {
        warn!(email = %credentials.email, "Sign-in with wrong password");
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use acme_core::password::hash_password;
    use acme_db::DbConfig;

    async fn db_with_user() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
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

    fn creds(email: &str, password: &str) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn test_authorize_accepts_matching_password() {
        let db = db_with_user().await;
        let user = authorize(&db, &creds("user@nextmail.com", "123456"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.id, "u1");
    }

    #[tokio::test]
    async fn test_authorize_rejects_wrong_password_and_unknown_email() {
        let db = db_with_user().await;
        assert!(authorize(&db, &creds("user@nextmail.com", "654321")).await.unwrap().is_none());
        assert!(authorize(&db, &creds("nobody@nextmail.com", "123456")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authorize_rejects_malformed_credentials() {
        let db = db_with_user().await;
        assert!(authorize(&db, &creds("not-an-email", "123456")).await.unwrap().is_none());
        assert!(authorize(&db, &creds("user@nextmail.com", "123")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_authorize_lookup_failure_is_data_error() {
        let db = db_with_user().await;
        db.close().await;

        let err = authorize(&db, &creds("user@nextmail.com", "123456")).await.unwrap_err();
        assert_eq!(err, DataError::User);
    }
}
