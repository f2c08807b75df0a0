//! # Sessions
//!
//! Signed session tokens (HS256 JWT) carried in an HttpOnly cookie, and the
//! route guard that reads them.
//!
//! ## Sign-in Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  POST /login (email, password, redirectTo)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SessionManager::sign_in                                               │
//! │       ├── auth::authorize → None      ──► AuthError::CredentialsSignin  │
//! │       ├── auth::authorize → Err       ──► AuthError::CallbackRoute      │
//! │       └── Some(user) → issue token    ──► Session { token, claims }     │
//! │                 │ (signing failure    ──► SessionError::Token)          │
//! │                 ▼                                                       │
//! │  Set-Cookie: session=<jwt>; HttpOnly; SameSite=Lax; Path=/             │
//! │                                                                         │
//! │  Every later request                                                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  require_session (middleware)                                          │
//! │       ├── /dashboard*, no valid session ──► 303 /login                 │
//! │       ├── /login, valid session         ──► 303 /dashboard             │
//! │       └── otherwise                     ──► handler (claims attached)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use acme_core::validation::Credentials;
use acme_core::User;
use acme_db::Database;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::authorize;
use crate::config::DashboardConfig;
use crate::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// Where anonymous dashboard requests are sent.
pub const LOGIN_PATH: &str = "/login";

/// Where signed-in users land by default.
pub const DASHBOARD_PATH: &str = "/dashboard";

// =============================================================================
// Errors
// =============================================================================

/// Sign-in and session failures the login form knows how to word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// Credentials were well formed but did not match a user.
    #[error("CredentialsSignin")]
    CredentialsSignin,

    /// The credentials check itself failed (e.g. user lookup error).
    #[error("CallbackRouteError")]
    CallbackRoute,

    /// Token missing, tampered with or expired.
    #[error("Invalid session: {0}")]
    InvalidSession(String),
}

/// Everything `sign_in` can fail with.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Not an authentication failure; propagated to the caller as-is.
    #[error("Failed to sign session token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

// =============================================================================
// Claims & Session
// =============================================================================

/// JWT claims structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Display name
    pub name: String,

    pub email: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,

    /// JWT ID (unique identifier for this token)
    pub jti: String,
}

/// A freshly issued session.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub claims: Claims,
}

// =============================================================================
// Session Manager
// =============================================================================

/// Issues and validates session tokens.
pub struct SessionManager {
    secret: String,
    lifetime_secs: i64,
    secure_cookies: bool,
}

impl SessionManager {
    /// Create a new session manager.
    pub fn new(secret: impl Into<String>, lifetime_secs: i64, secure_cookies: bool) -> Self {
        SessionManager {
            secret: secret.into(),
            lifetime_secs,
            secure_cookies,
        }
    }

    pub fn from_config(config: &DashboardConfig) -> Self {
        SessionManager::new(
            config.auth_secret.clone(),
            config.session_lifetime_secs,
            config.secure_cookies,
        )
    }

    /// Checks credentials and issues a session for the matching user.
    pub async fn sign_in(
        &self,
        db: &Database,
        credentials: &Credentials,
    ) -> Result<Session, SessionError> {
        let user = match authorize(db, credentials).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(AuthError::CredentialsSignin.into()),
            Err(_) => return Err(AuthError::CallbackRoute.into()),
        };

        let session = self.issue(&user)?;
        info!(user_id = %user.id, "User signed in");
        Ok(session)
    }

    /// Signs a token for `user`.
    pub fn issue(&self, user: &User) -> Result<Session, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(Session { token, claims })
    }

    /// Validate and decode a token.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| AuthError::InvalidSession(e.to_string()))?;

        Ok(token_data.claims)
    }

    /// `Set-Cookie` value carrying `token`.
    pub fn session_cookie(&self, token: &str) -> String {
        let mut cookie = format!(
            "{}={}; HttpOnly; SameSite=Lax; Path=/; Max-Age={}",
            SESSION_COOKIE, token, self.lifetime_secs
        );
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// `Set-Cookie` value that removes the session.
    pub fn clear_cookie(&self) -> String {
        let mut cookie = format!("{}=; HttpOnly; SameSite=Lax; Path=/; Max-Age=0", SESSION_COOKIE);
        if self.secure_cookies {
            cookie.push_str("; Secure");
        }
        cookie
    }

    /// Claims of the request's session cookie, if it holds a valid token.
    pub fn claims_from_headers(&self, headers: &HeaderMap) -> Option<Claims> {
        let token = token_from_headers(headers)?;
        match self.validate(&token) {
            Ok(claims) => Some(claims),
            Err(e) => {
                debug!(error = %e, "Ignoring session cookie");
                None
            }
        }
    }
}

/// Extracts the session token from the request's `Cookie` headers.
pub fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, value)| *name == SESSION_COOKIE && !value.is_empty())
        .map(|(_, value)| value.to_string())
}

// =============================================================================
// Route Guard
// =============================================================================

/// Keeps anonymous users out of `/dashboard` and signed-in users off `/login`.
///
/// Valid claims are attached to the request as an extension.
pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let claims = state.sessions.claims_from_headers(request.headers());
    let path = request.uri().path().to_owned();
    let is_on_dashboard = path == DASHBOARD_PATH || path.starts_with("/dashboard/");

    match claims {
        None if is_on_dashboard => {
            debug!(path = %path, "Anonymous request, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        Some(_) if path == LOGIN_PATH => Redirect::to(DASHBOARD_PATH).into_response(),
        Some(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        None => next.run(request).await,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
