//! Dashboard configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use std::env;

/// Dashboard server configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// HTTP listen port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub db_max_connections: u32,

    /// Secret key for signing session tokens
    pub auth_secret: String,

    /// Session lifetime in seconds
    pub session_lifetime_secs: i64,

    /// Add `Secure` to the session cookie (HTTPS deployments)
    pub secure_cookies: bool,
}

impl DashboardConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to its
    /// value if set.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let config = DashboardConfig {
            http_port: var("HTTP_PORT", "3000")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: var("DATABASE_PATH", "./acme_dashboard.db"),

            db_max_connections: var("DB_MAX_CONNECTIONS", "5")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            // In production, this MUST be set via environment variable
            auth_secret: var("AUTH_SECRET", "acme-dashboard-dev-secret-change-in-production"),

            session_lifetime_secs: var("SESSION_LIFETIME_SECS", "2592000") // 30 days
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SESSION_LIFETIME_SECS".to_string()))?,

            secure_cookies: var("SECURE_COOKIES", "false")
                .parse()
                .map_err(|_| ConfigError::InvalidValue("SECURE_COOKIES".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }
        if config.session_lifetime_secs <= 0 {
            return Err(ConfigError::InvalidValue("SESSION_LIFETIME_SECS".to_string()));
        }
        if config.auth_secret.is_empty() {
            return Err(ConfigError::MissingRequired("AUTH_SECRET".to_string()));
        }

        Ok(config)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.http_port, 3000);
        assert_eq!(config.database_path, "./acme_dashboard.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.session_lifetime_secs, 2_592_000);
        assert!(!config.secure_cookies);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("HTTP_PORT", "8080"),
            ("DATABASE_PATH", "/var/lib/acme.db"),
            ("SECURE_COOKIES", "true"),
        ]))
        .unwrap();
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_path, "/var/lib/acme.db");
        assert!(config.secure_cookies);
    }

    #[test]
    fn test_invalid_values() {
        let err = DashboardConfig::from_lookup(lookup(&[("HTTP_PORT", "http")])).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for HTTP_PORT");

        assert!(DashboardConfig::from_lookup(lookup(&[("SESSION_LIFETIME_SECS", "0")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(DashboardConfig::from_lookup(lookup(&[("AUTH_SECRET", "")])).is_err());
    }
}
