//! Configuration module
//!
//! Loads configuration from environment variables.

use std::env;

use crate::domain::StatusPolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Database connection URL
    pub database_url: String,

    /// Maximum database connections in pool
    pub database_max_connections: u32,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Environment (development, production)
    pub environment: String,

    /// Which status transitions reviewers may perform
    pub status_policy: StatusPolicy,

    /// Upper bound for `limit` on list endpoints
    pub max_page_limit: u32,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").ok_or(ConfigError::MissingEnv("DATABASE_URL"))?;

        let database_max_connections = lookup("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|| "10".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS"))?;

        let host = lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let port = lookup("PORT")
            .unwrap_or_else(|| "3000".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("PORT"))?;

        let environment = lookup("ENVIRONMENT").unwrap_or_else(|| "development".to_string());

        let status_policy = lookup("APPLICATION_STATUS_POLICY")
            .unwrap_or_else(|| "permissive".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("APPLICATION_STATUS_POLICY"))?;

        let max_page_limit: u32 = lookup("MAX_PAGE_LIMIT")
            .unwrap_or_else(|| "100".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("MAX_PAGE_LIMIT"))?;
        if max_page_limit == 0 {
            return Err(ConfigError::InvalidValue("MAX_PAGE_LIMIT"));
        }

        Ok(Self {
            database_url,
            database_max_connections,
            host,
            port,
            environment,
            status_policy,
            max_page_limit,
        })
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn settings(&self) -> ServiceSettings {
        ServiceSettings {
            status_policy: self.status_policy,
            max_page_limit: self.max_page_limit,
        }
    }
}

/// Runtime knobs the request handlers need
#[derive(Debug, Clone, Copy)]
pub struct ServiceSettings {
    pub status_policy: StatusPolicy,
    pub max_page_limit: u32,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            status_policy: StatusPolicy::Permissive,
            max_page_limit: 100,
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("Invalid value for environment variable: {0}")]
    InvalidValue(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[("DATABASE_URL", "postgres://localhost/hub")])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.database_max_connections, 10);
        assert_eq!(config.status_policy, StatusPolicy::Permissive);
        assert_eq!(config.max_page_limit, 100);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_database_url() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnv("DATABASE_URL")));
    }

    #[test]
    fn test_strict_policy_and_invalid_values() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/hub"),
            ("APPLICATION_STATUS_POLICY", "STRICT"),
            ("ENVIRONMENT", "production"),
        ]))
        .unwrap();
        assert_eq!(config.status_policy, StatusPolicy::Strict);
        assert!(config.is_production());

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/hub"),
            ("PORT", "not-a-port"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("PORT")));

        let err = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/hub"),
            ("MAX_PAGE_LIMIT", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue("MAX_PAGE_LIMIT")));
    }
}
