//! Configuration loading and management

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Deployment mode
///
/// Production refuses to start without an explicit signing secret;
/// development falls back to a built-in one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Mount every route under this prefix (e.g. "/api"); empty for root
    #[serde(default)]
    pub path_prefix: String,
    /// Origin allowed to make credentialed cross-origin requests
    #[serde(default = "default_allow_origin")]
    pub allow_origin: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            port: default_port(),
            path_prefix: String::new(),
            allow_origin: default_allow_origin(),
        }
    }
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Session token signing secret; required in production mode
    #[serde(default)]
    pub jwt_secret: Option<String>,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: i64,
    /// Cookie security policy: "same-origin" or "cross-origin"
    #[serde(default = "default_cookie_policy")]
    pub cookie_policy: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            token_ttl_secs: default_token_ttl_secs(),
            cookie_policy: default_cookie_policy(),
        }
    }
}

/// Account policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountsConfig {
    /// Balance granted to every new account
    #[serde(default = "default_initial_balance")]
    pub initial_balance: i64,
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            initial_balance: default_initial_balance(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

// Default value functions
fn default_bind_address() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4000
}

fn default_allow_origin() -> String {
    "http://localhost:5173".to_string()
}

fn default_db_path() -> String {
    "./data/teller.db".to_string()
}

fn default_token_ttl_secs() -> i64 {
    3600
}

fn default_cookie_policy() -> String {
    "same-origin".to_string()
}

fn default_initial_balance() -> i64 {
    100_000
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &str) -> Result<Self> {
        let config_path = Path::new(path);

        if !config_path.exists() {
            info!("Config file not found at {}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path))?;

        info!("Loaded configuration from {}", path);
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_development_grade() {
        let config = Config::default();
        assert_eq!(config.mode, Mode::Development);
        assert_eq!(config.server.port, 4000);
        assert_eq!(config.auth.token_ttl_secs, 3600);
        assert_eq!(config.auth.cookie_policy, "same-origin");
        assert_eq!(config.accounts.initial_balance, 100_000);
        assert!(config.auth.jwt_secret.is_none());
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            mode = "production"

            [server]
            port = 8080
            path_prefix = "/api"

            [auth]
            jwt_secret = "s3cret"
            cookie_policy = "cross-origin"
            "#,
        )
        .unwrap();

        assert_eq!(config.mode, Mode::Production);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.path_prefix, "/api");
        assert_eq!(config.auth.jwt_secret.as_deref(), Some("s3cret"));
        assert_eq!(config.auth.cookie_policy, "cross-origin");
        // Untouched sections keep their defaults
        assert_eq!(config.database.path, "./data/teller.db");
        assert_eq!(config.accounts.initial_balance, 100_000);
    }
}
