//! services/dashboard/src/config.rs
//!
//! Defines the dashboard's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::time::Duration;
use tracing::Level;

pub const DEFAULT_API_URL: &str = "http://localhost:5000/api/v1";

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub log_level: Level,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    pub therapist_email: Option<String>,
    pub therapist_password: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup("API_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::InvalidValue(
                "API_URL".to_string(),
                format!("'{}' must start with http:// or https://", api_url),
            ));
        }

        let log_level_str = lookup("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let request_timeout = match lookup("API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| {
                    ConfigError::InvalidValue("API_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        // --- Credentials (optional; the CLI can also take them as flags) ---
        let therapist_email = lookup("THERAPIST_EMAIL");
        let therapist_password = lookup("THERAPIST_PASSWORD");

        Ok(Self {
            api_url,
            log_level,
            request_timeout,
            therapist_email,
            therapist_password,
        })
    }

    /// Both login credentials, or `MissingVar` naming the first absent one.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let email = self
            .therapist_email
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("THERAPIST_EMAIL".to_string()))?;
        let password = self
            .therapist_password
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar("THERAPIST_PASSWORD".to_string()))?;
        Ok((email, password))
    }
}
