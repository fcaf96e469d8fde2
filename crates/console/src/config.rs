//! Console configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `COMBO_API_BASE_URL` - Base URL of the combo API (default: `https://tic2025.tranvu.info/api`)
//! - `COMBO_API_TOKEN` - Bearer token sent with every request
//! - `COMBO_CREATED_BY` - Identity recorded on created combos (default: `creator`)
//! - `COMBO_HTTP_TIMEOUT_SECS` - Request timeout in seconds (default: 30)

use std::time::Duration;

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Default combo API location.
pub const DEFAULT_BASE_URL: &str = "https://tic2025.tranvu.info/api";
/// Identity recorded as `created_by` when none is configured.
pub const DEFAULT_CREATED_BY: &str = "creator";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Console configuration.
#[derive(Debug, Clone)]
pub struct ConsoleConfig {
    /// Remote combo API settings
    pub api: ApiConfig,
    /// Identity recorded on combos this console creates
    pub created_by: String,
}

/// Combo API connection settings.
///
/// Implements `Debug` manually to redact the token.
#[derive(Clone)]
pub struct ApiConfig {
    /// Base URL, always ending in `/`
    pub base_url: Url,
    /// Optional bearer token
    pub token: Option<SecretString>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl std::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ApiConfig {
    /// Settings for `base_url` with no token and the default timeout.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL does not parse or is
    /// not http(s).
    pub fn new(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("COMBO_API_BASE_URL", base_url)?,
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "COMBO_API_BASE_URL",
            &get_env_or_default("COMBO_API_BASE_URL", DEFAULT_BASE_URL),
        )?;
        let token = get_optional_env("COMBO_API_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .map(SecretString::from);
        let timeout_secs =
            get_env_or_default("COMBO_HTTP_TIMEOUT_SECS", &DEFAULT_TIMEOUT_SECS.to_string())
                .parse::<u64>()
                .map_err(|e| {
                    ConfigError::InvalidEnvVar("COMBO_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
                })?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "COMBO_HTTP_TIMEOUT_SECS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        })
    }
}

impl ConsoleConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api = ApiConfig::from_env()?;
        let created_by = get_env_or_default("COMBO_CREATED_BY", DEFAULT_CREATED_BY);
        if created_by.trim().is_empty() {
            return Err(ConfigError::InvalidEnvVar(
                "COMBO_CREATED_BY".to_string(),
                "cannot be blank".to_string(),
            ));
        }

        Ok(Self { api, created_by })
    }

    /// Replace the API base URL (command-line override).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is invalid.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, ConfigError> {
        self.api.base_url = parse_base_url("--base-url", base_url)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an http(s) base URL and make sure it ends in `/` so that relative
/// endpoint paths join below it instead of replacing its last segment.
fn parse_base_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(source.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            source.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
