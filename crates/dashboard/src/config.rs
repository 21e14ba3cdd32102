//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_API_URL` - Base URL of the catalog API (default: http://127.0.0.1:3000)
//! - `VITRINE_PAGE_SIZE` - Products per listing page (default: 12)
//! - `VITRINE_REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)

use std::time::Duration;

use thiserror::Error;
use url::Url;
use vitrine_core::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

const DEFAULT_API_URL: &str = "http://127.0.0.1:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Dashboard client configuration.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    /// Base URL of the catalog API
    pub api_url: Url,
    /// Products per listing page
    pub page_size: u32,
    /// Timeout applied to every HTTP request
    pub request_timeout: Duration,
}

impl DashboardConfig {
    /// Configuration pointing at `api_url` with default paging and timeout.
    #[must_use]
    pub const fn new(api_url: Url) -> Self {
        Self {
            api_url,
            page_size: DEFAULT_PAGE_SIZE,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| get(key).filter(|v| !v.trim().is_empty());

        let raw_url = get("VITRINE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(raw_url.trim())
            .map_err(|e| ConfigError::InvalidEnvVar("VITRINE_API_URL".to_string(), e.to_string()))?;
        if !matches!(api_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_API_URL".to_string(),
                format!("unsupported scheme {}", api_url.scheme()),
            ));
        }

        let page_size = match get("VITRINE_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|size| (1..=MAX_PAGE_SIZE).contains(size))
                .ok_or_else(|| {
                    ConfigError::InvalidEnvVar(
                        "VITRINE_PAGE_SIZE".to_string(),
                        format!("expected an integer between 1 and {MAX_PAGE_SIZE}, got {raw}"),
                    )
                })?,
            None => DEFAULT_PAGE_SIZE,
        };

        let timeout_secs = match get("VITRINE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                ConfigError::InvalidEnvVar(
                    "VITRINE_REQUEST_TIMEOUT_SECS".to_string(),
                    e.to_string(),
                )
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            page_size,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<DashboardConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        DashboardConfig::from_vars(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:3000/");
        assert_eq!(config.page_size, 12);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("VITRINE_API_URL", "https://catalog.example.com/base/"),
            ("VITRINE_PAGE_SIZE", "24"),
            ("VITRINE_REQUEST_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.api_url.host_str(), Some("catalog.example.com"));
        assert_eq!(config.page_size, 24);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(load(&[("VITRINE_API_URL", "not a url")]).is_err());
        assert!(load(&[("VITRINE_API_URL", "ftp://files.example.com")]).is_err());
        assert!(load(&[("VITRINE_PAGE_SIZE", "0")]).is_err());
        assert!(load(&[("VITRINE_PAGE_SIZE", "101")]).is_err());
        assert!(load(&[("VITRINE_REQUEST_TIMEOUT_SECS", "soon")]).is_err());
    }
}
