//! API server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `VITRINE_HOST` - Bind address (default: 127.0.0.1)
//! - `VITRINE_PORT` - Listen port (default: 3000)
//! - `VITRINE_LATENCY_MIN_MS` - Lower bound of simulated latency (default: 300)
//! - `VITRINE_LATENCY_MAX_MS` - Upper bound of simulated latency (default: 600)
//! - `VITRINE_DEFAULT_PAGE_SIZE` - Page size when `limit` is absent (default: 12)
//! - `VITRINE_MAX_PAGE_SIZE` - Largest accepted `limit` (default: 100)
//! - `VITRINE_SEED_FILE` - JSON array of products replacing the built-in catalog
//! - `VITRINE_CORS_ORIGIN` - Allowed CORS origin (any origin when unset)
//! - `VITRINE_LOG_FORMAT` - `text` or `json` (default: text)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Traces sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected text or json, got {other}")),
        }
    }
}

/// Bounds of the artificial delay added to every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyConfig {
    pub min: Duration,
    pub max: Duration,
}

impl LatencyConfig {
    /// No delay at all. Used by tests.
    pub const NONE: Self = Self {
        min: Duration::ZERO,
        max: Duration::ZERO,
    };

    /// The same range scaled down to a third, used for lightweight endpoints.
    #[must_use]
    pub fn third(self) -> Self {
        Self {
            min: self.min / 3,
            max: self.max / 3,
        }
    }
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(300),
            max: Duration::from_millis(600),
        }
    }
}

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Simulated latency range
    pub latency: LatencyConfig,
    /// Page size used when a listing request has no `limit`
    pub default_page_size: u32,
    /// Largest `limit` accepted
    pub max_page_size: u32,
    /// Products loaded instead of the built-in seed catalog
    pub seed_file: Option<PathBuf>,
    /// Allowed CORS origin
    pub cors_origin: Option<String>,
    pub log_format: LogFormat,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g., "development", "staging", "production")
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate (0.0 to 1.0)
    pub sentry_sample_rate: f32,
    /// Sentry traces sample rate for performance monitoring (0.0 to 1.0)
    pub sentry_traces_sample_rate: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            latency: LatencyConfig::default(),
            default_page_size: vitrine_core::DEFAULT_PAGE_SIZE,
            max_page_size: vitrine_core::MAX_PAGE_SIZE,
            seed_file: None,
            cors_origin: None,
            log_format: LogFormat::Text,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        }
    }
}

impl ApiConfig {
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
        let defaults = Self::default();

        let host = parse_or(&get, "VITRINE_HOST", defaults.host)?;
        let port = parse_or(&get, "VITRINE_PORT", defaults.port)?;

        let min_ms = parse_or(&get, "VITRINE_LATENCY_MIN_MS", 300_u64)?;
        let max_ms = parse_or(&get, "VITRINE_LATENCY_MAX_MS", 600_u64)?;
        if min_ms > max_ms {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_LATENCY_MIN_MS".to_string(),
                format!("must not exceed VITRINE_LATENCY_MAX_MS ({max_ms})"),
            ));
        }

        let default_page_size =
            parse_or(&get, "VITRINE_DEFAULT_PAGE_SIZE", defaults.default_page_size)?;
        let max_page_size = parse_or(&get, "VITRINE_MAX_PAGE_SIZE", defaults.max_page_size)?;
        if default_page_size == 0 || default_page_size > max_page_size {
            return Err(ConfigError::InvalidEnvVar(
                "VITRINE_DEFAULT_PAGE_SIZE".to_string(),
                format!("must be between 1 and VITRINE_MAX_PAGE_SIZE ({max_page_size})"),
            ));
        }

        let log_format = get_optional(&get, "VITRINE_LOG_FORMAT")
            .map(|raw| {
                raw.parse::<LogFormat>().map_err(|e| {
                    ConfigError::InvalidEnvVar("VITRINE_LOG_FORMAT".to_string(), e)
                })
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            host,
            port,
            latency: LatencyConfig {
                min: Duration::from_millis(min_ms),
                max: Duration::from_millis(max_ms),
            },
            default_page_size,
            max_page_size,
            seed_file: get_optional(&get, "VITRINE_SEED_FILE").map(PathBuf::from),
            cors_origin: get_optional(&get, "VITRINE_CORS_ORIGIN"),
            log_format,
            sentry_dsn: get_optional(&get, "SENTRY_DSN"),
            sentry_environment: get_optional(&get, "SENTRY_ENVIRONMENT"),
            sentry_sample_rate: get_optional(&get, "SENTRY_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sentry_sample_rate),
            sentry_traces_sample_rate: get_optional(&get, "SENTRY_TRACES_SAMPLE_RATE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.sentry_traces_sample_rate),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional variable, treating empty values as unset.
fn get_optional(get: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    get(key).filter(|v| !v.trim().is_empty())
}

/// Parse a variable, falling back to `default` when unset.
fn parse_or<T>(
    get: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get_optional(get, key).map_or(Ok(default), |raw| {
        raw.trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
