//! CLI command implementations.

pub mod bulk;
pub mod products;

use thiserror::Error;
use vitrine_dashboard::{ConfigError, DashboardConfig, ProductService, ServiceError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    /// The command was given nothing to do.
    #[error("{0}")]
    InvalidArguments(String),

    /// A fetch failed; the store recorded the message.
    #[error("{0}")]
    Request(String),

    /// A bulk operation ended in the failed state.
    #[error("Bulk {kind} failed after {processed} of {total} products: {message}")]
    BulkFailed {
        kind: String,
        processed: usize,
        total: usize,
        message: String,
    },
}

/// Load the client configuration and build the API client.
fn connect() -> Result<(DashboardConfig, ProductService), CommandError> {
    let config = DashboardConfig::from_env()?;
    let service = ProductService::new(&config)?;
    tracing::debug!(api_url = %config.api_url, "Using catalog API");
    Ok((config, service))
}
