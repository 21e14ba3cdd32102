//! Client-side error types.

use thiserror::Error;
use vitrine_core::TransitionError;

/// Errors that can occur when calling the catalog API.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// HTTP request failed before a response arrived.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response. `message` comes from the server.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// Response body was not the expected envelope.
    #[error("Parse error: {0}")]
    Parse(String),

    /// Base URL cannot carry a path.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

impl ServiceError {
    /// HTTP status of an API error response.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }
}

/// Errors raised while running a bulk operation.
///
/// These end up as the operation's error message; they are never returned
/// to the caller of a bulk action.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error("Export encoding failed: {0}")]
    Export(#[from] serde_json::Error),

    #[error("Download failed: {0}")]
    Download(#[from] std::io::Error),
}
