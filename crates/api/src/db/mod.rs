//! In-memory product storage.
//!
//! The catalog lives in process memory behind an async `RwLock`. It is seeded
//! at startup (from the built-in catalog or `VITRINE_SEED_FILE`) and can be
//! reset to that seed, which integration tests use between scenarios.

pub mod products;
pub mod seed;

use std::path::PathBuf;

use thiserror::Error;
use vitrine_core::ProductId;

pub use products::ProductRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Requested product was not found.
    #[error("Product not found")]
    NotFound(ProductId),

    /// Seed file could not be read.
    #[error("failed to read seed file {path}: {source}")]
    SeedIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Seed file is not a JSON array of products.
    #[error("invalid seed file {path}: {source}")]
    SeedFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Seed file parsed but holds products the catalog cannot accept.
    #[error("invalid seed file {path}: {reason}")]
    SeedInvalid { path: PathBuf, reason: String },
}
