//! Vitrine Core - Shared catalog types library.
//!
//! This crate provides the types and pure logic used across all Vitrine components:
//! - `api` - Mock catalog REST API (in-memory product store)
//! - `dashboard` - Client-side listing state and bulk operations
//! - `cli` - Command-line front-end over the dashboard
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure functions - no I/O, no
//! HTTP clients. Both the server and the client apply the same query pipeline
//! and share the same wire envelope.
//!
//! # Modules
//!
//! - [`types`] - Product, category, identifier and status types
//! - [`query`] - Filter, sort and paginate pipeline
//! - [`bulk`] - Bulk operation state machine
//! - [`export`] - CSV/JSON export artifacts
//! - [`response`] - JSON response envelope

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bulk;
pub mod export;
pub mod query;
pub mod response;
pub mod types;

pub use bulk::{BulkOperation, TransitionError};
pub use export::{ExportArtifact, ExportFormat};
pub use query::{
    DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PaginationMeta, ProductFilters, ProductQuery,
    ProductQueryParams, ProductsResponse, SortCriteria, filter_products, paginate_products,
    sort_products,
};
pub use response::{ApiErrorBody, ApiResponse};
pub use types::*;
