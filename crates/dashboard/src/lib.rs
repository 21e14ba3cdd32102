//! Vitrine Dashboard - Client library for the catalog API.
//!
//! Holds the state a catalog dashboard works with:
//!
//! - [`ProductsStore`] - the filtered, sorted, paginated listing plus single
//!   product CRUD
//! - [`BulkOperationsStore`] - selection and batch delete/update/export with
//!   progress tracking
//!
//! Both talk to the server through the [`ProductApi`] trait, implemented over
//! HTTP by [`ProductService`].

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod bulk;
pub mod config;
pub mod download;
pub mod error;
pub mod notify;
pub mod products;
pub mod service;

#[cfg(test)]
pub(crate) mod testing;

pub use bulk::BulkOperationsStore;
pub use config::{ConfigError, DashboardConfig};
pub use download::{ArtifactSink, DirectorySink};
pub use error::{DashboardError, ServiceError};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use products::ProductsStore;
pub use service::{ProductApi, ProductService};
