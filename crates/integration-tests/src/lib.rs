//! Integration tests for Vitrine.
//!
//! Each test spawns the real API router on an ephemeral local port, with
//! simulated latency disabled, and drives it over HTTP.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p vitrine-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog_api` - Raw HTTP contract of `/api/products`
//! - `dashboard_client` - `ProductService` and `ProductsStore` against the server
//! - `bulk_operations` - `BulkOperationsStore` end to end

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;
use vitrine_api::config::{ApiConfig, LatencyConfig};
use vitrine_api::db::ProductRepository;
use vitrine_api::db::seed::seed_catalog;
use vitrine_api::state::AppState;
use vitrine_dashboard::{DashboardConfig, ProductService};

/// A running API server seeded with the built-in catalog.
pub struct TestServer {
    pub addr: SocketAddr,
    pub base_url: Url,
    pub repository: ProductRepository,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server on `127.0.0.1` with an OS-assigned port.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn() -> Self {
        let config = ApiConfig {
            latency: LatencyConfig::NONE,
            ..ApiConfig::default()
        };
        let repository = ProductRepository::new(seed_catalog());
        let app = vitrine_api::app(AppState::new(config, repository.clone()));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Listener has no local address");

        let handle = tokio::spawn(async move {
            // Aborted on drop; a serve error just ends the task
            let _ = axum::serve(listener, app).await;
        });

        let base_url =
            Url::parse(&format!("http://{addr}")).expect("Socket address is a valid URL");

        Self {
            addr,
            base_url,
            repository,
            handle,
        }
    }

    /// Absolute URL for `path` on this server.
    ///
    /// # Panics
    ///
    /// Panics if `path` cannot be joined onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> Url {
        self.base_url.join(path).expect("Invalid test path")
    }

    /// Client configuration pointing at this server.
    #[must_use]
    pub fn dashboard_config(&self) -> DashboardConfig {
        DashboardConfig::new(self.base_url.clone())
    }

    /// HTTP catalog client pointing at this server.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn service(&self) -> ProductService {
        ProductService::new(&self.dashboard_config()).expect("Failed to build catalog client")
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
