//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                    - Health check
//!
//! # Products
//! GET    /api/products              - Filtered, sorted, paginated listing
//! POST   /api/products              - Create product (201)
//! GET    /api/products/categories   - Category names
//! GET    /api/products/{id}         - Product detail
//! PUT    /api/products/{id}         - Partial update
//! DELETE /api/products/{id}         - Delete, returning the removed product
//! ```

pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/categories", get(products::categories))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .nest("/api/products", product_routes())
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
