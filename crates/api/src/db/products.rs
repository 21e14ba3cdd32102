//! Product repository.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::instrument;
use vitrine_core::{
    NewProduct, Product, ProductId, ProductPatch, ProductQuery, ProductsResponse,
    generate_product_id,
};

use super::RepositoryError;

/// Shared, resettable in-memory product list.
///
/// Cheaply cloneable; every clone sees the same products. Each method holds
/// the lock for its whole read or write, so individual operations are atomic.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    inner: Arc<RepositoryInner>,
}

#[derive(Debug)]
struct RepositoryInner {
    products: RwLock<Vec<Product>>,
    seed: Vec<Product>,
}

impl ProductRepository {
    /// Create a repository holding `seed`.
    #[must_use]
    pub fn new(seed: Vec<Product>) -> Self {
        Self {
            inner: Arc::new(RepositoryInner {
                products: RwLock::new(seed.clone()),
                seed,
            }),
        }
    }

    /// Run a listing query over the current products.
    #[instrument(skip(self))]
    pub async fn list(&self, query: &ProductQuery) -> ProductsResponse {
        let products = self.inner.products.read().await;
        query.run(&products)
    }

    /// Snapshot of every product, in storage order.
    pub async fn all(&self) -> Vec<Product> {
        self.inner.products.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.inner.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Get a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has that ID.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        self.inner
            .products
            .read()
            .await
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))
    }

    /// Store a new product with a generated ID and return it.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewProduct) -> Product {
        let product = new.into_product(generate_product_id(), Utc::now());
        self.inner.products.write().await.push(product.clone());
        tracing::info!(product_id = %product.id, "Product created");
        product
    }

    /// Apply a validated patch and return the updated product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has that ID.
    #[instrument(skip(self, patch), fields(product_id = %id))]
    pub async fn update(
        &self,
        id: &ProductId,
        patch: ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut products = self.inner.products.write().await;
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        patch.apply(product, Utc::now());
        tracing::info!("Product updated");
        Ok(product.clone())
    }

    /// Remove a product and return it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has that ID.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete(&self, id: &ProductId) -> Result<Product, RepositoryError> {
        let mut products = self.inner.products.write().await;
        let index = products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(|| RepositoryError::NotFound(id.clone()))?;

        let removed = products.remove(index);
        tracing::info!("Product deleted");
        Ok(removed)
    }

    /// Restore the seed catalog, discarding every change.
    #[instrument(skip(self))]
    pub async fn reset(&self) {
        let mut products = self.inner.products.write().await;
        products.clone_from(&self.inner.seed);
        tracing::debug!(count = products.len(), "Repository reset");
    }
}
