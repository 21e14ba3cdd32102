//! In-memory collaborators for store tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use vitrine_core::{
    CreateProductData, ExportArtifact, Product, ProductCategory, ProductId, ProductQuery,
    ProductsResponse, UpdateProductData, generate_product_id,
};

use crate::download::ArtifactSink;
use crate::error::ServiceError;
use crate::notify::{Notification, Notifier};
use crate::service::ProductApi;

fn product(
    id: &str,
    name: &str,
    description: &str,
    price: Decimal,
    category: ProductCategory,
) -> Product {
    let created = Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap();
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price,
        category,
        image: format!("https://example.com/{id}.jpg"),
        stock: 10,
        rating: 4.5,
        featured: false,
        created_at: created,
        updated_at: created,
    }
}

/// iPhone, MacBook and t-shirt with ids "1", "2", "3".
pub fn catalog() -> Vec<Product> {
    vec![
        product(
            "1",
            "iPhone 15 Pro",
            "Smartphone Apple",
            Decimal::new(899_999, 2),
            ProductCategory::Electronics,
        ),
        product(
            "2",
            "MacBook Air M3",
            "Notebook Apple",
            Decimal::new(1_299_999, 2),
            ProductCategory::Electronics,
        ),
        product(
            "3",
            "Camiseta Premium",
            "Camiseta de algodão",
            Decimal::new(8_999, 2),
            ProductCategory::Clothing,
        ),
    ]
}

fn not_found() -> ServiceError {
    ServiceError::Api {
        status: 404,
        message: "Product not found".to_string(),
    }
}

fn server_error(message: &str) -> ServiceError {
    ServiceError::Api {
        status: 500,
        message: message.to_string(),
    }
}

/// Catalog API backed by a vector, answering queries with the core pipeline.
#[derive(Default)]
pub struct FakeApi {
    products: Mutex<Vec<Product>>,
    failing: Mutex<HashSet<ProductId>>,
    listing_error: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
            ..Self::default()
        }
    }

    /// Make mutations of `id` fail with a 500.
    pub fn fail_on(&self, id: &str) {
        self.failing.lock().unwrap().insert(ProductId::new(id));
    }

    /// Make listing requests fail with a 500.
    pub fn fail_listing(&self, message: &str) {
        *self.listing_error.lock().unwrap() = Some(message.to_string());
    }

    /// Calls made so far, as `"<action>:<arg>"`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failing(&self, id: &ProductId) -> Result<(), ServiceError> {
        if self.failing.lock().unwrap().contains(id) {
            return Err(server_error("Internal server error"));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductApi for FakeApi {
    async fn get_products(&self, query: &ProductQuery) -> Result<ProductsResponse, ServiceError> {
        self.record(format!("list:{}", query.page));
        if let Some(message) = self.listing_error.lock().unwrap().as_deref() {
            return Err(server_error(message));
        }
        Ok(query.run(&self.products.lock().unwrap()))
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        self.record(format!("get:{id}"));
        self.products
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.id == id)
            .cloned()
            .ok_or_else(not_found)
    }

    async fn create_product(&self, data: &CreateProductData) -> Result<Product, ServiceError> {
        self.record("create".to_string());
        let new = data.clone().validate().map_err(|e| ServiceError::Api {
            status: 400,
            message: e.to_string(),
        })?;
        let product = new.into_product(generate_product_id(), Utc::now());
        self.products.lock().unwrap().push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &ProductId,
        data: &UpdateProductData,
    ) -> Result<Product, ServiceError> {
        self.record(format!("update:{id}"));
        self.check_failing(id)?;

        let mut products = self.products.lock().unwrap();
        let product = products
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(not_found)?;
        let patch = data.clone().validate().map_err(|e| ServiceError::Api {
            status: 400,
            message: e.to_string(),
        })?;
        patch.apply(product, Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        self.record(format!("delete:{id}"));
        self.check_failing(id)?;

        let mut products = self.products.lock().unwrap();
        let index = products
            .iter()
            .position(|p| &p.id == id)
            .ok_or_else(not_found)?;
        Ok(products.remove(index))
    }

    async fn get_categories(&self) -> Result<Vec<ProductCategory>, ServiceError> {
        self.record("categories".to_string());
        Ok(ProductCategory::ALL.to_vec())
    }
}

/// Notifier that keeps every notification.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    /// Drain the recorded notifications.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.notifications.lock().unwrap())
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.notifications.lock().unwrap().push(notification);
    }
}

/// Sink that keeps delivered artifacts in memory.
#[derive(Clone, Default)]
pub struct MemorySink {
    artifacts: Arc<Mutex<Vec<ExportArtifact>>>,
    failure: Arc<Mutex<Option<String>>>,
}

impl MemorySink {
    pub fn artifacts(&self) -> Vec<ExportArtifact> {
        self.artifacts.lock().unwrap().clone()
    }

    /// Make every delivery fail with `message`.
    pub fn fail_with(&self, message: &str) {
        *self.failure.lock().unwrap() = Some(message.to_string());
    }
}

#[async_trait]
impl ArtifactSink for MemorySink {
    async fn deliver(&self, artifact: &ExportArtifact) -> std::io::Result<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(std::io::Error::other(message));
        }
        self.artifacts.lock().unwrap().push(artifact.clone());
        Ok(())
    }
}
