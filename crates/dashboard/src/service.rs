//! Catalog API client.
//!
//! [`ProductApi`] is the boundary the stores depend on; [`ProductService`]
//! implements it over HTTP against `/api/products`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::instrument;
use url::Url;
use vitrine_core::{
    ApiErrorBody, ApiResponse, CreateProductData, Product, ProductCategory, ProductId,
    ProductQuery, ProductsResponse, UpdateProductData,
};

use crate::config::DashboardConfig;
use crate::error::ServiceError;

/// Product CRUD and listing operations.
#[async_trait]
pub trait ProductApi: Send + Sync {
    /// Fetch one page of products matching `query`.
    async fn get_products(&self, query: &ProductQuery) -> Result<ProductsResponse, ServiceError>;

    async fn get_product(&self, id: &ProductId) -> Result<Product, ServiceError>;

    async fn create_product(&self, data: &CreateProductData) -> Result<Product, ServiceError>;

    async fn update_product(
        &self,
        id: &ProductId,
        data: &UpdateProductData,
    ) -> Result<Product, ServiceError>;

    /// Delete a product, returning the removed record.
    async fn delete_product(&self, id: &ProductId) -> Result<Product, ServiceError>;

    async fn get_categories(&self) -> Result<Vec<ProductCategory>, ServiceError>;
}

#[async_trait]
impl<T: ProductApi + ?Sized> ProductApi for Arc<T> {
    async fn get_products(&self, query: &ProductQuery) -> Result<ProductsResponse, ServiceError> {
        (**self).get_products(query).await
    }

    async fn get_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        (**self).get_product(id).await
    }

    async fn create_product(&self, data: &CreateProductData) -> Result<Product, ServiceError> {
        (**self).create_product(data).await
    }

    async fn update_product(
        &self,
        id: &ProductId,
        data: &UpdateProductData,
    ) -> Result<Product, ServiceError> {
        (**self).update_product(id, data).await
    }

    async fn delete_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        (**self).delete_product(id).await
    }

    async fn get_categories(&self) -> Result<Vec<ProductCategory>, ServiceError> {
        (**self).get_categories().await
    }
}

/// HTTP client for the catalog API.
#[derive(Clone)]
pub struct ProductService {
    inner: Arc<ProductServiceInner>,
}

struct ProductServiceInner {
    client: reqwest::Client,
    base_url: Url,
}

impl ProductService {
    /// Create a new catalog API client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &DashboardConfig) -> Result<Self, ServiceError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(ProductServiceInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Build `<base>/api/products/<segments...>`, percent-encoding each segment.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ServiceError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "products"])
            .extend(segments);
        Ok(url)
    }

    /// Handle API response and unwrap the success envelope.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();

        if status.is_success() {
            let envelope: ApiResponse<T> = response
                .json()
                .await
                .map_err(|e| ServiceError::Parse(format!("Failed to parse response: {e}")))?;

            if !envelope.success {
                return Err(ServiceError::Api {
                    status: status.as_u16(),
                    message: envelope
                        .message
                        .unwrap_or_else(|| "Request failed".to_string()),
                });
            }
            return Ok(envelope.data);
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse an error response from the API.
    async fn parse_error(response: reqwest::Response) -> ServiceError {
        let status = response.status().as_u16();

        match response.json::<ApiErrorBody>().await {
            Ok(body) => ServiceError::Api {
                status,
                message: body.message,
            },
            Err(_) => ServiceError::Api {
                status,
                message: format!("Request failed with status {status}"),
            },
        }
    }
}

#[async_trait]
impl ProductApi for ProductService {
    #[instrument(skip(self))]
    async fn get_products(&self, query: &ProductQuery) -> Result<ProductsResponse, ServiceError> {
        let mut url = self.endpoint(&[])?;
        url.query_pairs_mut().extend_pairs(query.to_params().pairs());

        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        let url = self.endpoint(&[id.as_str()])?;
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self, data))]
    async fn create_product(&self, data: &CreateProductData) -> Result<Product, ServiceError> {
        let url = self.endpoint(&[])?;
        let response = self.inner.client.post(url).json(data).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self, data), fields(product_id = %id))]
    async fn update_product(
        &self,
        id: &ProductId,
        data: &UpdateProductData,
    ) -> Result<Product, ServiceError> {
        let url = self.endpoint(&[id.as_str()])?;
        let response = self.inner.client.put(url).json(data).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn delete_product(&self, id: &ProductId) -> Result<Product, ServiceError> {
        let url = self.endpoint(&[id.as_str()])?;
        let response = self.inner.client.delete(url).send().await?;
        Self::handle_response(response).await
    }

    #[instrument(skip(self))]
    async fn get_categories(&self) -> Result<Vec<ProductCategory>, ServiceError> {
        let url = self.endpoint(&["categories"])?;
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }
}
