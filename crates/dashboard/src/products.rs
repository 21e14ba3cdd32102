//! Listing state for the product dashboard.
//!
//! [`ProductsStore`] holds the page of products currently on screen together
//! with the filters, sort and pagination that produced it. Fetches swallow
//! their errors into [`ProductsStore::error`]; mutations record the message
//! and also return the error to the caller.

use rust_decimal::Decimal;
use tracing::{instrument, warn};
use vitrine_core::{
    CreateProductData, PaginationMeta, Product, ProductCategory, ProductFilters, ProductId,
    ProductQuery, SortCriteria, SortField, SortOrder, UpdateProductData,
};

use crate::error::ServiceError;
use crate::service::ProductApi;

/// Client-side catalog listing state.
pub struct ProductsStore<A> {
    api: A,
    products: Vec<Product>,
    current_product: Option<Product>,
    categories: Vec<ProductCategory>,
    filters: ProductFilters,
    sort: SortCriteria,
    pagination: PaginationMeta,
    loading: bool,
    error: Option<String>,
}

impl<A: ProductApi> ProductsStore<A> {
    /// Empty store fetching `page_size` products per page.
    pub const fn new(api: A, page_size: u32) -> Self {
        Self {
            api,
            products: Vec::new(),
            current_product: None,
            categories: Vec::new(),
            filters: ProductFilters {
                search: String::new(),
                category: None,
                min_price: None,
                max_price: None,
            },
            sort: SortCriteria {
                field: SortField::Name,
                order: SortOrder::Asc,
            },
            pagination: PaginationMeta {
                current_page: 1,
                total_pages: 1,
                total_items: 0,
                items_per_page: page_size,
            },
            loading: false,
            error: None,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub const fn current_product(&self) -> Option<&Product> {
        self.current_product.as_ref()
    }

    pub fn categories(&self) -> &[ProductCategory] {
        &self.categories
    }

    pub const fn filters(&self) -> &ProductFilters {
        &self.filters
    }

    pub const fn sort(&self) -> SortCriteria {
        self.sort
    }

    pub const fn pagination(&self) -> &PaginationMeta {
        &self.pagination
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    // Getters

    pub fn has_products(&self) -> bool {
        !self.products.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        (self.pagination.current_page as usize) < self.pagination.total_pages
    }

    pub const fn has_previous_page(&self) -> bool {
        self.pagination.current_page > 1
    }

    /// Featured products on the loaded page.
    pub fn featured_products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Number of products matching the current filters across all pages.
    pub const fn filtered_products_count(&self) -> usize {
        self.pagination.total_items
    }

    pub const fn is_first_page(&self) -> bool {
        self.pagination.current_page == 1
    }

    pub fn is_last_page(&self) -> bool {
        self.pagination.current_page as usize == self.pagination.total_pages
    }

    /// Query for `page` under the current filters and sort.
    pub fn query(&self, page: u32) -> ProductQuery {
        ProductQuery {
            filters: self.filters.clone(),
            sort: self.sort,
            page,
            limit: self.pagination.items_per_page,
        }
    }

    // Fetches

    /// Load `page` of the filtered listing. On failure the list is cleared.
    #[instrument(skip(self))]
    pub async fn fetch_products(&mut self, page: u32) {
        self.loading = true;
        self.error = None;

        let query = self.query(page);
        match self.api.get_products(&query).await {
            Ok(response) => {
                self.products = response.products;
                self.pagination = response.meta;
            }
            Err(e) => {
                warn!(error = %e, "Failed to load products");
                self.error = Some(e.to_string());
                self.products.clear();
            }
        }

        self.loading = false;
    }

    /// Load one product into `current_product`. On failure it is cleared.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn fetch_product(&mut self, id: &ProductId) {
        self.loading = true;
        self.error = None;

        match self.api.get_product(id).await {
            Ok(product) => self.current_product = Some(product),
            Err(e) => {
                warn!(error = %e, "Failed to load product");
                self.error = Some(e.to_string());
                self.current_product = None;
            }
        }

        self.loading = false;
    }

    /// Load the category list. On failure the previous list is kept.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&mut self) {
        match self.api.get_categories().await {
            Ok(categories) => self.categories = categories,
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                self.error = Some(e.to_string());
            }
        }
    }

    // Mutations

    /// Create a product and prepend it to the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the API error, which is also recorded in `error`.
    #[instrument(skip(self, data))]
    pub async fn create_product(
        &mut self,
        data: &CreateProductData,
    ) -> Result<Product, ServiceError> {
        self.loading = true;
        self.error = None;

        let result = self.api.create_product(data).await;
        match &result {
            Ok(product) => self.products.insert(0, product.clone()),
            Err(e) => self.error = Some(e.to_string()),
        }

        self.loading = false;
        result
    }

    /// Update a product and replace every local copy of it.
    ///
    /// # Errors
    ///
    /// Returns the API error, which is also recorded in `error`.
    #[instrument(skip(self, data), fields(product_id = %id))]
    pub async fn update_product(
        &mut self,
        id: &ProductId,
        data: &UpdateProductData,
    ) -> Result<Product, ServiceError> {
        self.loading = true;
        self.error = None;

        let result = self.api.update_product(id, data).await;
        match &result {
            Ok(updated) => {
                if let Some(slot) = self.products.iter_mut().find(|p| &p.id == id) {
                    *slot = updated.clone();
                }
                if self.current_product.as_ref().is_some_and(|p| &p.id == id) {
                    self.current_product = Some(updated.clone());
                }
            }
            Err(e) => self.error = Some(e.to_string()),
        }

        self.loading = false;
        result
    }

    /// Delete a product and drop it from the loaded page.
    ///
    /// # Errors
    ///
    /// Returns the API error, which is also recorded in `error`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&mut self, id: &ProductId) -> Result<Product, ServiceError> {
        self.loading = true;
        self.error = None;

        let result = self.api.delete_product(id).await;
        match &result {
            Ok(_) => {
                self.products.retain(|p| &p.id != id);
                if self.current_product.as_ref().is_some_and(|p| &p.id == id) {
                    self.current_product = None;
                }
            }
            Err(e) => self.error = Some(e.to_string()),
        }

        self.loading = false;
        result
    }

    // Filters and sort. Each resets the listing to page 1.

    pub fn update_filters(&mut self, update: impl FnOnce(&mut ProductFilters)) {
        update(&mut self.filters);
        self.pagination.current_page = 1;
    }

    pub fn update_search(&mut self, search: impl Into<String>) {
        self.filters.search = search.into();
        self.pagination.current_page = 1;
    }

    /// `None` selects every category.
    pub fn update_category(&mut self, category: Option<ProductCategory>) {
        self.filters.category = category;
        self.pagination.current_page = 1;
    }

    pub fn update_price_range(&mut self, min_price: Option<Decimal>, max_price: Option<Decimal>) {
        self.filters.min_price = min_price;
        self.filters.max_price = max_price;
        self.pagination.current_page = 1;
    }

    pub fn update_sort(&mut self, field: SortField, order: SortOrder) {
        self.sort = SortCriteria { field, order };
        self.pagination.current_page = 1;
    }

    pub fn reset_filters(&mut self) {
        self.filters = ProductFilters::default();
        self.sort = SortCriteria::default();
        self.pagination.current_page = 1;
    }

    // Pagination

    pub async fn next_page(&mut self) {
        if self.has_next_page() {
            self.fetch_products(self.pagination.current_page + 1).await;
        }
    }

    pub async fn previous_page(&mut self) {
        if self.has_previous_page() {
            self.fetch_products(self.pagination.current_page - 1).await;
        }
    }

    /// Jump to `page`; pages outside `1..=total_pages` are ignored.
    pub async fn go_to_page(&mut self, page: u32) {
        if page >= 1 && page as usize <= self.pagination.total_pages {
            self.pagination.current_page = page;
            self.fetch_products(page).await;
        }
    }

    pub fn clear_current_product(&mut self) {
        self.current_product = None;
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }
}
