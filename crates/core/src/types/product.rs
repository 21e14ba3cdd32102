//! Product entity and the create/update payloads that mutate it.
//!
//! Payloads arrive loosely typed (every field optional) so that missing or
//! malformed input is reported with a descriptive [`ValidationError`] instead
//! of a generic deserialization failure. Validation turns them into
//! [`NewProduct`] / [`ProductPatch`], which can no longer hold invalid values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::category::ProductCategory;
use super::id::ProductId;

/// Image used when a product is created without one.
pub const DEFAULT_PRODUCT_IMAGE: &str =
    "https://images.unsplash.com/photo-1560472354-b33ff0c44a43?w=400&h=300&fit=crop";

/// Input validation failures. Display strings are returned to API clients.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing required fields: name, description, price, category")]
    MissingRequiredFields,

    #[error("{0} cannot be empty")]
    BlankField(&'static str),

    #[error("Price must be greater than 0")]
    NonPositivePrice,

    #[error("Stock cannot be negative")]
    NegativeStock,

    #[error("Stock is too large")]
    StockOutOfRange,

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub category: ProductCategory,
    pub image: String,
    pub stock: u32,
    pub rating: f64,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Create payload as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl CreateProductData {
    /// Build a payload carrying the required fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        category: ProductCategory,
    ) -> Self {
        Self {
            name: Some(name.into()),
            description: Some(description.into()),
            price: Some(price),
            category: Some(category.name().to_owned()),
            ..Self::default()
        }
    }

    /// Validate the payload.
    ///
    /// # Errors
    ///
    /// Returns `MissingRequiredFields` if name, description, price or category
    /// is absent or blank, and the specific rule violation otherwise.
    pub fn validate(self) -> Result<NewProduct, ValidationError> {
        let (Some(name), Some(description), Some(price), Some(category)) =
            (self.name, self.description, self.price, self.category)
        else {
            return Err(ValidationError::MissingRequiredFields);
        };

        if name.trim().is_empty() || description.trim().is_empty() || category.is_empty() {
            return Err(ValidationError::MissingRequiredFields);
        }

        Ok(NewProduct {
            name,
            description,
            price: validate_price(price)?,
            category: parse_category(&category)?,
            image: self
                .image
                .filter(|image| !image.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_PRODUCT_IMAGE.to_owned()),
            stock: self.stock.map(validate_stock).transpose()?.unwrap_or(0),
            featured: self.featured.unwrap_or(false),
        })
    }
}

/// Partial update payload as sent by clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,
}

impl UpdateProductData {
    /// Returns true if the payload changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.category.is_none()
            && self.image.is_none()
            && self.stock.is_none()
            && self.featured.is_none()
    }

    /// Validate the fields that are present.
    ///
    /// # Errors
    ///
    /// Returns the first rule violated by a present field.
    pub fn validate(self) -> Result<ProductPatch, ValidationError> {
        Ok(ProductPatch {
            name: self.name.map(|v| non_blank(v, "Name")).transpose()?,
            description: self
                .description
                .map(|v| non_blank(v, "Description"))
                .transpose()?,
            price: self.price.map(validate_price).transpose()?,
            category: self.category.as_deref().map(parse_category).transpose()?,
            image: self.image,
            stock: self.stock.map(validate_stock).transpose()?,
            featured: self.featured,
        })
    }
}

/// A validated create request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: ProductCategory,
    pub image: String,
    pub stock: u32,
    pub featured: bool,
}

impl NewProduct {
    /// Materialize the product with a server-assigned ID and timestamps.
    #[must_use]
    pub fn into_product(self, id: ProductId, now: DateTime<Utc>) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            price: self.price,
            category: self.category,
            image: self.image,
            stock: self.stock,
            rating: 0.0,
            featured: self.featured,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A validated partial update.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<ProductCategory>,
    pub image: Option<String>,
    pub stock: Option<u32>,
    pub featured: Option<bool>,
}

impl ProductPatch {
    /// Apply the patch and re-stamp `updated_at`. The ID never changes.
    pub fn apply(self, product: &mut Product, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(category) = self.category {
            product.category = category;
        }
        if let Some(image) = self.image {
            product.image = image;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(featured) = self.featured {
            product.featured = featured;
        }
        product.updated_at = now;
    }
}

fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }
    Ok(price)
}

fn validate_stock(stock: i64) -> Result<u32, ValidationError> {
    if stock < 0 {
        return Err(ValidationError::NegativeStock);
    }
    u32::try_from(stock).map_err(|_| ValidationError::StockOutOfRange)
}

fn parse_category(category: &str) -> Result<ProductCategory, ValidationError> {
    category
        .parse()
        .map_err(|_| ValidationError::UnknownCategory(category.to_owned()))
}

fn non_blank(value: String, field: &'static str) -> Result<String, ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(value)
}
