//! Core types for Vitrine.
//!
//! This module provides type-safe wrappers for the catalog domain.

pub mod category;
pub mod id;
pub mod product;
pub mod status;

pub use category::{ProductCategory, UnknownCategory};
pub use id::*;
pub use product::{
    CreateProductData, DEFAULT_PRODUCT_IMAGE, NewProduct, Product, ProductPatch,
    UpdateProductData, ValidationError,
};
pub use status::*;
