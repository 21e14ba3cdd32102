//! Fixed-size page slicing.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Derived counts describing one page of an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Requested page (1-based), echoed even when past the end.
    pub current_page: u32,
    /// `ceil(total_items / items_per_page)`, or 0 for an empty collection.
    pub total_pages: usize,
    pub total_items: usize,
    pub items_per_page: u32,
}

impl PaginationMeta {
    /// Metadata for a collection that has not been fetched yet.
    #[must_use]
    pub const fn empty(items_per_page: u32) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            total_items: 0,
            items_per_page,
        }
    }
}

/// One page of products plus its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub meta: PaginationMeta,
}

/// Slice `products` into the requested page.
///
/// Returns items `[(page-1)*limit, (page-1)*limit + limit)` clamped to the
/// collection; a page past the end is empty. A zero `limit` yields an empty
/// page with zero total pages.
#[must_use]
pub fn paginate_products(products: Vec<Product>, page: u32, limit: u32) -> ProductsResponse {
    let total_items = products.len();
    let per_page = limit as usize;

    let total_pages = if per_page == 0 {
        0
    } else {
        total_items.div_ceil(per_page)
    };
    let start = (page.saturating_sub(1) as usize).saturating_mul(per_page);

    let products = products.into_iter().skip(start).take(per_page).collect();

    ProductsResponse {
        products,
        meta: PaginationMeta {
            current_page: page,
            total_pages,
            total_items,
            items_per_page: limit,
        },
    }
}
