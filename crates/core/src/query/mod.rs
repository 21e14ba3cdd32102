//! Product listing query pipeline.
//!
//! A listing request is answered in three steps, each a pure function over an
//! in-memory collection:
//!
//! ```text
//! products -> filter_products -> sort_products -> paginate_products -> ProductsResponse
//! ```
//!
//! [`ProductQueryParams`] is the loosely typed wire form of a request (query
//! string values); [`ProductQuery::from_params`] validates it into a
//! [`ProductQuery`] with closed sort enums, rejecting unrecognized values.

mod filter;
mod paginate;
mod sort;

pub use filter::filter_products;
pub use paginate::{PaginationMeta, ProductsResponse, paginate_products};
pub use sort::sort_products;

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Product, ProductCategory, SortField, SortOrder, ValidationError};

/// Page size used when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Largest page size accepted by default.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Filter criteria. Empty or absent criteria match every product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilters {
    /// Case-insensitive substring of name, description or category.
    pub search: String,
    /// `None` means all categories.
    pub category: Option<ProductCategory>,
    /// Inclusive lower price bound.
    pub min_price: Option<Decimal>,
    /// Inclusive upper price bound.
    pub max_price: Option<Decimal>,
}

/// Sort criteria. Defaults to name ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortCriteria {
    pub field: SortField,
    pub order: SortOrder,
}

/// A validated listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductQuery {
    pub filters: ProductFilters,
    pub sort: SortCriteria,
    /// 1-based page number.
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            filters: ProductFilters::default(),
            sort: SortCriteria::default(),
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Listing request as carried in a query string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<String>,
}

impl ProductQueryParams {
    /// Present parameters as `(name, value)` pairs in a fixed order.
    #[must_use]
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("search", &self.search),
            ("category", &self.category),
            ("minPrice", &self.min_price),
            ("maxPrice", &self.max_price),
            ("sortBy", &self.sort_by),
            ("sortOrder", &self.sort_order),
            ("page", &self.page),
            ("limit", &self.limit),
        ]
        .into_iter()
        .filter_map(|(name, value)| value.as_deref().map(|v| (name, v)))
        .collect()
    }
}

impl ProductQuery {
    /// Validate query string parameters.
    ///
    /// Empty strings are treated as absent and `category=all` as no category
    /// filter. `limit` falls back to `default_limit` and may not exceed
    /// `max_limit`.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` for unknown categories, sort fields or sort
    /// directions, non-numeric price bounds, and page/limit values that are
    /// not positive integers or exceed `max_limit`.
    pub fn from_params(
        params: &ProductQueryParams,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self, ValidationError> {
        let category = match present(params.category.as_ref()) {
            None | Some(ALL_CATEGORIES) => None,
            Some(name) => Some(
                name.parse()
                    .map_err(|_| ValidationError::UnknownCategory(name.to_owned()))?,
            ),
        };

        let filters = ProductFilters {
            search: present(params.search.as_ref()).unwrap_or_default().to_owned(),
            category,
            min_price: parse_optional::<Decimal>(params.min_price.as_ref(), "minPrice")?,
            max_price: parse_optional::<Decimal>(params.max_price.as_ref(), "maxPrice")?,
        };

        let sort = SortCriteria {
            field: parse_optional::<SortField>(params.sort_by.as_ref(), "sortBy")?
                .unwrap_or_default(),
            order: parse_optional::<SortOrder>(params.sort_order.as_ref(), "sortOrder")?
                .unwrap_or_default(),
        };

        let page = parse_positive(params.page.as_ref(), "page")?.unwrap_or(1);
        let limit = parse_positive(params.limit.as_ref(), "limit")?.unwrap_or(default_limit);
        if limit > max_limit {
            return Err(ValidationError::InvalidParameter {
                field: "limit",
                reason: format!("must not exceed {max_limit}"),
            });
        }

        Ok(Self {
            filters,
            sort,
            page,
            limit,
        })
    }

    /// Encode as query string parameters.
    ///
    /// Empty search, the all-categories filter and absent price bounds are
    /// omitted; sort, page and limit are always sent.
    #[must_use]
    pub fn to_params(&self) -> ProductQueryParams {
        ProductQueryParams {
            search: Some(self.filters.search.clone()).filter(|s| !s.is_empty()),
            category: self.filters.category.map(|c| c.name().to_owned()),
            min_price: self.filters.min_price.map(|p| p.to_string()),
            max_price: self.filters.max_price.map(|p| p.to_string()),
            sort_by: Some(self.sort.field.to_string()),
            sort_order: Some(self.sort.order.to_string()),
            page: Some(self.page.to_string()),
            limit: Some(self.limit.to_string()),
        }
    }

    /// Run the filter, sort and paginate pipeline over `products`.
    #[must_use]
    pub fn run(&self, products: &[Product]) -> ProductsResponse {
        let filtered = filter_products(products, &self.filters);
        let sorted = sort_products(filtered, self.sort);
        paginate_products(sorted, self.page, self.limit)
    }
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn parse_optional<T>(
    value: Option<&String>,
    field: &'static str,
) -> Result<Option<T>, ValidationError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    present(value)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .map_err(|e| ValidationError::InvalidParameter {
                    field,
                    reason: e.to_string(),
                })
        })
        .transpose()
}

fn parse_positive(
    value: Option<&String>,
    field: &'static str,
) -> Result<Option<u32>, ValidationError> {
    match parse_optional::<u32>(value, field)? {
        Some(0) => Err(ValidationError::InvalidParameter {
            field,
            reason: "must be at least 1".to_owned(),
        }),
        other => Ok(other),
    }
}
