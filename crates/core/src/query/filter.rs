//! Predicate filtering over product collections.

use crate::types::Product;

use super::ProductFilters;

impl ProductFilters {
    /// Returns true if the product satisfies every supplied criterion.
    ///
    /// Empty search text, an absent category and absent price bounds always
    /// match.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        self.matches_search(product)
            && self.category.is_none_or(|category| product.category == category)
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
    }

    fn matches_search(&self, product: &Product) -> bool {
        if self.search.is_empty() {
            return true;
        }

        let term = self.search.to_lowercase();
        product.name.to_lowercase().contains(&term)
            || product.description.to_lowercase().contains(&term)
            || product.category.name().to_lowercase().contains(&term)
    }
}

/// Keep the products matching all filters, preserving input order.
#[must_use]
pub fn filter_products(products: &[Product], filters: &ProductFilters) -> Vec<Product> {
    products
        .iter()
        .filter(|product| filters.matches(product))
        .cloned()
        .collect()
}
