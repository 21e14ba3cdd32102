//! Ordering of product collections.

use std::cmp::Ordering;

use crate::types::{Product, SortField, SortOrder};

use super::SortCriteria;

impl SortCriteria {
    /// Three-way comparison of two products under these criteria.
    #[must_use]
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortField::Price => a.price.cmp(&b.price),
            SortField::Rating => a.rating.total_cmp(&b.rating),
            SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        };

        match self.order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Sort products by the given criteria.
///
/// The sort is stable: products with equal keys keep their input order.
#[must_use]
pub fn sort_products(mut products: Vec<Product>, criteria: SortCriteria) -> Vec<Product> {
    products.sort_by(|a, b| criteria.compare(a, b));
    products
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::query::fixtures::sample_products;

    fn names(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.name.as_str()).collect()
    }

    fn sorted(field: SortField, order: SortOrder) -> Vec<Product> {
        sort_products(sample_products(), SortCriteria { field, order })
    }

    #[test]
    fn test_name_ascending_ignores_case() {
        assert_eq!(
            names(&sorted(SortField::Name, SortOrder::Asc)),
            ["Camiseta Premium", "iPhone 15 Pro", "MacBook Air M3"]
        );
    }

    #[test]
    fn test_price_ascending_is_non_decreasing() {
        let products = sorted(SortField::Price, SortOrder::Asc);
        assert!(products.windows(2).all(|w| match w {
            [a, b] => a.price <= b.price,
            _ => true,
        }));
    }

    #[test]
    fn test_price_descending() {
        assert_eq!(
            names(&sorted(SortField::Price, SortOrder::Desc)),
            ["MacBook Air M3", "iPhone 15 Pro", "Camiseta Premium"]
        );
    }

    #[test]
    fn test_rating_descending() {
        assert_eq!(
            names(&sorted(SortField::Rating, SortOrder::Desc)),
            ["MacBook Air M3", "iPhone 15 Pro", "Camiseta Premium"]
        );
    }

    #[test]
    fn test_created_at_is_chronological() {
        assert_eq!(
            names(&sorted(SortField::CreatedAt, SortOrder::Asc)),
            ["Camiseta Premium", "MacBook Air M3", "iPhone 15 Pro"]
        );
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let mut products = sample_products();
        for product in &mut products {
            product.price = Decimal::from(10);
        }
        let expected: Vec<String> = products.iter().map(|p| p.name.clone()).collect();

        for order in [SortOrder::Asc, SortOrder::Desc] {
            let result = sort_products(
                products.clone(),
                SortCriteria {
                    field: SortField::Price,
                    order,
                },
            );
            let actual: Vec<String> = result.iter().map(|p| p.name.clone()).collect();
            assert_eq!(actual, expected);
        }
    }

    #[test]
    fn test_scenario_electronics_by_name() {
        let electronics: Vec<Product> = sample_products().into_iter().take(2).collect();
        let result = sort_products(electronics, SortCriteria::default());
        assert_eq!(names(&result), ["iPhone 15 Pro", "MacBook Air M3"]);
    }
}
