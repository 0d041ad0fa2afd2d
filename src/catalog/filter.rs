//! Query filters extracted from free text and their application to the catalog.

use serde::{Deserialize, Serialize};

use super::{Catalog, Product};

/// Constraints parsed from a single product-query turn. Every field is
/// independently optional; a missing field imposes no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryFilter {
    pub category: Option<String>,
    pub color: Option<String>,
    /// Uppercased size token (XS, S, M, …).
    pub size: Option<String>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
}

impl QueryFilter {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.color.is_none()
            && self.size.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    /// True when `product` satisfies every set constraint.
    ///
    /// Products with no recorded colors are never excluded by a color filter.
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category {
            if !product.category.to_lowercase().contains(category.as_str()) {
                return false;
            }
        }

        if let Some(color) = &self.color {
            let wanted = color.trim().replace('-', " ");
            if !product.colors.is_empty()
                && !product
                    .colors
                    .iter()
                    .any(|c| c.to_lowercase().replace('-', " ").contains(&wanted))
            {
                return false;
            }
        }

        if let Some(size) = &self.size {
            if !product.sizes.iter().any(|s| s.to_uppercase() == *size) {
                return false;
            }
        }

        if let Some(max) = self.max_price {
            if product.price > max {
                return false;
            }
        }
        if let Some(min) = self.min_price {
            if product.price < min {
                return false;
            }
        }

        true
    }
}

impl Catalog {
    /// Catalog-order subsequence of products matching `filter`.
    pub fn filter_products(&self, filter: &QueryFilter) -> Vec<&Product> {
        self.products()
            .iter()
            .filter(|p| filter.matches(p))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u32, category: &str, price: f64, sizes: &[&str], colors: &[&str]) -> Product {
        Product {
            id,
            name: format!("item-{id}"),
            category: category.into(),
            price,
            stock: 1,
            sizes: sizes.iter().map(|s| s.to_string()).collect(),
            colors: colors.iter().map(|c| c.to_string()).collect(),
            fit: None,
            material: None,
            care: None,
            style_tips: vec![],
            image: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![
            product(1, "Jackets", 79.99, &["M", "L"], &["black"]),
            product(2, "Jackets", 49.99, &["S", "M"], &["navy", "green"]),
            product(3, "T-Shirts", 9.99, &["S", "M", "L"], &["white"]),
            product(4, "Accessories", 14.99, &[], &[]),
        ])
    }

    #[test]
    fn test_filtered_products_satisfy_every_constraint() {
        let catalog = catalog();
        let filter = QueryFilter {
            category: Some("jacket".into()),
            max_price: Some(50.0),
            ..Default::default()
        };

        let matched = catalog.filter_products(&filter);
        assert_eq!(matched.len(), 1);
        for p in &matched {
            assert!(filter.matches(p));
            assert!(p.category.to_lowercase().contains("jacket"));
            assert!(p.price <= 50.0);
        }
    }

    #[test]
    fn test_color_filter_keeps_products_without_colors() {
        let catalog = catalog();
        let filter = QueryFilter {
            color: Some("navy".into()),
            ..Default::default()
        };

        let matched = catalog.filter_products(&filter);
        let ids: Vec<u32> = matched.iter().map(|p| p.id).collect();
        // Item 4 has no colors recorded and must not be excluded.
        assert_eq!(ids, vec![2, 4]);
    }

    #[test]
    fn test_color_filter_normalizes_hyphens() {
        let mut products = vec![product(1, "T-Shirts", 9.99, &["S"], &["off-white"])];
        products[0].name = "Skyline Tee".into();
        let catalog = Catalog::new(products);

        let filter = QueryFilter {
            color: Some("off white".into()),
            ..Default::default()
        };
        assert_eq!(catalog.filter_products(&filter).len(), 1);
    }

    #[test]
    fn test_size_filter_is_case_insensitive_exact_membership() {
        let catalog = catalog();
        let filter = QueryFilter {
            size: Some("L".into()),
            ..Default::default()
        };
        let ids: Vec<u32> = catalog
            .filter_products(&filter)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_filtering_is_idempotent_and_order_preserving() {
        let catalog = catalog();
        let filter = QueryFilter {
            min_price: Some(10.0),
            ..Default::default()
        };
        let first: Vec<u32> = catalog
            .filter_products(&filter)
            .iter()
            .map(|p| p.id)
            .collect();
        let second: Vec<u32> = catalog
            .filter_products(&filter)
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(first, second);
        assert_eq!(first, vec![1, 2, 4]);
    }
}
