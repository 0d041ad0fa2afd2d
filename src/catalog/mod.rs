//! Product catalog: typed records, JSON loading and lookup helpers.
//!
//! The catalog is loaded once at startup and treated as immutable for the
//! lifetime of every conversation. All lookups preserve catalog order.

mod filter;

pub use filter::QueryFilter;

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading the catalog file. Catalog load failure is the
/// only fatal startup condition in the crate.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be read.
    #[error("failed to read catalog file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The catalog file was not valid JSON for `Vec<Product>`.
    #[error("failed to parse catalog file '{path}': {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// A single sellable item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Unique, stable identifier.
    pub id: u32,
    pub name: String,
    pub category: String,
    /// Non-negative price in pounds.
    pub price: f64,
    /// Units currently in stock.
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    /// Cut description shown by the fit/sizing follow-up ("Regular", "Slim", …).
    #[serde(default)]
    pub fit: Option<String>,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub care: Option<String>,
    #[serde(default)]
    pub style_tips: Vec<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Category reduced to its alphabetic characters, case-folded.
    /// `"T-Shirts"` → `"tshirts"`.
    pub fn category_key(&self) -> String {
        category_key(&self.category)
    }

    /// Image file name, falling back to a slug derived from the product name.
    pub fn image_file(&self) -> String {
        match &self.image {
            Some(image) => image.clone(),
            None => format!(
                "{}.jpg",
                self.name.to_lowercase().replace(' ', "-").replace('/', "-")
            ),
        }
    }

    /// Product name lowercased with spaces removed, used for loose matching
    /// of names typed without spaces ("monalisa tee").
    pub fn name_compact(&self) -> String {
        self.name.to_lowercase().replace(' ', "")
    }
}

/// Normalize a category to an alphabetic, case-folded key.
pub fn category_key(category: &str) -> String {
    category
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase())
        .collect()
}

/// Naive pluralizer for display titles: `"jean"` → `"jeans"`,
/// `"accessory"` → `"accessories"`.
pub fn pluralize(word: &str) -> String {
    let word = word.to_lowercase();
    if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with('s') {
        word
    } else {
        format!("{word}s")
    }
}

/// The loaded product catalog.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load the catalog from a JSON file containing an array of products.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let products = serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self { products })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn by_id(&self, id: u32) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// First product whose name contains `name`, case-insensitively.
    pub fn by_name_substring(&self, name: &str) -> Option<&Product> {
        let needle = name.to_lowercase();
        self.products
            .iter()
            .find(|p| p.name.to_lowercase().contains(&needle))
    }

    /// Products whose category, name or any color contains the keyword or
    /// its plural form.
    pub fn search_by_keyword(&self, keyword: &str) -> Vec<&Product> {
        let keyword = keyword.to_lowercase();
        let mut forms = vec![keyword.clone()];
        if let Some(stem) = keyword.strip_suffix('y') {
            forms.push(format!("{stem}ies"));
        } else {
            forms.push(format!("{keyword}s"));
        }

        self.products
            .iter()
            .filter(|p| {
                let category = p.category.to_lowercase();
                let name = p.name.to_lowercase();
                forms.iter().any(|form| {
                    category.contains(form)
                        || name.contains(form)
                        || p.colors
                            .iter()
                            .any(|c| c.to_lowercase().contains(form))
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog::new(vec![
            Product {
                id: 1,
                name: "Mona Lisa Tee".into(),
                category: "T-Shirts".into(),
                price: 19.99,
                stock: 5,
                sizes: vec!["S".into(), "M".into()],
                colors: vec!["white".into()],
                fit: None,
                material: None,
                care: None,
                style_tips: vec![],
                image: None,
            },
            Product {
                id: 2,
                name: "Puffer Jacket".into(),
                category: "Jackets".into(),
                price: 79.99,
                stock: 2,
                sizes: vec!["M".into(), "L".into()],
                colors: vec!["black".into()],
                fit: None,
                material: None,
                care: None,
                style_tips: vec![],
                image: None,
            },
        ])
    }

    #[test]
    fn test_category_key_strips_non_alpha() {
        assert_eq!(category_key("T-Shirts"), "tshirts");
        assert_eq!(category_key("Accessories"), "accessories");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("jean"), "jeans");
        assert_eq!(pluralize("jeans"), "jeans");
        assert_eq!(pluralize("accessory"), "accessories");
    }

    #[test]
    fn test_by_name_substring_is_case_insensitive() {
        let catalog = sample();
        assert_eq!(catalog.by_name_substring("mona lisa").unwrap().id, 1);
        assert!(catalog.by_name_substring("trench coat").is_none());
    }

    #[test]
    fn test_search_by_keyword_matches_category_and_plural() {
        let catalog = sample();
        let jackets = catalog.search_by_keyword("jacket");
        assert_eq!(jackets.len(), 1);
        assert_eq!(jackets[0].id, 2);

        // Color matches too.
        let black = catalog.search_by_keyword("black");
        assert_eq!(black.len(), 1);
    }

    #[test]
    fn test_image_file_falls_back_to_slug() {
        let catalog = sample();
        assert_eq!(
            catalog.by_id(1).unwrap().image_file(),
            "mona-lisa-tee.jpg"
        );
    }
}
