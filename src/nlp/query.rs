//! Free-text product-query parsing.
//!
//! Extracts the category, color, size and price constraints of a turn into
//! a [`QueryFilter`]. Extraction never fails: a field that cannot be parsed
//! is simply left unset.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::QueryFilter;
use crate::lexicon::{canonical_category, Lexicon};

static SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(xx?s|xs|s|m|l|xl|xxl)\b").unwrap());
static UNDER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:under|below|less than)\b\s*(?:£\s*)?([0-9]+(?:\.[0-9]{1,2})?)").unwrap()
});
static OVER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:over|above|more than)\b\s*(?:£\s*)?([0-9]+(?:\.[0-9]{1,2})?)").unwrap()
});

/// Parse `text` (already lowercased) into a [`QueryFilter`].
pub fn parse_product_query(text: &str, lexicon: &Lexicon) -> QueryFilter {
    let category = canonical_category(text).map(str::to_string);

    let size = SIZE_RE
        .captures(text)
        .map(|c| c[1].to_uppercase());

    let max_price = UNDER_RE
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok());
    let min_price = OVER_RE
        .captures(text)
        .and_then(|c| c[1].parse::<f64>().ok());

    // "off white" spans the hyphen/space divide, so it is special-cased
    // ahead of the known-color scan.
    let color = if text.contains("off white") || text.contains("off-white") {
        Some("off white".to_string())
    } else {
        lexicon.find_color(text).map(str::to_string)
    };

    QueryFilter {
        category,
        color,
        size,
        min_price,
        max_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn lexicon() -> Lexicon {
        Lexicon::from_catalog(&Catalog::default())
    }

    #[test]
    fn test_category_and_max_price() {
        let filter = parse_product_query("show me jackets under 50", &lexicon());
        assert_eq!(filter.category.as_deref(), Some("jacket"));
        assert_eq!(filter.max_price, Some(50.0));
        assert_eq!(filter.min_price, None);
        assert_eq!(filter.color, None);
        assert_eq!(filter.size, None);
    }

    #[test]
    fn test_both_price_bounds_from_one_turn() {
        let filter = parse_product_query("shoes over £20 but under £60.50", &lexicon());
        assert_eq!(filter.min_price, Some(20.0));
        assert_eq!(filter.max_price, Some(60.50));
    }

    #[test]
    fn test_size_is_boundary_matched_and_uppercased() {
        let filter = parse_product_query("any hoodies in xl", &lexicon());
        assert_eq!(filter.size.as_deref(), Some("XL"));

        // "small" must not match the size token "s".
        let filter = parse_product_query("small hoodies", &lexicon());
        assert_eq!(filter.size, None);
    }

    #[test]
    fn test_off_white_special_case() {
        let filter = parse_product_query("an off-white tee", &lexicon());
        assert_eq!(filter.color.as_deref(), Some("off white"));
    }

    #[test]
    fn test_color_scan_uses_known_colors() {
        let filter = parse_product_query("navy socks please", &lexicon());
        assert_eq!(filter.color.as_deref(), Some("navy"));
    }

    #[test]
    fn test_unparsed_fields_stay_unset() {
        let filter = parse_product_query("good morning", &lexicon());
        assert!(filter.is_empty());
    }
}
