//! Fixed vocabularies used across the pipeline.
//!
//! Everything here is pure data: the store vocabulary and greetings seeded
//! into the spell-correction dictionary, the category alias table, the known
//! color set (catalog-derived plus a fixed extra set), the frustration
//! lexicon and the assorted keyword lists consulted by the dispatcher.

pub mod polarity;

use std::collections::BTreeSet;

use regex::Regex;

use crate::catalog::Catalog;

/// Store vocabulary seeded into the spell-correction dictionary so product
/// talk is never "corrected" away. Includes the size tokens, which would
/// otherwise be easy prey for single-letter edits.
pub const STORE_WORDS: &[&str] = &[
    "monalisa", "hoodie", "hoodies", "denim", "tshirt", "t-shirt", "jacket", "jackets",
    "sneaker", "sneakers", "trouser", "trousers", "jean", "jeans", "puffer", "zipper",
    "fashion", "accessory", "accessories", "store", "sock", "socks", "shoe", "shoes",
    "xxs", "xs", "s", "m", "l", "xl", "xxl",
];

/// Greeting words seeded into the spell-correction dictionary.
pub const GREETING_WORDS: &[&str] = &[
    "hi", "hello", "hey", "hiya", "hya", "good", "morning", "afternoon", "evening",
    "bye", "goodbye", "thanks", "thank", "thankyou",
];

/// Exact greetings that earn the welcome reply.
pub const GREETINGS_EXACT: &[&str] = &[
    "hi", "hello", "hey", "hya", "good morning", "good afternoon", "good evening",
];

/// Surface form → canonical category. Iteration order is the tie-break when
/// several aliases appear in one turn.
pub const CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("jacket", "jacket"),
    ("jackets", "jacket"),
    ("hoodie", "hoodie"),
    ("hoodies", "hoodie"),
    ("t-shirt", "t-shirt"),
    ("tshirts", "t-shirt"),
    ("t shirt", "t-shirt"),
    ("shirt", "shirt"),
    ("shirts", "shirt"),
    ("shoe", "shoe"),
    ("shoes", "shoe"),
    ("accessory", "accessory"),
    ("accessories", "accessory"),
    ("sock", "sock"),
    ("socks", "sock"),
    ("bottom", "bottom"),
    ("bottoms", "bottom"),
    ("jean", "jean"),
    ("jeans", "jean"),
    ("trouser", "trouser"),
    ("trousers", "trouser"),
    ("pant", "pant"),
    ("pants", "pant"),
];

/// Colors recognized even when no catalog product carries them.
pub const EXTRA_COLORS: &[&str] = &[
    "grey", "gray", "navy", "white", "black", "blue", "red", "green", "brown", "beige",
];

/// Multi-word phrases that mark a frustrated turn outright.
pub const FRUSTRATION_PHRASES: &[&str] = &[
    "not working", "doesn't work", "doesnt work", "waste of time", "pissed off",
    "damn you", "damn it",
];

/// Mild profanity; counts as frustration only in turns of two or more words.
pub const SWEAR_WORDS: &[&str] = &["hell", "damn", "wth"];

/// Single words that mark a frustrated turn.
pub const NEGATIVE_WORDS: &[&str] = &[
    "broken", "bug", "error", "useless", "annoying", "mad", "angry", "frustrating",
    "bad", "sad", "trash", "terrible", "stupid", "hate", "worst", "ridiculous", "pissed",
];

pub const FRUSTRATION_EMOJIS: &[&str] = &["😡", "🤬", "😤", "😠", "😞", "💩", "🤦‍♂️"];

/// Clustered punctuation checked against the original-case text.
pub const NEGATIVE_PUNCTUATION: &[&str] = &["!!!", "!!", "??", "?!", "!?"];

/// Phrases answered with the capability rundown.
pub const ABOUT_BOT_PHRASES: &[&str] = &[
    "what can you do", "what are your features", "features", "what can you provide me",
    "what could you do", "what could you provide me", "what are you capable of",
    "what are your abilities", "your abilities", "what do you do", "what do you help with",
    "what is your purpose", "what is this bot", "who are you", "what are you",
    "how do i use you", "how do you work", "how can you help me",
    "what can you help me with", "how can you help",
];

/// Keywords that mark a turn as a product *request* for the search branch.
pub const PRODUCT_REQUEST_KEYWORDS: &[&str] = &[
    "show", "find", "list", "do you have", "have you got", "looking for", "need",
    "want", "buy", "available",
];

/// Filler stripped before guessing the salient keyword of a request.
pub const NOISE_WORDS: &[&str] = &[
    "show", "me", "all", "everything", "do", "you", "have", "got", "any", "a", "an",
    "the", "in", "under", "below", "less", "than", "over", "above", "more", "price",
    "cost", "size", "sizes", "color", "colour", "colors", "colours", "stock",
    "available", "availability", "please", "can", "could", "tell",
];

/// Bare adjectives accepted as deictic references against the last listing.
pub const DEICTIC_ADJECTIVES: &[&str] = &[
    "black", "plain", "blue", "red", "white", "green", "orange", "purple", "pink",
    "brown", "gray", "mona", "monalisa",
];

/// Measurement unit tokens the spell corrector must never touch.
pub const UNIT_TOKENS: &[&str] = &[
    "cm", "m", "kg", "kgs", "lb", "lbs", "ft", "in", "inch", "inches",
];

/// First category alias found as a substring of `text`, in table order.
pub fn canonical_category(text: &str) -> Option<&'static str> {
    CATEGORY_ALIASES
        .iter()
        .find(|(alias, _)| text.contains(alias))
        .map(|(_, canonical)| *canonical)
}

/// Catalog-derived vocabulary that has to be computed at startup: the known
/// color set and its boundary-matching patterns.
///
/// Colors are kept sorted so "first color found" scans are deterministic.
#[derive(Debug)]
pub struct Lexicon {
    known_colors: BTreeSet<String>,
    color_patterns: Vec<(String, Regex)>,
}

impl Lexicon {
    /// Union of every color in the catalog with [`EXTRA_COLORS`].
    pub fn from_catalog(catalog: &Catalog) -> Self {
        let mut known_colors: BTreeSet<String> = EXTRA_COLORS
            .iter()
            .map(|c| c.to_string())
            .collect();
        for product in catalog.products() {
            for color in &product.colors {
                known_colors.insert(color.to_lowercase());
            }
        }

        let color_patterns = known_colors
            .iter()
            .filter_map(|color| {
                Regex::new(&format!(r"\b{}\b", regex::escape(color)))
                    .ok()
                    .map(|re| (color.clone(), re))
            })
            .collect();

        Self {
            known_colors,
            color_patterns,
        }
    }

    pub fn known_colors(&self) -> impl Iterator<Item = &str> {
        self.known_colors.iter().map(String::as_str)
    }

    /// First known color appearing in `text` with token boundaries, in
    /// sorted-set order.
    pub fn find_color(&self, text: &str) -> Option<&str> {
        self.color_patterns
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(color, _)| color.as_str())
    }

    /// Up to `limit` known colors appearing anywhere in `text`, in
    /// sorted-set order (not input order).
    pub fn colors_in_text(&self, text: &str, limit: usize) -> Vec<String> {
        self.known_colors
            .iter()
            .filter(|color| text.contains(color.as_str()))
            .take(limit)
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Product};

    fn catalog() -> Catalog {
        Catalog::new(vec![Product {
            id: 1,
            name: "Graphic Tee".into(),
            category: "T-Shirts".into(),
            price: 9.99,
            stock: 1,
            sizes: vec![],
            colors: vec!["Burgundy".into()],
            fit: None,
            material: None,
            care: None,
            style_tips: vec![],
            image: None,
        }])
    }

    #[test]
    fn test_canonical_category_uses_table_order() {
        // "jackets" appears in the table after "jacket"; the substring
        // "jacket" wins because it comes first.
        assert_eq!(canonical_category("show me jackets"), Some("jacket"));
        assert_eq!(canonical_category("any t shirt deals"), Some("t-shirt"));
        assert_eq!(canonical_category("hello there"), None);
    }

    #[test]
    fn test_known_colors_include_catalog_and_extras() {
        let lexicon = Lexicon::from_catalog(&catalog());
        let colors: Vec<&str> = lexicon.known_colors().collect();
        assert!(colors.contains(&"burgundy"));
        assert!(colors.contains(&"navy"));
    }

    #[test]
    fn test_find_color_requires_token_boundaries() {
        let lexicon = Lexicon::from_catalog(&catalog());
        assert_eq!(lexicon.find_color("a navy jacket"), Some("navy"));
        // "rediscover" must not match "red".
        assert_eq!(lexicon.find_color("rediscover style"), None);
    }

    #[test]
    fn test_colors_in_text_caps_at_limit_in_sorted_order() {
        let lexicon = Lexicon::from_catalog(&catalog());
        let found = lexicon.colors_in_text("white or navy or black or red", 3);
        assert_eq!(found, vec!["black", "navy", "red"]);
    }
}
