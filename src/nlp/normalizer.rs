//! Token-level spell correction against the store dictionary.
//!
//! The dictionary is a frequency list: an embedded general-English list
//! (optionally overridden by an external file in the same `word count`
//! format) merged with the catalog's product and category names, the store
//! vocabulary and the greeting words. Lookup picks the entry within edit
//! distance 2, ranked by distance then frequency. Tokens containing digits
//! and measurement-unit tokens pass through untouched.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Catalog;
use crate::lexicon::{GREETING_WORDS, STORE_WORDS, UNIT_TOKENS};

const EMBEDDED_DICTIONARY: &str = include_str!("../../data/frequency_en.txt");
const MAX_EDIT_DISTANCE: usize = 2;

static LOOKUP_KEY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9']").unwrap());

/// Spell corrector over a fixed frequency dictionary.
#[derive(Debug)]
pub struct SpellCorrector {
    /// Entries ordered by descending frequency, then alphabetically, so the
    /// first acceptable candidate in a scan is the canonical tie-break.
    entries: Vec<(String, u64)>,
    index: HashMap<String, u64>,
}

impl SpellCorrector {
    /// Build the dictionary for `catalog`. `dictionary_path` overrides the
    /// embedded general-English list; if it cannot be read the embedded list
    /// is used and a warning is logged.
    pub fn from_catalog(catalog: &Catalog, dictionary_path: Option<&Path>) -> Self {
        let base = match dictionary_path {
            Some(path) => match std::fs::read_to_string(path) {
                Ok(raw) => raw,
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        %err,
                        "dictionary unavailable; falling back to embedded frequency list"
                    );
                    EMBEDDED_DICTIONARY.to_string()
                }
            },
            None => EMBEDDED_DICTIONARY.to_string(),
        };

        let mut index: HashMap<String, u64> = HashMap::new();
        for line in base.lines() {
            let mut parts = line.split_whitespace();
            let (Some(word), Some(count)) = (parts.next(), parts.next()) else {
                continue;
            };
            if let Ok(count) = count.parse::<u64>() {
                let entry = index.entry(word.to_lowercase()).or_insert(0);
                *entry = (*entry).max(count);
            }
        }

        for product in catalog.products() {
            let name = product.name.to_lowercase();
            index.entry(name.clone()).or_insert(1);
            // Individual name words too, so multi-word names survive
            // token-by-token correction.
            for word in name.split_whitespace() {
                index.entry(word.to_string()).or_insert(1);
            }
            index.entry(product.category.to_lowercase()).or_insert(1);
        }
        for word in STORE_WORDS.iter().chain(GREETING_WORDS) {
            index.entry(word.to_lowercase()).or_insert(1);
        }

        let mut entries: Vec<(String, u64)> = index
            .iter()
            .map(|(w, c)| (w.clone(), *c))
            .collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        Self { entries, index }
    }

    /// Correct `text`, returning a lowercase rewrite with the token count
    /// preserved. With an empty dictionary the text passes through
    /// unchanged (lowercased).
    pub fn correct(&self, text: &str) -> String {
        let lower = text.to_lowercase();
        if self.entries.is_empty() {
            return lower;
        }

        let corrected: Vec<String> = lower
            .split_whitespace()
            .map(|token| self.correct_token(token))
            .collect();
        corrected.join(" ")
    }

    fn correct_token(&self, token: &str) -> String {
        if token.chars().any(|c| c.is_ascii_digit()) {
            return token.to_string();
        }

        let key = LOOKUP_KEY_RE.replace_all(token, "").into_owned();
        if key.is_empty() || UNIT_TOKENS.contains(&key.as_str()) {
            return token.to_string();
        }
        if self.index.contains_key(&key) {
            return token.to_string();
        }

        match self.lookup(&key) {
            Some(suggestion) => suggestion.to_string(),
            None => token.to_string(),
        }
    }

    /// Nearest dictionary entry within [`MAX_EDIT_DISTANCE`], ranked by edit
    /// distance then frequency.
    fn lookup(&self, key: &str) -> Option<&str> {
        let mut best: Option<(&str, usize)> = None;

        for (word, _) in &self.entries {
            // Length difference is a lower bound on edit distance.
            if word.len().abs_diff(key.len()) > MAX_EDIT_DISTANCE {
                continue;
            }
            let distance = strsim::levenshtein(word, key);
            if distance > MAX_EDIT_DISTANCE {
                continue;
            }
            // Entries are pre-sorted by frequency, so only a strictly
            // closer candidate displaces the current best.
            if best.map_or(true, |(_, d)| distance < d) {
                if distance == 0 {
                    return Some(word);
                }
                best = Some((word, distance));
            }
        }

        best.map(|(word, _)| word)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Product};

    fn corrector() -> SpellCorrector {
        let catalog = Catalog::new(vec![Product {
            id: 1,
            name: "Mona Lisa Tee".into(),
            category: "T-Shirts".into(),
            price: 19.99,
            stock: 1,
            sizes: vec![],
            colors: vec![],
            fit: None,
            material: None,
            care: None,
            style_tips: vec![],
            image: None,
        }]);
        SpellCorrector::from_catalog(&catalog, None)
    }

    #[test]
    fn test_token_count_is_preserved() {
        let corrector = corrector();
        let input = "shwo me the jackts please";
        let output = corrector.correct(input);
        assert_eq!(
            input.split_whitespace().count(),
            output.split_whitespace().count()
        );
    }

    #[test]
    fn test_corrects_store_vocabulary() {
        let corrector = corrector();
        assert_eq!(corrector.correct("jackts"), "jackets");
        assert_eq!(corrector.correct("hodie"), "hoodie");
    }

    #[test]
    fn test_known_words_pass_through() {
        let corrector = corrector();
        assert_eq!(corrector.correct("show me jackets"), "show me jackets");
        assert_eq!(corrector.correct("mona lisa tee"), "mona lisa tee");
    }

    #[test]
    fn test_digits_and_units_are_untouched() {
        let corrector = corrector();
        assert_eq!(corrector.correct("177cm 77kg"), "177cm 77kg");
        assert_eq!(corrector.correct("5 ft 11 in"), "5 ft 11 in");
    }

    #[test]
    fn test_output_is_lowercase() {
        let corrector = corrector();
        assert_eq!(corrector.correct("SHOW ME Jackets"), "show me jackets");
    }

    #[test]
    fn test_unknown_tokens_far_from_dictionary_are_kept() {
        let corrector = corrector();
        assert_eq!(corrector.correct("qqqqzzzzqqqq"), "qqqqzzzzqqqq");
    }
}
