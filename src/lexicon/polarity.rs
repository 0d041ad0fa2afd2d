//! Subjectivity wordlist and aggregate polarity scoring.
//!
//! The external lexicon uses the MPQA subjectivity format: one record per
//! line of `key=value` tokens, of which `word1`, `priorpolarity` and `type`
//! (strongsubj/weaksubj) are consumed here. Loading is fail-soft: a missing
//! or unreadable file degrades the classifier signals that depend on it
//! instead of failing the turn.

use std::collections::HashSet;
use std::io;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z']+").unwrap());

/// Small embedded wordlists backing the aggregate score when no external
/// lexicon is available.
const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "excellent", "love", "amazing", "wonderful", "happy",
    "fantastic", "awesome", "best", "nice", "perfect", "helpful", "thanks",
];
const EMBEDDED_STRONG_NEGATIVE: &[&str] = &[
    "awful", "horrible", "disgusting", "dreadful", "atrocious", "appalling", "garbage",
];

/// Negative-polarity wordlist split by subjectivity strength.
#[derive(Debug, Default)]
pub struct PolarityLexicon {
    strong_negative: HashSet<String>,
    weak_negative: HashSet<String>,
}

impl PolarityLexicon {
    /// An empty lexicon; strong/weak hit counts are always zero and the
    /// aggregate score falls back to the embedded wordlists.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse an MPQA-style `.tff` file.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut lexicon = Self::default();

        for line in raw.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut word = None;
            let mut polarity = None;
            let mut strength = None;
            for token in line.split_whitespace() {
                if let Some((key, value)) = token.split_once('=') {
                    match key {
                        "word1" => word = Some(value),
                        "priorpolarity" => polarity = Some(value),
                        "type" => strength = Some(value),
                        _ => {}
                    }
                }
            }

            let (Some(word), Some("negative")) = (word, polarity) else {
                continue;
            };
            let word = word.to_lowercase();
            if strength == Some("strongsubj") {
                lexicon.strong_negative.insert(word);
            } else {
                lexicon.weak_negative.insert(word);
            }
        }

        Ok(lexicon)
    }

    /// Load from `path` when given, degrading to an empty lexicon with a
    /// warning on any failure.
    pub fn load_or_default(path: Option<&Path>) -> Self {
        match path {
            Some(path) => match Self::load(path) {
                Ok(lexicon) => {
                    tracing::info!(
                        path = %path.display(),
                        strong = lexicon.strong_negative.len(),
                        weak = lexicon.weak_negative.len(),
                        "polarity lexicon loaded"
                    );
                    lexicon
                }
                Err(err) => {
                    tracing::warn!(
                        path = %path.display(),
                        %err,
                        "polarity lexicon unavailable; degrading to embedded wordlists"
                    );
                    Self::empty()
                }
            },
            None => Self::empty(),
        }
    }

    pub fn strong_hits(&self, words: &[String]) -> usize {
        words
            .iter()
            .filter(|w| self.strong_negative.contains(*w))
            .count()
    }

    pub fn weak_hits(&self, words: &[String]) -> usize {
        words
            .iter()
            .filter(|w| self.weak_negative.contains(*w))
            .count()
    }

    /// Aggregate polarity of `text` in `[-1, 1]`: the mean weight of
    /// sentiment-bearing words (+1 positive, -1 strong negative, -0.5 weak
    /// negative), or 0.0 when none occur.
    pub fn score(&self, text: &str) -> f32 {
        let lower = text.to_lowercase();
        let mut sum = 0.0f32;
        let mut hits = 0u32;

        for word in WORD_RE.find_iter(&lower).map(|m| m.as_str()) {
            let weight = if POSITIVE_WORDS.contains(&word) {
                1.0
            } else if self.strong_negative.contains(word)
                || EMBEDDED_STRONG_NEGATIVE.contains(&word)
            {
                -1.0
            } else if self.weak_negative.contains(word) {
                -0.5
            } else {
                continue;
            };
            sum += weight;
            hits += 1;
        }

        if hits == 0 {
            0.0
        } else {
            sum / hits as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lexicon() -> PolarityLexicon {
        let mut lex = PolarityLexicon::empty();
        lex.strong_negative.insert("abysmal".into());
        lex.weak_negative.insert("slow".into());
        lex.weak_negative.insert("confusing".into());
        lex
    }

    #[test]
    fn test_hit_counts() {
        let lex = lexicon();
        let words: Vec<String> = ["this", "is", "abysmal", "and", "slow"]
            .iter()
            .map(|w| w.to_string())
            .collect();
        assert_eq!(lex.strong_hits(&words), 1);
        assert_eq!(lex.weak_hits(&words), 1);
    }

    #[test]
    fn test_score_is_zero_for_neutral_text() {
        assert_eq!(lexicon().score("where is the store"), 0.0);
    }

    #[test]
    fn test_score_range_and_sign() {
        let lex = lexicon();
        assert_eq!(lex.score("this is awful"), -1.0);
        assert_eq!(lex.score("this is great"), 1.0);
        // One weak negative averages above the -0.4 frustration threshold.
        assert_eq!(lex.score("a slow page"), -0.5);
    }

    #[test]
    fn test_missing_file_degrades_to_empty() {
        let lex = PolarityLexicon::load_or_default(Some(Path::new("/nonexistent/lexicon.tff")));
        assert_eq!(lex.strong_hits(&["abysmal".to_string()]), 0);
    }
}
