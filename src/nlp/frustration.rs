//! Lexical frustration classification.
//!
//! An ordered cascade of cheap deterministic rules; the first rule with an
//! opinion decides and later rules are never consulted. The statistical
//! aggregate-polarity fallback only runs when every lexical rule abstains.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::lexicon::polarity::PolarityLexicon;
use crate::lexicon::{
    FRUSTRATION_EMOJIS, FRUSTRATION_PHRASES, NEGATIVE_PUNCTUATION, NEGATIVE_WORDS, SWEAR_WORDS,
};

/// Aggregate polarity below this marks the turn as frustrated.
const POLARITY_THRESHOLD: f32 = -0.4;

/// Greetings that are never frustrated, whatever else they contain.
const GREETING_ALLOWLIST: &[&str] = &["hi", "hello", "hey", "hya"];

static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z']+").unwrap());

/// One turn, pre-tokenized for the rules.
struct TurnText<'a> {
    /// Original-case text; the punctuation and emoji rules need it.
    raw: &'a str,
    lower: String,
    words: Vec<String>,
}

impl<'a> TurnText<'a> {
    fn new(raw: &'a str) -> Self {
        let lower = raw.to_lowercase().trim().to_string();
        let words = WORD_RE
            .find_iter(&lower)
            .map(|m| m.as_str().to_string())
            .collect();
        Self { raw, lower, words }
    }
}

type FrustrationRule = fn(&FrustrationClassifier, &TurnText<'_>) -> Option<bool>;

/// The cascade, in decision order. A rule returns `Some(verdict)` to decide
/// the turn or `None` to pass to the next rule.
const RULES: &[(&str, FrustrationRule)] = &[
    ("greeting-allowlist", FrustrationClassifier::rule_greeting),
    ("frustration-phrase", FrustrationClassifier::rule_phrases),
    ("clustered-punctuation", FrustrationClassifier::rule_punctuation),
    ("emoji", FrustrationClassifier::rule_emoji),
    ("profanity", FrustrationClassifier::rule_profanity),
    ("negative-word", FrustrationClassifier::rule_negative_words),
    ("polarity-lexicon", FrustrationClassifier::rule_polarity_lexicon),
];

/// Boolean frustration classifier over the frustration lexicon and an
/// optional external polarity wordlist.
#[derive(Debug, Default)]
pub struct FrustrationClassifier {
    polarity: PolarityLexicon,
}

impl FrustrationClassifier {
    pub fn new(polarity: PolarityLexicon) -> Self {
        Self { polarity }
    }

    /// Classify one turn. `text` must be the original, uncorrected message:
    /// the punctuation rule inspects the original-case form.
    pub fn is_frustrated(&self, text: &str) -> bool {
        let turn = TurnText::new(text);

        for (name, rule) in RULES {
            if let Some(verdict) = rule(self, &turn) {
                tracing::trace!(rule = name, verdict, "frustration cascade decided");
                return verdict;
            }
        }

        let score = self.polarity.score(turn.raw);
        tracing::trace!(score, "frustration cascade fell through to polarity score");
        score < POLARITY_THRESHOLD
    }

    fn rule_greeting(&self, turn: &TurnText<'_>) -> Option<bool> {
        GREETING_ALLOWLIST
            .contains(&turn.lower.as_str())
            .then_some(false)
    }

    fn rule_phrases(&self, turn: &TurnText<'_>) -> Option<bool> {
        FRUSTRATION_PHRASES
            .iter()
            .any(|p| turn.lower.contains(p))
            .then_some(true)
    }

    fn rule_punctuation(&self, turn: &TurnText<'_>) -> Option<bool> {
        NEGATIVE_PUNCTUATION
            .iter()
            .any(|p| turn.raw.contains(p))
            .then_some(true)
    }

    fn rule_emoji(&self, turn: &TurnText<'_>) -> Option<bool> {
        FRUSTRATION_EMOJIS
            .iter()
            .any(|e| turn.raw.contains(e))
            .then_some(true)
    }

    fn rule_profanity(&self, turn: &TurnText<'_>) -> Option<bool> {
        (turn.words.len() >= 2
            && turn
                .words
                .iter()
                .any(|w| SWEAR_WORDS.contains(&w.as_str())))
        .then_some(true)
    }

    fn rule_negative_words(&self, turn: &TurnText<'_>) -> Option<bool> {
        turn.words
            .iter()
            .any(|w| NEGATIVE_WORDS.contains(&w.as_str()))
            .then_some(true)
    }

    fn rule_polarity_lexicon(&self, turn: &TurnText<'_>) -> Option<bool> {
        if self.polarity.strong_hits(&turn.words) >= 1 {
            return Some(true);
        }
        if self.polarity.weak_hits(&turn.words) >= 2 {
            return Some(true);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classifier() -> FrustrationClassifier {
        FrustrationClassifier::new(PolarityLexicon::empty())
    }

    #[test]
    fn test_greeting_is_never_frustrated() {
        assert!(!classifier().is_frustrated("hi"));
        assert!(!classifier().is_frustrated("Hello"));
    }

    #[test]
    fn test_phrase_hit() {
        assert!(classifier().is_frustrated("the search is not working"));
    }

    #[test]
    fn test_clustered_punctuation_in_original_case() {
        assert!(classifier().is_frustrated("this is so broken!!"));
        assert!(classifier().is_frustrated("where is my order??"));
        assert!(!classifier().is_frustrated("where is my order?"));
    }

    #[test]
    fn test_emoji_hit() {
        assert!(classifier().is_frustrated("great 😡"));
    }

    #[test]
    fn test_profanity_needs_two_words() {
        assert!(classifier().is_frustrated("damn thing"));
        // A lone swear word abstains and nothing later fires.
        assert!(!classifier().is_frustrated("damn"));
    }

    #[test]
    fn test_negative_word_hit() {
        assert!(classifier().is_frustrated("this page is useless"));
    }

    #[test]
    fn test_polarity_lexicon_thresholds() {
        let raw = "type=strongsubj word1=abysmal priorpolarity=negative\n\
                   type=weaksubj word1=slow priorpolarity=negative\n\
                   type=weaksubj word1=clunky priorpolarity=negative\n";
        let path = std::env::temp_dir().join("outfitter-polarity-test.tff");
        std::fs::write(&path, raw).unwrap();
        let classifier = FrustrationClassifier::new(PolarityLexicon::load(&path).unwrap());

        // One strong hit decides.
        assert!(classifier.is_frustrated("an abysmal experience"));
        // One weak hit abstains, two decide.
        assert!(!classifier.is_frustrated("a slow page"));
        assert!(classifier.is_frustrated("a slow clunky page"));
    }

    #[test]
    fn test_neutral_text_falls_through_to_false() {
        assert!(!classifier().is_frustrated("do you sell scarves"));
    }
}
