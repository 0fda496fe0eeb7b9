//! Text normalization: tokenization, stop-word filtering and suffix stemming.
//!
//! Both the query side and the knowledge-base side go through the same
//! [`Normalizer`], so a token produced from a question and a token produced
//! from a curated keyword are directly comparable.
//!
//! Only ASCII letters and digits count as word characters. Anything else,
//! including accented or non-Latin letters, acts as a separator.

use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

// ============================================================================
// Static tables
// ============================================================================

/// Suffixes checked by [`Normalizer::stem`], in the order they are tried.
pub const SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "tion", "ness", "ment", "ful", "less", "ous", "ive", "able",
    "ible",
];

/// A stem must keep at least this many characters after stripping.
const MIN_STEM_LEN: usize = 3;

const STOP_WORD_LIST: &[&str] = &[
    "a", "an", "the", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had",
    "do", "does", "did", "will", "would", "could", "should", "may", "might", "must", "shall",
    "can", "need", "dare", "ought", "used", "to", "of", "in", "for", "on", "with", "at", "by",
    "from", "up", "about", "into", "over", "after", "i", "me", "my", "myself", "we", "our",
    "ours", "you", "your", "yours", "he", "him", "his", "she", "her", "hers", "it", "its",
    "they", "them", "their", "what", "which", "who", "whom", "this", "that", "these", "those",
    "am", "and", "but", "if", "or", "because", "as", "until", "while", "just", "only", "own",
    "same", "so", "than", "too", "very", "s", "t", "don", "now", "d", "ll", "m", "o", "re", "ve",
    "y", "ain", "aren", "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma",
    "mightn", "mustn", "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn", "please",
    "thanks", "thank", "hi", "hello", "hey",
];

lazy_static! {
    static ref STOP_WORDS: HashSet<&'static str> = STOP_WORD_LIST.iter().copied().collect();
    static ref RE_NON_WORD: Regex = Regex::new(r"[^a-z0-9\s]").unwrap();
}

// ============================================================================
// Normalizer
// ============================================================================

/// Tokenizer and stemmer backed by fixed stop-word and suffix tables.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    stop_words: &'static HashSet<&'static str>,
    suffixes: &'static [&'static str],
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            stop_words: &STOP_WORDS,
            suffixes: SUFFIXES,
        }
    }
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `word` is in the stop-word table.
    pub fn is_stop_word(&self, word: &str) -> bool {
        self.stop_words.contains(word)
    }

    /// Split text into lower-case, stop-word-free tokens, left to right.
    ///
    /// Punctuation becomes whitespace, so `"what's"` yields `"what"` and `"s"`,
    /// both of which are then dropped.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lower = text.to_lowercase();
        let cleaned = RE_NON_WORD.replace_all(&lower, " ");

        cleaned
            .split_whitespace()
            .filter(|word| word.chars().count() > 1 && !self.is_stop_word(word))
            .map(str::to_string)
            .collect()
    }

    /// Strip the first suffix in table order whose removal leaves a stem of at
    /// least three characters. One pass only: the result is not re-stemmed,
    /// so `stem(stem(w)) == stem(w)` does not hold in general.
    pub fn stem(&self, word: &str) -> String {
        let len = word.chars().count();

        for suffix in self.suffixes {
            if len >= suffix.len() + MIN_STEM_LEN && word.ends_with(suffix) {
                return word[..word.len() - suffix.len()].to_string();
            }
        }

        word.to_string()
    }

    /// Tokenize then stem every token.
    pub fn normalize(&self, text: &str) -> Vec<String> {
        self.tokenize(text)
            .into_iter()
            .map(|token| self.stem(&token))
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_lowercases_and_splits_punctuation() {
        let n = Normalizer::new();
        assert_eq!(
            n.tokenize("How LONG does shipping take?"),
            vec!["how", "long", "shipping", "take"]
        );
        assert_eq!(n.tokenize("eco-friendly,recycled"), vec!["eco", "friendly", "recycled"]);
    }

    #[test]
    fn test_tokenize_drops_stop_words_and_short_tokens() {
        let n = Normalizer::new();
        assert_eq!(n.tokenize("Hi! Can I get a refund, please?"), vec!["get", "refund"]);
        assert_eq!(n.tokenize("x y z 42"), vec!["42"]);
    }

    #[test]
    fn test_tokenize_degenerate_input() {
        let n = Normalizer::new();
        assert!(n.tokenize("").is_empty());
        assert!(n.tokenize("  ?!... ,, \t\n").is_empty());
        assert!(n.tokenize("the a is").is_empty());
    }

    #[test]
    fn test_tokenize_non_ascii_letters_are_separators() {
        let n = Normalizer::new();
        assert_eq!(n.tokenize("café order"), vec!["caf", "order"]);
        assert!(n.tokenize("日本語").is_empty());
    }

    #[test]
    fn test_tokens_are_clean() {
        let n = Normalizer::new();
        let samples = [
            "What's your RETURN policy??",
            "I_forgot my pass-word (again)!",
            "Do you ship to Zürich, Ångström or 東京?",
            "   spaced\tout\nlines   ",
        ];
        for text in samples {
            for token in n.tokenize(text) {
                assert!(token.len() > 1, "short token {token:?} from {text:?}");
                assert!(!n.is_stop_word(&token), "stop word {token:?} from {text:?}");
                assert!(
                    token
                        .chars()
                        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()),
                    "unclean token {token:?} from {text:?}"
                );
            }
        }
    }

    #[test]
    fn test_stem_strips_first_matching_suffix() {
        let n = Normalizer::new();
        assert_eq!(n.stem("running"), "runn");
        assert_eq!(n.stem("shipping"), "shipp");
        assert_eq!(n.stem("tracked"), "track");
        assert_eq!(n.stem("quickly"), "quick");
        assert_eq!(n.stem("information"), "informa");
        assert_eq!(n.stem("payment"), "pay");
    }

    #[test]
    fn test_stem_respects_minimum_length() {
        let n = Normalizer::new();
        // "sing" minus "ing" would leave one character
        assert_eq!(n.stem("sing"), "sing");
        assert_eq!(n.stem("red"), "red");
        // exactly three characters left is allowed
        assert_eq!(n.stem("boxed"), "box");
        assert_eq!(n.stem("fly"), "fly");
    }

    #[test]
    fn test_stem_is_single_pass() {
        let n = Normalizer::new();
        // only one suffix is ever removed
        assert_eq!(n.stem("runner"), "runn");
        assert_eq!(n.stem(&n.stem("running")), "runn");
        // "helpfulness" -> "helpful" via "ness", not further reduced to "help"
        assert_eq!(n.stem("helpfulness"), "helpful");
        assert_eq!(n.stem("helpful"), "help");
    }

    #[test]
    fn test_stem_leaves_unmatched_words() {
        let n = Normalizer::new();
        assert_eq!(n.stem("refund"), "refund");
        assert_eq!(n.stem("send back"), "send back");
    }

    #[test]
    fn test_normalize_tokenizes_then_stems() {
        let n = Normalizer::new();
        assert_eq!(
            n.normalize("Tracking my shipped order"),
            vec!["track", "shipp", "ord"]
        );
        assert_eq!(n.normalize("hello there!"), vec!["there"]);
    }
}
