//! Tokenizer: turns free text into a set of lowercase keyword tokens.
//!
//! Purely lexical: maximal runs of word characters (letters, digits and
//! underscore) of at least three characters, case-folded, minus stopwords.
//! No stemming. Combining marks and connector punctuation other than `_`
//! end a run, so `cafe\u{301}` yields `cafe`.

use std::collections::{BTreeSet, HashSet};

use regex::Regex;

/// Runs of word characters shorter than this never become tokens.
pub const MIN_TOKEN_LEN: usize = 3;

/// Maximal run of letters, digits and underscore. Narrower than Unicode `\w`,
/// which also admits marks, connector punctuation and join controls.
const WORD_RUN: &str = r"[\p{L}\p{N}_]+";

/// Closed English stopword list. Membership is exact equality after lowercasing.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "the", "and", "for", "are", "but", "not", "you", "all", "any", "can", "had", "her", "was",
    "one", "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old",
    "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too", "use",
    "a", "an", "in", "on", "at", "to", "of", "is", "it", "as", "by", "be", "or", "if", "with",
    "from", "this", "that", "these", "those", "their", "there", "which", "so", "such", "then",
    "than", "also", "have", "will", "would", "should", "could", "may", "might", "must", "do",
    "does", "been", "were", "am", "i", "we", "he", "they", "them", "my", "your", "me", "us",
    "theirs", "ours", "yours", "mine", "about", "above", "after", "again", "against", "below",
    "between", "down", "during", "each", "few", "more", "most", "other", "some", "no", "nor",
    "only", "own", "same", "very", "s", "t", "just", "don",
];

/// Distinct normalized tokens. Ordered so that anything enumerated from it
/// (intersections, contributions) comes out lexicographically sorted.
pub type TokenSet = BTreeSet<String>;

/// Extracts [`TokenSet`]s from text using an injected stopword set.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    word: Regex,
    stopwords: HashSet<String>,
}

impl Tokenizer {
    pub fn new(stopwords: HashSet<String>) -> Self {
        Self {
            word: Regex::new(WORD_RUN).expect("token pattern is a valid regex"),
            stopwords: stopwords.into_iter().map(|w| w.to_lowercase()).collect(),
        }
    }

    pub fn english() -> Self {
        Self::new(english_stopwords())
    }

    /// Normalizes `text` into a token set. Never fails; empty input gives an empty set.
    pub fn tokenize(&self, text: &str) -> TokenSet {
        self.word
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|run| run.chars().count() >= MIN_TOKEN_LEN)
            .map(str::to_lowercase)
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }

    /// Tokenizes several text fields as if they were joined with a space.
    pub fn tokenize_fields(&self, fields: &[&str]) -> TokenSet {
        self.tokenize(&fields.join(" "))
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::english()
    }
}

pub fn english_stopwords() -> HashSet<String> {
    ENGLISH_STOPWORDS.iter().map(|w| w.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tokens(text: &str) -> Vec<String> {
        Tokenizer::english().tokenize(text).into_iter().collect()
    }

    #[test]
    fn test_extracts_lowercase_tokens_and_drops_stopwords() {
        assert_eq!(
            tokens("Python backend engineer with SQL experience"),
            vec!["backend", "engineer", "experience", "python", "sql"]
        );
    }

    #[test]
    fn test_short_runs_are_rejected_not_truncated() {
        // "Go" and "CI" are two characters; "C++" yields only "C".
        assert!(tokens("Go CI C++ UI").is_empty());
    }

    #[test]
    fn test_tokens_split_on_punctuation() {
        assert_eq!(
            tokens("node.js, REST-api; k8s"),
            vec!["api", "k8s", "node", "rest"]
        );
    }

    #[test]
    fn test_digits_and_underscore_are_word_characters() {
        assert_eq!(tokens("snake_case 2024"), vec!["2024", "snake_case"]);
    }

    #[test]
    fn test_combining_mark_ends_a_run() {
        // NFD "café": the acute accent is a mark, not a word character.
        assert_eq!(tokens("cafe\u{0301}"), vec!["cafe"]);
        assert_eq!(tokens("resume\u{0301} writing"), vec!["resume", "writing"]);
    }

    #[test]
    fn test_connector_punctuation_splits_runs() {
        // U+203F UNDERTIE is connector punctuation, unlike '_'.
        assert!(tokens("ab\u{203F}cd").is_empty());
        assert_eq!(tokens("rust\u{203F}tokio"), vec!["rust", "tokio"]);
    }

    #[test]
    fn test_non_latin_letters_and_digits_are_word_characters() {
        assert_eq!(tokens("Ünïcödé ١٢٣"), vec!["ünïcödé", "١٢٣"]);
    }

    #[test]
    fn test_duplicates_collapse() {
        assert_eq!(tokens("Rust rust RUST"), vec!["rust"]);
    }

    #[test]
    fn test_empty_text_gives_empty_set() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \n\t").is_empty());
    }

    #[test]
    fn test_stopword_match_is_case_insensitive() {
        assert!(tokens("THE And WITH").is_empty());
    }

    #[test]
    fn test_custom_stopwords() {
        let tokenizer = Tokenizer::new(["Rust".to_string()].into_iter().collect());
        let set = tokenizer.tokenize("rust and python");
        assert!(!set.contains("rust"));
        assert!(set.contains("and"));
        assert!(set.contains("python"));
    }

    #[test]
    fn test_tokenize_fields_joins_with_space() {
        let tokenizer = Tokenizer::english();
        let set = tokenizer.tokenize_fields(&["data", "base"]);
        assert!(set.contains("data"));
        assert!(set.contains("base"));
        assert!(!set.contains("database"));
    }

    proptest! {
        #[test]
        fn prop_tokens_are_long_lowercase_non_stopwords(text in "[a-zA-Z0-9_ ,.éÉ-]{0,200}") {
            let stopwords = english_stopwords();
            for token in Tokenizer::english().tokenize(&text) {
                prop_assert!(token.chars().count() >= MIN_TOKEN_LEN);
                prop_assert_eq!(token.to_lowercase(), token.clone());
                prop_assert!(!stopwords.contains(&token));
            }
        }
    }
}
