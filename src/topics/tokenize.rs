// Title tokenizer for lexical frequency analysis.
//
// Lowercase, blank out everything but [a-z0-9], whitespace and '-', split
// on whitespace, then drop short tokens and stop words. Pure function of the
// input string.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Tokens of this many characters or fewer are dropped.
pub const MIN_TOKEN_CHARS: usize = 2;

/// Articles, prepositions, conjunctions, pronouns, auxiliaries, and the
/// filler words that show up in almost every paper title.
pub const STOP_WORDS: &[&str] = &[
    // articles, determiners
    "a", "an", "the", "this", "that", "these", "those", "each", "every", "any", "all",
    "some", "such", "its", "their", "our", "your", "his", "her",
    // prepositions
    "of", "in", "on", "at", "to", "for", "from", "with", "without", "by", "about",
    "into", "onto", "over", "under", "via", "through", "across", "between", "among",
    "within", "towards", "toward", "against", "beyond", "upon", "after", "before",
    "during",
    // conjunctions
    "and", "or", "but", "nor", "yet", "so", "versus", "than", "then", "when", "where",
    "while", "whether",
    // pronouns, auxiliaries, question words
    "we", "you", "they", "it", "is", "are", "was", "were", "be", "been", "being", "can",
    "could", "do", "does", "how", "what", "which", "who", "why", "not", "more", "most",
    "very", "also",
    // academic filler
    "new", "novel", "method", "methods", "approach", "approaches", "analysis", "study",
    "studies", "paper", "using", "based", "framework", "results", "problem", "problems",
    "application", "applications", "case",
];

static STOP_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

static NON_TOKEN_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9\s-]").expect("valid regex"));

/// Whether a lowercase token is in the fixed stop-word set.
pub fn is_stop_word(token: &str) -> bool {
    STOP_SET.contains(token)
}

/// Tokenize a title into lowercase content words.
pub fn tokenize(title: &str) -> Vec<String> {
    let lower = title.to_lowercase();
    let cleaned = NON_TOKEN_CHARS.replace_all(&lower, " ");

    cleaned
        .split_whitespace()
        .filter(|t| t.chars().count() > MIN_TOKEN_CHARS)
        .filter(|t| !is_stop_word(t))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_stop_words_and_short_tokens() {
        assert_eq!(
            tokenize("A New Approach to Federated Learning"),
            vec!["federated", "learning"]
        );
    }

    #[test]
    fn test_punctuation_becomes_whitespace() {
        assert_eq!(
            tokenize("Graph-Based Models: GNNs (revisited)!"),
            vec!["graph-based", "models", "gnns", "revisited"]
        );
    }

    #[test]
    fn test_digits_survive() {
        assert_eq!(tokenize("GPT4 and 3D vision"), vec!["gpt4", "vision"]);
    }

    #[test]
    fn test_non_ascii_letters_are_separators() {
        // Lowercased non-ASCII letters fall outside [a-z0-9] and split tokens.
        assert_eq!(tokenize("Schrödinger bridges"), vec!["schr", "dinger", "bridges"]);
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t  ").is_empty());
        assert!(tokenize("of the in a").is_empty());
    }

    #[test]
    fn test_is_stop_word() {
        assert!(is_stop_word("approach"));
        assert!(is_stop_word("the"));
        assert!(!is_stop_word("transformer"));
    }
}
