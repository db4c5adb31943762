// TF-IDF keyword labels for topic clusters.
//
// Uses the `keyword_extraction` crate over a cluster's member titles, each
// title treated as its own document. Terms that appear in every title get
// downweighted, terms distinctive to part of the cluster get boosted. The
// result is a short keyword list that names what a cluster is about.

use keyword_extraction::tf_idf::{TfIdf, TfIdfParams};
use stop_words::{get, LANGUAGE};

use super::tokenize::STOP_WORDS;

/// Keywords kept per cluster.
pub const KEYWORDS_PER_CLUSTER: usize = 5;

/// English stop words plus the title-specific filler set.
fn stop_list() -> Vec<String> {
    let mut stop_words: Vec<String> = get(LANGUAGE::English);
    stop_words.extend(STOP_WORDS.iter().map(|w| w.to_string()));
    stop_words
}

/// Rank the most distinctive terms across a set of titles.
///
/// Returns at most `top_n` terms, best first. Empty input gives an empty list.
pub fn title_keywords(titles: &[String], top_n: usize) -> Vec<String> {
    if titles.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let stop_words = stop_list();
    let params = TfIdfParams::UnprocessedDocuments(titles, &stop_words, None);
    let tfidf = TfIdf::new(params);

    tfidf
        .get_ranked_word_scores(top_n)
        .into_iter()
        .map(|(word, _score)| word)
        .filter(|word| word.chars().count() > 2)
        .take(top_n)
        .collect()
}

/// Human-readable label from the first few keywords, e.g. "privacy / aggregation".
pub fn label_from_keywords(keywords: &[String]) -> String {
    let label_words: Vec<&str> = keywords.iter().take(3).map(|s| s.as_str()).collect();
    label_words.join(" / ")
}
