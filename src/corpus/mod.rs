// Corpus layer: line-delimited JSON storage for fetched paper metadata.
//
// One corpus file per (source, query, year span). Acquisition writes it from
// scratch on every run; analysis only ever reads it.

pub mod models;
pub mod store;

use std::path::{Path, PathBuf};

/// Build the corpus file path for a query, e.g. `data/arxiv_federated_learning_5y.jsonl`.
///
/// Whitespace and path separators in the query become underscores so the
/// query can never escape `data_dir`.
pub fn corpus_path(data_dir: &Path, source: &str, query: &str, years: u32) -> PathBuf {
    let slug: String = query
        .trim()
        .chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect();

    data_dir.join(format!("{}_{}_{}y.jsonl", source.to_lowercase(), slug, years))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_path_replaces_spaces() {
        let path = corpus_path(Path::new("data"), "arXiv", "federated learning", 5);
        assert_eq!(path, PathBuf::from("data/arxiv_federated_learning_5y.jsonl"));
    }

    #[test]
    fn test_corpus_path_neutralizes_separators() {
        let path = corpus_path(Path::new("data"), "arxiv", "../etc/passwd", 1);
        assert_eq!(path.parent(), Some(Path::new("data")));
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some("arxiv_.._etc_passwd_1y.jsonl")
        );
    }
}
