// Atom feed decoding for arXiv export API responses.
//
// Only the fields acquisition uses are modelled; everything else in the feed
// (links, authors, categories, arxiv: extensions) is skipped by serde.

use serde::Deserialize;

use super::traits::FetchedEntry;
use crate::error::FetchError;

#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "totalResults", alias = "opensearch:totalResults", default)]
    total_results: Option<String>,
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    published: Option<String>,
}

fn decode(xml: &str) -> Result<AtomFeed, FetchError> {
    quick_xml::de::from_str(xml).map_err(|e| FetchError::Parse {
        message: e.to_string(),
    })
}

/// Read the reported total-match count. A feed without one counts as zero.
pub fn parse_total_results(xml: &str) -> Result<u64, FetchError> {
    let feed = decode(xml)?;
    match feed.total_results {
        None => Ok(0),
        Some(raw) => raw.trim().parse::<u64>().map_err(|e| FetchError::Parse {
            message: format!("totalResults {raw:?}: {e}"),
        }),
    }
}

/// Read the entries of a fetch page, in feed order.
pub fn parse_entries(xml: &str) -> Result<Vec<FetchedEntry>, FetchError> {
    let feed = decode(xml)?;
    Ok(feed
        .entries
        .into_iter()
        .map(|entry| FetchedEntry {
            title: collapse_whitespace(&entry.title),
            abstract_text: entry
                .summary
                .map(|s| collapse_whitespace(&s))
                .filter(|s| !s.is_empty()),
            published: entry.published.map(|p| p.trim().to_string()),
            id: entry.id.trim().to_string(),
        })
        .collect())
}

/// arXiv hard-wraps titles and abstracts; fold each run of whitespace into a
/// single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
