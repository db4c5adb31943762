// Data models: the records that flow from acquisition into analysis.
//
// `Paper` is exactly what one corpus line holds. The count maps are kept as
// BTreeMaps so they serialize in calendar order.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// One published item as stored in the corpus file.
///
/// `year`, `month` and `source` are stamped from the acquisition loop, not
/// parsed from the provider payload. Unknown fields in a stored line are
/// ignored so older readers keep working as the format grows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    #[serde(default)]
    pub title: String,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    pub year: i32,
    pub month: u32,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub doi: Option<String>,
    /// Never populated by the arXiv source; kept for format compatibility.
    #[serde(default)]
    pub citation_count: Option<u64>,
}

impl Paper {
    /// The title if it can take part in lexical or semantic analysis.
    pub fn usable_title(&self) -> Option<&str> {
        let title = self.title.trim();
        if title.is_empty() {
            None
        } else {
            Some(title)
        }
    }
}

/// Provider-reported match totals: year -> (month -> count).
pub type MonthlyCounts = BTreeMap<i32, BTreeMap<u32, u64>>;

/// Papers actually fetched and persisted: year -> count.
pub type YearlyCounts = BTreeMap<i32, u64>;

/// What an acquisition run leaves behind for trend reporting.
///
/// `monthly_counts` holds the provider's reported totals while
/// `yearly_counts` holds what was actually written, capped per month, so the
/// two need not agree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusSummary {
    pub file_path: PathBuf,
    pub monthly_counts: MonthlyCounts,
    pub yearly_counts: YearlyCounts,
    pub total: u64,
}

/// Count papers per year from a loaded corpus.
pub fn yearly_counts(papers: &[Paper]) -> YearlyCounts {
    let mut counts = YearlyCounts::new();
    for paper in papers {
        *counts.entry(paper.year).or_insert(0) += 1;
    }
    counts
}
