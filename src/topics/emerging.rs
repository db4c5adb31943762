// Emerging topic detection.
//
// Split the corpus at a distinct-year boundary, cluster each side on its
// own, and flag new-period clusters that outgrew the largest old-period
// cluster. Old and new clusterings are not matched to each other: the
// comparison is aggregate cluster size against the biggest prior cluster.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::clusters::{compute_topics, TopicCluster};
use super::split::{distinct_years, partition, split_year};
use super::traits::TextEmbedder;
use crate::corpus::models::Paper;

/// Thresholds a new-period cluster must clear to count as emerging.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmergenceThresholds {
    /// new size / largest old size must exceed this (default 1.3)
    pub growth_ratio: f64,
    /// new size must exceed this (default 5)
    pub min_size: usize,
}

impl Default for EmergenceThresholds {
    fn default() -> Self {
        Self {
            growth_ratio: 1.3,
            min_size: 5,
        }
    }
}

impl EmergenceThresholds {
    /// Whether a cluster of `size` is emerging against a largest old cluster of `old_max`.
    pub fn is_emerging(&self, size: usize, old_max: usize) -> bool {
        let ratio = size as f64 / old_max.max(1) as f64;
        ratio > self.growth_ratio && size > self.min_size
    }
}

/// New-period clusters that grew past the thresholds, in new-period size order.
pub async fn compute_emerging_topics(
    embedder: &dyn TextEmbedder,
    papers: &[Paper],
    years_window: usize,
    k: usize,
    thresholds: &EmergenceThresholds,
) -> Result<Vec<TopicCluster>> {
    if papers.is_empty() || distinct_years(papers).len() < 2 {
        return Ok(Vec::new());
    }

    let Some(split) = split_year(papers, years_window) else {
        return Ok(Vec::new());
    };

    let (old, new) = partition(papers, split);

    let old_topics = compute_topics(embedder, old.iter().copied(), k).await?;
    let new_topics = compute_topics(embedder, new.iter().copied(), k).await?;

    if old_topics.is_empty() || new_topics.is_empty() {
        debug!(
            split_year = split,
            old_clusters = old_topics.len(),
            new_clusters = new_topics.len(),
            "Not enough clusters on one side of the split"
        );
        return Ok(Vec::new());
    }

    let old_max = old_topics.iter().map(|t| t.size).max().unwrap_or(0);

    let emerging: Vec<TopicCluster> = new_topics
        .into_iter()
        .filter(|t| thresholds.is_emerging(t.size, old_max))
        .collect();

    debug!(
        split_year = split,
        old_max = old_max,
        emerging = emerging.len(),
        "Computed emerging topics"
    );

    Ok(emerging)
}
