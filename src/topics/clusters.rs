// Semantic topic clustering of paper titles.
//
// Embed every usable title, run seeded k-means, then describe each cluster
// by its size, the titles nearest its centroid, and a few TF-IDF keywords.
// Clusters come back largest first.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::embeddings::{centroid, euclidean_distance};
use super::kmeans::{kmeans, DEFAULT_SEED};
use super::tfidf::{title_keywords, KEYWORDS_PER_CLUSTER};
use super::traits::TextEmbedder;
use crate::corpus::models::Paper;

/// Representative titles kept per cluster.
pub const REPRESENTATIVES_PER_CLUSTER: usize = 3;

/// One cluster of semantically similar titles.
///
/// `topic_id` is the k-means label: stable for identical input, but carries
/// no meaning across runs on different paper sets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicCluster {
    pub topic_id: usize,
    pub size: usize,
    /// Member titles nearest the centroid, nearest first
    pub representative_titles: Vec<String>,
    /// Distinctive terms across member titles, best first
    pub keywords: Vec<String>,
}

/// Cluster the titles of `papers` into `k` topics.
///
/// Empty when `k` is zero, there are fewer papers than `k`, or fewer usable
/// titles than `k`. Only embedding failures are errors.
pub async fn compute_topics<'a>(
    embedder: &dyn TextEmbedder,
    papers: impl IntoIterator<Item = &'a Paper>,
    k: usize,
) -> Result<Vec<TopicCluster>> {
    let papers: Vec<&Paper> = papers.into_iter().collect();
    if k == 0 || papers.len() < k {
        return Ok(Vec::new());
    }

    let titles: Vec<String> = papers
        .iter()
        .filter_map(|p| p.usable_title())
        .map(str::to_string)
        .collect();

    if titles.len() < k {
        return Ok(Vec::new());
    }

    let embeddings = embedder
        .embed_batch(&titles)
        .await
        .context("Failed to embed titles for clustering")?;

    if embeddings.len() != titles.len() {
        anyhow::bail!(
            "Embedder returned {} vectors for {} titles",
            embeddings.len(),
            titles.len()
        );
    }

    let Some(result) = kmeans(&embeddings, k, DEFAULT_SEED) else {
        return Ok(Vec::new());
    };

    let mut members: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for (idx, &label) in result.labels.iter().enumerate() {
        members.entry(label).or_default().push(idx);
    }

    let dim = embeddings.first().map(|e| e.len()).unwrap_or(0);
    let mut clusters: Vec<TopicCluster> = members
        .into_iter()
        .map(|(topic_id, idxs)| describe_cluster(topic_id, &idxs, &titles, &embeddings, dim))
        .collect();

    // stable: equal sizes keep label order
    clusters.sort_by(|a, b| b.size.cmp(&a.size));

    debug!(
        titles = titles.len(),
        k = k,
        clusters = clusters.len(),
        "Clustered titles"
    );

    Ok(clusters)
}

fn describe_cluster(
    topic_id: usize,
    idxs: &[usize],
    titles: &[String],
    embeddings: &[Vec<f64>],
    dim: usize,
) -> TopicCluster {
    let vectors: Vec<&[f64]> = idxs.iter().map(|&i| embeddings[i].as_slice()).collect();
    let center = centroid(&vectors, dim);

    let mut ranked: Vec<(usize, f64)> = idxs
        .iter()
        .map(|&i| (i, euclidean_distance(&embeddings[i], &center)))
        .collect();
    ranked.sort_by(|a, b| a.1.total_cmp(&b.1));

    let representative_titles = ranked
        .iter()
        .take(REPRESENTATIVES_PER_CLUSTER)
        .map(|&(i, _)| titles[i].clone())
        .collect();

    let member_titles: Vec<String> = idxs.iter().map(|&i| titles[i].clone()).collect();

    TopicCluster {
        topic_id,
        size: idxs.len(),
        representative_titles,
        keywords: title_keywords(&member_titles, KEYWORDS_PER_CLUSTER),
    }
}
