// Analysis pipeline: lexical and semantic branches over one corpus snapshot.
//
// The two branches share nothing but the immutable paper list. Lexical
// counting is CPU-only and runs on a blocking thread; clustering awaits the
// embedder. Both are driven at once and joined into a single report.

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::corpus::models::{yearly_counts, Paper, YearlyCounts};
use crate::topics::clusters::{compute_topics, TopicCluster};
use crate::topics::emerging::{compute_emerging_topics, EmergenceThresholds};
use crate::topics::frequency::{growing_terms, top_terms, GrowthParams};
use crate::topics::traits::TextEmbedder;

/// Knobs for one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisOptions {
    /// Length of the top-terms and growing-terms lists
    pub top_n: usize,
    /// Distinct years counted as the "new" period, for both terms and topics
    pub window: usize,
    /// Number of topic clusters
    pub clusters: usize,
    pub growth: GrowthParams,
    pub emergence: EmergenceThresholds,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            top_n: 20,
            window: 1,
            clusters: 4,
            growth: GrowthParams::default(),
            emergence: EmergenceThresholds::default(),
        }
    }
}

/// Everything the engine derives from a corpus.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub total_papers: usize,
    pub yearly_counts: YearlyCounts,
    pub top_terms: Vec<String>,
    pub growing_terms: Vec<String>,
    pub topics: Vec<TopicCluster>,
    pub emerging_topics: Vec<TopicCluster>,
}

/// Analyze a loaded corpus.
///
/// With no embedder the semantic branch is skipped and both topic lists are
/// empty; the lexical branch always runs.
pub async fn run(
    embedder: Option<&dyn TextEmbedder>,
    papers: Arc<[Paper]>,
    options: &AnalysisOptions,
) -> Result<AnalysisReport> {
    info!(
        papers = papers.len(),
        clusters = options.clusters,
        window = options.window,
        "Analyzing corpus"
    );

    let lexical = {
        let papers = Arc::clone(&papers);
        let top_n = options.top_n;
        let window = options.window;
        let growth = options.growth;
        tokio::task::spawn_blocking(move || {
            let top = top_terms(&papers, top_n);
            let growing = growing_terms(&papers, window, top_n, &growth);
            (top, growing)
        })
    };

    let semantic = async {
        let Some(embedder) = embedder else {
            warn!("No embedding model loaded, skipping topic clustering");
            return Ok::<_, anyhow::Error>((Vec::new(), Vec::new()));
        };

        let topics = compute_topics(embedder, papers.iter(), options.clusters)
            .await
            .context("Topic clustering failed")?;
        let emerging = compute_emerging_topics(
            embedder,
            &papers,
            options.window,
            options.clusters,
            &options.emergence,
        )
        .await
        .context("Emerging topic detection failed")?;

        Ok((topics, emerging))
    };

    let (lexical, semantic) = tokio::join!(lexical, semantic);
    let (top_terms, growing_terms) = lexical.context("Lexical analysis task panicked")?;
    let (topics, emerging_topics) = semantic?;

    info!(
        top_terms = top_terms.len(),
        growing_terms = growing_terms.len(),
        topics = topics.len(),
        emerging = emerging_topics.len(),
        "Analysis complete"
    );

    Ok(AnalysisReport {
        total_papers: papers.len(),
        yearly_counts: yearly_counts(&papers),
        top_terms,
        growing_terms,
        topics,
        emerging_topics,
    })
}
