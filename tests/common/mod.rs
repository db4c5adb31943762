// Shared fakes for integration tests: a scripted paper source and a
// deterministic keyword embedder. No network, no model files.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::Result;
use async_trait::async_trait;

use trendlens::corpus::models::Paper;
use trendlens::error::FetchError;
use trendlens::sources::traits::{FetchedEntry, MonthWindow, PaperSource};
use trendlens::topics::traits::TextEmbedder;

// ============================================================
// Papers
// ============================================================

pub fn paper(title: &str, year: i32) -> Paper {
    Paper {
        title: title.to_string(),
        abstract_text: None,
        year,
        month: 1,
        source: "arXiv".to_string(),
        url: String::new(),
        doi: None,
        citation_count: None,
    }
}

pub fn papers(title: &str, year: i32, n: usize) -> Vec<Paper> {
    (0..n).map(|i| paper(&format!("{title} {i}"), year)).collect()
}

// ============================================================
// Scripted paper source
// ============================================================

/// A source whose per-month behaviour is set up front.
///
/// Months without an entry in `available` have zero entries. Every probe
/// reports `available` unless the month is in `failing_probes`; every fetch
/// at or beyond `failing_fetch[month]` fails with a 503.
#[derive(Default)]
pub struct ScriptedSource {
    pub available: HashMap<MonthWindow, usize>,
    pub failing_probes: HashSet<MonthWindow>,
    pub failing_fetch: HashMap<MonthWindow, usize>,
    /// Every fetch request made, as (month, start, page_size)
    pub fetch_calls: Mutex<Vec<(MonthWindow, usize, usize)>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_month(mut self, year: i32, month: u32, available: usize) -> Self {
        self.available.insert(MonthWindow::new(year, month), available);
        self
    }

    pub fn failing_probe(mut self, year: i32, month: u32) -> Self {
        self.failing_probes.insert(MonthWindow::new(year, month));
        self
    }

    pub fn failing_fetch_from(mut self, year: i32, month: u32, start: usize) -> Self {
        self.failing_fetch
            .insert(MonthWindow::new(year, month), start);
        self
    }

    pub fn calls_for(&self, window: MonthWindow) -> Vec<usize> {
        self.fetch_calls
            .lock()
            .unwrap()
            .iter()
            .filter(|(w, _, _)| *w == window)
            .map(|(_, start, _)| *start)
            .collect()
    }
}

#[async_trait]
impl PaperSource for ScriptedSource {
    fn label(&self) -> &str {
        "arXiv"
    }

    async fn count_month(&self, _query: &str, window: MonthWindow) -> Result<u64, FetchError> {
        if self.failing_probes.contains(&window) {
            return Err(FetchError::Status { status: 503 });
        }
        Ok(self.available.get(&window).copied().unwrap_or(0) as u64)
    }

    async fn fetch_month_page(
        &self,
        _query: &str,
        window: MonthWindow,
        start: usize,
        page_size: usize,
    ) -> Result<Vec<FetchedEntry>, FetchError> {
        self.fetch_calls
            .lock()
            .unwrap()
            .push((window, start, page_size));

        if let Some(&fail_from) = self.failing_fetch.get(&window) {
            if start >= fail_from {
                return Err(FetchError::Status { status: 503 });
            }
        }

        let available = self.available.get(&window).copied().unwrap_or(0);
        let end = (start + page_size).min(available);
        Ok((start..end)
            .map(|i| FetchedEntry {
                title: format!("Paper {i} on federated learning from {window}"),
                abstract_text: Some(format!("Abstract {i}")),
                published: None,
                id: format!("http://arxiv.org/abs/{}.{:05}", window, i),
            })
            .collect())
    }
}

// ============================================================
// Keyword embedder
// ============================================================

/// Embeds a title as a 0/1 vector over a fixed vocabulary: axis `i` is 1.0
/// when the lowercased title contains `vocabulary[i]`. Titles sharing a
/// keyword land on the same point.
pub struct KeywordEmbedder {
    pub vocabulary: Vec<&'static str>,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&'static str]) -> Self {
        Self {
            vocabulary: vocabulary.to_vec(),
        }
    }
}

#[async_trait]
impl TextEmbedder for KeywordEmbedder {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        Ok(texts
            .iter()
            .map(|text| {
                let lower = text.to_lowercase();
                self.vocabulary
                    .iter()
                    .map(|word| if lower.contains(word) { 1.0 } else { 0.0 })
                    .collect()
            })
            .collect())
    }
}

/// An embedder that always fails.
pub struct BrokenEmbedder;

#[async_trait]
impl TextEmbedder for BrokenEmbedder {
    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<Vec<f64>>> {
        anyhow::bail!("model exploded")
    }
}
