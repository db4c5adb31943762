// Lexical frequency analysis over paper titles.
//
// Two rankings: the most frequent title terms overall, and the terms whose
// frequency grew most between the old and new partitions of the corpus.
// Both rank stably, so ties keep first-seen order.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::split::{partition, split_year};
use super::tokenize::tokenize;
use crate::corpus::models::Paper;

/// Tunables for growth-term scoring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthParams {
    /// A term needs at least this many new-period occurrences to be scored (default 3)
    pub min_new_frequency: usize,
}

impl Default for GrowthParams {
    fn default() -> Self {
        Self {
            min_new_frequency: 3,
        }
    }
}

/// A term with its growth between periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermGrowth {
    pub term: String,
    /// new-period frequency minus old-period frequency
    pub growth: i64,
    pub new_frequency: usize,
}

/// Term counts in first-encounter order.
struct Tally {
    order: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Tally {
    fn new() -> Self {
        Self {
            order: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn add_title(&mut self, title: &str) {
        for token in tokenize(title) {
            match self.index.get(&token) {
                Some(&i) => self.order[i].1 += 1,
                None => {
                    self.index.insert(token.clone(), self.order.len());
                    self.order.push((token, 1));
                }
            }
        }
    }

    fn get(&self, term: &str) -> usize {
        self.index.get(term).map(|&i| self.order[i].1).unwrap_or(0)
    }

    fn from_papers<'a>(papers: impl IntoIterator<Item = &'a Paper>) -> Self {
        let mut tally = Self::new();
        for title in papers.into_iter().filter_map(Paper::usable_title) {
            tally.add_title(title);
        }
        tally
    }
}

/// The `top_n` most frequent title terms, most frequent first.
pub fn top_terms(papers: &[Paper], top_n: usize) -> Vec<String> {
    let mut counts = Tally::from_papers(papers).order;
    // stable: equal counts keep first-encounter order
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(top_n).map(|(term, _)| term).collect()
}

/// Growth-ranked terms with their scores.
///
/// Splits at the `recent_years`-th-from-last distinct year. Empty when there
/// are fewer distinct years than that.
pub fn growth_scores(
    papers: &[Paper],
    recent_years: usize,
    top_n: usize,
    params: &GrowthParams,
) -> Vec<TermGrowth> {
    let Some(split) = split_year(papers, recent_years) else {
        return Vec::new();
    };

    let (old, new) = partition(papers, split);
    let old_counts = Tally::from_papers(old);
    let new_counts = Tally::from_papers(new);

    let mut scored: Vec<TermGrowth> = new_counts
        .order
        .into_iter()
        .filter(|(_, freq)| *freq >= params.min_new_frequency)
        .map(|(term, freq)| {
            let growth = freq as i64 - old_counts.get(&term) as i64;
            TermGrowth {
                term,
                growth,
                new_frequency: freq,
            }
        })
        .collect();

    scored.sort_by(|a, b| b.growth.cmp(&a.growth));
    scored.truncate(top_n);
    scored
}

/// Growth-ranked terms, highest growth first.
pub fn growing_terms(
    papers: &[Paper],
    recent_years: usize,
    top_n: usize,
    params: &GrowthParams,
) -> Vec<String> {
    growth_scores(papers, recent_years, top_n, params)
        .into_iter()
        .map(|g| g.term)
        .collect()
}
