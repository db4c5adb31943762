// Old/new partitioning by distinct publication year.
//
// The boundary is the n-th-from-last entry of the sorted distinct years,
// so a gap in coverage moves the boundary with it.

use std::collections::BTreeSet;

use crate::corpus::models::Paper;

/// Sorted distinct years present in the corpus.
pub fn distinct_years(papers: &[Paper]) -> Vec<i32> {
    papers
        .iter()
        .map(|p| p.year)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// The split year for a window of `recent` distinct years.
///
/// `None` when the window is zero or there are fewer distinct years than
/// the window asks for.
pub fn split_year(papers: &[Paper], recent: usize) -> Option<i32> {
    let years = distinct_years(papers);
    if recent == 0 || years.len() < recent {
        return None;
    }
    Some(years[years.len() - recent])
}

/// Partition papers into (old, new) around `split`: old is `year < split`.
pub fn partition(papers: &[Paper], split: i32) -> (Vec<&Paper>, Vec<&Paper>) {
    papers.iter().partition(|p| p.year < split)
}
