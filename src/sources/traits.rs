// Paper source trait: the swap-ready abstraction for corpus acquisition.
//
// Acquisition only talks to this trait, so tests can drive it with a canned
// source and a different provider can be added without touching the loop.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};

use crate::error::FetchError;

/// An inclusive calendar-month window, first day to last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthWindow {
    pub year: i32,
    pub month: u32,
}

impl MonthWindow {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// Last calendar day of the month (28-31, leap years included).
    pub fn last_day(&self) -> u32 {
        let (next_year, next_month) = if self.month >= 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .and_then(|d| d.pred_opt())
            .map(|d| d.day())
            .unwrap_or(28)
    }

    /// `YYYYMMDD` bounds of the window, as used by date-range queries.
    pub fn date_bounds(&self) -> (String, String) {
        (
            format!("{}{:02}01", self.year, self.month),
            format!("{}{:02}{:02}", self.year, self.month, self.last_day()),
        )
    }
}

impl std::fmt::Display for MonthWindow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}

/// One entry from a fetch page, before it is stamped into a `Paper`.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedEntry {
    pub title: String,
    pub abstract_text: Option<String>,
    pub published: Option<String>,
    /// Canonical identifier / link of the entry.
    pub id: String,
}

/// A provider of paper metadata searchable by query and month.
///
/// Each call is a single request: no call may abort a whole acquisition run,
/// the caller decides what a failure means for its unit.
#[async_trait]
pub trait PaperSource: Send + Sync {
    /// Label stamped into each record's `source` field.
    fn label(&self) -> &str;

    /// Provider-reported total number of matches for the month.
    async fn count_month(&self, query: &str, window: MonthWindow) -> Result<u64, FetchError>;

    /// One page of matches, newest submission first, starting at `start`.
    /// An empty page means there is nothing further to fetch.
    async fn fetch_month_page(
        &self,
        query: &str,
        window: MonthWindow,
        start: usize,
        page_size: usize,
    ) -> Result<Vec<FetchedEntry>, FetchError>;
}
