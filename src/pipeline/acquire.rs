// Corpus acquisition pipeline: month-by-month probe, page, persist.
//
// For every month in the requested span (stopping at the current month of
// the current year) this pipeline:
// 1. Probes the source for its reported total-match count
// 2. Pages through the month's entries, newest first, up to max_per_month
// 3. Appends each entry to the corpus file as soon as it arrives
// 4. Syncs the file before moving on to the next month
//
// A failed probe or page is recorded against its month and the run moves on.
// Only local I/O failures on the corpus file abort the run.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::corpus::models::{CorpusSummary, MonthlyCounts, Paper, YearlyCounts};
use crate::corpus::store::CorpusWriter;
use crate::error::FetchError;
use crate::sources::traits::{FetchedEntry, MonthWindow, PaperSource};

/// Knobs for one acquisition run.
#[derive(Debug, Clone)]
pub struct AcquireOptions {
    /// Number of calendar years to cover, ending with the current year
    pub years: u32,
    /// Cap on records fetched and persisted per month
    pub max_per_month: usize,
    /// Entries requested per page
    pub page_size: usize,
    /// "Today": decides the last year and the last month fetched
    pub today: NaiveDate,
    /// Draw a terminal progress bar over months
    pub show_progress: bool,
}

/// What happened for one (year, month) unit.
#[derive(Debug)]
pub struct MonthOutcome {
    pub window: MonthWindow,
    /// Count probe result; a failure is recorded as zero in the monthly map
    pub reported: Result<u64, FetchError>,
    /// Records fetched and persisted for this month
    pub fetched: usize,
    /// The failure that cut pagination short, if any
    pub fetch_error: Option<FetchError>,
}

impl MonthOutcome {
    pub fn is_degraded(&self) -> bool {
        self.reported.is_err() || self.fetch_error.is_some()
    }
}

/// Full result of an acquisition run: the summary plus per-month outcomes.
#[derive(Debug)]
pub struct AcquisitionReport {
    pub summary: CorpusSummary,
    pub months: Vec<MonthOutcome>,
}

impl AcquisitionReport {
    /// Months where a probe or fetch request failed.
    pub fn failures(&self) -> impl Iterator<Item = &MonthOutcome> {
        self.months.iter().filter(|m| m.is_degraded())
    }
}

/// The (year, month) units to acquire, in chronological order.
pub fn month_windows(years: u32, today: NaiveDate) -> Vec<MonthWindow> {
    let current_year = today.year();
    let start_year = current_year - years as i32 + 1;

    let mut windows = Vec::new();
    for year in start_year..=current_year {
        for month in 1..=12u32 {
            if year == current_year && month > today.month() {
                break;
            }
            windows.push(MonthWindow::new(year, month));
        }
    }
    windows
}

/// Run acquisition for `query`, writing the corpus to `file_path`.
///
/// The file is truncated first, so the result replaces any earlier corpus
/// for the same path. Returns once every month has been attempted.
pub async fn run(
    source: &dyn PaperSource,
    query: &str,
    file_path: &Path,
    options: &AcquireOptions,
) -> Result<AcquisitionReport> {
    let mut writer = CorpusWriter::create(file_path)
        .with_context(|| format!("Failed to open corpus file {}", file_path.display()))?;

    let windows = month_windows(options.years, options.today);

    let mut monthly_counts = MonthlyCounts::new();
    let mut yearly_counts = YearlyCounts::new();
    let mut months = Vec::with_capacity(windows.len());
    let mut total: u64 = 0;

    for year in windows.iter().map(|w| w.year) {
        monthly_counts.entry(year).or_default();
        yearly_counts.entry(year).or_insert(0);
    }

    let pb = if options.show_progress {
        let pb = ProgressBar::new(windows.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("  Months [{bar:30}] {pos}/{len} {msg} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        pb
    } else {
        ProgressBar::hidden()
    };

    info!(
        query = query,
        months = windows.len(),
        path = %file_path.display(),
        "Starting corpus acquisition"
    );

    for window in windows {
        pb.set_message(window.to_string());

        // Step 1: reported total for the month
        let reported = source.count_month(query, window).await;
        match &reported {
            Ok(count) => {
                monthly_counts
                    .entry(window.year)
                    .or_default()
                    .insert(window.month, *count);
            }
            Err(e) => {
                warn!(month = %window, error = %e, "Count probe failed, recording zero");
                monthly_counts
                    .entry(window.year)
                    .or_default()
                    .insert(window.month, 0);
            }
        }

        // Steps 2-3: page through the month, persisting as we go
        let (fetched, fetch_error) =
            fetch_month(source, query, window, source.label(), options, &mut writer).await?;

        // Step 4: the month's lines are durable before the next unit starts
        writer
            .sync()
            .with_context(|| format!("Failed to sync corpus file after {window}"))?;

        *yearly_counts.entry(window.year).or_insert(0) += fetched as u64;
        total += fetched as u64;

        info!(month = %window, fetched = fetched, "Month complete");

        months.push(MonthOutcome {
            window,
            reported,
            fetched,
            fetch_error,
        });
        pb.inc(1);
    }

    pb.finish_and_clear();

    let written = writer
        .finish()
        .with_context(|| format!("Failed to close corpus file {}", file_path.display()))?;
    debug_assert_eq!(written, total);

    let degraded = months.iter().filter(|m| m.is_degraded()).count();
    info!(
        total = total,
        degraded_months = degraded,
        "Corpus acquisition complete"
    );

    Ok(AcquisitionReport {
        summary: CorpusSummary {
            file_path: file_path.to_path_buf(),
            monthly_counts,
            yearly_counts,
            total,
        },
        months,
    })
}

/// Page through one month. Provider failures end the month early and are
/// returned alongside the count; corpus write failures are returned as errors.
async fn fetch_month(
    source: &dyn PaperSource,
    query: &str,
    window: MonthWindow,
    label: &str,
    options: &AcquireOptions,
    writer: &mut CorpusWriter,
) -> Result<(usize, Option<FetchError>)> {
    let mut fetched = 0usize;
    let mut start = 0usize;

    if options.page_size == 0 {
        return Ok((0, None));
    }

    while fetched < options.max_per_month {
        let page = match source
            .fetch_month_page(query, window, start, options.page_size)
            .await
        {
            Ok(page) => page,
            Err(e) => {
                warn!(
                    month = %window,
                    start = start,
                    fetched = fetched,
                    error = %e,
                    "Fetch failed, keeping what this month already has"
                );
                return Ok((fetched, Some(e)));
            }
        };

        if page.is_empty() {
            break;
        }

        for entry in page {
            writer
                .append(&stamp(entry, window, label))
                .with_context(|| format!("Failed to write record for {window}"))?;
            fetched += 1;
            if fetched >= options.max_per_month {
                break;
            }
        }

        start += options.page_size;
    }

    Ok((fetched, None))
}

/// Turn a fetched entry into a corpus record, stamped with loop context.
fn stamp(entry: FetchedEntry, window: MonthWindow, label: &str) -> Paper {
    Paper {
        title: entry.title,
        abstract_text: entry.abstract_text,
        year: window.year,
        month: window.month,
        source: label.to_string(),
        url: entry.id,
        doi: None,
        citation_count: None,
    }
}
