// arXiv export API client: unauthenticated Atom queries over HTTP.
//
// Two request shapes share one query builder: a count probe (max_results=1,
// read only opensearch:totalResults) and a paginated fetch sorted by
// submission date, newest first. Requests are paced through a shared
// RateLimiter and never run concurrently.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::feed;
use super::rate_limiter::{with_retry, RateLimiter};
use super::traits::{FetchedEntry, MonthWindow, PaperSource};
use crate::error::FetchError;

/// Default arXiv export API endpoint.
pub const DEFAULT_ARXIV_API_URL: &str = "https://export.arxiv.org/api/query";

/// Label stamped into every record fetched from arXiv.
pub const ARXIV_SOURCE: &str = "arXiv";

/// Per-client request behaviour.
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Minimum gap between consecutive requests
    pub request_interval: Duration,
    /// Timeout for single-result count probes
    pub probe_timeout: Duration,
    /// Timeout for paginated fetch requests
    pub fetch_timeout: Duration,
    /// Retries per request on transient failures (0 disables retrying)
    pub max_retries: u32,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_interval: Duration::from_secs(3),
            probe_timeout: Duration::from_secs(30),
            fetch_timeout: Duration::from_secs(60),
            max_retries: 0,
        }
    }
}

/// Build the arXiv `search_query` for a phrase within one month.
///
/// The phrase is matched against titles and abstracts; the date range is
/// inclusive at day granularity.
pub fn build_search_query(query: &str, window: MonthWindow) -> String {
    let phrase = format!("\"{}\"", query.trim().replace('"', ""));
    let (start, end) = window.date_bounds();
    format!("((ti:{phrase} OR abs:{phrase}) AND submittedDate:[{start} TO {end}])")
}

/// HTTP client for the arXiv export API.
pub struct ArxivClient {
    client: reqwest::Client,
    base_url: String,
    limiter: RateLimiter,
    options: ClientOptions,
}

impl ArxivClient {
    /// Create a new client pointing at the given endpoint.
    ///
    /// Pass a different URL for testing against a local mock server.
    pub fn new(base_url: &str, options: ClientOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .user_agent("trendlens/0.1 (temporal-corpus-analysis)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            limiter: RateLimiter::new(options.request_interval),
            options,
        })
    }

    /// GET the endpoint with the given query parameters and return the body.
    async fn get_feed(
        &self,
        params: &[(&str, String)],
        timeout: Duration,
    ) -> Result<String, FetchError> {
        with_retry(&self.limiter, self.options.max_retries, || async move {
            let response = self
                .client
                .get(&self.base_url)
                .query(params)
                .timeout(timeout)
                .send()
                .await?;

            if !response.status().is_success() {
                return Err(FetchError::Status {
                    status: response.status().as_u16(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

#[async_trait]
impl PaperSource for ArxivClient {
    fn label(&self) -> &str {
        ARXIV_SOURCE
    }

    async fn count_month(&self, query: &str, window: MonthWindow) -> Result<u64, FetchError> {
        let params = [
            ("search_query", build_search_query(query, window)),
            ("start", "0".to_string()),
            ("max_results", "1".to_string()),
        ];

        let body = self.get_feed(&params, self.options.probe_timeout).await?;
        let total = feed::parse_total_results(&body)?;

        debug!(month = %window, total = total, "Count probe");
        Ok(total)
    }

    async fn fetch_month_page(
        &self,
        query: &str,
        window: MonthWindow,
        start: usize,
        page_size: usize,
    ) -> Result<Vec<FetchedEntry>, FetchError> {
        let params = [
            ("search_query", build_search_query(query, window)),
            ("start", start.to_string()),
            ("max_results", page_size.to_string()),
            ("sortBy", "submittedDate".to_string()),
            ("sortOrder", "descending".to_string()),
        ];

        let body = self.get_feed(&params, self.options.fetch_timeout).await?;
        let entries = feed::parse_entries(&body)?;

        debug!(
            month = %window,
            start = start,
            entries = entries.len(),
            "Fetched page"
        );
        Ok(entries)
    }
}
