// Request pacing and bounded retry for provider calls.
//
// arXiv asks clients to leave a few seconds between requests. The pacer
// enforces a minimum interval between consecutive requests; it is the only
// rate-limit handling we do. The retry wrapper is off by default (zero
// retries) and only retries failures that `FetchError::is_transient` allows.

use std::future::Future;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::Mutex;
use tokio::time::{Duration, Instant};
use tracing::warn;

use crate::error::FetchError;

/// Base delay for exponential backoff (doubles each retry).
const BASE_BACKOFF: Duration = Duration::from_secs(2);

/// Maximum backoff delay to cap exponential growth.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Enforces a minimum interval between consecutive requests.
#[derive(Clone)]
pub struct RateLimiter {
    inner: Arc<Mutex<RateLimiterInner>>,
}

struct RateLimiterInner {
    /// Minimum time between requests
    interval: Duration,
    /// When the last request was allowed through
    last_request: Option<Instant>,
}

impl RateLimiter {
    /// Create a pacer that lets one request through per `interval`.
    /// A zero interval never waits.
    pub fn new(interval: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RateLimiterInner {
                interval,
                last_request: None,
            })),
        }
    }

    /// Wait until a request is allowed, then return.
    pub async fn acquire(&self) {
        let mut inner = self.inner.lock().await;
        let now = Instant::now();

        if let Some(last) = inner.last_request {
            let elapsed = now.duration_since(last);
            if elapsed < inner.interval {
                let sleep_time = inner.interval - elapsed;
                // Requests are sequential, so holding the lock while sleeping
                // only ever blocks the next request, which must wait anyway.
                tokio::time::sleep(sleep_time).await;
            }
        }

        inner.last_request = Some(Instant::now());
    }
}

/// Backoff for the given retry attempt (1-based), before jitter.
fn backoff_for(attempt: u32) -> Duration {
    BASE_BACKOFF
        .saturating_mul(1u32 << attempt.min(16))
        .min(MAX_BACKOFF)
}

/// Run a provider request with pacing and up to `max_retries` retries.
///
/// Every attempt goes through the pacer. Non-transient failures and the
/// failure of the last allowed attempt are returned to the caller.
pub async fn with_retry<F, Fut, T>(
    rate_limiter: &RateLimiter,
    max_retries: u32,
    operation: F,
) -> Result<T, FetchError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 0u32;

    loop {
        rate_limiter.acquire().await;

        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !err.is_transient() || attempt >= max_retries {
                    return Err(err);
                }

                attempt += 1;

                // +/- 25% jitter around the exponential backoff.
                let jitter_factor = rand::rng().random_range(0.75..1.25);
                let jittered =
                    Duration::from_secs_f64(backoff_for(attempt).as_secs_f64() * jitter_factor);

                warn!(
                    attempt = attempt,
                    max_retries = max_retries,
                    backoff_secs = jittered.as_secs_f64(),
                    error = %err,
                    "Provider request failed, retrying",
                );

                tokio::time::sleep(jittered).await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_rate_limiter_allows_first_request_immediately() {
        let limiter = RateLimiter::new(Duration::from_secs(1));
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_rate_limiter_delays_second_request() {
        let limiter = RateLimiter::new(Duration::from_millis(300));
        limiter.acquire().await;
        let start = Instant::now();
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(
            elapsed >= Duration::from_millis(250),
            "Expected ~300ms delay, got {:?}",
            elapsed
        );
    }

    #[tokio::test]
    async fn test_zero_interval_never_waits() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..20 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        assert_eq!(backoff_for(1), Duration::from_secs(4));
        assert_eq!(backoff_for(2), Duration::from_secs(8));
        assert_eq!(backoff_for(10), MAX_BACKOFF);
    }

    #[tokio::test]
    async fn test_no_retries_returns_first_failure() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<(), FetchError> = with_retry(&limiter, 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Status { status: 503 }) }
        })
        .await;

        assert!(matches!(result, Err(FetchError::Status { status: 503 })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_transient_failure_is_not_retried() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result: Result<(), FetchError> = with_retry(&limiter, 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(FetchError::Status { status: 400 }) }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_failure_retried_until_success() {
        let limiter = RateLimiter::new(Duration::ZERO);
        let calls = AtomicU32::new(0);

        let result = with_retry(&limiter, 3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(FetchError::Status { status: 503 })
                } else {
                    Ok(n)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
