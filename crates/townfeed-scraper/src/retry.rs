//! Bounded retry with a fixed pause between attempts.

use std::future::Future;
use std::time::Duration;

use crate::error::ScraperError;

/// How many times a fetch is attempted and how long to wait between tries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first. Values below 1 behave as 1.
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(2000),
        }
    }
}

/// Network failures, 429 and 5xx responses are worth another try. A 404 or
/// other 4xx will not change.
fn is_retriable(err: &ScraperError) -> bool {
    match err {
        ScraperError::Http(_) => true,
        ScraperError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        ScraperError::NotFound { .. }
        | ScraperError::InvalidUrl { .. }
        | ScraperError::Pattern(_) => false,
    }
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
        }
    }

    /// Runs `operation` until it succeeds, fails with a non-retriable error,
    /// or `max_attempts` is used up. Sleeps `backoff` between attempts.
    ///
    /// # Errors
    ///
    /// Returns the last error from `operation`.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, ScraperError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, ScraperError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1u32;

        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) if !is_retriable(&err) || attempt >= max_attempts => return Err(err),
                Err(err) => {
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        backoff_ms = u64::try_from(self.backoff.as_millis()).unwrap_or(u64::MAX),
                        error = %err,
                        "fetch failed; retrying after backoff"
                    );
                }
            }
            tokio::time::sleep(self.backoff).await;
            attempt += 1;
        }
    }
}
