//! Bounded retry with exponential backoff
//!
//! Only [`FetchError::Transient`] failures are retried. Not-found and
//! other-status failures, as well as success, return immediately.

use crate::config::RetryConfig;
use crate::crawler::fetcher::FetchError;
use crate::output::CrawlObserver;
use std::future::Future;
use std::time::Duration;

/// Retry schedule for network operations
///
/// With the defaults the delays are 5s, 10s, 20s, 40s and 80s, so an
/// operation is attempted at most six times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Multiplier applied to the delay after every retry
    pub backoff_factor: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Creates a policy from the retry configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            initial_delay: Duration::from_millis(config.initial_delay_ms),
            backoff_factor: config.backoff_factor,
        }
    }

    /// A policy that surfaces the first failure unchanged
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            initial_delay: Duration::ZERO,
            backoff_factor: 1,
        }
    }

    /// The sleep before each retry, in order
    pub fn delays(&self) -> impl Iterator<Item = Duration> + '_ {
        (0..self.max_retries).scan(self.initial_delay, |delay, _| {
            let current = *delay;
            *delay = delay.saturating_mul(self.backoff_factor);
            Some(current)
        })
    }

    /// Runs `operation` until it succeeds, fails non-transiently, or the
    /// retry budget is spent
    ///
    /// # Arguments
    ///
    /// * `url` - The URL being fetched (for reporting only)
    /// * `observer` - Receives one event per retry
    /// * `operation` - Produces a fresh attempt on every call
    ///
    /// # Returns
    ///
    /// The first non-transient outcome, or the last transient failure once
    /// the retries are exhausted.
    pub async fn run<T, F, Fut>(
        &self,
        url: &str,
        observer: &dyn CrawlObserver,
        mut operation: F,
    ) -> Result<T, FetchError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let mut delays = self.delays();
        let mut attempt = 0;

        loop {
            match operation().await {
                Err(error) if error.is_transient() => match delays.next() {
                    Some(delay) => {
                        attempt += 1;
                        tracing::warn!(
                            "{}, retrying in {:?} ({}/{})",
                            error,
                            delay,
                            attempt,
                            self.max_retries
                        );
                        observer.on_retry(url, attempt, delay);
                        tokio::time::sleep(delay).await;
                    }
                    None => {
                        tracing::error!("Giving up on {} after {} retries", url, attempt);
                        return Err(error);
                    }
                },
                outcome => return outcome,
            }
        }
    }
}
