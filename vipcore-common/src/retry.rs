//! Bounded retries with a fixed delay between attempts.
//!
//! A call is repeated when it did not complete or when the service answered
//! with one of a small set of statuses. Every wait has the same length; there
//! is no backoff and no jitter.

use crate::TransportError;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Wait before each retry.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Statuses answered by an overloaded or restarting vip-core.
pub const DEFAULT_RETRY_STATUSES: [u16; 2] = [500, 502];

/// Retry settings of the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait before each retry
    pub delay: Duration,
    /// Statuses treated like a failed request
    pub retry_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            delay: DEFAULT_RETRY_DELAY,
            retry_statuses: DEFAULT_RETRY_STATUSES.to_vec(),
        }
    }
}

impl RetryConfig {
    /// Set the number of retries.
    #[must_use]
    pub const fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the wait before each retry.
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Replace the retried statuses.
    #[must_use]
    pub fn with_retry_statuses(mut self, statuses: impl Into<Vec<u16>>) -> Self {
        self.retry_statuses = statuses.into();
        self
    }

    /// Make a single attempt only.
    #[must_use]
    pub const fn without_retries(self) -> Self {
        self.with_max_retries(0)
    }
}

/// Runs a fallible transport operation under a [`RetryConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: RetryConfig,
}

impl RetryPolicy {
    /// Wrap a configuration.
    #[must_use]
    pub const fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Three retries, ten seconds apart, on 500 and 502.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// Wait before every retry.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.config.delay
    }

    /// Retries after the first attempt.
    #[must_use]
    pub const fn max_retries(&self) -> u32 {
        self.config.max_retries
    }

    /// Whether a response with `status` counts as a failed attempt.
    #[must_use]
    pub fn retries_status(&self, status: u16) -> bool {
        self.config.retry_statuses.contains(&status)
    }

    /// Whether `error` on the attempt numbered `retries_done` (from zero) is
    /// followed by another attempt.
    #[must_use]
    pub const fn should_retry(&self, error: &TransportError, retries_done: u32) -> bool {
        error.is_retryable() && retries_done < self.config.max_retries
    }

    /// Run `operation` until it succeeds or [`RetryPolicy::should_retry`]
    /// rejects its error.
    ///
    /// # Errors
    ///
    /// The error of the last attempt.
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut retries_done = 0;
        loop {
            let error = match operation().await {
                Ok(value) => return Ok(value),
                Err(error) if self.should_retry(&error, retries_done) => error,
                Err(error) => return Err(error),
            };

            retries_done += 1;
            warn!(
                retry = retries_done,
                max_retries = self.config.max_retries,
                delay_ms = u64::try_from(self.config.delay.as_millis()).unwrap_or(u64::MAX),
                error = %error,
                "Retrying vip-core request"
            );
            tokio::time::sleep(self.config.delay).await;
        }
    }
}
