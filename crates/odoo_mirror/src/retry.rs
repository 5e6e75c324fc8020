//! Retry utilities for remote calls.

use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use backon::{ExponentialBuilder, Retryable};

/// Initial delay before the first retry.
pub const INITIAL_BACKOFF_MS: u64 = 500;
/// Upper bound for a single backoff delay.
pub const MAX_BACKOFF_MS: u64 = 10_000;
/// Retries after the first attempt.
pub const MAX_RETRIES: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub max_retries: usize,
    pub with_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_millis(INITIAL_BACKOFF_MS),
            max_delay: Duration::from_millis(MAX_BACKOFF_MS),
            max_retries: MAX_RETRIES,
            with_jitter: true,
        }
    }
}

impl RetryConfig {
    #[must_use]
    pub fn new(min_delay: Duration, max_delay: Duration, max_retries: usize) -> Self {
        Self {
            min_delay,
            max_delay,
            max_retries,
            with_jitter: true,
        }
    }

    /// A configuration that never retries.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO, 0).with_jitter(false)
    }

    #[must_use]
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.with_jitter = jitter;
        self
    }

    #[must_use]
    pub fn into_backoff(self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_retries);

        if self.with_jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

/// Run `operation`, retrying with exponential backoff while `is_retryable`
/// holds for the returned error.
///
/// `label` names the call in the `warn` emitted before each retry.
pub async fn with_retry<T, E, F, Fut, IsRetryable>(
    operation: F,
    is_retryable: IsRetryable,
    config: &RetryConfig,
    label: &str,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    IsRetryable: FnMut(&E) -> bool,
{
    let attempt = AtomicU32::new(1);

    operation
        .retry(config.clone().into_backoff())
        .when(is_retryable)
        .notify(|err, delay| {
            let current = attempt.fetch_add(1, Ordering::SeqCst);
            tracing::warn!(
                call = label,
                attempt = current,
                delay_ms = delay.as_millis() as u64,
                "Retrying after error: {}",
                err
            );
        })
        .await
}
