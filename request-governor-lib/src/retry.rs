//! Retry mechanism with exponential backoff
//!
//! Authentication and validation failures (401, 403, 422) are returned at
//! once; everything else is retried with a doubling delay.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::failure::Failure;

/// Statuses that are never retried.
pub const NON_RETRYABLE_STATUSES: [u16; 3] = [401, 403, 422];

/// Failures the retry engine can inspect.
pub trait Retryable {
    /// HTTP status carried by the failure, if any.
    fn status(&self) -> Option<u16>;

    /// Whether another attempt could succeed.
    fn is_retryable(&self) -> bool {
        !self.status().is_some_and(|s| NON_RETRYABLE_STATUSES.contains(&s))
    }
}

impl Retryable for Failure {
    fn status(&self) -> Option<u16> {
        Failure::status(self)
    }
}

/// Retry policy for governed operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
    max_delay: Option<Duration>,
}

impl RetryPolicy {
    /// Create a retry policy.
    ///
    /// `max_retries` is the total number of attempts and is clamped to at
    /// least 1. There is no delay ceiling unless [`with_max_delay`](Self::with_max_delay)
    /// is used.
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self { max_retries: max_retries.max(1), initial_delay, max_delay: None }
    }

    /// Cap every single backoff delay at `max_delay`.
    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = Some(max_delay);
        self
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    pub fn max_delay(&self) -> Option<Duration> {
        self.max_delay
    }

    /// Delay after the failed attempt `attempt` (0-based): `initial * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let delay = self
            .initial_delay
            .saturating_mul(2u32.saturating_pow(attempt));
        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// Retry an async operation with exponential backoff.
///
/// # Returns
/// The first success, the first non-retryable failure, or the last failure
/// once every attempt is used up
pub async fn retry_with_backoff<F, Fut, T, E>(operation: F, policy: &RetryPolicy) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
{
    retry_with_backoff_notify(operation, policy, |_, _, _| {}).await
}

/// [`retry_with_backoff`], calling `on_retry(attempt, &error, delay)` before
/// each backoff sleep.
pub async fn retry_with_backoff_notify<F, Fut, T, E, N>(
    mut operation: F,
    policy: &RetryPolicy,
    mut on_retry: N,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + Display,
    N: FnMut(u32, &E, Duration),
{
    let mut attempt = 0;
    loop {
        match operation().await {
            Ok(result) => {
                if attempt > 0 {
                    debug!(attempts = attempt + 1, "operation succeeded after retrying");
                }
                return Ok(result);
            }
            Err(error) => {
                if !error.is_retryable() {
                    debug!(%error, "non-retryable failure");
                    return Err(error);
                }

                if attempt + 1 >= policy.max_retries {
                    warn!(max_retries = policy.max_retries, %error, "retries exhausted");
                    return Err(error);
                }

                let delay = policy.delay_for(attempt);
                warn!(attempt = attempt + 1, %error, ?delay, "attempt failed, retrying");
                on_retry(attempt, &error, delay);

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
