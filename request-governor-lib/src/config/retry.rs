use serde::Deserialize;
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Retry-with-backoff configuration
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one
    /// Default: 3
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Delay before the second attempt in milliseconds; doubles afterwards
    /// Default: 1000
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
    /// Optional ceiling for a single backoff delay in milliseconds
    /// Default: None (unbounded doubling)
    #[serde(default)]
    pub max_delay_ms: Option<u64>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: None,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(cfg: &RetryConfig) -> Self {
        let policy =
            RetryPolicy::new(cfg.max_retries, Duration::from_millis(cfg.initial_delay_ms));
        match cfg.max_delay_ms {
            Some(max) => policy.with_max_delay(Duration::from_millis(max)),
            None => policy,
        }
    }
}

fn default_max_retries() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}
