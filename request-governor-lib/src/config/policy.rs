use serde::Deserialize;

use crate::rate_limit::RateLimitPolicy;

/// A named rate limit policy as written in the config file
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct PolicyConfig {
    /// Maximum admitted requests per key inside one window
    /// Must be > 0
    pub max_requests: u32,
    /// Sliding window length in milliseconds
    /// Must be > 0
    pub window_ms: u64,
}

impl From<&PolicyConfig> for RateLimitPolicy {
    fn from(cfg: &PolicyConfig) -> Self {
        RateLimitPolicy::new(cfg.max_requests, cfg.window_ms)
    }
}
