use ahash::AHashMap;
use std::time::Duration;

pub const DEFAULT_POLICY: &str = "default";
pub const LOGIN_POLICY: &str = "login";
pub const API_POLICY: &str = "api";

/// Maximum number of admitted requests per key inside a sliding window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    max_requests: u32,
    window_ms: u64,
}

impl RateLimitPolicy {
    /// 60 requests per minute.
    pub const DEFAULT: RateLimitPolicy = RateLimitPolicy { max_requests: 60, window_ms: 60_000 };
    /// 5 attempts per 5 minutes.
    pub const LOGIN: RateLimitPolicy = RateLimitPolicy { max_requests: 5, window_ms: 300_000 };
    /// 100 requests per minute.
    pub const API: RateLimitPolicy = RateLimitPolicy { max_requests: 100, window_ms: 60_000 };

    /// Create a policy. Both values are clamped to at least 1.
    pub fn new(max_requests: u32, window_ms: u64) -> Self {
        Self { max_requests: max_requests.max(1), window_ms: window_ms.max(1) }
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn window_ms(&self) -> u64 {
        self.window_ms
    }

    pub fn window(&self) -> Duration {
        Duration::from_millis(self.window_ms)
    }
}

/// Named policies, read-only once handed to a [`RateLimiter`](super::RateLimiter).
///
/// Always resolves: a name that is not present falls back to `default`.
#[derive(Debug, Clone)]
pub struct PolicyTable {
    policies: AHashMap<String, RateLimitPolicy>,
}

impl PolicyTable {
    /// Add or replace a policy.
    pub fn insert(&mut self, name: impl Into<String>, policy: RateLimitPolicy) {
        self.policies.insert(name.into(), policy);
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, policy: RateLimitPolicy) -> Self {
        self.insert(name, policy);
        self
    }

    /// Look up a policy, falling back to `default` for unknown names.
    pub fn get(&self, name: &str) -> RateLimitPolicy {
        self.policies
            .get(name)
            .or_else(|| self.policies.get(DEFAULT_POLICY))
            .copied()
            .unwrap_or(RateLimitPolicy::DEFAULT)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.policies.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        let mut policies = AHashMap::new();
        policies.insert(DEFAULT_POLICY.to_string(), RateLimitPolicy::DEFAULT);
        policies.insert(LOGIN_POLICY.to_string(), RateLimitPolicy::LOGIN);
        policies.insert(API_POLICY.to_string(), RateLimitPolicy::API);
        Self { policies }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_has_builtin_policies() {
        let table = PolicyTable::default();
        assert_eq!(table.len(), 3);
        assert_eq!(table.get("default"), RateLimitPolicy::new(60, 60_000));
        assert_eq!(table.get("login"), RateLimitPolicy::new(5, 300_000));
        assert_eq!(table.get("api"), RateLimitPolicy::new(100, 60_000));
    }

    #[test]
    fn unknown_name_falls_back_to_default() {
        let table = PolicyTable::default().with("default", RateLimitPolicy::new(2, 1000));
        assert_eq!(table.get("does-not-exist"), RateLimitPolicy::new(2, 1000));
    }

    #[test]
    fn zero_values_are_clamped() {
        let policy = RateLimitPolicy::new(0, 0);
        assert_eq!(policy.max_requests(), 1);
        assert_eq!(policy.window_ms(), 1);
    }
}
