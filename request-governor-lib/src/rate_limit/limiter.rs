//! Sliding-window rate limiter.
//!
//! This module wraps the [`WindowStore`] with policy lookup, the admission
//! decision and the result type handed back to callers.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, warn};

use super::policy::PolicyTable;
use super::window::WindowStore;
use super::RateLimitPolicy;
use crate::clock::{Clock, SystemClock};

/// Result of a rate limit check.
///
/// Rejections are plain values so the caller decides whether to surface them
/// or silently defer the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RateLimitResult {
    /// Request is admitted and has been recorded in the window.
    Allowed {
        /// Maximum number of requests allowed in the window
        limit: u32,
        /// Number of requests still admissible in the current window
        remaining: u32,
    },
    /// Request is rejected and was not recorded.
    Limited {
        /// Maximum number of requests allowed in the window
        limit: u32,
        /// Whole seconds until the oldest admitted request leaves the window
        retry_after_secs: u64,
        /// User-facing explanation
        message: String,
    },
}

impl RateLimitResult {
    /// Returns true if the request is allowed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed { .. })
    }

    /// Returns true if the request is limited.
    pub fn is_limited(&self) -> bool {
        matches!(self, RateLimitResult::Limited { .. })
    }

    /// Get the limit value.
    pub fn limit(&self) -> u32 {
        match self {
            RateLimitResult::Allowed { limit, .. } => *limit,
            RateLimitResult::Limited { limit, .. } => *limit,
        }
    }

    /// Get the remaining count (always 0 when limited).
    pub fn remaining(&self) -> u32 {
        match self {
            RateLimitResult::Allowed { remaining, .. } => *remaining,
            RateLimitResult::Limited { .. } => 0,
        }
    }

    /// Seconds to wait before retrying, if limited.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            RateLimitResult::Limited { retry_after_secs, .. } => Some(*retry_after_secs),
            _ => None,
        }
    }

    /// [`retry_after_secs`](Self::retry_after_secs) as a `Duration`.
    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_secs().map(Duration::from_secs)
    }

    /// User-facing message, if limited.
    pub fn message(&self) -> Option<&str> {
        match self {
            RateLimitResult::Limited { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// Formats the rejection message shown to users.
pub(crate) fn limited_message(retry_after_secs: u64) -> String {
    format!("Too many requests. Please try again in {retry_after_secs} seconds.")
}

/// A rate limiter that enforces per-key request limits over sliding windows.
///
/// One instance is meant to be shared (behind an `Arc`) by every caller in the
/// process; two independent instances would each admit a full quota.
///
/// # Example
/// ```ignore
/// use request_governor_lib::rate_limit::{PolicyTable, RateLimiter};
///
/// let limiter = RateLimiter::new(PolicyTable::default());
/// for _ in 0..5 {
///     assert!(limiter.check_limit("/login_anonymous", "login").is_allowed());
/// }
/// assert!(limiter.check_limit("/login_anonymous", "login").is_limited());
/// ```
pub struct RateLimiter {
    policies: PolicyTable,
    windows: Mutex<WindowStore>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    /// Create a rate limiter on the monotonic system clock.
    pub fn new(policies: PolicyTable) -> Self {
        Self::with_clock(policies, Arc::new(SystemClock::new()))
    }

    /// Create a rate limiter reading time from `clock`.
    pub fn with_clock(policies: PolicyTable, clock: Arc<dyn Clock>) -> Self {
        Self { policies, windows: Mutex::new(WindowStore::new()), clock }
    }

    /// Check whether a request for `key` is admitted under `policy_name`.
    ///
    /// An admitted request is recorded; a rejected one is not. Unknown policy
    /// names use the `default` policy.
    ///
    /// # Parameters
    /// - `key`: rate limit key, usually from [`resolve_key`](super::resolve_key)
    /// - `policy_name`: name of the policy to apply (`default`, `login`, `api`, ...)
    pub fn check_limit(&self, key: &str, policy_name: &str) -> RateLimitResult {
        let policy = self.policies.get(policy_name);
        let limit = policy.max_requests();

        let mut store = self.store();
        let now = self.clock.now_ms();
        let window = store.pruned(key, now, policy.window_ms());

        if window.len() >= limit as usize {
            let oldest = window.front().copied().unwrap_or(now);
            let wait_ms = oldest
                .saturating_add(policy.window_ms())
                .saturating_sub(now);
            let retry_after_secs = wait_ms.div_ceil(1000);

            warn!(key, policy = policy_name, limit, retry_after_secs, "rate limit exceeded");

            return RateLimitResult::Limited {
                limit,
                retry_after_secs,
                message: limited_message(retry_after_secs),
            };
        }

        window.push_back(now);
        let remaining = limit.saturating_sub(window.len() as u32);
        debug!(key, policy = policy_name, limit, remaining, "rate limit check passed");

        RateLimitResult::Allowed { limit, remaining }
    }

    /// Discard the window for `key`.
    pub fn reset(&self, key: &str) {
        if self.store().remove(key) {
            debug!(key, "rate limit window reset");
        }
    }

    /// Discard every window. Used on logout and session reset.
    pub fn clear_all(&self) {
        let mut store = self.store();
        let keys = store.len();
        store.clear();
        debug!(keys, "all rate limit windows cleared");
    }

    /// The policy `name` resolves to.
    pub fn policy(&self, name: &str) -> RateLimitPolicy {
        self.policies.get(name)
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Number of keys currently holding a window.
    pub fn tracked_keys(&self) -> usize {
        self.store().len()
    }

    fn store(&self) -> MutexGuard<'_, WindowStore> {
        match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                warn!("Rate limiter window store lock poisoned");
                poisoned.into_inner()
            }
        }
    }
}
