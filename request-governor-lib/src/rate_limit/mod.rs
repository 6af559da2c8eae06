//! Client-side rate limiting for outbound backend calls.
//!
//! Admission is decided per rate-limit key (endpoint + principal) against a
//! named policy, using an exact sliding window of admitted-request timestamps:
//!
//! 1. **WindowStore** (`window.rs`): per-key ordered timestamps, pruned lazily
//!    when a key is touched.
//!
//! 2. **PolicyTable** (`policy.rs`): named `max_requests` / `window_ms` pairs.
//!    Unknown policy names fall back to `default`.
//!
//! 3. **RateLimiter** (`limiter.rs`): read-prune-append under one lock, so the
//!    number of admitted calls inside any window never exceeds the policy limit
//!    even with concurrent callers sharing a key.
//!
//! 4. **Key resolution** (`key.rs`): `"{endpoint}_{principal}"`, with
//!    `anonymous` standing in for a missing identity.
//!
//! # Example Usage
//!
//! ```ignore
//! use request_governor_lib::rate_limit::{PolicyTable, RateLimiter, RateLimitResult};
//!
//! let limiter = RateLimiter::new(PolicyTable::default());
//!
//! match limiter.check_limit("/auth/login_anonymous", "login") {
//!     RateLimitResult::Allowed { remaining, .. } => {
//!         println!("go ahead, {remaining} left in this window");
//!     }
//!     RateLimitResult::Limited { message, .. } => {
//!         println!("{message}");
//!     }
//! }
//! ```
//!
//! # Configuration
//!
//! ```toml
//! [policies.login]
//! max_requests = 5
//! window_ms = 300000
//!
//! [policies.reports]
//! max_requests = 10
//! window_ms = 60000
//! ```

mod key;
mod limiter;
mod policy;
mod window;

pub use key::{rate_limit_key, resolve_key, ANONYMOUS};
pub use limiter::{RateLimitResult, RateLimiter};
pub use policy::{PolicyTable, RateLimitPolicy, API_POLICY, DEFAULT_POLICY, LOGIN_POLICY};
pub use window::WindowStore;
