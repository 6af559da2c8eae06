#![forbid(unsafe_code)]

pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod failure;
pub mod governor;
pub mod rate_limit;
pub mod retry;
pub mod session;
pub mod shaping;
pub mod telemetry;

pub use client::{extract_response_data, ApiClient};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{load_from_path, Config};
pub use error::{GovernorError, Result};
pub use failure::{classify_error, Classifier, ErrorClassification, ErrorKind, Failure};
pub use governor::{GovernedError, Governor};
pub use rate_limit::{RateLimitPolicy, RateLimitResult, RateLimiter};
pub use retry::{retry_with_backoff, RetryPolicy};
pub use session::{Connectivity, ConnectivityFlag, IdentityProvider, SessionIdentity};
pub use shaping::{debounce, throttle, Debounced, Throttled};
