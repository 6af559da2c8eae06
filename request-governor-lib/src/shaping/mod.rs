//! Call-rate shaping for locally triggered actions (search boxes, refresh
//! buttons, scroll handlers).
//!
//! These wrappers decide how often a caller *attempts* an action; they never
//! consult the rate limiter. Both run their deferred executions on tokio
//! timers and own at most one pending task at a time.

mod debounce;
mod throttle;

pub use debounce::{debounce, Debounced};
pub use throttle::{throttle, Throttled};

use std::sync::{Mutex, MutexGuard};
use tracing::warn;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => {
            warn!("call shaping state lock poisoned");
            poisoned.into_inner()
        }
    }
}
