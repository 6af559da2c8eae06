use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

use super::lock;

struct ThrottleState {
    last_exec: Option<Instant>,
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

struct Inner<A> {
    func: Box<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    state: Mutex<ThrottleState>,
}

impl<A> Drop for Inner<A> {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.state).pending.take() {
            pending.abort();
        }
    }
}

/// A throttled callable, see [`throttle`].
pub struct Throttled<A> {
    inner: Arc<Inner<A>>,
}

/// Wrap `func` so it runs at most once per `delay`.
///
/// The first call runs immediately. A call within `delay` of the last
/// execution replaces the single pending deferred execution, which fires when
/// `delay` has elapsed and receives the latest arguments. A call after `delay`
/// has elapsed runs immediately and drops any pending deferred execution.
/// Dropping the wrapper drops its pending execution.
///
/// # Example
/// ```ignore
/// let refresh = throttle(|page: u32| reload(page), Duration::from_secs(1));
/// refresh.call(1); // runs now
/// refresh.call(2); // deferred
/// refresh.call(3); // replaces 2; runs with 3 once the second is up
/// ```
pub fn throttle<A, F>(func: F, delay: Duration) -> Throttled<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Throttled {
        inner: Arc::new(Inner {
            func: Box::new(func),
            delay,
            state: Mutex::new(ThrottleState { last_exec: None, pending: None, generation: 0 }),
        }),
    }
}

impl<A: Send + 'static> Throttled<A> {
    /// Invoke the throttled function.
    ///
    /// # Panics
    /// When a deferred execution has to be scheduled outside a tokio runtime.
    pub fn call(&self, args: A) {
        let mut state = lock(&self.inner.state);
        let now = Instant::now();
        let elapsed = state.last_exec.map(|last| now.saturating_duration_since(last));

        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.generation = state.generation.wrapping_add(1);

        match elapsed {
            Some(elapsed) if elapsed < self.inner.delay => {
                let remaining = self.inner.delay.saturating_sub(elapsed);
                let generation = state.generation;
                let weak = Arc::downgrade(&self.inner);
                state.pending = Some(tokio::spawn(fire_later(weak, generation, remaining, args)));
            }
            _ => {
                state.last_exec = Some(now);
                drop(state);
                (self.inner.func)(args);
            }
        }
    }

    /// Whether a deferred execution is scheduled.
    pub fn is_pending(&self) -> bool {
        lock(&self.inner.state).pending.is_some()
    }

    pub fn delay(&self) -> Duration {
        self.inner.delay
    }
}

async fn fire_later<A>(inner: Weak<Inner<A>>, generation: u64, after: Duration, args: A) {
    sleep(after).await;

    let Some(inner) = inner.upgrade() else {
        return;
    };
    {
        let mut state = lock(&inner.state);
        if state.generation != generation {
            return;
        }
        state.pending = None;
        state.last_exec = Some(Instant::now());
    }
    (inner.func)(args);
}
