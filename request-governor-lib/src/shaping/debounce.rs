use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use super::lock;

struct DebounceState {
    pending: Option<JoinHandle<()>>,
    generation: u64,
}

struct Inner<A> {
    func: Box<dyn Fn(A) + Send + Sync>,
    delay: Duration,
    state: Mutex<DebounceState>,
}

impl<A> Drop for Inner<A> {
    fn drop(&mut self) {
        if let Some(pending) = lock(&self.state).pending.take() {
            pending.abort();
        }
    }
}

/// A debounced callable, see [`debounce`].
pub struct Debounced<A> {
    inner: Arc<Inner<A>>,
}

/// Wrap `func` so a burst of calls produces one execution, `delay` after the
/// last call of the burst, with that call's arguments.
///
/// A burst that never goes quiet before the wrapper is dropped produces no
/// execution at all.
pub fn debounce<A, F>(func: F, delay: Duration) -> Debounced<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        inner: Arc::new(Inner {
            func: Box::new(func),
            delay,
            state: Mutex::new(DebounceState { pending: None, generation: 0 }),
        }),
    }
}

impl<A: Send + 'static> Debounced<A> {
    /// Invoke the debounced function.
    ///
    /// # Panics
    /// When called outside a tokio runtime.
    pub fn call(&self, args: A) {
        let mut state = lock(&self.inner.state);
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        state.generation = state.generation.wrapping_add(1);

        let weak = Arc::downgrade(&self.inner);
        let generation = state.generation;
        state.pending = Some(tokio::spawn(fire_later(weak, generation, self.inner.delay, args)));
    }

    /// Whether an execution is scheduled.
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
    }
    (inner.func)(args);
}
