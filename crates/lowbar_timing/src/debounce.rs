// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{Scheduler, TimerHandle};

/// Wraps `callback` so that it runs only once calls stop arriving for `delay`.
///
/// Every call to [`Debounced::call`] cancels the pending invocation, if any, and schedules a
/// new one carrying the latest arguments. The callback therefore runs with the arguments of
/// the last call in a burst, `delay` after that call.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use parking_lot::Mutex;
/// use lowbar_timing::{VirtualScheduler, debounce};
///
/// let scheduler = VirtualScheduler::new();
/// let seen = Arc::new(Mutex::new(Vec::new()));
///
/// let sink = Arc::clone(&seen);
/// let search = debounce(scheduler.clone(), std::time::Duration::from_millis(100), move |query: String| {
///     sink.lock().push(query);
/// });
///
/// search.call("r".to_string());
/// scheduler.advance_millis(50);
/// search.call("ru".to_string());
/// scheduler.advance_millis(50);
/// search.call("rust".to_string());
/// scheduler.advance_millis(100);
///
/// assert_eq!(*seen.lock(), ["rust"]);
/// ```
pub fn debounce<A, S, F>(scheduler: S, delay: Duration, callback: F) -> Debounced<A, S>
where
    A: Send + 'static,
    S: Scheduler + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounced {
        inner: Arc::new(Inner {
            scheduler,
            delay,
            callback: Box::new(callback),
            state: Mutex::new(State::default()),
        }),
    }
}

/// A debounced callback created by [`debounce`].
///
/// Clones share the pending invocation. Dropping the wrapper does not cancel it.
pub struct Debounced<A, S> {
    inner: Arc<Inner<A, S>>,
}

struct Inner<A, S> {
    scheduler: S,
    delay: Duration,
    callback: Box<dyn Fn(A) + Send + Sync>,
    state: Mutex<State>,
}

#[derive(Debug, Default)]
struct State {
    pending: Option<TimerHandle>,

    /// Bumped on every call. A firing task whose generation is stale lost a race with a
    /// later call and must not invoke the callback.
    generation: u64,
}

impl<A, S> Debounced<A, S>
where
    A: Send + 'static,
    S: Scheduler + 'static,
{
    /// Restarts the wait and remembers `args` for the eventual invocation.
    pub fn call(&self, args: A) {
        let mut state = self.inner.state.lock();

        if let Some(handle) = state.pending.take() {
            self.inner.scheduler.cancel(handle);
            tracing::trace!("debounced call superseded");
        }

        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        let inner = Arc::clone(&self.inner);
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.delay, Box::new(move || inner.fire(generation, args)));

        state.pending = Some(handle);
    }

    /// Returns `true` while an invocation is scheduled but has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.state.lock().pending.is_some()
    }
}

impl<A, S> Inner<A, S> {
    fn fire(&self, generation: u64, args: A) {
        {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::trace!("stale debounce timer ignored");
                return;
            }

            state.pending = None;
        }

        tracing::debug!("debounced call invoked");
        (self.callback)(args);
    }
}

impl<A, S> Clone for Debounced<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S: fmt::Debug> fmt::Debug for Debounced<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debounced")
            .field("scheduler", &self.inner.scheduler)
            .field("delay", &self.inner.delay)
            .field("pending", &self.inner.state.lock().pending)
            .finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::VirtualScheduler;

    type Log = Arc<Mutex<Vec<u32>>>;

    fn recorded(scheduler: &VirtualScheduler, delay_ms: u64) -> (Debounced<u32, VirtualScheduler>, Log) {
        let log = Log::default();
        let sink = Arc::clone(&log);
        let debounced = debounce(scheduler.clone(), Duration::from_millis(delay_ms), move |n| sink.lock().push(n));
        (debounced, log)
    }

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(Debounced<u32, VirtualScheduler>: Send, Sync, Clone, fmt::Debug);
    }

    #[test]
    fn burst_collapses_to_last_call() {
        let scheduler = VirtualScheduler::new();
        let (debounced, log) = recorded(&scheduler, 100);

        for n in 1..=5 {
            debounced.call(n);
            scheduler.advance_millis(20);
        }
        assert!(log.lock().is_empty());
        assert_eq!(scheduler.pending(), 1);

        scheduler.advance_millis(80);
        assert_eq!(*log.lock(), [5]);
        assert!(!debounced.is_pending());
    }

    #[test]
    fn fires_exactly_delay_after_last_call() {
        let scheduler = VirtualScheduler::new();
        let (debounced, log) = recorded(&scheduler, 100);

        debounced.call(1);
        scheduler.advance_millis(60);
        debounced.call(2);

        scheduler.advance_millis(99);
        assert!(log.lock().is_empty());
        assert!(debounced.is_pending());

        scheduler.advance_millis(1);
        assert_eq!(*log.lock(), [2]);
    }

    #[test]
    fn separate_bursts_each_fire() {
        let scheduler = VirtualScheduler::new();
        let (debounced, log) = recorded(&scheduler, 10);

        debounced.call(1);
        scheduler.advance_millis(10);
        debounced.call(2);
        scheduler.advance_millis(10);

        assert_eq!(*log.lock(), [1, 2]);
    }

    #[test]
    fn clones_share_pending_invocation() {
        let scheduler = VirtualScheduler::new();
        let (debounced, log) = recorded(&scheduler, 10);
        let clone = debounced.clone();

        debounced.call(1);
        clone.call(2);
        assert!(debounced.is_pending());

        scheduler.run_until_idle();
        assert_eq!(*log.lock(), [2]);
    }

    #[test]
    fn stale_task_does_nothing() {
        let scheduler = VirtualScheduler::new();
        let (debounced, log) = recorded(&scheduler, 10);

        debounced.call(1);
        let stale = debounced.inner.state.lock().generation;
        debounced.call(2);

        debounced.inner.fire(stale, 1);
        assert!(log.lock().is_empty());
        assert!(debounced.is_pending());
    }

    #[test]
    fn dropping_wrapper_keeps_pending_invocation() {
        let scheduler = VirtualScheduler::new();
        let (debounced, log) = recorded(&scheduler, 10);

        debounced.call(7);
        drop(debounced);

        scheduler.advance_millis(10);
        assert_eq!(*log.lock(), [7]);
    }
}
