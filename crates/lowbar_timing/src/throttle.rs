// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::{Scheduler, TimerHandle};

/// Wraps `callback` so that it runs at most once per `delay` window.
///
/// The first call in a window schedules the callback with that call's arguments. Calls made
/// while the invocation is pending are dropped along with their arguments. Once the callback
/// runs, the next call opens a new window.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use std::time::Duration;
///
/// use lowbar_timing::{VirtualScheduler, throttle};
///
/// let scheduler = VirtualScheduler::new();
/// let total = Arc::new(AtomicU32::new(0));
///
/// let sink = Arc::clone(&total);
/// let on_scroll = throttle(scheduler.clone(), Duration::from_millis(100), move |y: u32| {
///     sink.fetch_add(y, Ordering::SeqCst);
/// });
///
/// on_scroll.call(1);
/// on_scroll.call(2); // dropped
/// scheduler.advance_millis(100);
///
/// assert_eq!(total.load(Ordering::SeqCst), 1);
/// ```
pub fn throttle<A, S, F>(scheduler: S, delay: Duration, callback: F) -> Throttled<A, S>
where
    A: Send + 'static,
    S: Scheduler + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Throttled {
        inner: Arc::new(Inner {
            scheduler,
            delay,
            callback: Box::new(callback),
            pending: Mutex::new(None),
        }),
    }
}

/// A throttled callback created by [`throttle`].
///
/// Clones share the same window. Dropping the wrapper does not cancel a pending invocation.
pub struct Throttled<A, S> {
    inner: Arc<Inner<A, S>>,
}

struct Inner<A, S> {
    scheduler: S,
    delay: Duration,
    callback: Box<dyn Fn(A) + Send + Sync>,
    pending: Mutex<Option<TimerHandle>>,
}

impl<A, S> Throttled<A, S>
where
    A: Send + 'static,
    S: Scheduler + 'static,
{
    /// Schedules the callback with `args` unless an invocation is already pending.
    pub fn call(&self, args: A) {
        let mut pending = self.inner.pending.lock();

        if pending.is_some() {
            tracing::trace!("throttled call dropped");
            return;
        }

        let inner = Arc::clone(&self.inner);
        let handle = self
            .inner
            .scheduler
            .schedule(self.inner.delay, Box::new(move || inner.fire(args)));

        *pending = Some(handle);
    }

    /// Returns `true` while an invocation is scheduled but has not run yet.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.inner.pending.lock().is_some()
    }
}

impl<A, S> Inner<A, S> {
    fn fire(&self, args: A) {
        // Cleared first so calls made by the callback open a new window.
        *self.pending.lock() = None;

        tracing::debug!("throttled call invoked");
        (self.callback)(args);
    }
}

impl<A, S> Clone for Throttled<A, S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A, S: fmt::Debug> fmt::Debug for Throttled<A, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Throttled")
            .field("scheduler", &self.inner.scheduler)
            .field("delay", &self.inner.delay)
            .field("pending", &*self.inner.pending.lock())
            .finish_non_exhaustive()
    }
}
