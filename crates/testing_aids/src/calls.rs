// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

/// Records the arguments of every invocation of a callback, in invocation order.
///
/// Hand out [`recorder`][Self::recorder] closures to the code under test, then inspect the
/// log. Clones share the same log.
#[derive(Debug)]
pub struct CallLog<T> {
    calls: Arc<Mutex<Vec<T>>>,
}

impl<T> CallLog<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a callback that appends its argument to this log.
    pub fn recorder(&self) -> impl Fn(T) + Send + Sync + 'static
    where
        T: Send + 'static,
    {
        let calls = Arc::clone(&self.calls);
        move |args| calls.lock().push(args)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    /// Returns a copy of the recorded calls.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.calls.lock().clone()
    }

    /// Removes and returns the recorded calls.
    #[must_use]
    pub fn take(&self) -> Vec<T> {
        std::mem::take(&mut *self.calls.lock())
    }
}

impl<A> CallLog<(A, Duration)> {
    /// Returns a callback that records its argument together with the time read from `clock`
    /// at the moment of invocation.
    pub fn recorder_with_time<C, N>(&self, clock: C, now: N) -> impl Fn(A) + Send + Sync + 'static
    where
        A: Send + 'static,
        C: Send + Sync + 'static,
        N: Fn(&C) -> Duration + Send + Sync + 'static,
    {
        let calls = Arc::clone(&self.calls);
        move |args| {
            let at = now(&clock);
            calls.lock().push((args, at));
        }
    }
}

impl<T> Clone for CallLog<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
        }
    }
}

impl<T> Default for CallLog<T> {
    fn default() -> Self {
        Self::new()
    }
}
