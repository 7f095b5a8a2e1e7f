// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::{Error, Result, Scheduler, Task, TimerHandle};

/// A scheduler that runs tasks on a Tokio runtime.
///
/// Each scheduled task is spawned onto the runtime as a future that sleeps for the requested
/// delay and then runs the task. Cancelling a handle aborts that future.
///
/// Clones share the same runtime handle and set of pending timers.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use lowbar_timing::{Scheduler, TokioScheduler};
///
/// # #[tokio::main(flavor = "current_thread", start_paused = true)]
/// # async fn main() -> Result<(), lowbar_timing::Error> {
/// let scheduler = TokioScheduler::new()?;
/// let (tx, rx) = tokio::sync::oneshot::channel();
///
/// scheduler.schedule(Duration::from_millis(10), Box::new(move || {
///     let _ = tx.send("fired");
/// }));
///
/// assert_eq!(rx.await.ok(), Some("fired"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    runtime: Handle,
    timers: Mutex<HashMap<u64, JoinHandle<()>>>,
    last_id: AtomicU64,
}

impl TokioScheduler {
    /// Creates a scheduler bound to the Tokio runtime of the calling thread.
    ///
    /// # Errors
    ///
    /// Returns an error if the calling thread is not inside a Tokio runtime.
    pub fn new() -> Result<Self> {
        Handle::try_current().map(Self::from_handle).map_err(Error::no_runtime)
    }

    /// Creates a scheduler bound to the given runtime.
    #[must_use]
    pub fn from_handle(runtime: Handle) -> Self {
        Self {
            inner: Arc::new(Inner {
                runtime,
                timers: Mutex::new(HashMap::new()),
                last_id: AtomicU64::new(0),
            }),
        }
    }

    /// Returns the number of scheduled tasks that have neither run nor been cancelled.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.timers.lock().len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        let id = self.inner.last_id.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
        let inner = Arc::clone(&self.inner);

        // Held until the join handle is stored, so a timer that fires right away still
        // finds its own entry.
        let mut timers = self.inner.timers.lock();

        let join = self.inner.runtime.spawn(async move {
            tokio::time::sleep(delay).await;

            // A missing entry means a cancellation won the race after the sleep completed.
            if inner.timers.lock().remove(&id).is_none() {
                return;
            }

            tracing::trace!(id, "tokio timer fired");
            task();
        });

        timers.insert(id, join);
        tracing::trace!(id, delay_ms = delay.as_millis(), "tokio timer scheduled");

        TimerHandle::from_raw(id)
    }

    fn cancel(&self, handle: TimerHandle) {
        let removed = self.inner.timers.lock().remove(&handle.as_raw());

        if let Some(join) = removed {
            join.abort();
            tracing::trace!(id = handle.as_raw(), "tokio timer cancelled");
        }
    }
}
