// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::timers::Timers;
use crate::{Scheduler, Task, TimerHandle};

/// A scheduler driven by virtual time.
///
/// Time stands still until [`advance`][Self::advance] moves it forward. Tasks that fall due
/// run on the thread that advances time, in deadline order, with ties broken by scheduling
/// order. This makes the scheduler a single-threaded event loop suitable for headless hosts
/// and for deterministic tests of time-dependent code.
///
/// Clones share the same clock and timers.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::time::Duration;
///
/// use lowbar_timing::{Scheduler, VirtualScheduler};
///
/// let scheduler = VirtualScheduler::new();
/// let fired = Arc::new(AtomicBool::new(false));
///
/// let flag = Arc::clone(&fired);
/// scheduler.schedule(Duration::from_millis(100), Box::new(move || flag.store(true, Ordering::SeqCst)));
///
/// scheduler.advance_millis(99);
/// assert!(!fired.load(Ordering::SeqCst));
///
/// scheduler.advance_millis(1);
/// assert!(fired.load(Ordering::SeqCst));
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualScheduler {
    state: Arc<Mutex<State>>,
}

#[derive(Debug, Default)]
struct State {
    /// Virtual time elapsed since the scheduler was created.
    now: Duration,
    timers: Timers,
}

impl VirtualScheduler {
    /// Creates a scheduler whose virtual clock starts at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the virtual time elapsed since the scheduler was created.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.with_state(|s| s.now)
    }

    /// Returns the number of scheduled tasks that have not run yet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.with_state(|s| s.timers.len())
    }

    /// Returns when the next task falls due, if any task is scheduled.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.with_state(|s| s.timers.next_deadline())
    }

    /// Advances virtual time by `millis` milliseconds. See [`advance`][Self::advance].
    pub fn advance_millis(&self, millis: u64) {
        self.advance(Duration::from_millis(millis));
    }

    /// Advances virtual time by `duration`, running every task that falls due.
    ///
    /// Tasks scheduled by running tasks also run if they fall due before the new time. Time
    /// is moved to each task's deadline before that task runs, so [`now`][Self::now] reads
    /// the deadline from inside the task.
    pub fn advance(&self, duration: Duration) {
        let target = self.now().saturating_add(duration);
        self.advance_to(target);
    }

    /// Runs tasks until none remain, advancing virtual time to each deadline in turn.
    ///
    /// Tasks that keep rescheduling themselves make this loop forever.
    pub fn run_until_idle(&self) {
        while let Some(deadline) = self.next_deadline() {
            self.advance_to(deadline);
        }
    }

    fn advance_to(&self, target: Duration) {
        // The lock is released before each task runs so that tasks can schedule and cancel.
        while let Some(task) = self.pop_due(target) {
            task();
        }

        self.with_state(|s| s.now = s.now.max(target));
    }

    fn pop_due(&self, target: Duration) -> Option<Task> {
        self.with_state(|s| {
            let (key, task) = s.timers.pop_due(target)?;
            s.now = s.now.max(key.deadline());
            tracing::trace!(deadline_ms = key.deadline().as_millis(), "virtual timer fired");
            Some(task)
        })
    }

    fn with_state<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut State) -> R,
    {
        f(&mut self.state.lock())
    }
}

impl Scheduler for VirtualScheduler {
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        self.with_state(|s| {
            let deadline = s.now.saturating_add(delay);
            tracing::trace!(delay_ms = delay.as_millis(), "virtual timer scheduled");
            s.timers.register(deadline, task)
        })
    }

    fn cancel(&self, handle: TimerHandle) {
        self.with_state(|s| {
            if s.timers.unregister(handle) {
                tracing::trace!("virtual timer cancelled");
            }
        });
    }
}
