// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::sync::Arc;
use std::time::Duration;

/// A unit of work run once by a [`Scheduler`] when its delay elapses.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Identifies a task registered with a [`Scheduler`].
///
/// Handles are opaque and cheap to copy. Cancelling a handle whose task already ran, or
/// that a scheduler never issued, does nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Creates a handle from a scheduler-specific identifier.
    ///
    /// Intended for custom [`Scheduler`] implementations.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// Returns the scheduler-specific identifier of this handle.
    #[must_use]
    pub const fn as_raw(self) -> u64 {
        self.0
    }
}

/// The timer facility used by [`debounce`][crate::debounce] and [`throttle`][crate::throttle].
///
/// A scheduler runs each task once, no earlier than `delay` after it was scheduled, unless
/// the task is cancelled first. Implementations must never run a task synchronously from
/// within [`Scheduler::schedule`].
///
/// This crate provides [`VirtualScheduler`][crate::VirtualScheduler], which runs tasks as
/// virtual time is advanced, and `TokioScheduler` (with the `tokio` feature), which runs
/// them on a Tokio runtime.
pub trait Scheduler: Send + Sync {
    /// Schedules `task` to run after `delay`.
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle;

    /// Cancels a scheduled task. No-op if the task already ran or was cancelled.
    fn cancel(&self, handle: TimerHandle);
}

impl<T> Scheduler for Arc<T>
where
    T: Scheduler + ?Sized,
{
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        (**self).schedule(delay, task)
    }

    fn cancel(&self, handle: TimerHandle) {
        (**self).cancel(handle);
    }
}

impl<T> Scheduler for &T
where
    T: Scheduler + ?Sized,
{
    fn schedule(&self, delay: Duration, task: Task) -> TimerHandle {
        (**self).schedule(delay, task)
    }

    fn cancel(&self, handle: TimerHandle) {
        (**self).cancel(handle);
    }
}
