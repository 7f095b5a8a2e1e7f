// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::time::Duration;

use crate::{Task, TimerHandle};

/// Orders timers by deadline, then by registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct TimerKey {
    deadline: Duration,

    /// Unique per timer. Also breaks ties between timers with the same deadline.
    id: u64,
}

impl TimerKey {
    /// Determines when the timer fires, measured from the scheduler's origin.
    pub const fn deadline(&self) -> Duration {
        self.deadline
    }
}

/// One-shot timers keyed by deadline, each owning the task it runs.
///
/// Timers are removed from the collection when they are popped or unregistered, so a task
/// can run at most once.
#[derive(Default)]
pub(crate) struct Timers {
    /// Timers in firing order.
    tasks: BTreeMap<TimerKey, Task>,

    /// Deadline of each registered timer, to find its key on cancellation.
    deadlines: HashMap<u64, Duration>,

    last_id: u64,
}

impl Timers {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Registers a task that becomes due at `deadline`.
    pub fn register(&mut self, deadline: Duration, task: Task) -> TimerHandle {
        self.last_id = self.last_id.wrapping_add(1);
        let key = TimerKey { deadline, id: self.last_id };

        self.tasks.insert(key, task);
        self.deadlines.insert(key.id, deadline);

        TimerHandle::from_raw(key.id)
    }

    /// Removes a timer. Returns `false` if it was not registered.
    pub fn unregister(&mut self, handle: TimerHandle) -> bool {
        let id = handle.as_raw();

        match self.deadlines.remove(&id) {
            Some(deadline) => self.tasks.remove(&TimerKey { deadline, id }).is_some(),
            None => false,
        }
    }

    /// Returns the earliest deadline, or `None` if no timers are registered.
    pub fn next_deadline(&self) -> Option<Duration> {
        self.tasks.keys().next().map(TimerKey::deadline)
    }

    /// Removes and returns the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: Duration) -> Option<(TimerKey, Task)> {
        let entry = self.tasks.first_entry()?;

        if entry.key().deadline() > now {
            return None;
        }

        let (key, task) = entry.remove_entry();
        self.deadlines.remove(&key.id);

        Some((key, task))
    }
}

impl fmt::Debug for Timers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timers")
            .field("len", &self.tasks.len())
            .field("next_deadline", &self.next_deadline())
            .finish()
    }
}
