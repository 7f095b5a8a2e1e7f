// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Debounce and throttle wrappers driven by a pluggable timer scheduler.
//!
//! Rate limiting needs a way to run code later and to call that off again. This crate
//! abstracts that as the [`Scheduler`] trait and builds the two classic wrappers on it:
//!
//! - [`debounce`] - Runs the callback once calls have stopped arriving for a delay, with the
//!   arguments of the last call.
//! - [`throttle`] - Runs the callback at most once per delay window, with the arguments of
//!   the first call in the window.
//!
//! # Schedulers
//!
//! - [`VirtualScheduler`] - Virtual time that only moves when told to. Deterministic, which
//!   makes it the scheduler of choice for tests and for hosts with their own event loop.
//! - `TokioScheduler` - Runs timers on a Tokio runtime. Available with the `tokio` feature.
//!
//! Any type implementing [`Scheduler`] can be used instead, and `Arc<S>` is a scheduler
//! whenever `S` is.
//!
//! # Testing time-dependent code
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! use lowbar_timing::{VirtualScheduler, debounce};
//!
//! let scheduler = VirtualScheduler::new();
//! let saves = Arc::new(AtomicUsize::new(0));
//!
//! let counter = Arc::clone(&saves);
//! let autosave = debounce(scheduler.clone(), Duration::from_secs(1), move |()| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! });
//!
//! for _ in 0..10 {
//!     autosave.call(());
//!     scheduler.advance(Duration::from_millis(100));
//! }
//! assert_eq!(saves.load(Ordering::SeqCst), 0);
//!
//! scheduler.advance(Duration::from_secs(1));
//! assert_eq!(saves.load(Ordering::SeqCst), 1);
//! ```

mod debounce;
mod error;
mod scheduler;
mod throttle;
mod timers;
#[cfg(any(feature = "tokio", test))]
mod tokio_scheduler;
mod virtual_scheduler;

pub use debounce::{Debounced, debounce};
pub use error::{Error, Result};
pub use scheduler::{Scheduler, Task, TimerHandle};
pub use throttle::{Throttled, throttle};
#[cfg(any(feature = "tokio", test))]
#[cfg_attr(docsrs, doc(cfg(feature = "tokio")))]
pub use tokio_scheduler::TokioScheduler;
pub use virtual_scheduler::VirtualScheduler;
