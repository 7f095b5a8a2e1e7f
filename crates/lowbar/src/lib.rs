// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! A small utility toolkit.
//!
//! This crate bundles the `lowbar` family under one roof:
//!
//! - [`memo`] - Memoization with a replaceable cache store: [`memoize`], [`memoize_by`].
//! - [`timing`] - Rate limiting over a pluggable timer scheduler: [`debounce`], [`throttle`].
//! - [`dom`] - Element augmentation and outside-click detection: [`augment`], [`click_outside`].
//! - [`helpers`] - Object projection, shuffling and value predicates.
//!
//! Each family has its own error type, reachable as `memo::Error`, `timing::Error` and
//! `dom::Error`.
//!
//! # Features
//!
//! - `moka` - Enables `memo::BoundedCache`, a capacity-bounded store.
//! - `tokio` - Enables `timing::TokioScheduler`, which runs timers on a Tokio runtime.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::time::Duration;
//!
//! use lowbar::timing::VirtualScheduler;
//! use lowbar::{debounce, memoize};
//!
//! let lookups = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&lookups);
//! let lookup = Arc::new(memoize(move |word: &String| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//!     word.len()
//! }));
//!
//! let scheduler = VirtualScheduler::new();
//! let memoized = Arc::clone(&lookup);
//! let on_input = debounce(scheduler.clone(), Duration::from_millis(200), move |word: String| {
//!     memoized.call(word).expect("map store never fails");
//! });
//!
//! for word in ["r", "ru", "rust"] {
//!     on_input.call(word.to_string());
//! }
//! scheduler.advance(Duration::from_millis(200));
//! on_input.call("rust".to_string());
//! scheduler.advance(Duration::from_millis(200));
//!
//! assert_eq!(lookups.load(Ordering::SeqCst), 1);
//! ```

pub mod helpers;

#[doc(inline)]
pub use lowbar_dom as dom;
#[doc(inline)]
pub use lowbar_dom::{augment, click_outside};
#[doc(inline)]
pub use lowbar_memo as memo;
#[doc(inline)]
pub use lowbar_memo::{memoize, memoize_by};
#[doc(inline)]
pub use lowbar_timing as timing;
#[doc(inline)]
pub use lowbar_timing::{debounce, throttle};
