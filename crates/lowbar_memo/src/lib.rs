// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
#![cfg_attr(docsrs, feature(doc_cfg))]

//! Memoization of deterministic functions over a pluggable key/value store.
//!
//! A memoized function derives a key from its arguments and returns the stored result when
//! the key has been seen before, invoking the wrapped function only on a miss.
//!
//! # Quick Start
//!
//! ```
//! use lowbar_memo::memoize;
//!
//! let slow_len = memoize(|s: &String| s.chars().count());
//!
//! assert_eq!(slow_len.call("hello".to_string())?, 5);
//! assert_eq!(slow_len.call("hello".to_string())?, 5); // served from the store
//! # Ok::<(), lowbar_memo::Error>(())
//! ```
//!
//! # Overview
//!
//! - [`memoize`] and [`memoize_by`] - Memoize a function on its first argument, or on a key
//!   computed by a resolver.
//! - [`Memoizer`] - Creates memoized functions with a configurable store factory.
//! - [`Memoized`] - A memoized function and the store it owns.
//! - [`CacheStore`] - The `has`/`get`/`set`/`delete` capability set a store must provide.
//! - [`MapCache`] - The default, unbounded store.
//! - [`BoundedCache`] - A capacity-bounded store backed by moka. Available with the `moka`
//!   feature.
//! - [`FirstArg`] - Derives the default key from a call's arguments.
//!
//! # Keys
//!
//! Arguments are passed as one value; functions of several arguments take a tuple. Without
//! a resolver the key is the first tuple element, so `(1, "a")` and `(1, "b")` share an
//! entry. Use [`memoize_by`] or [`Memoizer::wrap_with_resolver`] to key on more than that.
//!
//! # Replacing the store
//!
//! Each memoized function gets a fresh store when it is created. Stores are chosen through
//! [`Memoizer::with_store`], which only affects functions wrapped afterwards:
//!
//! ```
//! use lowbar_memo::{CacheStore, MapCache, Memoizer};
//!
//! let memoizer = Memoizer::new();
//! let first = memoizer.wrap(|n: &u32| n + 1);
//!
//! let memoizer = memoizer.with_store(MapCache::<u32, u32>::new);
//! let second = memoizer.wrap(|n: &u32| n + 2);
//!
//! first.call(1)?;
//! assert_eq!(first.with_store(|s| s.len()), Some(1));
//! assert_eq!(second.with_store(|s| s.len()), Some(0));
//! # Ok::<(), lowbar_memo::Error>(())
//! ```

mod args;
#[cfg(any(feature = "moka", test))]
mod bounded;
mod error;
mod memoize;
mod store;

pub use args::FirstArg;
#[cfg(any(feature = "moka", test))]
pub use bounded::BoundedCache;
pub use error::{Error, Result};
pub use memoize::{FirstArgKey, Memoized, MemoizedFn, Memoizer, memoize, memoize_by};
#[cfg(test)]
pub(crate) use store::MockCacheStore;
pub use store::{CacheStore, DefaultStore, MapCache, StoreFactory};
