// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use std::fmt;
use std::marker::PhantomData;

use parking_lot::Mutex;

use crate::{CacheStore, DefaultStore, FirstArg, MapCache, Result, StoreFactory};

/// The key function used when no resolver is given: [`FirstArg::first_arg`].
pub type FirstArgKey<A> = fn(&A) -> <A as FirstArg>::First;

/// A function memoized on its first argument with the default store.
pub type MemoizedFn<A, V, F> =
    Memoized<A, <A as FirstArg>::First, V, F, FirstArgKey<A>, MapCache<<A as FirstArg>::First, V>>;

/// Memoizes `func` on its first argument, using a fresh [`MapCache`].
///
/// Repeated calls whose first argument is equal return the stored result without invoking
/// `func` again. Remaining tuple elements do not take part in the key; use [`memoize_by`]
/// when they must.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicU32, Ordering};
///
/// let calls = AtomicU32::new(0);
/// let square = lowbar_memo::memoize(|n: &u64| {
///     calls.fetch_add(1, Ordering::Relaxed);
///     n * n
/// });
///
/// assert_eq!(square.call(12)?, 144);
/// assert_eq!(square.call(12)?, 144);
/// assert_eq!(calls.load(Ordering::Relaxed), 1);
/// # Ok::<(), lowbar_memo::Error>(())
/// ```
pub fn memoize<A, V, F>(func: F) -> MemoizedFn<A, V, F>
where
    A: FirstArg,
    A::First: std::hash::Hash + Eq,
    V: Clone,
    F: Fn(&A) -> V,
{
    Memoizer::new().wrap(func)
}

/// Memoizes `func` under the key computed by `resolver`, using a fresh [`MapCache`].
///
/// The resolver receives the same arguments as `func`. Two calls whose resolver outputs
/// are equal share a stored result even when their raw arguments differ.
///
/// # Examples
///
/// ```
/// let area = lowbar_memo::memoize_by(|&(w, h): &(u32, u32)| w * h, |&(w, h)| (w, h));
///
/// assert_eq!(area.call((2, 3))?, 6);
/// assert_eq!(area.call((2, 4))?, 8);
/// # Ok::<(), lowbar_memo::Error>(())
/// ```
pub fn memoize_by<A, K, V, F, R>(func: F, resolver: R) -> Memoized<A, K, V, F, R, MapCache<K, V>>
where
    K: std::hash::Hash + Eq,
    V: Clone,
    F: Fn(&A) -> V,
    R: Fn(&A) -> K,
{
    Memoizer::new().wrap_with_resolver(func, resolver)
}

/// Creates memoized functions, each with a fresh store from the configured factory.
///
/// The store factory is read when a function is wrapped. Replacing it with
/// [`Memoizer::with_store`] affects only functions wrapped afterwards; functions wrapped
/// earlier keep the store they were created with.
///
/// # Examples
///
/// ```
/// use lowbar_memo::{CacheStore, MapCache, Memoizer};
///
/// let memoizer = Memoizer::new().with_store(MapCache::<u32, String>::new);
/// let describe = memoizer.wrap(|n: &u32| format!("#{n}"));
///
/// assert_eq!(describe.call(5)?, "#5");
/// assert_eq!(describe.with_store(|store| store.len()), Some(1));
/// # Ok::<(), lowbar_memo::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Memoizer<S = DefaultStore> {
    factory: S,
}

impl Memoizer {
    /// Creates a memoizer that backs each function with a [`MapCache`].
    #[must_use]
    pub fn new() -> Self {
        Self { factory: DefaultStore }
    }
}

impl<S> Memoizer<S> {
    /// Returns a memoizer that creates stores with `factory` instead.
    ///
    /// `factory` is any [`StoreFactory`], typically a closure or constructor such as
    /// `MapCache::new`.
    #[must_use]
    pub fn with_store<T>(self, factory: T) -> Memoizer<T> {
        Memoizer { factory }
    }

    /// Memoizes `func` on its first argument.
    pub fn wrap<A, V, F>(&self, func: F) -> Memoized<A, A::First, V, F, FirstArgKey<A>, S::Store>
    where
        A: FirstArg,
        S: StoreFactory<A::First, V>,
        V: Clone,
        F: Fn(&A) -> V,
    {
        self.wrap_with_resolver(func, <A as FirstArg>::first_arg as FirstArgKey<A>)
    }

    /// Memoizes `func` under the key computed by `resolver`.
    pub fn wrap_with_resolver<A, K, V, F, R>(&self, func: F, resolver: R) -> Memoized<A, K, V, F, R, S::Store>
    where
        S: StoreFactory<K, V>,
        V: Clone,
        F: Fn(&A) -> V,
        R: Fn(&A) -> K,
    {
        Memoized {
            func,
            resolver,
            store: Mutex::new(self.factory.create()),
            _marker: PhantomData,
        }
    }
}

/// A memoized function together with the store it owns.
///
/// Created by [`memoize`], [`memoize_by`] or a [`Memoizer`]. The store lives as long as
/// the wrapper and is never shared with other wrappers.
pub struct Memoized<A, K, V, F, R, S> {
    func: F,
    resolver: R,
    store: Mutex<S>,
    _marker: PhantomData<fn(&A) -> (K, V)>,
}

impl<A, K, V, F, R, S> Memoized<A, K, V, F, R, S>
where
    V: Clone,
    F: Fn(&A) -> V,
    R: Fn(&A) -> K,
    S: CacheStore<K, V>,
{
    /// Calls the function, or returns the result stored for the derived key.
    ///
    /// The function runs at most once per distinct key, as long as the store does not
    /// evict. The store is not locked while the function runs, so the function may itself
    /// call other memoized functions.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the store. A panic in the function or resolver
    /// propagates to the caller and nothing is stored.
    pub fn call(&self, args: A) -> Result<V> {
        let key = (self.resolver)(&args);

        if let Some(value) = self.lookup(&key)? {
            tracing::trace!("memoized call served from store");
            return Ok(value);
        }

        tracing::trace!("memoized call computing result");
        let value = (self.func)(&args);
        self.store.lock().set(key, value.clone())?;

        Ok(value)
    }

    /// Removes the stored result for the key that `args` derive.
    ///
    /// Returns `true` if a result was removed.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the store.
    pub fn forget(&self, args: &A) -> Result<bool> {
        let key = (self.resolver)(args);
        self.store.lock().delete(&key)
    }

    fn lookup(&self, key: &K) -> Result<Option<V>> {
        let store = self.store.lock();

        if store.has(key)? {
            // A store that evicts may still report a miss here.
            return store.get(key);
        }

        Ok(None)
    }
}

impl<A, K, V, F, R, S> Memoized<A, K, V, F, R, S> {
    /// Runs `f` with exclusive access to the store.
    ///
    /// Do not call the memoized function from inside `f`; the store is locked.
    pub fn with_store<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        f(&mut self.store.lock())
    }
}

impl<A, K, V, F, R, S> fmt::Debug for Memoized<A, K, V, F, R, S>
where
    S: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Memoized").field("store", &*self.store.lock()).finish_non_exhaustive()
    }
}

#[cfg_attr(coverage_nightly, coverage(off))]
#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;
    use crate::{Error, MockCacheStore};

    #[test]
    fn assert_types() {
        static_assertions::assert_impl_all!(MemoizedFn<u32, u32, fn(&u32) -> u32>: Send, Sync);
    }

    #[test]
    fn second_call_is_served_from_store() {
        let calls = AtomicU32::new(0);
        let double = memoize(|n: &u32| {
            calls.fetch_add(1, Ordering::Relaxed);
            n * 2
        });

        assert_eq!(double.call(4).unwrap(), 8);
        assert_eq!(double.call(4).unwrap(), 8);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        assert_eq!(double.call(5).unwrap(), 10);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn default_key_ignores_trailing_arguments() {
        let add = memoize(|&(a, b): &(u32, u32)| a + b);

        assert_eq!(add.call((1, 1)).unwrap(), 2);
        // Same first argument, so the first result is returned.
        assert_eq!(add.call((1, 100)).unwrap(), 2);
    }

    #[test]
    fn resolver_controls_the_key() {
        let calls = AtomicU32::new(0);
        let len = memoize_by(
            |s: &String| {
                calls.fetch_add(1, Ordering::Relaxed);
                s.len()
            },
            |s| s.to_lowercase(),
        );

        assert_eq!(len.call("Hello".to_string()).unwrap(), 5);
        assert_eq!(len.call("HELLO".to_string()).unwrap(), 5);
        assert_eq!(calls.load(Ordering::Relaxed), 1);

        assert_eq!(len.call("other".to_string()).unwrap(), 5);
        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn forget_recomputes() {
        let calls = AtomicU32::new(0);
        let id = memoize(|n: &u8| {
            calls.fetch_add(1, Ordering::Relaxed);
            *n
        });

        id.call(1).unwrap();
        assert!(id.forget(&1).unwrap());
        assert!(!id.forget(&1).unwrap());
        id.call(1).unwrap();

        assert_eq!(calls.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn panic_in_function_stores_nothing() {
        let explode = memoize(|n: &u8| {
            assert!(*n != 0, "zero is not allowed");
            *n
        });

        testing_aids::assert_panic!(explode.call(0));

        assert_eq!(explode.with_store(|s| s.len()), Some(0));
    }

    #[test]
    fn store_error_from_has_propagates() {
        let factory = || {
            let mut store = MockCacheStore::<u8, u8>::new();
            store.expect_has().returning(|_| Err(Error::from_message("has failed")));
            store
        };

        let memoized = Memoizer::new().with_store(factory).wrap(|n: &u8| *n);
        let error = memoized.call(1).unwrap_err();

        assert_eq!(error.to_string(), "has failed");
    }

    #[test]
    fn store_error_from_set_propagates_after_computing() {
        let calls = AtomicU32::new(0);
        let factory = || {
            let mut store = MockCacheStore::<u8, u8>::new();
            store.expect_has().returning(|_| Ok(false));
            store.expect_set().times(1).returning(|_, _| Err(Error::from_message("set failed")));
            store
        };

        let memoized = Memoizer::new().with_store(factory).wrap(|n: &u8| {
            calls.fetch_add(1, Ordering::Relaxed);
            *n
        });

        assert_eq!(memoized.call(3).unwrap_err().to_string(), "set failed");
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn reported_but_evicted_entry_recomputes() {
        let factory = || {
            let mut store = MockCacheStore::<u8, u8>::new();
            store.expect_has().returning(|_| Ok(true));
            store.expect_get().returning(|_| Ok(None));
            store.expect_set().times(1).returning(|_, _| Ok(()));
            store
        };

        let memoized = Memoizer::new().with_store(factory).wrap(|n: &u8| n + 1);

        assert_eq!(memoized.call(1).unwrap(), 2);
    }

    #[test]
    fn debug_output() {
        let memoized = memoize(|n: &u8| *n);
        memoized.call(1).unwrap();

        assert_eq!(format!("{memoized:?}"), "Memoized { store: MapCache { len: 1 }, .. }");
    }

    #[test]
    fn logs_hits_and_misses() {
        let capture = testing_aids::LogCapture::new();
        let memoized = memoize(|n: &u8| *n);

        tracing::subscriber::with_default(capture.subscriber_at(tracing::Level::TRACE), || {
            memoized.call(1).unwrap();
            memoized.call(1).unwrap();
        });

        capture.assert_contains("memoized call computing result");
        capture.assert_contains("memoized call served from store");
    }
}
