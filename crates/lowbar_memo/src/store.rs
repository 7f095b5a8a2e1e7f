// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The key/value capability set that backs memoization.
//!
//! [`CacheStore`] is deliberately small: `has`, `get`, `set` and `delete`. Any type that
//! provides these four operations can back a [`Memoized`][crate::Memoized] function, and
//! [`StoreFactory`] decides which store a freshly wrapped function receives.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use foldhash::fast::RandomState;

use crate::Result;

/// Key/value store used by a memoized function.
///
/// A store holds at most one value per key; a `set` for a key that is already present
/// overwrites the earlier value. How keys compare is up to the store.
///
/// All methods are fallible so that custom backends can report failures. Errors propagate
/// unchanged to the caller of the memoized function.
#[cfg_attr(test, mockall::automock)]
pub trait CacheStore<K, V> {
    /// Returns `true` if a value is stored under `key`.
    fn has(&self, key: &K) -> Result<bool>;

    /// Returns a copy of the value stored under `key`, if any.
    fn get(&self, key: &K) -> Result<Option<V>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: K, value: V) -> Result<()>;

    /// Removes the value stored under `key`.
    ///
    /// Returns `true` if a value was removed.
    fn delete(&mut self, key: &K) -> Result<bool>;

    /// Returns the number of stored entries, if the store tracks it.
    fn len(&self) -> Option<usize> {
        None
    }

    /// Returns `true` if the store holds no entries, if the store tracks its size.
    fn is_empty(&self) -> Option<bool> {
        self.len().map(|len| len == 0)
    }
}

/// Creates the store for each newly memoized function.
///
/// Implemented for every `Fn() -> S` closure, and for [`DefaultStore`].
pub trait StoreFactory<K, V> {
    /// The store type produced by this factory.
    type Store: CacheStore<K, V>;

    /// Creates an empty store.
    fn create(&self) -> Self::Store;
}

impl<K, V, S, F> StoreFactory<K, V> for F
where
    F: Fn() -> S,
    S: CacheStore<K, V>,
{
    type Store = S;

    fn create(&self) -> S {
        self()
    }
}

/// The factory used when no other store is configured. Produces a [`MapCache`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultStore;

impl<K, V> StoreFactory<K, V> for DefaultStore
where
    K: Hash + Eq,
    V: Clone,
{
    type Store = MapCache<K, V>;

    fn create(&self) -> MapCache<K, V> {
        MapCache::new()
    }
}

/// Unbounded in-memory store backed by a hash map.
///
/// This is the default store of a memoized function. It never evicts and its operations
/// never fail.
///
/// # Examples
///
/// ```
/// use lowbar_memo::{CacheStore, MapCache};
///
/// let mut store = MapCache::new();
/// store.set("a", 1)?;
///
/// assert!(store.has(&"a")?);
/// assert_eq!(store.get(&"a")?, Some(1));
/// # Ok::<(), lowbar_memo::Error>(())
/// ```
pub struct MapCache<K, V> {
    entries: HashMap<K, V, RandomState>,
}

impl<K, V> MapCache<K, V> {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::with_hasher(RandomState::default()),
        }
    }

    /// Iterates over the stored keys in arbitrary order.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.entries.keys()
    }
}

impl<K, V> Default for MapCache<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for MapCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapCache").field("len", &self.entries.len()).finish()
    }
}

impl<K, V> CacheStore<K, V> for MapCache<K, V>
where
    K: Hash + Eq,
    V: Clone,
{
    fn has(&self, key: &K) -> Result<bool> {
        Ok(self.entries.contains_key(key))
    }

    fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: K, value: V) -> Result<()> {
        self.entries.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &K) -> Result<bool> {
        Ok(self.entries.remove(key).is_some())
    }

    fn len(&self) -> Option<usize> {
        Some(self.entries.len())
    }
}
