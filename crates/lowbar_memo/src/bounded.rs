// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Capacity-bounded store using moka.

use std::fmt;
use std::hash::Hash;

use moka::sync::Cache;

use crate::{CacheStore, Result};

/// A store that holds at most `capacity` entries, backed by [`moka`].
///
/// Once full, moka evicts entries according to its admission and eviction policy, so a
/// memoized function backed by this store may run again for a key it has seen before.
/// Eviction happens in the background; `len` is therefore not reported.
///
/// # Examples
///
/// ```
/// use lowbar_memo::{BoundedCache, Memoizer};
///
/// let memoizer = Memoizer::new().with_store(|| BoundedCache::new(1_000));
/// let cube = memoizer.wrap(|n: &u64| n * n * n);
///
/// assert_eq!(cube.call(3)?, 27);
/// # Ok::<(), lowbar_memo::Error>(())
/// ```
#[derive(Clone)]
pub struct BoundedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    inner: Cache<K, V>,
    capacity: u64,
}

impl<K, V> BoundedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Creates a store that holds at most `capacity` entries.
    #[must_use]
    pub fn new(capacity: u64) -> Self {
        Self {
            inner: Cache::new(capacity),
            capacity,
        }
    }

    /// The maximum number of entries.
    #[must_use]
    pub fn capacity(&self) -> u64 {
        self.capacity
    }
}

impl<K, V> fmt::Debug for BoundedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache").field("capacity", &self.capacity).finish_non_exhaustive()
    }
}

impl<K, V> CacheStore<K, V> for BoundedCache<K, V>
where
    K: Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn has(&self, key: &K) -> Result<bool> {
        Ok(self.inner.contains_key(key))
    }

    fn get(&self, key: &K) -> Result<Option<V>> {
        Ok(self.inner.get(key))
    }

    fn set(&mut self, key: K, value: V) -> Result<()> {
        self.inner.insert(key, value);
        Ok(())
    }

    fn delete(&mut self, key: &K) -> Result<bool> {
        Ok(self.inner.remove(key).is_some())
    }
}
