//! Lock-guarded map for sharing between threads.
//!
//! [`AvlMap`] itself never locks. [`SharedAvlMap`] puts the whole map behind
//! one [`RwLock`]: lookups share the lock, every mutation holds it
//! exclusively until the tree is rebalanced.

use parking_lot::RwLock;

use crate::compare::{Comparator, Natural};
use crate::dispose::{DropKey, KeyDisposal};
use crate::map::AvlMap;

/// An [`AvlMap`] behind one lock: readers never observe a rotation in
/// progress, and each mutation (disposal hook included) runs to completion
/// before any other thread sees the map.
pub struct SharedAvlMap<K, V, C = Natural, D = DropKey>
where
    D: KeyDisposal<K>,
{
    inner: RwLock<AvlMap<K, V, C, D>>,
}

impl<K: Ord, V> SharedAvlMap<K, V> {
    pub fn new() -> Self {
        Self::from_map(AvlMap::new())
    }
}

impl<K: Ord, V> Default for SharedAvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, D> SharedAvlMap<K, V, C, D>
where
    C: Comparator<K>,
    D: KeyDisposal<K>,
{
    pub fn from_map(map: AvlMap<K, V, C, D>) -> Self {
        Self {
            inner: RwLock::new(map),
        }
    }

    /// Returns a copy of the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.read().get(key).cloned()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.read().contains_key(key)
    }

    pub fn insert(&self, key: K, value: V) -> Option<V> {
        self.inner.write().insert(key, value)
    }

    pub fn remove(&self, key: &K) -> Option<V> {
        self.inner.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    pub fn depth(&self) -> usize {
        self.inner.read().depth()
    }

    pub fn clear(&self) {
        let mut map = self.inner.write();
        tracing::trace!(entries = map.len(), "clearing shared map");
        map.clear();
    }

    /// Runs `f` with shared access to the map.
    pub fn read<R>(&self, f: impl FnOnce(&AvlMap<K, V, C, D>) -> R) -> R {
        f(&self.inner.read())
    }

    /// Runs `f` with exclusive access to the map; no reader observes the map
    /// until `f` returns.
    pub fn write<R>(&self, f: impl FnOnce(&mut AvlMap<K, V, C, D>) -> R) -> R {
        f(&mut self.inner.write())
    }

    pub fn into_inner(self) -> AvlMap<K, V, C, D> {
        self.inner.into_inner()
    }
}
