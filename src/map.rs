use std::fmt;
use std::mem;

use crate::compare::{Comparator, Natural};
use crate::dispose::{DropKey, KeyDisposal};
use crate::error::InvariantError;
use crate::node::{self, Checker, Link, Node};

/// An ordered map backed by an AVL tree.
///
/// - `C` decides key order (see [`Comparator`]); defaults to the key's [`Ord`].
/// - `D` receives every key the map gives up (see [`KeyDisposal`]); defaults
///   to dropping it.
///
/// Values are never disposed by the map: they are handed back from
/// [`insert`](Self::insert) and [`remove`](Self::remove), or passed to the
/// visitor given to [`destroy`](Self::destroy).
pub struct AvlMap<K, V, C = Natural, D = DropKey>
where
    D: KeyDisposal<K>,
{
    root: Link<K, V>,
    len: usize,
    comparator: C,
    disposal: D,
}

impl<K: Ord, V> AvlMap<K, V> {
    /// Empty map ordered by `K`'s own [`Ord`], dropping released keys.
    pub fn new() -> Self {
        Self::with_hooks(Natural, DropKey)
    }
}

impl<K, V, C: Comparator<K>> AvlMap<K, V, C> {
    /// Empty map ordered by `comparator`, dropping released keys.
    pub fn with_comparator(comparator: C) -> Self {
        Self::with_hooks(comparator, DropKey)
    }
}

impl<K, V, C, D> AvlMap<K, V, C, D>
where
    C: Comparator<K>,
    D: KeyDisposal<K>,
{
    /// Empty map ordered by `comparator`; every key the map gives up is
    /// passed to `disposal`.
    pub fn with_hooks(comparator: C, disposal: D) -> Self {
        Self {
            root: None,
            len: 0,
            comparator,
            disposal,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree: 0 when empty, 1 for a single entry.
    #[inline]
    pub fn depth(&self) -> usize {
        usize::from(node::height(&self.root))
    }

    /// The ordering this map was built with.
    pub fn comparator(&self) -> &C {
        &self.comparator
    }

    #[cfg(test)]
    pub(crate) fn root_link(&self) -> &Link<K, V> {
        &self.root
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        node::search(&self.root, key, &self.comparator).map(|node| &node.value)
    }

    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        node::search(&self.root, key, &self.comparator).map(|node| (&node.key, &node.value))
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        node::search_mut(&mut self.root, key, &self.comparator).map(|node| &mut node.value)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    ///
    /// The map takes ownership of `key` either way. If an equal key is already
    /// present, the stored key is kept and the incoming one goes to the
    /// disposal hook after the new value is in place.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match node::insert(&mut self.root, key, value, &self.comparator) {
            None => {
                self.len += 1;
                None
            }
            Some((rejected, old)) => {
                self.disposal.dispose(rejected);
                Some(old)
            }
        }
    }

    /// Removes the entry for `key`, returning its value. The stored key is
    /// passed to the disposal hook once the tree has been rebalanced.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let (stored, value) = node::remove(&mut self.root, key, &self.comparator)?;
        self.len -= 1;
        self.disposal.dispose(stored);
        Some(value)
    }

    /// Empties the map, calling `visitor` with each entry before its key is
    /// disposed. The visitor owns the value; it must leave the key alone.
    ///
    /// The map remains usable afterwards.
    pub fn destroy<F>(&mut self, mut visitor: F)
    where
        F: FnMut(&K, V),
    {
        let root = self.root.take();
        let expected = mem::take(&mut self.len);
        let released = node::destroy(root, &mut visitor, &mut self.disposal);
        debug_assert_eq!(released, expected);
        tracing::trace!(released, expected, "destroyed map entries");
    }

    /// Empties the map, dropping every value.
    pub fn clear(&mut self) {
        self.destroy(|_, _| {});
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(left) = node.left.as_deref() {
            node = left;
        }
        Some((&node.key, &node.value))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_deref()?;
        while let Some(right) = node.right.as_deref() {
            node = right;
        }
        Some((&node.key, &node.value))
    }

    /// Entries in comparator order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let mut iter = Iter {
            stack: Vec::with_capacity(self.depth()),
            remaining: self.len,
        };
        iter.push_left_spine(self.root.as_deref());
        iter
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, v)| v)
    }

    /// Checks key order, cached heights, balance factors and the entry count.
    pub fn validate(&self) -> Result<(), InvariantError> {
        let mut checker = Checker::new(&self.comparator);
        let result = checker.check(&self.root).and_then(|_| {
            let found = checker.visited();
            if found == self.len {
                Ok(())
            } else {
                Err(InvariantError::LengthMismatch {
                    expected: self.len,
                    found,
                })
            }
        });
        if let Err(ref error) = result {
            tracing::debug!(%error, "map invariant violated");
        }
        result
    }
}

impl<K, V, C, D> Drop for AvlMap<K, V, C, D>
where
    D: KeyDisposal<K>,
{
    fn drop(&mut self) {
        node::destroy(self.root.take(), &mut |_: &K, _: V| {}, &mut self.disposal);
    }
}

impl<K: Ord, V> Default for AvlMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C, D> Clone for AvlMap<K, V, C, D>
where
    K: Clone,
    V: Clone,
    C: Clone,
    D: KeyDisposal<K> + Clone,
{
    fn clone(&self) -> Self {
        fn clone_link<K: Clone, V: Clone>(link: &Link<K, V>) -> Link<K, V> {
            link.as_ref().map(|node| {
                Box::new(Node {
                    key: node.key.clone(),
                    value: node.value.clone(),
                    left: clone_link(&node.left),
                    right: clone_link(&node.right),
                    height: node.height,
                })
            })
        }

        Self {
            root: clone_link(&self.root),
            len: self.len,
            comparator: self.comparator.clone(),
            disposal: self.disposal.clone(),
        }
    }
}

impl<K, V, C, D> fmt::Debug for AvlMap<K, V, C, D>
where
    K: fmt::Debug,
    V: fmt::Debug,
    C: Comparator<K>,
    D: KeyDisposal<K>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V, C, D> Extend<(K, V)> for AvlMap<K, V, C, D>
where
    C: Comparator<K>,
    D: KeyDisposal<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for AvlMap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<'a, K, V, C, D> IntoIterator for &'a AvlMap<K, V, C, D>
where
    C: Comparator<K>,
    D: KeyDisposal<K>,
{
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over an [`AvlMap`]. Holds at most one pending node per
/// tree level.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}
