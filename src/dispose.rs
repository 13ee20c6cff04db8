//! Key disposal capabilities.
//!
//! Keys handed to [`AvlMap::insert`](crate::AvlMap::insert) belong to the map
//! from then on. Whenever the map lets go of a key (a duplicate insert, a
//! removal, [`destroy`](crate::AvlMap::destroy) or drop) the key is passed to
//! the map's [`KeyDisposal`] hook exactly once.

/// Receives every key the map relinquishes.
pub trait KeyDisposal<K> {
    fn dispose(&mut self, key: K);
}

impl<K, F> KeyDisposal<K> for F
where
    F: FnMut(K),
{
    #[inline]
    fn dispose(&mut self, key: K) {
        self(key)
    }
}

/// Default disposal: the key is simply dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DropKey;

impl<K> KeyDisposal<K> for DropKey {
    #[inline]
    fn dispose(&mut self, key: K) {
        drop(key);
    }
}

/// Destroy visitor that releases each value and leaves the key to the
/// disposal hook.
///
/// ```rust
/// use avl_rs::{free_value, AvlMap};
///
/// let mut map = AvlMap::new();
/// map.insert(1, Box::new([0u8; 64]));
/// map.destroy(free_value);
/// assert!(map.is_empty());
/// ```
pub fn free_value<K, V>(_key: &K, value: V) {
    drop(value);
}
