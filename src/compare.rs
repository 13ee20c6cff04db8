//! Key ordering capabilities.
//!
//! An [`AvlMap`](crate::AvlMap) never looks at its keys except through a
//! [`Comparator`]. Any `Fn(&K, &K) -> Ordering` works, so the built-in
//! orderings below are plain functions.

use std::cmp::Ordering;
use std::ops::Deref;

/// Strict total order over keys of type `K`.
///
/// The order must be consistent for the lifetime of the map: a comparator
/// that is not transitive, or that changes its answer for the same pair of
/// keys, leaves the tree in an unspecified (but memory-safe) shape.
pub trait Comparator<K: ?Sized> {
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

impl<K: ?Sized, F> Comparator<K> for F
where
    F: Fn(&K, &K) -> Ordering,
{
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// The key type's own [`Ord`] implementation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<K: Ord + ?Sized> Comparator<K> for Natural {
    #[inline]
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

/// Orders pointer-like keys by the address of their referent, ignoring its
/// contents. Two keys are equal only when they point at the same object.
pub fn by_address<P: Deref>(a: &P, b: &P) -> Ordering {
    let a: *const P::Target = &**a;
    let b: *const P::Target = &**b;
    a.cast::<()>().cmp(&b.cast::<()>())
}

/// Orders signed integer keys numerically.
pub fn signed<K: Copy + Into<i64>>(a: &K, b: &K) -> Ordering {
    let (a, b): (i64, i64) = ((*a).into(), (*b).into());
    a.cmp(&b)
}

/// Orders unsigned integer keys numerically.
pub fn unsigned<K: Copy + Into<u64>>(a: &K, b: &K) -> Ordering {
    let (a, b): (u64, u64) = ((*a).into(), (*b).into());
    a.cmp(&b)
}
