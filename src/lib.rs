//! # avl-rs
//!
//! An ordered map backed by an AVL tree: a binary search tree in which the
//! two subtrees of every node differ in height by at most one, giving
//! `O(log n)` search, insertion and removal.
//!
//! Key order and key disposal are capabilities supplied at construction:
//!
//! - a [`Comparator`] decides how keys are ordered (any
//!   `Fn(&K, &K) -> Ordering`, or [`Natural`] for the key's own [`Ord`]);
//! - a [`KeyDisposal`] hook receives every key the map relinquishes, whether
//!   it is a duplicate passed to [`AvlMap::insert`] or a stored key released
//!   by [`AvlMap::remove`], [`AvlMap::destroy`] or drop.
//!
//! Values are always handed back to the caller.
//!
//! ## Example
//!
//! ```rust
//! use avl_rs::AvlMap;
//!
//! let mut tree: AvlMap<&str, u64> = AvlMap::new();
//! tree.insert("hello", 1);
//! tree.insert("world", 2);
//!
//! assert_eq!(tree.get(&"hello"), Some(&1));
//! assert_eq!(tree.insert("world", 3), Some(2));
//! assert_eq!(tree.remove(&"hello"), Some(1));
//! assert_eq!(tree.depth(), 1);
//! ```
//!
//! With a custom order and a disposal hook:
//!
//! ```rust
//! use avl_rs::{compare, AvlMap};
//!
//! let mut released = Vec::new();
//! {
//!     let mut tree = AvlMap::with_hooks(compare::signed::<i32>, |key: i32| released.push(key));
//!     tree.insert(-4, "a");
//!     tree.insert(-4, "b");
//!     tree.insert(7, "c");
//! }
//! // The duplicate key first, then the stored keys when the map is dropped.
//! assert_eq!(released.len(), 3);
//! ```

#![deny(unsafe_code)]

pub mod compare;
pub mod dispose;
mod error;
mod map;
mod node;
#[cfg(feature = "sync")]
mod sync;

pub use compare::{Comparator, Natural};
pub use dispose::{free_value, DropKey, KeyDisposal};
pub use error::InvariantError;
pub use map::{AvlMap, Iter};
#[cfg(feature = "sync")]
pub use sync::SharedAvlMap;

#[cfg(test)]
mod proptests;
