//! Tree nodes and the recursive operations that keep them balanced.
//!
//! Insertion and removal descend through `&mut Link` slots, so the tree stays
//! whole while the caller's comparator runs. A node only leaves its slot
//! inside the restructuring helpers, which never call back into user code.
//! Heights follow the convention empty = 0, leaf = 1, parent = 1 + max(children).

use std::cmp::Ordering;
use std::mem;

use crate::compare::Comparator;
use crate::dispose::KeyDisposal;
use crate::error::InvariantError;

pub(crate) type Link<K, V> = Option<Box<Node<K, V>>>;

pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
    pub(crate) height: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

#[inline]
pub(crate) fn height<K, V>(link: &Link<K, V>) -> u8 {
    link.as_ref().map_or(0, |node| node.height)
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            value,
            left: None,
            right: None,
            height: 1,
        })
    }

    #[inline]
    fn update_height(&mut self) {
        self.height = height(&self.left).max(height(&self.right)) + 1;
    }

    /// Left height minus right height.
    #[inline]
    fn balance(&self) -> i16 {
        i16::from(height(&self.left)) - i16::from(height(&self.right))
    }

    #[inline]
    fn leans(&self, side: Side) -> bool {
        match side {
            Side::Left => self.balance() > 0,
            Side::Right => self.balance() < 0,
        }
    }

    #[inline]
    fn child(&self, side: Side) -> &Link<K, V> {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    #[inline]
    fn child_mut(&mut self, side: Side) -> &mut Link<K, V> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

/// Lifts the child on `heavy` into `node`'s place.
///
/// The lifted child's inner subtree (the one facing `node`) moves across to
/// become `node`'s new `heavy` child. Heights are fixed bottom-up: `node`
/// first, then the new subtree root.
fn rotate<K, V>(mut node: Box<Node<K, V>>, heavy: Side) -> Box<Node<K, V>> {
    let Some(mut child) = node.child_mut(heavy).take() else {
        debug_assert!(false, "rotation towards an empty subtree");
        return node;
    };
    *node.child_mut(heavy) = child.child_mut(heavy.opposite()).take();
    node.update_height();
    *child.child_mut(heavy.opposite()) = Some(node);
    child.update_height();
    child
}

/// Recomputes `node`'s height and restores the balance invariant at `node`,
/// assuming both of its subtrees already satisfy it.
pub(crate) fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.update_height();
    let heavy = match node.balance() {
        balance if balance > 1 => Side::Left,
        balance if balance < -1 => Side::Right,
        _ => return node,
    };

    // Zig-zag: straighten the heavy child first so a single rotation suffices.
    let zig_zag = node
        .child(heavy)
        .as_ref()
        .is_some_and(|child| child.leans(heavy.opposite()));
    if zig_zag {
        let straightened = node
            .child_mut(heavy)
            .take()
            .map(|child| rotate(child, heavy.opposite()));
        *node.child_mut(heavy) = straightened;
    }
    rotate(node, heavy)
}

pub(crate) fn search<'a, K, V, C>(mut link: &'a Link<K, V>, key: &K, cmp: &C) -> Option<&'a Node<K, V>>
where
    C: Comparator<K>,
{
    while let Some(node) = link {
        link = match cmp.compare(key, &node.key) {
            Ordering::Less => &node.left,
            Ordering::Greater => &node.right,
            Ordering::Equal => return Some(&**node),
        };
    }
    None
}

pub(crate) fn search_mut<'a, K, V, C>(
    mut link: &'a mut Link<K, V>,
    key: &K,
    cmp: &C,
) -> Option<&'a mut Node<K, V>>
where
    C: Comparator<K>,
{
    while let Some(node) = link {
        match cmp.compare(key, &node.key) {
            Ordering::Less => link = &mut node.left,
            Ordering::Greater => link = &mut node.right,
            Ordering::Equal => return Some(&mut **node),
        }
    }
    None
}

/// Restores balance at `link` after one of its subtrees changed height.
fn rebalance_at<K, V>(link: &mut Link<K, V>) {
    if let Some(node) = link.take() {
        *link = Some(rebalance(node));
    }
}

/// Inserts `(key, value)` below `link`, rebalancing every node on the way
/// back up.
///
/// The tree stays in place while the comparator runs. When an equal key is
/// already stored, its value is swapped and the incoming key is handed back
/// with the old value so the caller can dispose of it once the tree is
/// consistent again.
pub(crate) fn insert<K, V, C>(link: &mut Link<K, V>, key: K, value: V, cmp: &C) -> Option<(K, V)>
where
    C: Comparator<K>,
{
    let node = match link {
        Some(node) => node,
        None => {
            *link = Some(Node::leaf(key, value));
            return None;
        }
    };

    let side = match cmp.compare(&key, &node.key) {
        Ordering::Less => Side::Left,
        Ordering::Greater => Side::Right,
        Ordering::Equal => {
            let old = mem::replace(&mut node.value, value);
            return Some((key, old));
        }
    };

    let replaced = insert(node.child_mut(side), key, value, cmp);
    if replaced.is_none() {
        rebalance_at(link);
    }
    replaced
}

/// Removes `key` from below `link` and returns the detached entry. A node
/// with two children takes over its in-order predecessor's entry instead of
/// being unlinked.
pub(crate) fn remove<K, V, C>(link: &mut Link<K, V>, key: &K, cmp: &C) -> Option<(K, V)>
where
    C: Comparator<K>,
{
    let node = link.as_mut()?;
    let side = match cmp.compare(key, &node.key) {
        Ordering::Less => Side::Left,
        Ordering::Greater => Side::Right,
        Ordering::Equal => return unlink(link),
    };

    let removed = remove(node.child_mut(side), key, cmp)?;
    rebalance_at(link);
    Some(removed)
}

fn unlink<K, V>(link: &mut Link<K, V>) -> Option<(K, V)> {
    let mut node = link.take()?;
    match (node.left.take(), node.right.take()) {
        (Some(left), Some(right)) => {
            let (left, (key, value)) = remove_max(left);
            node.left = left;
            node.right = Some(right);
            let old_key = mem::replace(&mut node.key, key);
            let old_value = mem::replace(&mut node.value, value);
            *link = Some(rebalance(node));
            Some((old_key, old_value))
        }
        (only, None) | (None, only) => {
            *link = only;
            let Node { key, value, .. } = *node;
            Some((key, value))
        }
    }
}

/// Detaches the rightmost node of a non-empty subtree and returns its entry.
fn remove_max<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, (K, V)) {
    match node.right.take() {
        Some(right) => {
            let (right, max) = remove_max(right);
            node.right = right;
            (Some(rebalance(node)), max)
        }
        None => {
            let Node {
                key, value, left, ..
            } = *node;
            (left, (key, value))
        }
    }
}

/// Tears down a subtree in pre-order: visitor, then key disposal, then the
/// node itself. Returns the number of nodes released.
pub(crate) fn destroy<K, V, F, D>(link: Link<K, V>, visitor: &mut F, dispose: &mut D) -> usize
where
    F: FnMut(&K, V),
    D: KeyDisposal<K>,
{
    let Some(node) = link else {
        return 0;
    };
    let Node {
        key,
        value,
        left,
        right,
        ..
    } = *node;
    visitor(&key, value);
    dispose.dispose(key);
    1 + destroy(left, visitor, dispose) + destroy(right, visitor, dispose)
}

pub(crate) struct Checker<'a, K, C> {
    cmp: &'a C,
    prev: Option<&'a K>,
    position: usize,
}

impl<'a, K, C: Comparator<K>> Checker<'a, K, C> {
    pub(crate) fn new(cmp: &'a C) -> Self {
        Self {
            cmp,
            prev: None,
            position: 0,
        }
    }

    /// Number of nodes visited so far.
    pub(crate) fn visited(&self) -> usize {
        self.position
    }

    /// Walks `link` in order, verifying key order, cached heights and balance.
    /// Returns the subtree's real height.
    pub(crate) fn check<V>(&mut self, link: &'a Link<K, V>) -> Result<usize, InvariantError> {
        let Some(node) = link else {
            return Ok(0);
        };

        let left = self.check(&node.left)?;

        let position = self.position;
        if let Some(prev) = self.prev {
            if self.cmp.compare(prev, &node.key) != Ordering::Less {
                return Err(InvariantError::Unordered { position });
            }
        }
        self.prev = Some(&node.key);
        self.position += 1;

        let right = self.check(&node.right)?;

        let actual = left.max(right) + 1;
        let cached = usize::from(node.height);
        if cached != actual {
            return Err(InvariantError::StaleHeight {
                position,
                cached,
                actual,
            });
        }

        let balance = left as isize - right as isize;
        if balance.abs() > 1 {
            return Err(InvariantError::Unbalanced { position, balance });
        }

        Ok(actual)
    }
}
