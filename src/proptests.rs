use super::*;

use crate::node::{height, Link};
use proptest::prelude::*;
use proptest_derive::Arbitrary;
use std::collections::BTreeMap;

/// Walks every node checking order, cached height, balance and the AVL
/// height bound. Returns the number of reachable nodes.
fn validate_tree<K: Ord + std::fmt::Debug, V>(t: &AvlMap<K, V>) -> usize {
    fn walk<K: Ord + std::fmt::Debug, V>(
        link: &Link<K, V>,
        lower: Option<&K>,
        upper: Option<&K>,
    ) -> usize {
        let Some(node) = link else {
            return 0;
        };
        if let Some(lower) = lower {
            assert!(lower < &node.key, "{:?} must sort after {:?}", node.key, lower);
        }
        if let Some(upper) = upper {
            assert!(&node.key < upper, "{:?} must sort before {:?}", node.key, upper);
        }

        let (lh, rh) = (height(&node.left), height(&node.right));
        assert_eq!(node.height, lh.max(rh) + 1, "stored node height must match children");
        assert!(lh.abs_diff(rh) <= 1, "node {:?} unbalanced: {} vs {}", node.key, lh, rh);

        1 + walk(&node.left, lower, Some(&node.key)) + walk(&node.right, Some(&node.key), upper)
    }

    let count = walk(t.root_link(), None, None);
    assert_eq!(count, t.len(), "reachable node count must match AvlMap::len");
    assert_eq!(t.validate(), Ok(()));

    let bound = 1.4405 * ((count + 2) as f64).log2();
    assert!(
        (t.depth() as f64) <= bound,
        "depth {} exceeds AVL bound {} for {} nodes",
        t.depth(),
        bound,
        count
    );
    count
}

#[derive(Clone, Debug, Arbitrary)]
enum Op {
    #[proptest(weight = 5)]
    Insert(#[proptest(strategy = "0u16..512")] u16, u64),
    #[proptest(weight = 3)]
    Remove(#[proptest(strategy = "0u16..512")] u16),
    #[proptest(weight = 2)]
    Get(#[proptest(strategy = "0u16..512")] u16),
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        max_shrink_iters: 50_000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn prop_equivalence(ops in prop::collection::vec(any::<Op>(), 0..=2000)) {
        let mut t: AvlMap<u16, u64> = AvlMap::new();
        let mut m: BTreeMap<u16, u64> = BTreeMap::new();

        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    prop_assert_eq!(t.insert(key, value), m.insert(key, value));
                }
                Op::Remove(key) => {
                    prop_assert_eq!(t.remove(&key), m.remove(&key));
                }
                Op::Get(key) => {
                    prop_assert_eq!(t.get(&key), m.get(&key));
                }
            }

            prop_assert_eq!(t.len(), m.len());
        }

        validate_tree(&t);
        let got: Vec<(u16, u64)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u16, u64)> = m.into_iter().collect();
        prop_assert_eq!(got, expected);
    }

    #[test]
    fn prop_every_step_balanced(ops in prop::collection::vec(any::<Op>(), 0..=300)) {
        let mut t: AvlMap<u16, u64> = AvlMap::new();
        for op in ops {
            match op {
                Op::Insert(key, value) => {
                    t.insert(key, value);
                }
                Op::Remove(key) => {
                    t.remove(&key);
                }
                Op::Get(_) => {}
            }
            validate_tree(&t);
        }
    }

    #[test]
    fn prop_keys_disposed_exactly_once(ops in prop::collection::vec(any::<Op>(), 0..=500)) {
        use std::cell::Cell;

        let handed_over = Cell::new(0usize);
        let disposed = Cell::new(0usize);
        {
            let mut t = AvlMap::with_hooks(Natural, |_: u16| disposed.set(disposed.get() + 1));
            for op in ops {
                match op {
                    Op::Insert(key, value) => {
                        handed_over.set(handed_over.get() + 1);
                        t.insert(key, value);
                    }
                    Op::Remove(key) => {
                        t.remove(&key);
                    }
                    Op::Get(key) => {
                        t.get(&key);
                    }
                }
                prop_assert_eq!(disposed.get() + t.len(), handed_over.get());
            }
        }
        prop_assert_eq!(disposed.get(), handed_over.get());
    }

    #[test]
    fn prop_insert_remove_round_trip(
        keys in prop::collection::btree_set(0u16..1024, 0..200),
        extra in 1024u16..2048,
    ) {
        let mut t: AvlMap<u16, u16> = keys.iter().map(|&k| (k, k)).collect();
        let before: Vec<u16> = t.keys().copied().collect();

        prop_assert_eq!(t.insert(extra, 7), None);
        prop_assert_eq!(t.remove(&extra), Some(7));

        let after: Vec<u16> = t.keys().copied().collect();
        prop_assert_eq!(before, after);
        validate_tree(&t);
    }
}

fn for_each_permutation<T: Clone>(items: &[T], mut f: impl FnMut(Vec<T>)) {
    fn rec<T: Clone>(items: &[T], used: &mut [bool], out: &mut Vec<T>, f: &mut impl FnMut(Vec<T>)) {
        if out.len() == items.len() {
            f(out.clone());
            return;
        }
        for i in 0..items.len() {
            if used[i] {
                continue;
            }
            used[i] = true;
            out.push(items[i].clone());
            rec(items, used, out, f);
            out.pop();
            used[i] = false;
        }
    }

    let mut used = vec![false; items.len()];
    let mut out = Vec::with_capacity(items.len());
    rec(items, &mut used, &mut out, &mut f);
}

#[test]
fn exhaustive_insert_order_small_set() {
    let keys: Vec<u32> = (1..=7).collect();

    for_each_permutation(&keys, |perm| {
        let mut t: AvlMap<u32, u32> = AvlMap::new();
        let mut m: BTreeMap<u32, u32> = BTreeMap::new();

        for (i, k) in perm.into_iter().enumerate() {
            let v = i as u32;
            assert_eq!(t.insert(k, v), m.insert(k, v));
        }

        validate_tree(&t);
        // Seven keys always fit in a tree of height four.
        assert!(t.depth() <= 4);
        let got: Vec<(u32, u32)> = t.iter().map(|(k, v)| (*k, *v)).collect();
        let expected: Vec<(u32, u32)> = m.into_iter().collect();
        assert_eq!(got, expected);
    });
}

#[test]
fn exhaustive_remove_order_small_set() {
    let keys: Vec<u32> = (1..=7).collect();

    // Insert in a fixed order, then remove in all permutations.
    let mut base_tree: AvlMap<u32, u32> = AvlMap::new();
    let mut base_map: BTreeMap<u32, u32> = BTreeMap::new();
    for &k in &keys {
        assert_eq!(base_tree.insert(k, k * 3), base_map.insert(k, k * 3));
    }

    for_each_permutation(&keys, |perm| {
        let mut t = base_tree.clone();
        let mut m = base_map.clone();

        for k in perm {
            assert_eq!(t.remove(&k), m.remove(&k));
            assert_eq!(t.len(), m.len());
            validate_tree(&t);
        }
        assert_eq!(t.len(), 0);
        assert_eq!(t.depth(), 0);
        assert!(t.root_link().is_none());
    });
}
