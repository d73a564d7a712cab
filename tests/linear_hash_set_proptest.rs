// LinearHashSet property tests.
//
// Property 1: set semantics match hashbrown::HashSet.
//  - Operations: insert, erase, find, count, clear, clone-and-compare.
//  - Invariant after each step: len() parity, and iteration lists exactly
//    the model's keys, each once.
//
// Property 2: copies and swaps preserve content equality.
//  - A clone is equal to its source; swapping two sets swaps their
//    contents; equality ignores insertion order.
use hashbrown::HashSet;
use linhash_set::{DefaultHashBuilder, LinearHashSet};
use proptest::prelude::*;
use std::collections::BTreeSet;

// Property 1: model equivalence under random operations.
proptest! {
    #[test]
    fn prop_matches_model(ops in proptest::collection::vec((0u8..=5u8, 0u16..300u16), 1..300)) {
        let mut s: LinearHashSet<u16, DefaultHashBuilder, 2> = LinearHashSet::default();
        let mut model: HashSet<u16> = HashSet::new();

        for (op, k) in ops {
            match op {
                // Insert reports newness exactly when the model did not hold k.
                0 | 1 => {
                    let (pos, new) = s.insert(k);
                    prop_assert_eq!(new, model.insert(k));
                    prop_assert_eq!(s.get_at(pos), Some(&k));
                }
                // Erase returns 1 for present keys and 0 for absent ones.
                2 => {
                    let expected = usize::from(model.remove(&k));
                    prop_assert_eq!(s.erase(&k), expected);
                }
                // Find/count agree with the model.
                3 => {
                    let present = model.contains(&k);
                    prop_assert_eq!(s.find(&k).is_some(), present);
                    prop_assert_eq!(s.count(&k), usize::from(present));
                }
                // Copy compares equal and lists the same keys.
                4 => {
                    let copy = s.clone();
                    prop_assert!(copy == s);
                    let a: BTreeSet<u16> = copy.iter().copied().collect();
                    let b: BTreeSet<u16> = s.iter().copied().collect();
                    prop_assert_eq!(a, b);
                }
                // Occasionally clear everything.
                5 => {
                    if k % 16 == 0 {
                        s.clear();
                        model.clear();
                    }
                }
                _ => unreachable!(),
            }

            prop_assert_eq!(s.len(), model.len());
            let listed: Vec<u16> = s.iter().copied().collect();
            prop_assert_eq!(listed.len(), model.len());
            prop_assert!(listed.iter().all(|k| model.contains(k)));
        }
    }
}

// Property 2: equality, copies and swap.
proptest! {
    #[test]
    fn prop_equality_and_swap(
        xs in proptest::collection::vec(0u32..1000, 0..200),
        ys in proptest::collection::vec(0u32..1000, 0..200),
    ) {
        let a: LinearHashSet<u32> = xs.iter().copied().collect();
        let a_rev: LinearHashSet<u32> = xs.iter().rev().copied().collect();
        prop_assert!(a == a_rev);

        let b: LinearHashSet<u32> = ys.iter().copied().collect();
        let xs_set: BTreeSet<u32> = xs.iter().copied().collect();
        let ys_set: BTreeSet<u32> = ys.iter().copied().collect();
        prop_assert_eq!(a == b, xs_set == ys_set);

        let mut a2 = a.clone();
        let mut b2 = b.clone();
        a2.swap(&mut b2);
        prop_assert!(a2 == b);
        prop_assert!(b2 == a);
    }
}
