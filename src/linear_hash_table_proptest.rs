#![cfg(test)]

// Property tests for LinearHashTable kept inside the crate so they can check
// structural invariants through test-only hooks.

use crate::linear_hash_table::{InsertError, LinearHashTable};
use core::hash::{BuildHasher, Hasher};
use hashbrown::hash_map::DefaultHashBuilder;
use hashbrown::HashSet;
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::BTreeSet;
use std::fmt;

// Key newtype with Borrow<str> to exercise borrowed lookup.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct Key(String);
impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
impl std::borrow::Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

// Pool-indexed operations: indices shrink to earlier keys, the pool shrinks,
// and op lists shrink in length.
#[derive(Clone, Debug)]
enum OpI {
    Insert(usize),
    Remove(usize),
    Find(usize),
    Contains(String),
    Split,
    Iterate,
    Clear,
}

fn key_from(pool: &[String], i: usize) -> Key {
    Key(pool[i].clone())
}

fn arb_scenario() -> impl Strategy<Value = (Vec<String>, Vec<OpI>)> {
    proptest::collection::vec("[a-z]{0,4}", 1..=24).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let contains_pool = proptest::sample::select(pool.clone());
        let op = prop_oneof![
            6 => idx.clone().prop_map(OpI::Insert),
            3 => idx.clone().prop_map(OpI::Remove),
            2 => idx.clone().prop_map(OpI::Find),
            1 => prop_oneof![
                contains_pool.prop_map(|s: String| s),
                "[a-z]{0,4}".prop_map(|s| s)
            ]
            .prop_map(OpI::Contains),
            1 => Just(OpI::Split),
            1 => Just(OpI::Iterate),
            1 => Just(OpI::Clear),
        ];
        proptest::collection::vec(op, 1..120).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Drives one scenario against a hashbrown::HashSet model.
// Invariants exercised after every op:
// - Duplicate keys are rejected with the position of the stored key.
// - `find`/`contains` parity with the model; positions resolve to the key.
// - `remove` returns the stored key exactly when the model held it.
// - `iter` yields each live key exactly once, with an exact size hint.
// - Structural invariants: routing, dense slots, chain ownership, counts.
fn run_scenario<S, const N: usize>(
    mut sut: LinearHashTable<Key, S, N>,
    pool: Vec<String>,
    ops: Vec<OpI>,
) -> Result<(), TestCaseError>
where
    S: BuildHasher,
{
    let mut model: HashSet<Key> = HashSet::new();
    for op in ops {
        match op {
            OpI::Insert(i) => {
                let k = key_from(&pool, i);
                let already = model.contains(&k);
                match sut.insert(k.clone()) {
                    Ok(pos) => {
                        prop_assert!(!already, "insert must fail on duplicate");
                        prop_assert_eq!(pos.key(&sut), Some(&k));
                        model.insert(k);
                    }
                    Err(InsertError::DuplicateKey(pos)) => {
                        prop_assert!(already, "duplicate error only when key exists");
                        prop_assert_eq!(pos.key(&sut), Some(&k));
                    }
                }
            }
            OpI::Remove(i) => {
                let k = key_from(&pool, i);
                let removed = sut.remove(&k);
                prop_assert_eq!(removed.is_some(), model.remove(&k));
                if let Some(kk) = removed {
                    prop_assert_eq!(kk, k);
                }
            }
            OpI::Find(i) => {
                let k = key_from(&pool, i);
                let found = sut.find(&k);
                prop_assert_eq!(found.is_some(), model.contains(&k));
                if let Some(pos) = found {
                    prop_assert_eq!(pos.key(&sut), Some(&k));
                }
            }
            OpI::Contains(s) => {
                let has_model = model.iter().any(|k| k.0 == s);
                prop_assert_eq!(sut.contains(s.as_str()), has_model);
            }
            OpI::Split => sut.force_split(),
            OpI::Iterate => {
                let it = sut.iter();
                prop_assert_eq!(it.len(), model.len());
                let listed: Vec<Key> = it.cloned().collect();
                let s_keys: BTreeSet<_> = listed.iter().cloned().collect();
                let m_keys: BTreeSet<_> = model.iter().cloned().collect();
                prop_assert_eq!(listed.len(), s_keys.len(), "key listed twice");
                prop_assert_eq!(s_keys, m_keys);
            }
            OpI::Clear => {
                sut.clear();
                model.clear();
            }
        }

        sut.check_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        let sut: LinearHashTable<Key, DefaultHashBuilder, 3> = LinearHashTable::new();
        run_scenario(sut, pool, ops)?;
    }

    #[test]
    fn prop_state_machine_single_slot_buckets((pool, ops) in arb_scenario()) {
        let sut: LinearHashTable<Key, DefaultHashBuilder, 1> =
            LinearHashTable::with_hasher(DefaultHashBuilder::default());
        run_scenario(sut, pool, ops)?;
    }
}

// Collision variant using a constant hasher: every key shares one chain.
#[derive(Clone, Default)]
struct ConstBuildHasher;
struct ConstHasher;
impl BuildHasher for ConstBuildHasher {
    type Hasher = ConstHasher;
    fn build_hasher(&self) -> Self::Hasher {
        ConstHasher
    }
}
impl Hasher for ConstHasher {
    fn write(&mut self, _bytes: &[u8]) {}
    fn finish(&self) -> u64 {
        0
    }
}

// Same state machine under worst-case collisions. Stresses overflow chains
// and splits whose entries all land on the same side.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let sut: LinearHashTable<Key, ConstBuildHasher, 2> =
            LinearHashTable::with_hasher(ConstBuildHasher);
        run_scenario(sut, pool, ops)?;
    }
}
