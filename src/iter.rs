//! Forward cursors over the table: directory index, then overflow chain,
//! then slot.

use crate::bucket::{Bucket, BucketId, IntoEntries};
use crate::directory::Directory;
use core::iter::FusedIterator;
use slotmap::SlotMap;

/// Borrowing iterator over the keys of a table.
pub struct Iter<'a, K, const N: usize> {
    directory: &'a Directory,
    arena: &'a SlotMap<BucketId, Bucket<K, N>>,
    // next directory index to load once the current chain is exhausted
    index: usize,
    bucket: Option<BucketId>,
    slot: usize,
    remaining: usize,
}

impl<'a, K, const N: usize> Iter<'a, K, N> {
    pub(crate) fn new(
        directory: &'a Directory,
        arena: &'a SlotMap<BucketId, Bucket<K, N>>,
        len: usize,
    ) -> Self {
        Self {
            directory,
            arena,
            index: 0,
            bucket: None,
            slot: 0,
            remaining: len,
        }
    }
}

impl<'a, K, const N: usize> Iterator for Iter<'a, K, N> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(id) = self.bucket {
                let bucket = &self.arena[id];
                if let Some(entry) = bucket.get(self.slot) {
                    self.slot += 1;
                    self.remaining -= 1;
                    return Some(&entry.key);
                }
                self.bucket = bucket.overflow;
                self.slot = 0;
                continue;
            }
            if self.index >= self.directory.len() {
                return None;
            }
            self.bucket = self.directory.get(self.index);
            self.index += 1;
            self.slot = 0;
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, const N: usize> ExactSizeIterator for Iter<'_, K, N> {}
impl<K, const N: usize> FusedIterator for Iter<'_, K, N> {}

impl<K, const N: usize> Clone for Iter<'_, K, N> {
    fn clone(&self) -> Self {
        Self {
            directory: self.directory,
            arena: self.arena,
            index: self.index,
            bucket: self.bucket,
            slot: self.slot,
            remaining: self.remaining,
        }
    }
}

/// Owning iterator; yields keys in the same order as `Iter`.
pub struct IntoIter<K, const N: usize> {
    directory: Directory,
    arena: SlotMap<BucketId, Bucket<K, N>>,
    index: usize,
    next_bucket: Option<BucketId>,
    entries: Option<IntoEntries<K, N>>,
    remaining: usize,
}

impl<K, const N: usize> IntoIter<K, N> {
    pub(crate) fn new(
        directory: Directory,
        arena: SlotMap<BucketId, Bucket<K, N>>,
        len: usize,
    ) -> Self {
        Self {
            directory,
            arena,
            index: 0,
            next_bucket: None,
            entries: None,
            remaining: len,
        }
    }
}

impl<K, const N: usize> Iterator for IntoIter<K, N> {
    type Item = K;

    fn next(&mut self) -> Option<K> {
        loop {
            if let Some(entries) = &mut self.entries {
                if let Some(entry) = entries.next() {
                    self.remaining -= 1;
                    return Some(entry.key);
                }
                self.entries = None;
            }
            let id = match self.next_bucket.take() {
                Some(id) => id,
                None => {
                    if self.index >= self.directory.len() {
                        return None;
                    }
                    let id = self.directory.get(self.index);
                    self.index += 1;
                    match id {
                        Some(id) => id,
                        None => continue,
                    }
                }
            };
            if let Some(bucket) = self.arena.remove(id) {
                let (entries, overflow) = bucket.into_parts();
                self.entries = Some(entries);
                self.next_bucket = overflow;
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, const N: usize> ExactSizeIterator for IntoIter<K, N> {}
impl<K, const N: usize> FusedIterator for IntoIter<K, N> {}

#[cfg(test)]
mod tests {
    use crate::linear_hash_table::LinearHashTable;
    use core::hash::{BuildHasher, Hasher};

    #[derive(Clone, Default)]
    struct ModBuildHasher;
    struct ModHasher(u64);
    impl BuildHasher for ModBuildHasher {
        type Hasher = ModHasher;
        fn build_hasher(&self) -> Self::Hasher {
            ModHasher(0)
        }
    }
    impl Hasher for ModHasher {
        fn write(&mut self, _bytes: &[u8]) {
            unimplemented!("only u64 keys")
        }
        fn write_u64(&mut self, n: u64) {
            self.0 = n;
        }
        fn finish(&self) -> u64 {
            self.0
        }
    }

    fn table<const N: usize>(keys: &[u64]) -> LinearHashTable<u64, ModBuildHasher, N> {
        let mut t = LinearHashTable::with_hasher(ModBuildHasher);
        for &k in keys {
            t.insert(k).unwrap();
        }
        t
    }

    /// Invariant: an empty table yields nothing, repeatedly.
    #[test]
    fn empty_iter() {
        let t = table::<3>(&[]);
        let mut it = t.iter();
        assert_eq!(it.len(), 0);
        assert_eq!(it.next(), None);
        assert_eq!(it.next(), None);
    }

    /// Invariant: order is index-major, then chain order, then slot order.
    #[test]
    fn order_is_index_then_chain_then_slot() {
        // N = 8: no bucket fills, so no split; index 0 gets evens, 1 odds.
        let t = table::<8>(&[5, 2, 3, 4, 1]);
        let keys: Vec<u64> = t.iter().copied().collect();
        assert_eq!(keys, vec![2, 4, 5, 3, 1]);
    }

    /// Invariant: a chain is walked primary-first, after which the next
    /// directory index follows.
    #[test]
    fn chain_before_next_index() {
        let mut t: LinearHashTable<u64, ModBuildHasher, 1> =
            LinearHashTable::with_hasher(ModBuildHasher);
        t.insert(1).unwrap();
        let before: Vec<u64> = t.iter().copied().collect();
        assert_eq!(before, vec![1]);
        for k in [4, 8, 12] {
            t.insert(k).unwrap();
        }
        t.check_invariants();
        // index 0: [8], index 1: [1], index 4: [4] -> overflow [12]
        let keys: Vec<u64> = t.iter().copied().collect();
        assert_eq!(keys, vec![8, 1, 4, 12]);
        assert_eq!(t.stats().overflow_buckets, 1);
    }

    /// Invariant: each fresh iteration reproduces the same order, and the
    /// owning iterator agrees with it.
    #[test]
    fn repeatable_and_into_iter_agrees() {
        let keys: Vec<u64> = (0..200).map(|i| i * 7 + 3).collect();
        let t = table::<3>(&keys);
        let a: Vec<u64> = t.iter().copied().collect();
        let b: Vec<u64> = (&t).into_iter().copied().collect();
        assert_eq!(a, b);
        assert_eq!(a.len(), keys.len());

        let owned: Vec<u64> = t.into_iter().collect();
        assert_eq!(owned, a);
    }

    /// Invariant: size_hint is exact and counts down.
    #[test]
    fn exact_size() {
        let t = table::<3>(&[10, 11, 12, 13, 14, 15, 16]);
        let mut it = t.iter();
        for left in (0..7).rev() {
            assert!(it.next().is_some());
            assert_eq!(it.len(), left);
        }
        assert!(it.next().is_none());

        let mut owned = t.into_iter();
        assert_eq!(owned.len(), 7);
        owned.next();
        assert_eq!(owned.size_hint(), (6, Some(6)));
    }

    /// Invariant: a cloned cursor continues from the same place.
    #[test]
    fn cloned_cursor_resumes() {
        let t = table::<2>(&[1, 2, 3, 4, 5, 6]);
        let mut it = t.iter();
        it.next();
        it.next();
        let rest_a: Vec<u64> = it.clone().copied().collect();
        let rest_b: Vec<u64> = it.copied().collect();
        assert_eq!(rest_a, rest_b);
        assert_eq!(rest_a.len(), 4);
    }
}
