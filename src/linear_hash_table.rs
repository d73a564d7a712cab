//! LinearHashTable: the linear-hashing engine behind `LinearHashSet`.
//!
//! Buckets live in a `SlotMap` arena; the directory and overflow links hold
//! `BucketId`s. Every stored entry keeps the hash it was inserted with, so
//! splits re-route entries without calling `K: Hash` again.
//!
//! Splitting is round-robin: whenever an insert leaves a full bucket in the
//! target chain, the bucket at `next_to_split` is split, whichever bucket
//! that is. Splits never trigger further splits.

use crate::bucket::{Bucket, BucketId, Entry};
use crate::directory::{Directory, SplitOutcome};
use crate::iter::{IntoIter, Iter};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use slotmap::SlotMap;
use std::io;

/// Location of a stored key: directory index, bucket and slot.
///
/// A position is a snapshot. Any later insert, removal or split may move
/// the key; a position whose bucket has since been released resolves to
/// `None`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Position {
    index: usize,
    bucket: BucketId,
    slot: usize,
}

impl Position {
    /// Directory index the key was addressed to.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Slot within the bucket holding the key.
    pub fn slot(&self) -> usize {
        self.slot
    }

    pub fn key<'a, K, S, const N: usize>(
        &self,
        table: &'a LinearHashTable<K, S, N>,
    ) -> Option<&'a K> {
        table.resolve(*self)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertError {
    /// The key is already stored at the given position.
    DuplicateKey(Position),
}

impl fmt::Display for InsertError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey(pos) => {
                write!(f, "key already present at directory index {}", pos.index)
            }
        }
    }
}

impl std::error::Error for InsertError {}

/// Snapshot of the table's shape.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct TableStats {
    pub len: usize,
    pub round: u32,
    pub next_to_split: usize,
    pub directory_len: usize,
    pub directory_capacity: usize,
    pub bucket_capacity: usize,
    /// Live buckets, primary and overflow.
    pub buckets: usize,
    pub overflow_buckets: usize,
}

/// Directory, arena and key count. Everything here runs with the table's
/// reentrancy guard held.
pub(crate) struct Store<K, const N: usize> {
    pub(crate) directory: Directory,
    pub(crate) arena: SlotMap<BucketId, Bucket<K, N>>,
    pub(crate) len: usize,
}

impl<K, const N: usize> Store<K, N> {
    fn new() -> Self {
        let mut directory = Directory::new();
        let mut arena = SlotMap::with_key();
        for index in 0..directory.len() {
            directory.install(index, arena.insert(Bucket::new()));
        }
        Self {
            directory,
            arena,
            len: 0,
        }
    }

    /// Buckets of the chain rooted at `index`, primary first.
    fn chain(&self, index: usize) -> impl Iterator<Item = (BucketId, &Bucket<K, N>)> + '_ {
        let mut next = self.directory.get(index);
        core::iter::from_fn(move || {
            let id = next?;
            let bucket = &self.arena[id];
            next = bucket.overflow;
            Some((id, bucket))
        })
    }

    fn locate<Q>(&self, hash: u64, q: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let index = self.directory.address_of(hash);
        self.chain(index).find_map(|(id, bucket)| {
            bucket
                .find_slot(|e| e.hash == hash && e.key.borrow() == q)
                .map(|slot| Position {
                    index,
                    bucket: id,
                    slot,
                })
        })
    }

    /// Append without splitting: first chain bucket with room, else a new
    /// overflow bucket at the end of the chain.
    fn append(&mut self, index: usize, mut entry: Entry<K>) -> Position {
        let mut id = match self.directory.get(index) {
            Some(id) => id,
            None => {
                let id = self.arena.insert(Bucket::new());
                self.directory.install(index, id);
                id
            }
        };
        loop {
            let bucket = &mut self.arena[id];
            match bucket.try_append(entry) {
                Ok(slot) => {
                    return Position {
                        index,
                        bucket: id,
                        slot,
                    }
                }
                Err(rejected) => entry = rejected,
            }
            let overflow = bucket.overflow;
            id = match overflow {
                Some(next) => next,
                None => {
                    let fresh = self.arena.insert(Bucket::new());
                    self.arena[id].overflow = Some(fresh);
                    fresh
                }
            };
        }
    }

    /// Split the bucket at `next_to_split`. If `track` points into that
    /// chain, the entry's new position is returned in its place.
    fn split(&mut self, track: Option<Position>) -> Option<Position> {
        let (old, sibling) = self.directory.begin_split();
        let mut cursor = self.directory.take(old);
        let fresh = self.arena.insert(Bucket::new());
        self.directory.install(old, fresh);
        let fresh = self.arena.insert(Bucket::new());
        self.directory.install(sibling, fresh);

        let mut tracked = track;
        let mut moved = 0usize;
        while let Some(id) = cursor {
            let Some(bucket) = self.arena.remove(id) else {
                break;
            };
            let (entries, overflow) = bucket.into_parts();
            cursor = overflow;
            for (slot, entry) in entries.enumerate() {
                let target = self.directory.split_target(entry.hash);
                debug_assert!(target == old || target == sibling);
                let pos = self.append(target, entry);
                if track.is_some_and(|t| t.bucket == id && t.slot == slot) {
                    tracked = Some(pos);
                }
                moved += 1;
            }
        }

        log::trace!("split bucket {old} into {old} and {sibling}, moved {moved} keys");
        if let SplitOutcome::RoundCompleted { round } = self.directory.finish_split() {
            log::debug!(
                "round rolled over to {round}: {} buckets addressed, {} keys",
                self.directory.len(),
                self.len
            );
        }
        tracked
    }

    fn remove<Q>(&mut self, hash: u64, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Eq,
    {
        let index = self.directory.address_of(hash);
        let mut cursor = self.directory.get(index);
        while let Some(id) = cursor {
            let bucket = &mut self.arena[id];
            if let Some(entry) = bucket.erase_key(|e| e.hash == hash && e.key.borrow() == q) {
                self.len -= 1;
                return Some(entry.key);
            }
            cursor = bucket.overflow;
        }
        None
    }
}

/// Linear-hashing set storage with `N` slots per bucket.
pub struct LinearHashTable<K, S = DefaultHashBuilder, const N: usize = 3> {
    hasher: S,
    store: Store<K, N>,
    reentrancy: DebugReentrancy,
}

impl<K> LinearHashTable<K> {
    pub fn new() -> Self {
        Self::with_hasher(DefaultHashBuilder::default())
    }
}

impl<K> Default for LinearHashTable<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S, const N: usize> LinearHashTable<K, S, N> {
    /// # Panics
    ///
    /// If `N` is zero.
    pub fn with_hasher(hasher: S) -> Self {
        assert!(N > 0, "bucket capacity must be non-zero");
        Self {
            hasher,
            store: Store::new(),
            reentrancy: DebugReentrancy::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        &self.hasher
    }

    pub fn len(&self) -> usize {
        self.store.len
    }

    pub fn is_empty(&self) -> bool {
        self.store.len == 0
    }

    /// Drop every key and return to the two-bucket starting shape.
    pub fn clear(&mut self) {
        let _g = self.reentrancy.enter();
        self.store = Store::new();
    }

    pub fn resolve(&self, pos: Position) -> Option<&K> {
        self.store
            .arena
            .get(pos.bucket)
            .and_then(|b| b.get(pos.slot))
            .map(|e| &e.key)
    }

    /// Keys in directory order, then chain order, then slot order.
    pub fn iter(&self) -> Iter<'_, K, N> {
        Iter::new(&self.store.directory, &self.store.arena, self.store.len)
    }

    pub fn stats(&self) -> TableStats {
        let directory = &self.store.directory;
        let primaries = directory.ids().flatten().count();
        TableStats {
            len: self.store.len,
            round: directory.round(),
            next_to_split: directory.next_to_split(),
            directory_len: directory.len(),
            directory_capacity: directory.capacity(),
            bucket_capacity: N,
            buckets: self.store.arena.len(),
            overflow_buckets: self.store.arena.len() - primaries,
        }
    }

    /// Write a human-readable listing of the round state and every bucket,
    /// overflow chains included. The format is for inspection only.
    pub fn dump<W>(&self, out: &mut W) -> io::Result<()>
    where
        W: io::Write + ?Sized,
        K: fmt::Debug,
    {
        let stats = self.stats();
        writeln!(
            out,
            "len = {}, directory_capacity = {}, bucket_capacity = {}",
            stats.len, stats.directory_capacity, N
        )?;
        writeln!(
            out,
            "next_to_split = {}, round = {}, buckets = {} ({} overflow)",
            stats.next_to_split, stats.round, stats.buckets, stats.overflow_buckets
        )?;
        for index in 0..self.store.directory.len() {
            write!(out, "{index}:")?;
            if self.store.directory.get(index).is_none() {
                write!(out, " NULL")?;
            }
            for (link, (_, bucket)) in self.store.chain(index).enumerate() {
                if link > 0 {
                    write!(out, " -> overflow")?;
                }
                write!(out, " [len = {}]", bucket.len())?;
                for slot in bucket.slots() {
                    match slot {
                        Some(entry) => write!(out, " ({:?})", entry.key)?,
                        None => write!(out, " (free)")?,
                    }
                }
            }
            writeln!(out)?;
        }
        Ok(())
    }
}

impl<K, S, const N: usize> LinearHashTable<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn make_hash<Q>(&self, q: &Q) -> u64
    where
        Q: ?Sized + Hash,
    {
        self.hasher.hash_one(q)
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.store.locate(hash, q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let pos = self.find(q)?;
        self.resolve(pos)
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.find(q).is_some()
    }

    /// Insert `key`. On success the returned position already accounts for
    /// any split the insert triggered.
    pub fn insert(&mut self, key: K) -> Result<Position, InsertError> {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(&key);
        if let Some(pos) = self.store.locate(hash, &key) {
            return Err(InsertError::DuplicateKey(pos));
        }

        let index = self.store.directory.address_of(hash);
        let pos = self.store.append(index, Entry { key, hash });
        self.store.len += 1;

        if self.store.chain(index).any(|(_, b)| b.is_full()) {
            if let Some(moved) = self.store.split(Some(pos)) {
                return Ok(moved);
            }
        }
        Ok(pos)
    }

    /// Remove `q`, returning the stored key. Buckets are never merged.
    pub fn remove<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let _g = self.reentrancy.enter();
        let hash = self.make_hash(q);
        self.store.remove(hash, q)
    }

    #[cfg(test)]
    pub(crate) fn force_split(&mut self) {
        let _g = self.reentrancy.enter();
        self.store.split(None);
    }

    /// Structural invariants: routing, counts, chain ownership, shape.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        use std::collections::HashSet;

        let dir = &self.store.directory;
        assert_eq!(dir.len(), dir.width() + dir.next_to_split());
        assert!(dir.next_to_split() < dir.width());
        assert!(dir.capacity() >= dir.len());

        let mut seen_buckets = HashSet::new();
        let mut total = 0;
        for index in 0..dir.len() {
            for (id, bucket) in self.store.chain(index) {
                assert!(seen_buckets.insert(id), "bucket reachable twice");
                assert_eq!(bucket.entries().count(), bucket.len());
                for (slot, e) in bucket.slots().iter().enumerate() {
                    assert_eq!(e.is_some(), slot < bucket.len(), "slots not dense");
                }
                for e in bucket.entries() {
                    assert_eq!(dir.address_of(e.hash), index, "entry misrouted");
                    assert_eq!(e.hash, self.make_hash(&e.key));
                    total += 1;
                }
            }
        }
        assert_eq!(seen_buckets.len(), self.store.arena.len(), "unreachable bucket");
        assert_eq!(total, self.store.len);
    }
}

impl<K, S, const N: usize> IntoIterator for LinearHashTable<K, S, N> {
    type Item = K;
    type IntoIter = IntoIter<K, N>;

    fn into_iter(self) -> Self::IntoIter {
        let Store {
            directory,
            arena,
            len,
        } = self.store;
        IntoIter::new(directory, arena, len)
    }
}

impl<'a, K, S, const N: usize> IntoIterator for &'a LinearHashTable<K, S, N> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
