//! LinearHashSet: public set API over `LinearHashTable`.

use crate::iter::{IntoIter, Iter};
use crate::linear_hash_table::{InsertError, LinearHashTable, Position, TableStats};
use core::borrow::Borrow;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use hashbrown::hash_map::DefaultHashBuilder;
use std::io;

/// A hash set that grows by linear hashing: one bucket split at a time,
/// overflow chains in between.
///
/// `N` is the number of keys per bucket. `S` builds the hasher; the hash of
/// a key is computed once, at insertion.
///
/// Positions returned by `insert`/`find` and all iterators describe the
/// set as it was when they were obtained; mutation moves keys around.
pub struct LinearHashSet<K, S = DefaultHashBuilder, const N: usize = 3> {
    table: LinearHashTable<K, S, N>,
}

impl<K> LinearHashSet<K> {
    pub fn new() -> Self {
        Self {
            table: LinearHashTable::new(),
        }
    }
}

impl<K, S, const N: usize> Default for LinearHashSet<K, S, N>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<K, S, const N: usize> LinearHashSet<K, S, N> {
    /// # Panics
    ///
    /// If `N` is zero.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            table: LinearHashTable::with_hasher(hasher),
        }
    }

    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Remove every key. The set returns to its freshly constructed shape;
    /// the hasher is kept.
    pub fn clear(&mut self) {
        self.table.clear()
    }

    /// Exchange contents and round state with `other` without touching
    /// any bucket.
    pub fn swap(&mut self, other: &mut Self) {
        core::mem::swap(&mut self.table, &mut other.table)
    }

    pub fn iter(&self) -> Iter<'_, K, N> {
        self.table.iter()
    }

    /// The key stored at `pos`, if that slot still holds one.
    pub fn get_at(&self, pos: Position) -> Option<&K> {
        self.table.resolve(pos)
    }

    pub fn stats(&self) -> TableStats {
        self.table.stats()
    }

    /// Diagnostic listing of round state and every bucket.
    pub fn dump<W>(&self, out: &mut W) -> io::Result<()>
    where
        W: io::Write + ?Sized,
        K: fmt::Debug,
    {
        self.table.dump(out)
    }
}

impl<K, S, const N: usize> LinearHashSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    /// Insert `key`, returning where it is stored and whether it was new.
    /// An already-present key is left in place and `key` is dropped.
    pub fn insert(&mut self, key: K) -> (Position, bool) {
        match self.table.insert(key) {
            Ok(pos) => (pos, true),
            Err(InsertError::DuplicateKey(pos)) => (pos, false),
        }
    }

    /// Insert every key of `keys`, skipping those already present. Returns
    /// how many were new.
    pub fn insert_all<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = K>,
    {
        let mut inserted = 0;
        for key in keys {
            if self.insert(key).1 {
                inserted += 1;
            }
        }
        inserted
    }

    pub fn find<Q>(&self, q: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.find(q)
    }

    /// `1` if `q` is present, `0` otherwise.
    pub fn count<Q>(&self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.contains(q))
    }

    pub fn contains<Q>(&self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.contains(q)
    }

    pub fn get<Q>(&self, q: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.get(q)
    }

    /// Remove `q`, returning the number of keys removed (0 or 1).
    pub fn erase<Q>(&mut self, q: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        usize::from(self.remove(q))
    }

    pub fn remove<Q>(&mut self, q: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.take(q).is_some()
    }

    /// Remove `q` and hand back the stored key.
    pub fn take<Q>(&mut self, q: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.table.remove(q)
    }
}

/// Copies replay insertions into a fresh set with a clone of the hasher.
/// The copy's round state may differ from the source; contents are equal.
impl<K, S, const N: usize> Clone for LinearHashSet<K, S, N>
where
    K: Clone + Eq + Hash,
    S: Clone + BuildHasher,
{
    fn clone(&self) -> Self {
        let mut copy = Self::with_hasher(self.hasher().clone());
        copy.extend(self.iter().cloned());
        copy
    }

    fn clone_from(&mut self, source: &Self) {
        let mut copy = source.clone();
        self.swap(&mut copy);
    }
}

impl<K, S, const N: usize> PartialEq for LinearHashSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && other.iter().all(|k| self.contains(k))
    }
}

impl<K, S, const N: usize> Eq for LinearHashSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
}

impl<K, S, const N: usize> fmt::Debug for LinearHashSet<K, S, N>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K, S, const N: usize> Extend<K> for LinearHashSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K, S, const N: usize> Extend<&'a K> for LinearHashSet<K, S, N>
where
    K: Eq + Hash + Copy + 'a,
    S: BuildHasher,
{
    fn extend<I: IntoIterator<Item = &'a K>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<K, S, const N: usize> FromIterator<K> for LinearHashSet<K, S, N>
where
    K: Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut set = Self::default();
        set.extend(iter);
        set
    }
}

impl<K, const M: usize> From<[K; M]> for LinearHashSet<K>
where
    K: Eq + Hash,
{
    fn from(keys: [K; M]) -> Self {
        let mut set = Self::new();
        set.extend(keys);
        set
    }
}

impl<'a, K, S, const N: usize> IntoIterator for &'a LinearHashSet<K, S, N> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, S, const N: usize> IntoIterator for LinearHashSet<K, S, N> {
    type Item = K;
    type IntoIter = IntoIter<K, N>;

    fn into_iter(self) -> Self::IntoIter {
        self.table.into_iter()
    }
}
