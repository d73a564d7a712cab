//! Bucket: fixed-capacity slot array with an optional overflow link.
//!
//! Occupied slots are always dense at `[0, len)`. Appends write slot `len`,
//! erases compact by moving the last occupied entry into the vacated slot.
//! A bucket never follows its own overflow link; chain walks belong to the
//! table.

use core::iter::{Flatten, Take};

slotmap::new_key_type! {
    /// Arena id of a bucket. Stale ids (buckets released by a split) never
    /// resolve again.
    pub struct BucketId;
}

/// A stored key together with the hash it was routed with.
#[derive(Clone, Debug)]
pub(crate) struct Entry<K> {
    pub(crate) key: K,
    pub(crate) hash: u64,
}

/// Owning iterator over a bucket's occupied entries, in slot order.
pub(crate) type IntoEntries<K, const N: usize> =
    Flatten<Take<core::array::IntoIter<Option<Entry<K>>, N>>>;

#[derive(Debug)]
pub(crate) struct Bucket<K, const N: usize> {
    slots: [Option<Entry<K>>; N],
    len: usize,
    pub(crate) overflow: Option<BucketId>,
}

impl<K, const N: usize> Bucket<K, N> {
    pub(crate) fn new() -> Self {
        Self {
            slots: core::array::from_fn(|_| None),
            len: 0,
            overflow: None,
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == N
    }

    /// Append into the first free slot. A full bucket hands the entry back.
    pub(crate) fn try_append(&mut self, entry: Entry<K>) -> Result<usize, Entry<K>> {
        if self.is_full() {
            return Err(entry);
        }
        let slot = self.len;
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(entry);
        self.len += 1;
        Ok(slot)
    }

    /// Index of the first occupied slot accepted by `is_match`.
    pub(crate) fn find_slot<F>(&self, mut is_match: F) -> Option<usize>
    where
        F: FnMut(&Entry<K>) -> bool,
    {
        self.entries().position(|e| is_match(e))
    }

    #[inline]
    pub(crate) fn get(&self, slot: usize) -> Option<&Entry<K>> {
        if slot < self.len {
            self.slots[slot].as_ref()
        } else {
            None
        }
    }

    /// Remove the entry at `slot`, moving the last occupied entry into its
    /// place.
    pub(crate) fn remove_slot(&mut self, slot: usize) -> Option<Entry<K>> {
        if slot >= self.len {
            return None;
        }
        let last = self.len - 1;
        self.slots.swap(slot, last);
        self.len = last;
        self.slots[last].take()
    }

    pub(crate) fn erase_key<F>(&mut self, is_match: F) -> Option<Entry<K>>
    where
        F: FnMut(&Entry<K>) -> bool,
    {
        let slot = self.find_slot(is_match)?;
        self.remove_slot(slot)
    }

    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry<K>> + '_ {
        self.slots[..self.len].iter().flatten()
    }

    /// Raw view of every slot, free ones included.
    pub(crate) fn slots(&self) -> &[Option<Entry<K>>] {
        &self.slots
    }

    /// Consume the bucket into its entries and its overflow link.
    pub(crate) fn into_parts(self) -> (IntoEntries<K, N>, Option<BucketId>) {
        let Bucket {
            slots,
            len,
            overflow,
        } = self;
        (slots.into_iter().take(len).flatten(), overflow)
    }
}
