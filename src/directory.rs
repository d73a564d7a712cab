//! Directory: bucket ids indexed by hash address, plus linear-hashing round
//! state.
//!
//! At round `d` the address space has `2^d` regions of which
//! `next_to_split` have already been split. Indices below `next_to_split`
//! and at or above `2^d` are addressed with `d + 1` hash bits, the rest with
//! `d` bits. The logical length is always `2^d + next_to_split`.
//!
//! Growth policy: the physical capacity only grows, to
//! `max(required, 2 * capacity)`. Growing moves ids, never keys.

use crate::bucket::BucketId;

/// Round number of a freshly constructed directory (two buckets).
pub(crate) const INITIAL_ROUND: u32 = 1;

/// What `finish_split` did to the round state.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) enum SplitOutcome {
    Continued,
    RoundCompleted { round: u32 },
}

#[derive(Debug)]
pub(crate) struct Directory {
    buckets: Vec<Option<BucketId>>,
    capacity: usize,
    round: u32,
    next_to_split: usize,
}

#[inline]
fn low_bits(hash: u64, bits: u32) -> usize {
    match 1u64.checked_shl(bits) {
        Some(m) => (hash & (m - 1)) as usize,
        None => hash as usize,
    }
}

impl Directory {
    pub(crate) fn new() -> Self {
        let width = 1usize << INITIAL_ROUND;
        Self {
            buckets: vec![None; width],
            capacity: width,
            round: INITIAL_ROUND,
            next_to_split: 0,
        }
    }

    /// Number of regions at the start of the current round (`2^d`).
    #[inline]
    pub(crate) fn width(&self) -> usize {
        1usize << self.round
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.buckets.len()
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) fn round(&self) -> u32 {
        self.round
    }

    #[inline]
    pub(crate) fn next_to_split(&self) -> usize {
        self.next_to_split
    }

    /// Directory index owning `hash` under the current round state.
    #[inline]
    pub(crate) fn address_of(&self, hash: u64) -> usize {
        let idx = low_bits(hash, self.round);
        if idx < self.next_to_split {
            self.split_target(hash)
        } else {
            idx
        }
    }

    /// Address with one extra bit. For a key of the bucket at
    /// `next_to_split` this is either that index or its sibling.
    #[inline]
    pub(crate) fn split_target(&self, hash: u64) -> usize {
        low_bits(hash, self.round + 1)
    }

    #[inline]
    pub(crate) fn get(&self, index: usize) -> Option<BucketId> {
        self.buckets.get(index).copied().flatten()
    }

    pub(crate) fn install(&mut self, index: usize, id: BucketId) -> Option<BucketId> {
        self.buckets[index].replace(id)
    }

    pub(crate) fn take(&mut self, index: usize) -> Option<BucketId> {
        self.buckets[index].take()
    }

    pub(crate) fn ids(&self) -> impl Iterator<Item = Option<BucketId>> + '_ {
        self.buckets.iter().copied()
    }

    /// Open the split of `next_to_split`: append the sibling slot and
    /// return `(old, sibling)`. Round state is unchanged until
    /// `finish_split`.
    pub(crate) fn begin_split(&mut self) -> (usize, usize) {
        let old = self.next_to_split;
        let sibling = old + self.width();
        debug_assert_eq!(sibling, self.buckets.len());
        self.grow_if_needed(sibling + 1);
        self.buckets.push(None);
        (old, sibling)
    }

    /// Advance `next_to_split`, rolling over to the next round once every
    /// bucket of this round has split.
    pub(crate) fn finish_split(&mut self) -> SplitOutcome {
        self.next_to_split += 1;
        if self.next_to_split < self.width() {
            return SplitOutcome::Continued;
        }
        self.round += 1;
        self.next_to_split = 0;
        // The next round ends at twice the current width.
        self.grow_if_needed(self.width() * 2);
        debug_assert_eq!(self.buckets.len(), self.width());
        SplitOutcome::RoundCompleted { round: self.round }
    }

    /// Ensure physical room for `required` slots. Returns whether it grew.
    pub(crate) fn grow_if_needed(&mut self, required: usize) -> bool {
        if required <= self.capacity {
            return false;
        }
        let grown = required.max(self.capacity.saturating_mul(2));
        self.buckets.reserve_exact(grown - self.buckets.len());
        log::debug!(
            "growing directory capacity {} -> {grown} (round {})",
            self.capacity,
            self.round
        );
        self.capacity = grown;
        true
    }
}
