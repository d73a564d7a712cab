//! linhash-set: a hash set that grows by linear hashing.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a set whose table grows one bucket at a time instead of by
//!   whole-table rehashing, with overflow chains absorbing collisions
//!   between splits.
//! - Layers:
//!   - Bucket<K, N>: fixed array of `N` slots kept dense at the front,
//!     plus an optional overflow link.
//!   - Directory: bucket ids indexed by hash address, and the round state
//!     (`round` = hash bits in use, `next_to_split`, physical capacity).
//!   - LinearHashTable<K, S, N>: owns the bucket arena, addresses keys
//!     through the directory, walks chains, splits buckets.
//!   - LinearHashSet<K, S, N>: public set API (insert/erase/find/count,
//!     copy, swap, equality, iteration, diagnostic dump).
//!
//! Addressing
//! - At round `d`, a key with hash `h` lives at `h mod 2^d`, unless that
//!   index is below `next_to_split`, in which case it lives at
//!   `h mod 2^(d+1)`. The directory's logical length is
//!   `2^d + next_to_split`.
//!
//! Growth
//! - An insert that leaves any bucket of its target chain full splits the
//!   bucket at `next_to_split` (round-robin, not necessarily the one that
//!   filled up). A split moves that chain's entries into two fresh buckets
//!   at `old` and `old + 2^d` using one extra hash bit, then advances
//!   `next_to_split`. When every bucket of the round has split, `d`
//!   increments and `next_to_split` resets to 0; no data moves at rollover.
//! - Splits never trigger further splits. The directory never shrinks and
//!   buckets are never merged on erase.
//!
//! Storage
//! - Buckets live in a `slotmap::SlotMap` arena; the directory and overflow
//!   links hold generational `BucketId`s. Released buckets are removed from
//!   the arena, so stale `Position`s stop resolving.
//! - Each entry stores its precomputed `u64` hash; `K: Hash` is invoked
//!   once per insert or lookup, never during a split.
//!
//! Iteration
//! - Order is directory index, then overflow chain (primary first), then
//!   slot. The same state always enumerates in the same order.
//!
//! Reentrancy policy
//! - Public entry points of `LinearHashTable` take a debug-only guard;
//!   re-entering the same table from `K: Hash`/`K: Eq` panics in debug
//!   builds.
//!
//! Notes and non-goals
//! - Single-threaded: no internal locking; the table is `!Sync`.
//! - No persistence, no key-to-value mapping, no shrinking.
//! - Copies replay insertions, so a copy's round state may differ from its
//!   source while the two compare equal.

mod bucket;
mod directory;
pub mod iter;
pub mod linear_hash_set;
pub mod linear_hash_table;
mod linear_hash_table_proptest;
mod reentrancy;

// Public surface
pub use hashbrown::hash_map::DefaultHashBuilder;
pub use linear_hash_set::LinearHashSet;
pub use linear_hash_table::{InsertError, LinearHashTable, Position, TableStats};
