//! Chained Directory Index
//!
//! Each directory inode owns one of these: an ordered chain of
//! fixed-capacity buckets holding references to child node slots. Entry
//! `i` lives in bucket `i / DIR_BUCKET_ENTRIES` at offset
//! `i % DIR_BUCKET_ENTRIES`. Insertion takes the first empty slot in
//! chain order and appends a fresh bucket when the chain is full.
//! Tombstones mark logically removed entries and are never reused.
//!
//! Children are referenced by inode number into the owning filesystem's
//! node table, never by address; cross-filesystem references are a VFS
//! concern (mountpoints) and never appear here.

use alloc::vec::Vec;

use crate::config::DIR_BUCKET_ENTRIES;
use crate::vfs::node::Ino;

/// One slot of a directory bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSlot {
    /// Never used.
    Empty,
    /// Previously occupied, logically removed, never reused.
    Tombstone,
    /// Reference to a child node slot.
    Child(Ino),
}

/// One fixed-capacity bucket of the chain.
pub struct DirBucket {
    slots: [DirSlot; DIR_BUCKET_ENTRIES],
}

impl DirBucket {
    fn new() -> Self {
        Self {
            slots: [DirSlot::Empty; DIR_BUCKET_ENTRIES],
        }
    }
}

/// Chained directory index: bucket order in the vec is chain order.
pub struct DirIndex {
    buckets: Vec<DirBucket>,
}

impl DirIndex {
    /// Create an index with a single empty bucket.
    pub fn new() -> Self {
        let mut buckets = Vec::new();
        buckets.push(DirBucket::new());
        Self { buckets }
    }

    /// Insert a child reference into the first empty slot in chain order,
    /// extending the chain if every slot is occupied or tombstoned.
    pub fn insert(&mut self, child: Ino) {
        for bucket in self.buckets.iter_mut() {
            for slot in bucket.slots.iter_mut() {
                if matches!(slot, DirSlot::Empty) {
                    *slot = DirSlot::Child(child);
                    return;
                }
            }
        }

        let mut bucket = DirBucket::new();
        bucket.slots[0] = DirSlot::Child(child);
        self.buckets.push(bucket);
    }

    /// Fetch the entry at position `index`.
    ///
    /// Returns `None` if the chain is shorter than required or the target
    /// slot is empty or tombstoned.
    pub fn get(&self, index: usize) -> Option<Ino> {
        let bucket = self.buckets.get(index / DIR_BUCKET_ENTRIES)?;
        match bucket.slots[index % DIR_BUCKET_ENTRIES] {
            DirSlot::Child(ino) => Some(ino),
            DirSlot::Empty | DirSlot::Tombstone => None,
        }
    }

    /// Iterate over live child references in chain order.
    pub fn children(&self) -> impl Iterator<Item = Ino> + '_ {
        self.buckets
            .iter()
            .flat_map(|bucket| bucket.slots.iter())
            .filter_map(|slot| match slot {
                DirSlot::Child(ino) => Some(*ino),
                DirSlot::Empty | DirSlot::Tombstone => None,
            })
    }

    /// Number of buckets in the chain.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for DirIndex {
    fn default() -> Self {
        Self::new()
    }
}
