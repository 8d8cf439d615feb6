//! Chained Block Index
//!
//! Each file inode owns one of these: an ordered chain of fixed-capacity
//! buckets holding fixed-size data blocks. Byte offset `o` lives in bucket
//! `o / BLOCK_BUCKET_SPAN`, block `(o % BLOCK_BUCKET_SPAN) / BLOCK_SIZE`,
//! at intra-block offset `o % BLOCK_SIZE`.
//!
//! Blocks are allocated lazily, zero-filled, on the first write that
//! touches them; the chain grows monotonically with the highest byte ever
//! written and is never compacted. Reads are whole-call: either the full
//! range is transferred or nothing is.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::config::{BLOCK_BUCKET_ENTRIES, BLOCK_BUCKET_SPAN, BLOCK_SIZE};
use crate::vfs::error::{FsError, FsResult};

/// One fixed-capacity bucket of data blocks. A `None` slot has never been
/// written.
pub struct BlockBucket {
    blocks: [Option<Box<[u8; BLOCK_SIZE]>>; BLOCK_BUCKET_ENTRIES],
}

impl BlockBucket {
    fn new() -> Self {
        Self {
            blocks: core::array::from_fn(|_| None),
        }
    }
}

/// Chained block index with a written-extent high-water mark.
pub struct BlockIndex {
    /// Highest byte offset ever written plus one. Reads past this fail.
    size: u64,
    buckets: Vec<BlockBucket>,
}

impl BlockIndex {
    /// Create an index with a single empty bucket and no data.
    pub fn new() -> Self {
        let mut buckets = Vec::new();
        buckets.push(BlockBucket::new());
        Self { size: 0, buckets }
    }

    /// Bytes ever written (high-water mark).
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Number of buckets in the chain.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of allocated data blocks across the chain.
    pub fn allocated_blocks(&self) -> usize {
        self.buckets
            .iter()
            .map(|bucket| bucket.blocks.iter().filter(|b| b.is_some()).count())
            .sum()
    }

    /// Read `dst.len()` bytes starting at `offset`.
    ///
    /// Fails with `NotPresent`, leaving `dst` untouched, if the range
    /// extends past the written extent or touches an unallocated block.
    /// There is no zero-fill-on-read.
    pub fn read_at(&self, offset: u64, dst: &mut [u8]) -> FsResult<usize> {
        if dst.is_empty() {
            return Ok(0);
        }

        // An end offset that does not fit in u64 cannot be inside the
        // written extent either.
        let end = offset
            .checked_add(dst.len() as u64)
            .ok_or(FsError::NotPresent)?;
        if end > self.size {
            return Err(FsError::NotPresent);
        }

        // Validate the whole range is backed before copying anything, so
        // a failed read transfers no partial result.
        let mut probe = offset;
        while probe < end {
            if self.block_at(probe).is_none() {
                return Err(FsError::NotPresent);
            }
            probe = probe - probe % BLOCK_SIZE as u64 + BLOCK_SIZE as u64;
        }

        let mut copied = 0;
        while copied < dst.len() {
            let off = offset + copied as u64;
            let block = self.block_at(off).ok_or(FsError::NotPresent)?;
            let intra = (off % BLOCK_SIZE as u64) as usize;
            let n = (dst.len() - copied).min(BLOCK_SIZE - intra);
            dst[copied..copied + n].copy_from_slice(&block[intra..intra + n]);
            copied += n;
        }

        Ok(copied)
    }

    /// Write `src` starting at `offset`, allocating zero-filled blocks for
    /// exactly the blocks the range touches. Writes never fail on holes.
    ///
    /// Fails with `InvalidArgument` if the range's end offset does not fit
    /// in `u64`.
    pub fn write_at(&mut self, offset: u64, src: &[u8]) -> FsResult<usize> {
        if src.is_empty() {
            return Ok(0);
        }

        let end = offset
            .checked_add(src.len() as u64)
            .ok_or(FsError::InvalidArgument)?;

        let mut written = 0;
        while written < src.len() {
            let off = offset + written as u64;
            let intra = (off % BLOCK_SIZE as u64) as usize;
            let n = (src.len() - written).min(BLOCK_SIZE - intra);
            let block = self.block_at_mut_or_alloc(off);
            block[intra..intra + n].copy_from_slice(&src[written..written + n]);
            written += n;
        }

        if end > self.size {
            self.size = end;
        }

        Ok(written)
    }

    fn block_at(&self, offset: u64) -> Option<&[u8; BLOCK_SIZE]> {
        let bucket = self.buckets.get(offset as usize / BLOCK_BUCKET_SPAN)?;
        bucket.blocks[offset as usize % BLOCK_BUCKET_SPAN / BLOCK_SIZE].as_deref()
    }

    fn block_at_mut_or_alloc(&mut self, offset: u64) -> &mut [u8; BLOCK_SIZE] {
        let bucket_idx = offset as usize / BLOCK_BUCKET_SPAN;
        while self.buckets.len() <= bucket_idx {
            self.buckets.push(BlockBucket::new());
        }
        let slot = &mut self.buckets[bucket_idx].blocks[offset as usize % BLOCK_BUCKET_SPAN / BLOCK_SIZE];
        slot.get_or_insert_with(|| Box::new([0u8; BLOCK_SIZE]))
    }
}

impl Default for BlockIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_then_read_round_trips() {
        let mut index = BlockIndex::new();
        let data = b"hello";
        assert_eq!(index.write_at(0, data).unwrap(), 5);
        assert_eq!(index.size(), 5);

        let mut out = [0u8; 5];
        assert_eq!(index.read_at(0, &mut out).unwrap(), 5);
        assert_eq!(&out, data);
    }

    #[test]
    fn ranges_overflowing_u64_are_rejected() {
        let mut index = BlockIndex::new();
        index.write_at(0, b"hello").unwrap();

        let mut out = [0u8; 2];
        assert_eq!(index.read_at(u64::MAX, &mut out), Err(FsError::NotPresent));
        assert_eq!(
            index.read_at(u64::MAX - 1, &mut out),
            Err(FsError::NotPresent)
        );
        assert_eq!(
            index.write_at(u64::MAX, b"xy"),
            Err(FsError::InvalidArgument)
        );
    }

    #[test]
    fn read_past_written_extent_fails() {
        let mut index = BlockIndex::new();
        index.write_at(0, b"hello").unwrap();

        let mut out = [0u8; 1];
        assert_eq!(index.read_at(5, &mut out), Err(FsError::NotPresent));
        assert_eq!(index.read_at(0, &mut [0u8; 6]), Err(FsError::NotPresent));
    }

    #[test]
    fn read_of_hole_inside_extent_fails() {
        let mut index = BlockIndex::new();
        // Touches only the third block; the first two stay unallocated.
        let off = 2 * BLOCK_SIZE as u64 + 100;
        index.write_at(off, b"x").unwrap();
        assert_eq!(index.allocated_blocks(), 1);

        let mut out = [0u8; 4];
        assert_eq!(index.read_at(0, &mut out), Err(FsError::NotPresent));
        // The touched block itself reads back fine.
        let mut one = [0u8; 1];
        assert_eq!(index.read_at(off, &mut one).unwrap(), 1);
        assert_eq!(&one, b"x");
    }

    #[test]
    fn failed_read_leaves_buffer_untouched() {
        let mut index = BlockIndex::new();
        index.write_at(0, &[7u8; 100]).unwrap();

        let mut out = [0xaau8; 200];
        assert_eq!(index.read_at(0, &mut out), Err(FsError::NotPresent));
        assert!(out.iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn write_spanning_block_boundary() {
        let mut index = BlockIndex::new();
        let data: Vec<u8> = (0..BLOCK_SIZE + 100).map(|i| i as u8).collect();
        let off = BLOCK_SIZE as u64 - 50;
        index.write_at(off, &data).unwrap();
        assert_eq!(index.allocated_blocks(), 3);

        let mut out = vec![0u8; data.len()];
        index.read_at(off, &mut out).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn chain_extends_across_bucket_span() {
        let mut index = BlockIndex::new();
        let off = BLOCK_BUCKET_SPAN as u64 + 17;
        index.write_at(off, b"far").unwrap();
        assert_eq!(index.bucket_count(), 2);
        // Only the one touched block was allocated.
        assert_eq!(index.allocated_blocks(), 1);

        let mut out = [0u8; 3];
        index.read_at(off, &mut out).unwrap();
        assert_eq!(&out, b"far");
    }
}
