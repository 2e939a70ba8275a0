//! A single cache line.
//!
//! A block carries its payload bytes plus the bookkeeping state the rest of
//! the cache needs: the valid and dirty bits, the resident tag, and the
//! access-order stamp used by round-robin eviction.

use crate::common::AddressParts;

/// One cache line: validity, dirty flag, tag, payload, and first-touch stamp.
#[derive(Clone, Debug)]
pub struct Block {
    valid: bool,
    dirty: bool,
    tag: u32,
    data: Vec<u8>,
    queue_number: u64,
}

impl Block {
    /// Creates an invalid, clean block with a zeroed payload.
    pub fn new(block_size: u32) -> Self {
        Self {
            valid: false,
            dirty: false,
            tag: 0,
            data: vec![0; block_size as usize],
            queue_number: 0,
        }
    }

    /// Reads the byte at the address's offset.
    ///
    /// Stamps the block with `access_seq` if this is the first touch of the
    /// current residency (a stamp of 0 means "never touched").
    ///
    /// # Panics
    ///
    /// Panics if the offset is outside the block; the address decoder's field
    /// widths guarantee this never happens for a correctly configured cache.
    pub fn read(&mut self, address: &AddressParts, access_seq: u64) -> u8 {
        if self.queue_number == 0 {
            self.queue_number = access_seq;
        }
        self.data[address.offset() as usize]
    }

    /// Writes `value` at the address's offset, marking the block valid and
    /// dirty. Same first-touch stamping rule as [`Block::read`].
    ///
    /// # Panics
    ///
    /// Panics if the offset is outside the block (see [`Block::read`]).
    pub fn write(&mut self, address: &AddressParts, value: u8, access_seq: u64) {
        if self.queue_number == 0 {
            self.queue_number = access_seq;
        }
        self.data[address.offset() as usize] = value;
        self.valid = true;
        self.dirty = true;
    }

    /// Replaces the payload wholesale after a miss is serviced.
    ///
    /// This is the only operation allowed on a block that is currently valid
    /// under a different tag (the eviction path). The block becomes valid and
    /// clean for the new tag, and its first-touch stamp is cleared so the new
    /// residency is stamped by its first access.
    pub fn fill(&mut self, tag: u32, data: Vec<u8>) {
        debug_assert_eq!(data.len(), self.data.len());
        self.tag = tag;
        self.data = data;
        self.valid = true;
        self.dirty = false;
        self.queue_number = 0;
    }

    /// Returns true if the block holds resident data.
    #[inline(always)]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if the block holds a write not yet propagated to memory.
    #[inline(always)]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns the resident tag. Meaningless while the block is invalid.
    #[inline(always)]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Returns the sequence number of the access that first touched the
    /// current residency, or 0 if untouched.
    #[inline(always)]
    pub fn queue_number(&self) -> u64 {
        self.queue_number
    }

    /// Returns the stored byte at `offset` without stamping.
    ///
    /// Used by the write-back path, which is not an access.
    pub fn byte(&self, offset: u32) -> u8 {
        self.data[offset as usize]
    }
}
