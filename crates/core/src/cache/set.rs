//! A group of blocks sharing one index.
//!
//! A set owns `associativity` interchangeable blocks and a running access
//! counter used to stamp block occupancy. Residency resolution is a linear
//! scan over the valid blocks; eviction candidate selection is delegated to
//! the replacement policy.

use super::block::Block;
use crate::common::AddressParts;

/// A fixed-size group of blocks addressed by one set index.
#[derive(Debug)]
pub struct CacheSet {
    blocks: Vec<Block>,
    accesses: u64,
}

impl CacheSet {
    /// Creates a set of `associativity` invalid blocks of `block_size` bytes.
    pub fn new(associativity: u32, block_size: u32) -> Self {
        Self {
            blocks: (0..associativity).map(|_| Block::new(block_size)).collect(),
            accesses: 0,
        }
    }

    /// Returns the set's blocks, in way order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Finds the resident block for the address's tag, if any.
    ///
    /// This is the hit test: a valid block whose tag matches. At most one
    /// such block exists at any time.
    pub fn resident_block(&self, address: &AddressParts) -> Option<&Block> {
        self.blocks
            .iter()
            .find(|b| b.is_valid() && b.tag() == address.tag())
    }

    /// Reads the byte the address refers to from its resident block.
    ///
    /// The access is numbered with the set's pre-incremented counter, so the
    /// first access in a set is numbered 1 and 0 stays a safe "unset"
    /// sentinel for block stamps.
    ///
    /// # Panics
    ///
    /// Panics if no block is resident for the tag; the cache always fills
    /// before servicing, so this indicates a broken residency contract.
    pub fn read_byte(&mut self, address: &AddressParts) -> u8 {
        self.accesses += 1;
        let seq = self.accesses;
        match self.resident_block_mut(address) {
            Some(block) => block.read(address, seq),
            None => panic!("read of non-resident tag {:#x}", address.tag()),
        }
    }

    /// Writes `value` at the address within its resident block.
    ///
    /// Same numbering rule as [`CacheSet::read_byte`].
    ///
    /// # Panics
    ///
    /// Panics if no block is resident for the tag (see [`CacheSet::read_byte`]).
    pub fn write_byte(&mut self, address: &AddressParts, value: u8) {
        self.accesses += 1;
        let seq = self.accesses;
        match self.resident_block_mut(address) {
            Some(block) => block.write(address, value, seq),
            None => panic!("write of non-resident tag {:#x}", address.tag()),
        }
    }

    /// Replaces the payload of the block at `way` for a new tag.
    pub(super) fn fill_way(&mut self, way: usize, tag: u32, data: Vec<u8>) {
        self.blocks[way].fill(tag, data);
    }

    /// Returns the stored byte at `offset` of the block at `way` without
    /// counting an access (write-back path).
    pub(super) fn peek_byte(&self, way: usize, offset: u32) -> u8 {
        self.blocks[way].byte(offset)
    }

    fn resident_block_mut(&mut self, address: &AddressParts) -> Option<&mut Block> {
        self.blocks
            .iter_mut()
            .find(|b| b.is_valid() && b.tag() == address.tag())
    }
}
