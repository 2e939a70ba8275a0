//! Random replacement policy.
//!
//! This policy evicts a uniformly random way once the set is full. It draws
//! from the crate's seedable xorshift generator so that runs are exactly
//! reproducible from their seed.

use super::ReplacementPolicy;
use crate::cache::block::Block;
use crate::common::XorShift64;

/// Random policy state.
#[derive(Debug)]
pub struct RandomPolicy {
    rng: XorShift64,
}

impl RandomPolicy {
    /// Creates a new random policy instance from the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: XorShift64::new(seed),
        }
    }
}

impl ReplacementPolicy for RandomPolicy {
    /// Identifies the victim way to evict.
    ///
    /// Prefers any invalid way; otherwise picks uniformly at random among
    /// all ways.
    fn select_victim(&mut self, blocks: &[Block]) -> usize {
        if let Some(way) = blocks.iter().position(|b| !b.is_valid()) {
            return way;
        }
        self.rng.next_below(blocks.len() as u64) as usize
    }
}
