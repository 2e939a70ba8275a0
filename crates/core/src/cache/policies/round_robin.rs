//! Round-robin (FIFO by first access) replacement policy.
//!
//! This policy evicts the block whose current residency was first touched
//! earliest, regardless of how recently it was used. It is a FIFO over block
//! occupancy, not a true LRU: the stamp is written once per residency and
//! never refreshed.
//!
//! # Performance
//!
//! - **Time Complexity:** `select_victim()`: O(ways)
//! - **Hardware Cost:** one sequence register per block
//! - **Worst Case:** workloads with strong temporal locality (may evict
//!   frequently-used lines)

use super::ReplacementPolicy;
use crate::cache::block::Block;

/// Round-robin policy state.
///
/// Stateless: the ordering lives in the blocks' first-touch stamps.
#[derive(Debug, Default)]
pub struct RoundRobinPolicy;

impl RoundRobinPolicy {
    /// Creates a new round-robin policy instance.
    pub fn new() -> Self {
        Self
    }
}

impl ReplacementPolicy for RoundRobinPolicy {
    /// Identifies the victim way to evict.
    ///
    /// Prefers any invalid way (empty slots are filled before anything is
    /// evicted). Otherwise returns the resident way with the smallest
    /// nonzero first-touch stamp. A resident way that was never touched
    /// (stamp still 0) cannot be ordered, so way 0 stands in as the victim;
    /// in practice every fill is followed by a servicing access that stamps
    /// the block.
    fn select_victim(&mut self, blocks: &[Block]) -> usize {
        if let Some(way) = blocks.iter().position(|b| !b.is_valid()) {
            return way;
        }

        let mut victim = None;
        let mut oldest = u64::MAX;
        for (way, block) in blocks.iter().enumerate() {
            let stamp = block.queue_number();
            if stamp != 0 && stamp < oldest {
                oldest = stamp;
                victim = Some(way);
            }
        }

        victim.unwrap_or(0)
    }
}
