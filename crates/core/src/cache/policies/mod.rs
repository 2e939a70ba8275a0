//! Block-replacement policies.
//!
//! Implements the algorithms for selecting an eviction candidate within a
//! set. Both policies fill empty ways before evicting resident data.
//!
//! # Policies
//!
//! - `RoundRobin`: FIFO by first access.
//! - `Random`: uniform selection from a seedable generator.

/// Round-robin (FIFO by first access) replacement policy.
pub mod round_robin;

/// Random replacement policy.
pub mod random;

pub use random::RandomPolicy;
pub use round_robin::RoundRobinPolicy;

use super::block::Block;

/// Trait for block-replacement policies.
///
/// A policy inspects a set's blocks and names the way to evict. The cache
/// resolves the configured policy into a concrete implementation once at
/// construction; no per-miss dispatch on the configuration value happens.
pub trait ReplacementPolicy: Send + Sync {
    /// Selects the way to evict from a set.
    ///
    /// # Arguments
    ///
    /// * `blocks` - The set's blocks, in way order. Never empty: the
    ///   configuration layer guarantees associativity of at least 1.
    ///
    /// # Returns
    ///
    /// The index of the way to evict.
    fn select_victim(&mut self, blocks: &[Block]) -> usize;
}
