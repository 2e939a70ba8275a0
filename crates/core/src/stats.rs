//! Access counters and derived performance metrics.
//!
//! This module tracks everything a run accumulates: hits, the miss
//! breakdown, replacements, cycles, retired instructions, and transferred
//! bytes. Derived metrics (hit rate, miss rate, cycles-per-instruction) are
//! pure functions of the counters, recomputed on demand and never stored.
//!
//! One `Statistics` value belongs to exactly one cache; there is no shared
//! or global accounting state.

use serde::Serialize;

/// Monotonic counters for one simulation run.
///
/// All counters only ever increase. The structure serializes to JSON for
/// machine-readable output; the derived rates are methods, not fields.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Statistics {
    hits: u64,
    compulsory_misses: u64,
    conflict_misses: u64,
    replacements: u64,
    cycles: u64,
    instructions: u64,
    bytes_read: u64,
    unused_blocks: u64,
}

impl Statistics {
    /// Counts one cache hit.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    /// Counts one compulsory miss (fill of a never-occupied way).
    pub fn record_compulsory_miss(&mut self) {
        self.compulsory_misses += 1;
    }

    /// Counts one conflict miss (eviction of resident data).
    pub fn record_conflict_miss(&mut self) {
        self.conflict_misses += 1;
    }

    /// Counts one block replacement.
    pub fn record_replacement(&mut self) {
        self.replacements += 1;
    }

    /// Counts one retired trace instruction.
    pub fn record_instruction(&mut self) {
        self.instructions += 1;
    }

    /// Records the ways still empty at the end of a run.
    pub fn record_unused_blocks(&mut self, count: u64) {
        self.unused_blocks += count;
    }

    /// Accounts the transfer cost of one serviced access.
    ///
    /// `bytes` are added to the transferred-byte counter regardless of
    /// outcome. A hit costs 1 cycle; a miss costs a burst transfer of
    /// `4 * ceil(block_size / 4)` cycles, proportional to the block size and
    /// independent of `bytes`.
    pub fn record_access(&mut self, hit: bool, bytes: u32, block_size: u32) {
        self.bytes_read += u64::from(bytes);
        if hit {
            self.cycles += 1;
        } else {
            self.cycles += u64::from(4 * block_size.div_ceil(4));
        }
    }

    /// Adds fixed overhead cycles.
    pub fn add_cycles(&mut self, cycles: u64) {
        self.cycles += cycles;
    }

    /// Returns the hit count.
    pub fn hits(&self) -> u64 {
        self.hits
    }

    /// Returns the compulsory miss count.
    pub fn compulsory_misses(&self) -> u64 {
        self.compulsory_misses
    }

    /// Returns the conflict miss count.
    pub fn conflict_misses(&self) -> u64 {
        self.conflict_misses
    }

    /// Returns the total miss count.
    pub fn misses(&self) -> u64 {
        self.compulsory_misses + self.conflict_misses
    }

    /// Returns the total access count (`hits + misses`).
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses()
    }

    /// Returns the replacement count.
    pub fn replacements(&self) -> u64 {
        self.replacements
    }

    /// Returns the accumulated cycle count.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Returns the retired instruction count.
    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Returns the transferred byte count.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    /// Returns the count of ways left empty at the end of the run.
    pub fn unused_blocks(&self) -> u64 {
        self.unused_blocks
    }

    /// Returns the hit rate as a percentage, or 0 before any access.
    pub fn hit_rate(&self) -> f64 {
        self.rate(self.hits)
    }

    /// Returns the miss rate as a percentage, or 0 before any access.
    pub fn miss_rate(&self) -> f64 {
        self.rate(self.misses())
    }

    /// Returns cycles per instruction.
    ///
    /// NaN when no instructions have retired; callers format it, they never
    /// divide by the instruction count themselves.
    pub fn cpi(&self) -> f64 {
        self.cycles as f64 / self.instructions as f64
    }

    fn rate(&self, count: u64) -> f64 {
        let accesses = self.accesses();
        if accesses == 0 {
            0.0
        } else {
            100.0 * count as f64 / accesses as f64
        }
    }
}
