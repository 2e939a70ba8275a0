//! Set-associative cache simulator.
//!
//! This module implements the cache core: address decomposition into
//! tag/index/offset, the set-associative storage structure, replacement
//! policies, dirty-block write-back, and the hit/miss/cycle accounting
//! derived from every access. It provides:
//! 1. **Geometry:** Bit widths, block/set counts, and the implementation and
//!    overhead sizes, derived once at construction.
//! 2. **Access Protocol:** Residency probe, hit service, and the miss fill
//!    protocol (eviction, write-back, refill from physical memory).
//! 3. **Ownership:** The cache exclusively owns its sets, its statistics,
//!    and its backing memory; one cache instance is one simulation run.

/// A single cache line and its bookkeeping state.
pub mod block;

/// Replacement policy implementations (round-robin, random).
pub mod policies;

/// A fixed group of blocks sharing one index.
pub mod set;

use tracing::{debug, trace};

use self::policies::{RandomPolicy, ReplacementPolicy, RoundRobinPolicy};
use self::set::CacheSet;
use crate::common::AddressParts;
use crate::common::math::log2_ceil;
use crate::config::{CacheConfig, ConfigError, ReplacementPolicy as PolicyKind};
use crate::memory::PhysicalMemory;
use crate::stats::Statistics;

/// Set-associative cache in front of a flat physical memory.
///
/// Geometry is immutable after construction; only block and set contents and
/// the statistics counters mutate during a run.
pub struct Cache {
    size_kb: u32,
    block_size: u32,
    associativity: u32,
    num_blocks: u32,
    num_sets: u32,
    tag_bits: u32,
    index_bits: u32,
    offset_bits: u32,
    implementation_size: u64,
    overhead_size: u64,
    sets: Vec<CacheSet>,
    policy: Box<dyn ReplacementPolicy>,
    memory: PhysicalMemory,
    stats: Statistics,
}

impl Cache {
    /// Creates a cache from a validated configuration, taking ownership of
    /// its backing memory.
    ///
    /// Derives the full geometry once: block and set counts, the three
    /// address field widths, and the implementation/overhead sizes. The
    /// configured replacement policy is resolved here into a concrete
    /// implementation.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the configuration violates the
    /// documented geometry constraints.
    pub fn new(config: &CacheConfig, memory: PhysicalMemory) -> Result<Self, ConfigError> {
        config.validate()?;

        let size_bytes = config.size_bytes();
        let num_blocks = (size_bytes / u64::from(config.block_size)) as u32;
        let num_sets = num_blocks / config.associativity;

        let offset_bits = log2_ceil(u64::from(config.block_size));
        let index_bits = log2_ceil(size_bytes)
            - log2_ceil(u64::from(config.block_size) * u64::from(config.associativity));
        let tag_bits = 32 - index_bits - offset_bits;

        // Payload bytes + one byte per possible tag + one valid/dirty byte
        // per block.
        let implementation_size = size_bytes + (1u64 << tag_bits) + u64::from(num_blocks);
        let overhead_size = implementation_size - size_bytes;

        let policy: Box<dyn ReplacementPolicy> = match config.policy {
            PolicyKind::RoundRobin => Box::new(RoundRobinPolicy::new()),
            PolicyKind::Random => Box::new(RandomPolicy::new(config.seed)),
        };

        let sets = (0..num_sets)
            .map(|_| CacheSet::new(config.associativity, config.block_size))
            .collect();

        Ok(Self {
            size_kb: config.size_kb,
            block_size: config.block_size,
            associativity: config.associativity,
            num_blocks,
            num_sets,
            tag_bits,
            index_bits,
            offset_bits,
            implementation_size,
            overhead_size,
            sets,
            policy,
            memory,
            stats: Statistics::default(),
        })
    }

    /// Reads one byte through the cache.
    ///
    /// On a hit the resident block services the read directly. On a miss the
    /// fill protocol runs first (eviction, possible write-back, refill from
    /// physical memory) and the read is then serviced against the
    /// now-resident block.
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    pub fn read(&mut self, addr: u32) -> bool {
        let address = AddressParts::decode(addr, self.index_bits, self.offset_bits);
        let hit = self.probe(&address);

        if hit {
            self.stats.record_hit();
        } else {
            self.fill(&address);
        }

        let _ = self.sets[address.index() as usize].read_byte(&address);
        trace!(addr = format_args!("{addr:#010x}"), hit, "read");
        hit
    }

    /// Writes one byte through the cache.
    ///
    /// Same protocol as [`Cache::read`]; the serviced block becomes dirty
    /// and its contents reach physical memory only when it is written back
    /// on eviction.
    ///
    /// # Returns
    ///
    /// `true` on a hit, `false` on a miss.
    pub fn write(&mut self, addr: u32, value: u8) -> bool {
        let address = AddressParts::decode(addr, self.index_bits, self.offset_bits);
        let hit = self.probe(&address);

        if hit {
            self.stats.record_hit();
        } else {
            self.fill(&address);
        }

        self.sets[address.index() as usize].write_byte(&address, value);
        trace!(addr = format_args!("{addr:#010x}"), hit, "write");
        hit
    }

    /// Adds the transfer cost of one serviced access to the statistics.
    ///
    /// A hit costs one cycle; a miss costs a burst transfer proportional to
    /// the block size (`4 * ceil(block_size / 4)` cycles), independent of
    /// `bytes`. The driver calls this once per trace access with the
    /// access's byte count.
    pub fn record_transfer(&mut self, hit: bool, bytes: u32) {
        self.stats.record_access(hit, bytes, self.block_size);
    }

    /// Adds fixed overhead cycles (e.g. instruction decode) to the run.
    pub fn add_cycles(&mut self, cycles: u64) {
        self.stats.add_cycles(cycles);
    }

    /// Counts one completed trace instruction.
    pub fn retire_instruction(&mut self) {
        self.stats.record_instruction();
    }

    /// Tallies end-of-run block occupancy into the statistics.
    ///
    /// Called once after the last trace event; ways that never held data are
    /// recorded as unused.
    pub fn finalize_run(&mut self) {
        let unused = self
            .sets
            .iter()
            .flat_map(|set| set.blocks().iter())
            .filter(|block| !block.is_valid())
            .count() as u64;
        self.stats.record_unused_blocks(unused);
    }

    /// Returns the accumulated statistics.
    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    /// Returns the backing physical memory.
    pub fn memory(&self) -> &PhysicalMemory {
        &self.memory
    }

    /// Returns the sets, in index order. Inspection and reporting only; all
    /// mutation goes through [`Cache::read`] and [`Cache::write`].
    pub fn sets(&self) -> &[CacheSet] {
        &self.sets
    }

    /// Returns the configured cache capacity in kilobytes.
    pub fn size_kb(&self) -> u32 {
        self.size_kb
    }

    /// Returns the block size in bytes.
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    /// Returns the configured associativity (ways per set).
    pub fn associativity(&self) -> u32 {
        self.associativity
    }

    /// Returns the total number of blocks.
    pub fn num_blocks(&self) -> u32 {
        self.num_blocks
    }

    /// Returns the number of sets (rows).
    pub fn num_sets(&self) -> u32 {
        self.num_sets
    }

    /// Returns the width of the tag field in bits.
    pub fn tag_bits(&self) -> u32 {
        self.tag_bits
    }

    /// Returns the width of the set-index field in bits.
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Returns the width of the block-offset field in bits.
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Returns the implementation size in bytes: payload plus tag storage
    /// plus per-block status bytes.
    pub fn implementation_size(&self) -> u64 {
        self.implementation_size
    }

    /// Returns the implementation size in kilobytes.
    pub fn implementation_size_kb(&self) -> f64 {
        self.implementation_size as f64 / 1024.0
    }

    /// Returns the overhead size in bytes (implementation size minus raw
    /// payload).
    pub fn overhead_size(&self) -> u64 {
        self.overhead_size
    }

    /// Hit test: is a block resident for this address's tag?
    fn probe(&self, address: &AddressParts) -> bool {
        self.sets[address.index() as usize]
            .resident_block(address)
            .is_some()
    }

    /// The fill protocol, run once per miss.
    ///
    /// Selects an eviction candidate per the replacement policy, writes a
    /// dirty candidate back to physical memory at its reconstructed
    /// address, then refills the candidate with `block_size` bytes read from
    /// physical memory at the missing block's base.
    fn fill(&mut self, address: &AddressParts) {
        let set_index = address.index() as usize;
        let way = self.policy.select_victim(self.sets[set_index].blocks());

        let (was_valid, was_dirty, old_tag) = {
            let victim = &self.sets[set_index].blocks()[way];
            (victim.is_valid(), victim.is_dirty(), victim.tag())
        };

        if was_valid && was_dirty {
            self.write_back(set_index, way, old_tag, address);
        }

        // Miss taxonomy: filling an empty way is a compulsory miss; evicting
        // resident data is a conflict miss and counts as a replacement.
        if was_valid {
            self.stats.record_conflict_miss();
            self.stats.record_replacement();
            debug!(
                set = set_index,
                way,
                old_tag = format_args!("{old_tag:#x}"),
                new_tag = format_args!("{:#x}", address.tag()),
                "evict"
            );
        } else {
            self.stats.record_compulsory_miss();
        }

        let base = self.block_base(address.tag(), address.index());
        let mut data = vec![0u8; self.block_size as usize];
        for (i, slot) in data.iter_mut().enumerate() {
            *slot = self.memory.read(base.step(i as u32).address());
        }
        self.sets[set_index].fill_way(way, address.tag(), data);
    }

    /// Writes a dirty victim's payload back to physical memory.
    ///
    /// The victim's original address is reconstructed from its tag and set
    /// index; all `block_size` bytes are written.
    fn write_back(&mut self, set_index: usize, way: usize, old_tag: u32, address: &AddressParts) {
        let base = self.block_base(old_tag, address.index());
        for offset in 0..self.block_size {
            let byte = self.sets[set_index].peek_byte(way, offset);
            self.memory.write(base.step(offset).address(), byte);
        }
        debug!(
            base = format_args!("{:#010x}", base.address()),
            bytes = self.block_size,
            "write-back"
        );
    }

    /// Decodes the block-aligned base address for a (tag, index) pair.
    fn block_base(&self, tag: u32, index: u32) -> AddressParts {
        let base = (tag.wrapping_mul(self.num_sets).wrapping_add(index))
            .wrapping_mul(self.block_size);
        AddressParts::decode(base, self.index_bits, self.offset_bits)
    }
}
