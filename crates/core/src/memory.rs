//! Demand-populated physical memory model.
//!
//! Physical memory is a conceptually infinite mapping from 32-bit addresses
//! to bytes. Locations materialize on first read with a pseudo-random value
//! drawn from a seedable generator (the first read fixes the value for the
//! rest of the run); writes upsert unconditionally; nothing is ever evicted.
//!
//! The model also derives paging metrics (page counts, page-table entry
//! width, page-table RAM) for reporting. These are pure functions of the
//! configured size and have no coupling to reads or writes.

use std::collections::HashMap;

use crate::common::XorShift64;
use crate::common::math::log2_ceil;
use crate::config::{MemoryConfig, defaults};

/// Flat, sparse physical address space with random-on-first-touch contents.
#[derive(Debug)]
pub struct PhysicalMemory {
    size_bytes: u64,
    unused_percent: u32,
    data: HashMap<u32, u8>,
    rng: XorShift64,
}

impl PhysicalMemory {
    /// Creates a physical memory of `config.size_bytes` bytes.
    ///
    /// The size bounds only the derived paging metrics; the address space
    /// itself grows on demand and is never capacity-checked on access.
    pub fn new(config: &MemoryConfig) -> Self {
        Self {
            size_bytes: config.size_bytes,
            unused_percent: config.unused_percent,
            data: HashMap::new(),
            rng: XorShift64::new(config.seed),
        }
    }

    /// Reads the byte at `address`, materializing an unmapped location with
    /// a pseudo-random value in [0, 256).
    pub fn read(&mut self, address: u32) -> u8 {
        let rng = &mut self.rng;
        *self
            .data
            .entry(address)
            .or_insert_with(|| rng.next_below(256) as u8)
    }

    /// Writes `value` at `address`, mapping the location if necessary.
    pub fn write(&mut self, address: u32, value: u8) {
        let _ = self.data.insert(address, value);
    }

    /// Returns the byte at `address` if it has been materialized, without
    /// materializing it. Inspection only.
    pub fn peek(&self, address: u32) -> Option<u8> {
        self.data.get(&address).copied()
    }

    /// Returns the configured memory size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Returns the configured system-reserved percentage.
    pub fn unused_percent(&self) -> u32 {
        self.unused_percent
    }

    /// Returns the number of physical pages (`size / 4096`).
    pub fn num_pages(&self) -> u64 {
        self.size_bytes / defaults::PAGE_SIZE
    }

    /// Returns the number of pages reserved by the system.
    pub fn num_system_pages(&self) -> u64 {
        (self.num_pages() as f64 * (f64::from(self.unused_percent) / 100.0)) as u64
    }

    /// Returns the width of a page-table entry in bits
    /// (`ceil(log2(num_pages)) + 1`; the extra bit is the valid flag).
    pub fn page_table_bits(&self) -> u32 {
        log2_ceil(self.num_pages()) + 1
    }

    /// Returns the RAM consumed by page tables for `processes` tracked
    /// processes (one per trace file), in bytes.
    pub fn page_table_ram(&self, processes: u64) -> u64 {
        ((u64::from(self.page_table_bits()) * self.num_pages() * processes) / 8) * 2
    }
}
