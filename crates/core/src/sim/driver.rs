//! Simulation driver.
//!
//! The driver owns the cache (which in turn owns its statistics and backing
//! memory) and streams parsed trace events into it. One driver instance is
//! one simulation run; nothing is shared across runs.

use std::io::BufRead;

use tracing::info;

use super::trace::{TraceError, TraceEvent, TraceReader};
use crate::cache::Cache;

/// Bytes accounted for every data access in the trace format.
const DATA_ACCESS_BYTES: u32 = 4;

/// Fixed decode overhead charged per instruction fetch, in cycles.
const FETCH_DECODE_CYCLES: u64 = 2;

/// Trace-driven simulation run over one cache instance.
pub struct Simulation {
    cache: Cache,
}

impl Simulation {
    /// Creates a driver around a freshly constructed cache.
    pub fn new(cache: Cache) -> Self {
        Self { cache }
    }

    /// Streams one trace through the cache.
    ///
    /// May be called once per trace file; all files accumulate into the same
    /// statistics. Call [`Simulation::finish`] after the last one.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] on I/O failure or a malformed line. The
    /// counters reflect every event applied before the failure.
    pub fn run<R: BufRead>(&mut self, reader: R) -> Result<(), TraceError> {
        for event in TraceReader::new(reader) {
            self.apply(event?);
        }
        Ok(())
    }

    /// Completes the run: tallies end-of-run occupancy into the statistics.
    pub fn finish(&mut self) {
        self.cache.finalize_run();
        info!(
            accesses = self.cache.stats().accesses(),
            hits = self.cache.stats().hits(),
            misses = self.cache.stats().misses(),
            "trace complete"
        );
    }

    /// Returns the cache under simulation.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// Applies one trace event to the cache.
    ///
    /// A fetch becomes one cache read accounted at its fetch length plus a
    /// fixed decode overhead. A data record becomes up to two accesses
    /// (destination write-or-read, then source read), each accounted at
    /// [`DATA_ACCESS_BYTES`]. An instruction boundary retires one
    /// instruction.
    fn apply(&mut self, event: TraceEvent) {
        match event {
            TraceEvent::Fetch { addr, len } => {
                let hit = self.cache.read(addr);
                self.cache.record_transfer(hit, len);
                self.cache.add_cycles(FETCH_DECODE_CYCLES);
            }
            TraceEvent::Data { dst, src } => {
                if let Some(access) = dst {
                    let hit = match access.value {
                        Some(value) => self.cache.write(access.addr, value),
                        None => self.cache.read(access.addr),
                    };
                    self.cache.record_transfer(hit, DATA_ACCESS_BYTES);
                }
                if let Some(addr) = src {
                    let hit = self.cache.read(addr);
                    self.cache.record_transfer(hit, DATA_ACCESS_BYTES);
                }
            }
            TraceEvent::InstructionBoundary => self.cache.retire_instruction(),
        }
    }
}
