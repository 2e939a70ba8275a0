//! Trace parsing and the simulation driver.
//!
//! Provides the textual trace-file reader and the driver that streams the
//! resulting access events through a cache, performing per-event cycle and
//! byte accounting.

/// Simulation driver: streams trace events into a cache.
pub mod driver;

/// Trace-file format and parser.
pub mod trace;

pub use driver::Simulation;
pub use trace::{TraceError, TraceEvent, TraceReader};
