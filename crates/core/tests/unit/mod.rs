//! # Unit Components
//!
//! This module organizes the unit tests by the component under test.

/// Address decomposition: field extraction, stepping, and the round-trip
/// law over arbitrary addresses.
pub mod addr;

/// Cache behavior: geometry derivation, hit/miss protocol, eviction, and
/// write-back integrity.
pub mod cache;


/// Statistics accounting identities driven through whole simulation runs.
pub mod stats_invariants;

/// Trace files on disk driven end-to-end through the simulation driver.
pub mod trace_file;
