//! Trace-driven set-associative cache simulator library.
//!
//! This crate models the observable behavior of a single-level CPU cache in
//! front of a flat physical memory. It provides:
//! 1. **Cache:** Set-associative storage, address decomposition, replacement
//!    policies (round-robin and random), and dirty-block write-back.
//! 2. **Memory:** A demand-populated, unbounded physical address space with
//!    deterministic pseudo-random initial contents.
//! 3. **Statistics:** Hit/miss/cycle accounting with derived hit rate, miss
//!    rate, and cycles-per-instruction.
//! 4. **Simulation:** A trace-file parser and a driver that streams memory
//!    access events through the cache.

/// Common building blocks (address decomposition, pseudo-random generator).
pub mod common;
/// Simulator configuration (defaults, replacement policy, validation).
pub mod config;
/// The set-associative cache: blocks, sets, policies, and the orchestrator.
pub mod cache;
/// Demand-populated physical memory model.
pub mod memory;
/// Trace parsing and the simulation driver.
pub mod sim;
/// Access counters and derived performance metrics.
pub mod stats;

/// Main cache type; owns its sets, statistics, and backing memory.
pub use crate::cache::Cache;
/// Cache geometry and policy configuration; validate before construction.
pub use crate::config::CacheConfig;
/// Flat backing memory; construct with `PhysicalMemory::new`.
pub use crate::memory::PhysicalMemory;
/// Trace-driven simulation driver; construct with `Simulation::new`.
pub use crate::sim::Simulation;
