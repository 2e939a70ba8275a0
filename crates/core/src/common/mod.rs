//! Common utilities shared across the simulator.
//!
//! This module provides the building blocks the rest of the crate is written
//! against:
//! 1. **Address Decomposition:** Splitting a 32-bit address into tag, index,
//!    and block offset fields.
//! 2. **Pseudo-Random Numbers:** A small seedable xorshift generator used by
//!    the random replacement policy and the physical-memory fill pattern.

/// Address decomposition into tag/index/offset fields.
pub mod addr;

/// Arithmetic helpers for geometry derivation.
pub mod math;

/// Seedable xorshift pseudo-random number generator.
pub mod rng;

pub use addr::AddressParts;
pub use rng::XorShift64;
