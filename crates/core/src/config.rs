//! Configuration system for the cache simulator.
//!
//! This module defines the structures and enums used to parameterize a
//! simulation run. It provides:
//! 1. **Defaults:** Baseline hardware constants (cache geometry, physical
//!    memory size, generator seed).
//! 2. **Structures:** Cache and physical-memory configuration with
//!    construction-time validation.
//! 3. **Enums:** The replacement policy selector.
//!
//! Configuration is supplied by the command-line front end (which warns and
//! substitutes defaults on invalid input) or deserialized from JSON/TOML via
//! serde; the core itself rejects invalid geometry outright.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

/// Default configuration constants for the simulator.
///
/// These values define the baseline configuration when not explicitly
/// overridden on the command line, and the documented bounds that input
/// parameters are validated against.
pub mod defaults {
    /// Default cache size in kilobytes (8 KB).
    pub const CACHE_SIZE_KB: u32 = 8;

    /// Smallest accepted cache size in kilobytes.
    pub const MIN_CACHE_SIZE_KB: u32 = 8;

    /// Largest accepted cache size in kilobytes (8 MB).
    pub const MAX_CACHE_SIZE_KB: u32 = 8192;

    /// Default block (line) size in bytes.
    pub const BLOCK_SIZE: u32 = 8;

    /// Smallest accepted block size in bytes.
    pub const MIN_BLOCK_SIZE: u32 = 8;

    /// Largest accepted block size in bytes.
    pub const MAX_BLOCK_SIZE: u32 = 64;

    /// Default associativity (1 way = direct-mapped).
    pub const ASSOCIATIVITY: u32 = 1;

    /// Largest accepted associativity.
    pub const MAX_ASSOCIATIVITY: u32 = 16;

    /// Default physical memory size in bytes (1 GB).
    pub const PHYS_MEM_BYTES: u64 = 1 << 30;

    /// Smallest accepted physical memory size in bytes (1 MB).
    pub const MIN_PHYS_MEM_BYTES: u64 = 1 << 20;

    /// Largest accepted physical memory size in bytes (4 GB).
    pub const MAX_PHYS_MEM_BYTES: u64 = 1 << 32;

    /// Default percentage of physical memory reserved by the system.
    pub const UNUSED_PERCENT: u32 = 0;

    /// Page size assumed by the paging metrics, in bytes.
    pub const PAGE_SIZE: u64 = 4096;
}

/// Block-replacement policy selector.
///
/// Chooses how a set picks its eviction candidate on a miss. Resolved once
/// at cache construction into a concrete policy implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ReplacementPolicy {
    /// Round-robin replacement (FIFO by first access).
    ///
    /// Fills empty ways first, then evicts the resident block whose first
    /// touch is oldest.
    #[default]
    #[serde(alias = "RR")]
    RoundRobin,
    /// Random replacement.
    ///
    /// Fills empty ways first, then evicts a uniformly random way.
    #[serde(alias = "RND")]
    Random,
}

impl fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoundRobin => write!(f, "Round Robin"),
            Self::Random => write!(f, "Random"),
        }
    }
}

impl FromStr for ReplacementPolicy {
    type Err = ConfigError;

    /// Parses the trace-tool spellings `RR` and `RND`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RR" => Ok(Self::RoundRobin),
            "RND" => Ok(Self::Random),
            other => Err(ConfigError::UnknownPolicy {
                value: other.to_string(),
            }),
        }
    }
}

/// Cache geometry and policy configuration.
///
/// Validated once before the cache is constructed; the per-access hot path
/// assumes the geometry is well formed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Total cache capacity in kilobytes. Power of two in
    /// [`defaults::MIN_CACHE_SIZE_KB`, `defaults::MAX_CACHE_SIZE_KB`].
    pub size_kb: u32,
    /// Block (line) size in bytes. Power of two in
    /// [`defaults::MIN_BLOCK_SIZE`, `defaults::MAX_BLOCK_SIZE`].
    pub block_size: u32,
    /// Ways per set. Power of two in [1, `defaults::MAX_ASSOCIATIVITY`].
    pub associativity: u32,
    /// Block-replacement policy.
    pub policy: ReplacementPolicy,
    /// Seed for the random replacement policy.
    pub seed: u64,
}

impl Default for CacheConfig {
    /// Returns the reference configuration: 8 KB, 8-byte blocks,
    /// direct-mapped, round-robin.
    fn default() -> Self {
        Self {
            size_kb: defaults::CACHE_SIZE_KB,
            block_size: defaults::BLOCK_SIZE,
            associativity: defaults::ASSOCIATIVITY,
            policy: ReplacementPolicy::default(),
            seed: crate::common::rng::DEFAULT_SEED,
        }
    }
}

impl CacheConfig {
    /// Checks the documented geometry constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any parameter is outside its documented
    /// range, is not a power of two, or if the resulting block count does not
    /// divide evenly across the ways.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pow2_range(
            "cache size (KB)",
            u64::from(self.size_kb),
            u64::from(defaults::MIN_CACHE_SIZE_KB),
            u64::from(defaults::MAX_CACHE_SIZE_KB),
        )?;
        check_pow2_range(
            "block size",
            u64::from(self.block_size),
            u64::from(defaults::MIN_BLOCK_SIZE),
            u64::from(defaults::MAX_BLOCK_SIZE),
        )?;
        check_pow2_range(
            "associativity",
            u64::from(self.associativity),
            1,
            u64::from(defaults::MAX_ASSOCIATIVITY),
        )?;

        let num_blocks = self.size_kb * 1024 / self.block_size;
        if num_blocks % self.associativity != 0 {
            return Err(ConfigError::UnevenWays {
                blocks: num_blocks,
                associativity: self.associativity,
            });
        }

        Ok(())
    }

    /// Returns the total cache capacity in bytes.
    pub fn size_bytes(&self) -> u64 {
        u64::from(self.size_kb) * 1024
    }
}

/// Physical memory configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Total physical memory size in bytes. Power of two in
    /// [`defaults::MIN_PHYS_MEM_BYTES`, `defaults::MAX_PHYS_MEM_BYTES`].
    pub size_bytes: u64,
    /// Percentage of physical memory reserved by the system, in [0, 100].
    pub unused_percent: u32,
    /// Seed for the first-touch fill pattern.
    pub seed: u64,
}

impl Default for MemoryConfig {
    /// Returns the reference configuration: 1 GB, nothing reserved.
    fn default() -> Self {
        Self {
            size_bytes: defaults::PHYS_MEM_BYTES,
            unused_percent: defaults::UNUSED_PERCENT,
            seed: crate::common::rng::DEFAULT_SEED,
        }
    }
}

impl MemoryConfig {
    /// Checks the documented physical-memory constraints.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the size is outside its documented range
    /// or not a power of two, or if the reserved percentage exceeds 100.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_pow2_range(
            "physical memory",
            self.size_bytes,
            defaults::MIN_PHYS_MEM_BYTES,
            defaults::MAX_PHYS_MEM_BYTES,
        )?;
        if self.unused_percent > 100 {
            return Err(ConfigError::OutOfRange {
                name: "unused physical memory",
                value: u64::from(self.unused_percent),
                min: 0,
                max: 100,
            });
        }
        Ok(())
    }
}

/// Configuration validation failure.
///
/// Construction-time only: once a cache exists its geometry is immutable and
/// the access path has no recoverable error states.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A geometry parameter is not a power of two.
    #[error("{name} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Human-readable parameter name.
        name: &'static str,
        /// The offending value.
        value: u64,
    },

    /// A parameter is outside its documented range.
    #[error("{name} must be between {min} and {max}, got {value}")]
    OutOfRange {
        /// Human-readable parameter name.
        name: &'static str,
        /// The offending value.
        value: u64,
        /// Smallest accepted value.
        min: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The block count does not divide evenly across the ways.
    #[error("{blocks} blocks cannot be divided evenly across {associativity} ways")]
    UnevenWays {
        /// Total number of blocks implied by size and block size.
        blocks: u32,
        /// Configured associativity.
        associativity: u32,
    },

    /// An unrecognized replacement policy name.
    #[error("unknown replacement policy {value:?} (expected \"RR\" or \"RND\")")]
    UnknownPolicy {
        /// The offending spelling.
        value: String,
    },
}

/// Validates that `value` is a power of two within `[min, max]`.
fn check_pow2_range(
    name: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::OutOfRange {
            name,
            value,
            min,
            max,
        });
    }
    if !value.is_power_of_two() {
        return Err(ConfigError::NotPowerOfTwo { name, value });
    }
    Ok(())
}
