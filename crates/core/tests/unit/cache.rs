//! Cache Unit Tests.
//!
//! Verifies geometry derivation, the hit/miss protocol, round-robin and
//! random eviction behavior, and dirty-block write-back integrity against
//! the backing physical memory.

use cachesim_core::config::{CacheConfig, MemoryConfig, ReplacementPolicy};
use cachesim_core::{Cache, PhysicalMemory};
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Builds a cache with the given geometry over a fresh 1 GB memory.
fn build_cache(size_kb: u32, block_size: u32, associativity: u32, policy: ReplacementPolicy) -> Cache {
    let config = CacheConfig {
        size_kb,
        block_size,
        associativity,
        policy,
        seed: 7,
    };
    let memory = PhysicalMemory::new(&MemoryConfig {
        seed: 7,
        ..MemoryConfig::default()
    });
    Cache::new(&config, memory).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Geometry derivation
// ══════════════════════════════════════════════════════════

/// Derived values for the reference configuration (8 KB, 8-byte blocks,
/// direct mapped): 1024 blocks, 1024 sets, 19/10/3 bit split.
#[test]
fn reference_geometry() {
    let cache = build_cache(8, 8, 1, ReplacementPolicy::RoundRobin);

    assert_eq!(cache.num_blocks(), 1024);
    assert_eq!(cache.num_sets(), 1024);
    assert_eq!(cache.offset_bits(), 3);
    assert_eq!(cache.index_bits(), 10);
    assert_eq!(cache.tag_bits(), 19);

    // 8192 payload bytes + 2^19 tag bytes + 1024 status bytes.
    assert_eq!(cache.implementation_size(), 8192 + 524_288 + 1024);
    assert_eq!(cache.overhead_size(), 524_288 + 1024);
    assert!((cache.implementation_size_kb() - 521.0).abs() < 1e-9);
}

#[rstest]
#[case::two_way(64, 16, 2, 2048, 11, 4)]
#[case::sixteen_way(8192, 64, 16, 8192, 13, 6)]
fn geometry_across_configurations(
    #[case] size_kb: u32,
    #[case] block: u32,
    #[case] ways: u32,
    #[case] num_sets: u32,
    #[case] index_bits: u32,
    #[case] offset_bits: u32,
) {
    let cache = build_cache(size_kb, block, ways, ReplacementPolicy::RoundRobin);
    assert_eq!(cache.num_sets(), num_sets);
    assert_eq!(cache.index_bits(), index_bits);
    assert_eq!(cache.offset_bits(), offset_bits);
    assert_eq!(
        cache.tag_bits() + cache.index_bits() + cache.offset_bits(),
        32
    );
}

/// Invalid geometry is rejected at construction.
#[test]
fn invalid_geometry_is_rejected() {
    let config = CacheConfig {
        block_size: 7,
        ..CacheConfig::default()
    };
    let memory = PhysicalMemory::new(&MemoryConfig::default());
    assert!(Cache::new(&config, memory).is_err());
}

// ══════════════════════════════════════════════════════════
// 2. Hit/miss protocol
// ══════════════════════════════════════════════════════════

/// Repeated access to one address: exactly 1 miss, then N-1 hits.
#[rstest]
#[case::round_robin(ReplacementPolicy::RoundRobin)]
#[case::random(ReplacementPolicy::Random)]
fn repeated_access_misses_once(#[case] policy: ReplacementPolicy) {
    let mut cache = build_cache(8, 8, 2, policy);

    assert!(!cache.read(0x4000));
    for _ in 0..9 {
        assert!(cache.read(0x4000));
    }

    let stats = cache.stats();
    assert_eq!(stats.misses(), 1);
    assert_eq!(stats.hits(), 9);
}

/// Different offsets within one block all hit after the first fill.
#[test]
fn same_block_different_offsets_hit() {
    let mut cache = build_cache(8, 8, 1, ReplacementPolicy::RoundRobin);

    assert!(!cache.read(0x100));
    for offset in 1..8 {
        assert!(cache.read(0x100 + offset), "offset {offset} should hit");
    }
}

/// Classic direct-mapped conflict: stride equal to the cache size maps to
/// the same set with a different tag, evicting on every access.
#[test]
fn direct_mapped_conflict_pattern() {
    let mut cache = build_cache(8, 8, 1, ReplacementPolicy::RoundRobin);

    assert!(!cache.read(0x0000_0000));
    assert!(!cache.read(0x0000_2000));
    assert!(!cache.read(0x0000_0000));

    let stats = cache.stats();
    assert_eq!(stats.hits(), 0);
    assert_eq!(stats.compulsory_misses(), 1);
    assert_eq!(stats.conflict_misses(), 2);
    assert_eq!(stats.replacements(), 2);
}

/// A 2-way set absorbs the same pattern without conflict.
#[test]
fn two_way_set_absorbs_stride_pair() {
    let mut cache = build_cache(8, 8, 2, ReplacementPolicy::RoundRobin);

    assert!(!cache.read(0x0000_0000));
    assert!(!cache.read(0x0000_1000)); // same set, second way
    assert!(cache.read(0x0000_0000));
    assert!(cache.read(0x0000_1000));

    assert_eq!(cache.stats().conflict_misses(), 0);
}

// ══════════════════════════════════════════════════════════
// 3. Eviction and residency invariants
// ══════════════════════════════════════════════════════════

/// No two resident blocks in a set ever share a tag, for either policy.
#[rstest]
#[case::round_robin(ReplacementPolicy::RoundRobin)]
#[case::random(ReplacementPolicy::Random)]
fn one_resident_block_per_tag(#[case] policy: ReplacementPolicy) {
    let mut cache = build_cache(8, 8, 4, policy);

    // Hammer one set with more tags than ways, revisiting old tags.
    for round in 0..8u32 {
        for tag in 0..6u32 {
            let _ = cache.read(tag * 0x2000 + (round % 8));
        }
    }

    for set in cache.sets() {
        let mut tags: Vec<u32> = set
            .blocks()
            .iter()
            .filter(|b| b.is_valid())
            .map(|b| b.tag())
            .collect();
        tags.sort_unstable();
        let before = tags.len();
        tags.dedup();
        assert_eq!(tags.len(), before, "duplicate resident tag in a set");
    }
}

/// Round-robin never evicts resident data while an empty way exists: filling
/// `ways` distinct tags in one set produces only compulsory misses.
#[test]
fn round_robin_fills_empty_ways_first() {
    let mut cache = build_cache(8, 8, 4, ReplacementPolicy::RoundRobin);

    for tag in 0..4u32 {
        assert!(!cache.read(tag * 0x2000));
    }

    let stats = cache.stats();
    assert_eq!(stats.compulsory_misses(), 4);
    assert_eq!(stats.conflict_misses(), 0);

    // All four tags still resident.
    for tag in 0..4u32 {
        assert!(cache.read(tag * 0x2000));
    }
}

/// Round-robin evicts the oldest first touch once the set is full.
#[test]
fn round_robin_evicts_oldest_first_touch() {
    let mut cache = build_cache(8, 8, 2, ReplacementPolicy::RoundRobin);

    let _ = cache.read(0x0000); // tag 0, touched first
    let _ = cache.read(0x2000); // tag 1
    let _ = cache.read(0x4000); // tag 2 evicts tag 0

    assert!(!cache.read(0x0000), "oldest tag should have been evicted");
    assert!(cache.read(0x4000), "newest tag should survive");
}

// ══════════════════════════════════════════════════════════
// 4. Write-back integrity
// ══════════════════════════════════════════════════════════

/// A dirty block's eviction writes its bytes back to physical memory at the
/// reconstructed address; nothing is lost.
#[test]
fn dirty_eviction_writes_back_to_memory() {
    let mut cache = build_cache(8, 8, 1, ReplacementPolicy::RoundRobin);

    // Write two bytes into the block at address 0x18 (set 3, tag 0).
    let _ = cache.write(0x18, 0xAB);
    let _ = cache.write(0x19, 0xCD);

    // Evict it with the conflicting tag (stride = cache size).
    let _ = cache.read(0x2018);

    assert_eq!(cache.memory().peek(0x18), Some(0xAB));
    assert_eq!(cache.memory().peek(0x19), Some(0xCD));
    // The whole 8-byte line was written back.
    for offset in 0..8u32 {
        assert!(
            cache.memory().peek(0x18 & !0x7 | offset).is_some(),
            "byte {offset} of the evicted line missing from memory"
        );
    }

    // Reloading the evicted line observes the written data.
    assert!(!cache.read(0x18));
    assert_eq!(cache.memory().peek(0x18), Some(0xAB));
}

/// A clean eviction writes nothing back.
#[test]
fn clean_eviction_skips_write_back() {
    let mut cache = build_cache(8, 8, 1, ReplacementPolicy::RoundRobin);

    let _ = cache.read(0x18);
    let materialized = cache.memory().peek(0x18);

    let _ = cache.read(0x2018);
    assert_eq!(cache.memory().peek(0x18), materialized);
}

// ══════════════════════════════════════════════════════════
// 5. End-of-run occupancy
// ══════════════════════════════════════════════════════════

/// Finalizing tallies the ways that never held data.
#[test]
fn finalize_counts_unused_blocks() {
    let mut cache = build_cache(8, 8, 1, ReplacementPolicy::RoundRobin);

    let _ = cache.read(0x0);
    let _ = cache.read(0x8);
    cache.finalize_run();

    // 1024 blocks, 2 filled.
    assert_eq!(cache.stats().unused_blocks(), 1022);
}
