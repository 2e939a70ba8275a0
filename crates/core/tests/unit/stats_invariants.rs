//! Statistics Accounting Invariants.
//!
//! Drives pseudo-random access sequences through whole caches and checks
//! the identities the counters must satisfy regardless of policy, geometry,
//! or access pattern.

use cachesim_core::common::XorShift64;
use cachesim_core::config::{CacheConfig, MemoryConfig, ReplacementPolicy};
use cachesim_core::{Cache, PhysicalMemory};
use rstest::rstest;

fn driven_cache(policy: ReplacementPolicy, accesses: u32) -> Cache {
    let config = CacheConfig {
        size_kb: 8,
        block_size: 16,
        associativity: 2,
        policy,
        seed: 11,
    };
    let memory = PhysicalMemory::new(&MemoryConfig {
        seed: 11,
        ..MemoryConfig::default()
    });
    let mut cache = Cache::new(&config, memory).unwrap();

    // A mix of reads and writes over a working set a few times the cache
    // size, so both miss kinds and write-backs occur.
    let mut rng = XorShift64::new(99);
    for _ in 0..accesses {
        let addr = (rng.next_below(4 * 8 * 1024)) as u32;
        if rng.next_below(4) == 0 {
            let _ = cache.write(addr, (addr & 0xFF) as u8);
        } else {
            let _ = cache.read(addr);
        }
    }
    cache
}

/// `hits + compulsory + conflict == total accesses`, always.
#[rstest]
#[case::round_robin(ReplacementPolicy::RoundRobin)]
#[case::random(ReplacementPolicy::Random)]
fn accesses_partition_into_hits_and_misses(#[case] policy: ReplacementPolicy) {
    let cache = driven_cache(policy, 10_000);
    let stats = cache.stats();

    assert_eq!(
        stats.hits() + stats.compulsory_misses() + stats.conflict_misses(),
        10_000
    );
    assert_eq!(stats.accesses(), 10_000);
}

/// Hit rate and miss rate always sum to 100% once anything was accessed.
#[rstest]
#[case::round_robin(ReplacementPolicy::RoundRobin)]
#[case::random(ReplacementPolicy::Random)]
fn rates_partition_one_hundred_percent(#[case] policy: ReplacementPolicy) {
    let cache = driven_cache(policy, 2_500);
    let stats = cache.stats();

    assert!(stats.accesses() > 0);
    assert!((stats.hit_rate() + stats.miss_rate() - 100.0).abs() < 1e-9);
}

/// Replacements count exactly the conflict misses: every eviction of
/// resident data is one replacement.
#[rstest]
#[case::round_robin(ReplacementPolicy::RoundRobin)]
#[case::random(ReplacementPolicy::Random)]
fn replacements_match_conflict_misses(#[case] policy: ReplacementPolicy) {
    let cache = driven_cache(policy, 5_000);
    let stats = cache.stats();

    assert!(stats.conflict_misses() > 0, "pattern should thrash");
    assert_eq!(stats.replacements(), stats.conflict_misses());
}

/// Rates are 0 (not NaN, not a crash) before any access, and CPI is NaN
/// before any instruction retires.
#[test]
fn empty_run_edge_cases() {
    let memory = PhysicalMemory::new(&MemoryConfig::default());
    let cache = Cache::new(&CacheConfig::default(), memory).unwrap();
    let stats = cache.stats();

    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.hit_rate(), 0.0);
    assert_eq!(stats.miss_rate(), 0.0);
    assert!(stats.cpi().is_nan());
}

/// Counters serialize to JSON for machine-readable output.
#[test]
fn statistics_serialize_to_json() {
    let cache = driven_cache(ReplacementPolicy::RoundRobin, 100);
    let json = serde_json::to_value(cache.stats()).unwrap();

    assert_eq!(
        json.get("hits").and_then(serde_json::Value::as_u64),
        Some(cache.stats().hits())
    );
    assert!(json.get("cycles").is_some());
}
