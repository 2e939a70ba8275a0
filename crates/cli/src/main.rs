//! Trace-driven cache simulator CLI.
//!
//! This binary wires the simulator core to the command line. It performs:
//! 1. **Flag handling:** Parse cache geometry, policy, and memory flags;
//!    invalid values warn and fall back to the documented defaults rather
//!    than aborting.
//! 2. **Simulation:** Stream every given trace file through one cache
//!    instance, accumulating statistics across files.
//! 3. **Reporting:** Print the parameter/geometry/paging/results report,
//!    plus an optional JSON dump of the counters.

mod report;

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::rng::DEFAULT_SEED;
use cachesim_core::config::{CacheConfig, MemoryConfig, ReplacementPolicy, defaults};
use cachesim_core::{Cache, PhysicalMemory, Simulation};

#[derive(Parser, Debug)]
#[command(
    name = "cachesim",
    author,
    version,
    about = "Trace-driven set-associative cache simulator",
    long_about = "Simulates a set-associative cache over one or more instruction traces.\n\nAll trace files accumulate into a single run. Invalid geometry flags warn\nand fall back to their defaults (8 KB cache, 8-byte blocks, direct mapped,\nround-robin, 1 GB physical memory).\n\nExamples:\n  cachesim -f traces/a.trc\n  cachesim -f a.trc -f b.trc -s 1024 -b 16 -a 4 -r RND\n  cachesim -f a.trc --json"
)]
struct Cli {
    /// Trace file to simulate. May be given more than once.
    #[arg(short = 'f', long = "file", required = true)]
    files: Vec<PathBuf>,

    /// Cache size in KB (power of two, 8 to 8192).
    #[arg(short = 's', long = "cache-size", default_value_t = defaults::CACHE_SIZE_KB)]
    cache_size: u32,

    /// Block size in bytes (power of two, 8 to 64).
    #[arg(short = 'b', long = "block-size", default_value_t = defaults::BLOCK_SIZE)]
    block_size: u32,

    /// Ways per set (power of two, 1 to 16).
    #[arg(short = 'a', long, default_value_t = defaults::ASSOCIATIVITY)]
    associativity: u32,

    /// Replacement policy: RR (round robin) or RND (random).
    #[arg(short = 'r', long = "policy", default_value = "RR")]
    policy: String,

    /// Physical memory size in MB (power of two, 1 to 4096).
    #[arg(short = 'p', long = "phys-mem", default_value_t = 1024)]
    phys_mem_mb: u64,

    /// Percentage of physical memory reserved by the system (0 to 100).
    #[arg(short = 'u', long = "unused", default_value_t = defaults::UNUSED_PERCENT)]
    unused_percent: u32,

    /// Instructions per time slice; -1 disables slicing. Reported only.
    #[arg(short = 'n', long = "slice", default_value_t = -1, allow_hyphen_values = true)]
    time_slice: i64,

    /// Seed for the random policy and the memory fill pattern.
    #[arg(long, default_value_t = DEFAULT_SEED)]
    seed: u64,

    /// Additionally dump the statistics counters as JSON.
    #[arg(long)]
    json: bool,
}

fn main() {
    // Diagnostics go to stderr so the report on stdout stays clean.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let policy = cli.policy.parse::<ReplacementPolicy>().unwrap_or_else(|_| {
        warn!(
            "replacement policy must be \"RR\" or \"RND\", not \"{}\"; using RR",
            cli.policy
        );
        ReplacementPolicy::RoundRobin
    });

    let cache_config = CacheConfig {
        size_kb: check_pow2(
            "cache size (KB)",
            u64::from(cli.cache_size),
            u64::from(defaults::MIN_CACHE_SIZE_KB),
            u64::from(defaults::MAX_CACHE_SIZE_KB),
            u64::from(defaults::CACHE_SIZE_KB),
        ) as u32,
        block_size: check_pow2(
            "block size",
            u64::from(cli.block_size),
            u64::from(defaults::MIN_BLOCK_SIZE),
            u64::from(defaults::MAX_BLOCK_SIZE),
            u64::from(defaults::BLOCK_SIZE),
        ) as u32,
        associativity: check_pow2(
            "associativity",
            u64::from(cli.associativity),
            1,
            u64::from(defaults::MAX_ASSOCIATIVITY),
            u64::from(defaults::ASSOCIATIVITY),
        ) as u32,
        policy,
        seed: cli.seed,
    };

    let memory_config = MemoryConfig {
        size_bytes: check_pow2(
            "physical memory",
            cli.phys_mem_mb.saturating_mul(1024 * 1024),
            defaults::MIN_PHYS_MEM_BYTES,
            defaults::MAX_PHYS_MEM_BYTES,
            defaults::PHYS_MEM_BYTES,
        ),
        unused_percent: check_range(
            "unused physical memory",
            u64::from(cli.unused_percent),
            0,
            100,
            u64::from(defaults::UNUSED_PERCENT),
        ) as u32,
        seed: cli.seed,
    };

    let memory = PhysicalMemory::new(&memory_config);
    let cache = match Cache::new(&cache_config, memory) {
        Ok(cache) => cache,
        Err(err) => {
            eprintln!("Error: {err}");
            process::exit(1);
        }
    };

    let mut sim = Simulation::new(cache);
    for path in &cli.files {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) => {
                eprintln!("Could not read the trace file \"{}\": {err}", path.display());
                process::exit(1);
            }
        };
        if let Err(err) = sim.run(BufReader::new(file)) {
            eprintln!("Error in trace file \"{}\": {err}", path.display());
            process::exit(1);
        }
    }
    sim.finish();

    print!(
        "{}",
        report::render(sim.cache(), policy, cli.time_slice, &cli.files)
    );

    if cli.json {
        match serde_json::to_string_pretty(sim.cache().stats()) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("Could not serialize statistics: {err}");
                process::exit(1);
            }
        }
    }
}

/// Range check in the trace tool's warn-and-substitute style: out-of-range
/// values fall back to `fallback` instead of aborting the run.
fn check_range(name: &str, value: u64, min: u64, max: u64, fallback: u64) -> u64 {
    if value < min || value > max {
        warn!("{name} must be between {min} and {max}, not {value}; using {fallback}");
        return fallback;
    }
    value
}

/// [`check_range`] plus a power-of-two requirement.
fn check_pow2(name: &str, value: u64, min: u64, max: u64, fallback: u64) -> u64 {
    let value = check_range(name, value, min, max, fallback);
    if !value.is_power_of_two() {
        warn!("{name} must be a power of two, not {value}; using {fallback}");
        return fallback;
    }
    value
}
