//! End-to-End Trace File Tests.
//!
//! Writes small trace files to disk and drives them through the simulation
//! driver, checking the accumulated statistics.

use std::fs::File;
use std::io::{BufReader, Write as _};

use cachesim_core::config::{CacheConfig, MemoryConfig};
use cachesim_core::{Cache, PhysicalMemory, Simulation};
use tempfile::NamedTempFile;

fn simulation() -> Simulation {
    let memory = PhysicalMemory::new(&MemoryConfig::default());
    let cache = Cache::new(&CacheConfig::default(), memory).unwrap();
    Simulation::new(cache)
}

fn write_trace(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn two_instruction_trace() {
    let trace = write_trace(concat!(
        "EIP (03): 00000100 a3 05 14\n",
        "dstM: 00001000 000000aa  srcM: 00002000 00000001\n",
        "\n",
        "EIP (02): 00000103 0f 1a\n",
        "dstM: 00000000 --------  srcM: 00000000 --------\n",
        "\n",
    ));

    let mut sim = simulation();
    sim.run(BufReader::new(File::open(trace.path()).unwrap()))
        .unwrap();
    sim.finish();

    let stats = sim.cache().stats();
    // Fetch + write + read, then a fetch hitting the first fetch's block.
    assert_eq!(stats.accesses(), 4);
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.misses(), 3);
    assert_eq!(stats.instructions(), 2);
    // 3 + 4 + 4 fetch/data bytes, then 2 more fetch bytes.
    assert_eq!(stats.bytes_read(), 13);
}

#[test]
fn statistics_accumulate_across_files() {
    let first = write_trace("EIP (02): 00000100 0f 1a\n\n");
    let second = write_trace("EIP (02): 00000100 0f 1a\n\n");

    let mut sim = simulation();
    for trace in [&first, &second] {
        sim.run(BufReader::new(File::open(trace.path()).unwrap()))
            .unwrap();
    }
    sim.finish();

    let stats = sim.cache().stats();
    assert_eq!(stats.accesses(), 2);
    assert_eq!(stats.hits(), 1);
    assert_eq!(stats.instructions(), 2);
}

#[test]
fn parse_error_preserves_prior_accounting() {
    let trace = write_trace("EIP (02): 00000100 0f 1a\nnot a trace line\n");

    let mut sim = simulation();
    let result = sim.run(BufReader::new(File::open(trace.path()).unwrap()));

    assert!(result.is_err());
    assert_eq!(sim.cache().stats().accesses(), 1);
}
