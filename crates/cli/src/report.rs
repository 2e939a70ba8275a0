//! Plain-text run report.
//!
//! Renders the four report sections in order: input parameters, calculated
//! geometry values, physical-memory paging figures, and the simulation
//! results. All figures come from the finished cache; nothing here mutates
//! the simulation.

use std::path::{Path, PathBuf};

use cachesim_core::Cache;
use cachesim_core::config::ReplacementPolicy;

/// Hardware cost per implementation kilobyte, in dollars.
const COST_PER_KB: f64 = 0.15;

/// Renders the full report for a finished run.
pub fn render(cache: &Cache, policy: ReplacementPolicy, time_slice: i64, files: &[PathBuf]) -> String {
    let mut out = String::from("Cache Simulator\n\n");

    for path in files {
        out.push_str(&format!("Trace file: {}\n", file_name(path)));
    }
    out.push('\n');

    out.push_str(&input_parameters(cache, policy, time_slice));
    out.push_str(&calculated_values(cache));
    out.push_str(&paging_calculations(cache, files.len() as u64));
    out.push_str(&simulation_results(cache));
    out
}

fn input_parameters(cache: &Cache, policy: ReplacementPolicy, time_slice: i64) -> String {
    format!(
        "***** Cache Input Parameters *****\n\
         Cache Size:                     {} KB\n\
         Block Size:                     {} bytes\n\
         Associativity:                  {}\n\
         Replacement Policy:             {}\n\
         Physical Memory:                {} MB\n\
         Percent Memory Used by System:  {}%\n\
         Instructions / Time Slice:      {}\n\n",
        cache.size_kb(),
        cache.block_size(),
        cache.associativity(),
        policy,
        cache.memory().size_bytes() / (1024 * 1024),
        cache.memory().unused_percent(),
        time_slice,
    )
}

fn calculated_values(cache: &Cache) -> String {
    format!(
        "***** Cache Calculated Values *****\n\
         Total # Blocks:                 {}\n\
         Tag Size:                       {} bits\n\
         Index Size:                     {} bits\n\
         Total # Rows:                   {}\n\
         Overhead Size:                  {} bytes\n\
         Implementation Memory Size:     {:.2} KB ({} bytes)\n\
         Cost:                           ${:.2} @ (${COST_PER_KB:.2} / KB)\n\n",
        cache.num_blocks(),
        cache.tag_bits(),
        cache.index_bits(),
        cache.num_sets(),
        cache.overhead_size(),
        cache.implementation_size_kb(),
        cache.implementation_size(),
        cache.implementation_size_kb() * COST_PER_KB,
    )
}

fn paging_calculations(cache: &Cache, trace_count: u64) -> String {
    let memory = cache.memory();
    format!(
        "***** Physical Memory Calculations *****\n\
         Number of Physical Pages:       {}\n\
         Number of Pages for System:     {}\n\
         Size of Page Table Entry:       {} bits\n\
         Total RAM for Page Table(s):    {} bytes\n\n",
        memory.num_pages(),
        memory.num_system_pages(),
        memory.page_table_bits(),
        memory.page_table_ram(trace_count.max(1)),
    )
}

fn simulation_results(cache: &Cache) -> String {
    let stats = cache.stats();
    format!(
        "***** CACHE SIMULATION RESULTS *****\n\
         Total Cache Accesses:           {}\n\
         Total Bytes Read:               {}\n\
         Cache Hits:                     {}\n\
         Cache Misses:                   {}\n\
         --- Compulsory Misses:          {}\n\
         --- Conflict Misses:            {}\n\
         Replacements:                   {}\n\
         Unused Cache Blocks:            {} / {}\n\n\
         ***** CACHE HIT & MISS RATE *****\n\
         Hit Rate:                       {:.4}%\n\
         Miss Rate:                      {:.4}%\n\
         CPI:                            {:.2} Cycles/Instruction\n",
        stats.accesses(),
        stats.bytes_read(),
        stats.hits(),
        stats.misses(),
        stats.compulsory_misses(),
        stats.conflict_misses(),
        stats.replacements(),
        stats.unused_blocks(),
        cache.num_blocks(),
        stats.hit_rate(),
        stats.miss_rate(),
        stats.cpi(),
    )
}

fn file_name(path: &Path) -> String {
    path.file_name().map_or_else(
        || path.display().to_string(),
        |name| name.to_string_lossy().into_owned(),
    )
}
