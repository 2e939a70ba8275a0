//! Small arithmetic helpers for geometry derivation.

/// Returns `ceil(log2(value))`, with `log2_ceil(0) == 0` and
/// `log2_ceil(1) == 0`.
///
/// Cache geometry only ever calls this with powers of two, where the result
/// is the exact base-2 logarithm; the paging metrics also use the ceiling
/// behavior for non-power-of-two page counts.
pub fn log2_ceil(value: u64) -> u32 {
    match value {
        0 | 1 => 0,
        v => 64 - (v - 1).leading_zeros(),
    }
}
