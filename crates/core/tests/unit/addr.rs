//! Address Decomposition Unit Tests.
//!
//! Verifies the tag/index/offset split against the geometry contract: the
//! three field widths always sum to 32 bits, and recombining the fields
//! reproduces the original address.

use cachesim_core::common::AddressParts;
use proptest::prelude::*;
use rstest::rstest;

// ──────────────────────────────────────────────────────────
// Field width contract
// ──────────────────────────────────────────────────────────

/// For every accepted geometry, the widths partition the 32-bit address.
#[rstest]
#[case::direct_mapped_8kb(8, 8, 1)]
#[case::two_way_64kb(64, 16, 2)]
#[case::full_range_8mb(8192, 64, 16)]
#[case::four_way_1mb(1024, 32, 4)]
fn field_widths_sum_to_32(#[case] size_kb: u32, #[case] block: u32, #[case] ways: u32) {
    let size_bytes = u64::from(size_kb) * 1024;
    let offset_bits = (u64::from(block)).trailing_zeros();
    let index_bits =
        (size_bytes.trailing_zeros()) - (u64::from(block) * u64::from(ways)).trailing_zeros();

    let parts = AddressParts::decode(0xDEAD_BEEF, index_bits, offset_bits);
    assert_eq!(
        parts.tag_bits() + parts.index_bits() + parts.offset_bits(),
        32
    );
}

// ──────────────────────────────────────────────────────────
// Round-trip law
// ──────────────────────────────────────────────────────────

proptest! {
    /// Recombining (tag * num_sets + index) * block_size + offset
    /// reproduces the address, for any address and a representative
    /// geometry (1024 sets of 8-byte blocks).
    #[test]
    fn recombination_reproduces_address(addr in any::<u32>()) {
        let index_bits = 10;
        let offset_bits = 3;
        let num_sets = 1u32 << index_bits;
        let block_size = 1u32 << offset_bits;

        let parts = AddressParts::decode(addr, index_bits, offset_bits);
        let rebuilt = (parts.tag() * num_sets + parts.index()) * block_size + parts.offset();
        prop_assert_eq!(rebuilt, addr);
    }

    /// Stepping by any amount equals decoding the stepped raw address.
    #[test]
    fn step_matches_fresh_decode(addr in any::<u32>(), step in 0u32..256) {
        let parts = AddressParts::decode(addr, 10, 3);
        prop_assert_eq!(
            parts.step(step),
            AddressParts::decode(addr.wrapping_add(step), 10, 3)
        );
    }
}
