//! Address decomposition into tag, index, and offset fields.
//!
//! Every cache access starts by splitting a 32-bit address into three
//! bit-fields: the block offset (low bits), the set index (middle bits), and
//! the tag (everything above). The field widths are fixed by the cache
//! geometry at construction time, so a decoded address carries them along and
//! can re-decode neighbouring addresses with the same widths.

/// A 32-bit address decomposed into tag, index, and offset fields.
///
/// The decomposition is pure and total: any address and any pair of field
/// widths summing to at most 32 bits produce a valid result. The original
/// address is retained so that byte-stepping can re-decode rather than
/// adjust fields component-wise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressParts {
    address: u32,
    tag: u32,
    index: u32,
    offset: u32,
    index_bits: u32,
    offset_bits: u32,
}

impl AddressParts {
    /// Decomposes `address` using the given field widths.
    ///
    /// # Arguments
    ///
    /// * `address` - The raw 32-bit address.
    /// * `index_bits` - Width of the set-index field.
    /// * `offset_bits` - Width of the block-offset field.
    ///
    /// # Returns
    ///
    /// The decomposed address. The tag occupies the remaining
    /// `32 - index_bits - offset_bits` high bits.
    pub fn decode(address: u32, index_bits: u32, offset_bits: u32) -> Self {
        let tag = address
            .checked_shr(index_bits + offset_bits)
            .unwrap_or(0);
        let index = address.checked_shr(offset_bits).unwrap_or(0) & mask(index_bits);
        let offset = address & mask(offset_bits);

        Self {
            address,
            tag,
            index,
            offset,
            index_bits,
            offset_bits,
        }
    }

    /// Re-decodes this address advanced by `step` bytes.
    ///
    /// The step is applied to the raw address and the result is decoded with
    /// the same field widths, so a step that crosses an offset boundary rolls
    /// over into the index and tag fields. Used to walk all bytes of a block.
    pub fn step(&self, step: u32) -> Self {
        Self::decode(self.address.wrapping_add(step), self.index_bits, self.offset_bits)
    }

    /// Returns the raw 32-bit address.
    #[inline(always)]
    pub fn address(&self) -> u32 {
        self.address
    }

    /// Returns the tag field (high bits).
    #[inline(always)]
    pub fn tag(&self) -> u32 {
        self.tag
    }

    /// Returns the set-index field (middle bits).
    #[inline(always)]
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Returns the block-offset field (low bits).
    #[inline(always)]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Returns the width of the set-index field in bits.
    #[inline(always)]
    pub fn index_bits(&self) -> u32 {
        self.index_bits
    }

    /// Returns the width of the block-offset field in bits.
    #[inline(always)]
    pub fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Returns the width of the tag field in bits.
    ///
    /// For every geometry the cache accepts,
    /// `tag_bits + index_bits + offset_bits == 32`.
    #[inline(always)]
    pub fn tag_bits(&self) -> u32 {
        32 - self.index_bits - self.offset_bits
    }
}

/// Returns a mask covering the low `bits` bits.
fn mask(bits: u32) -> u32 {
    1u32.checked_shl(bits).map_or(u32::MAX, |m| m.wrapping_sub(1))
}
