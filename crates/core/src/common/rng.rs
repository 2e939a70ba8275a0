//! Seedable xorshift pseudo-random number generator.
//!
//! The simulator needs randomness in two places: the random replacement
//! policy and the first-touch fill value of physical memory. Neither needs
//! cryptographic quality, but both need to be reproducible so that a run can
//! be replayed exactly from its seed. A 64-bit xorshift generator covers both
//! without pulling in an external RNG crate.

/// Default generator seed used when a configuration supplies none.
pub const DEFAULT_SEED: u64 = 123_456_789;

/// Xorshift64 pseudo-random number generator state.
#[derive(Clone, Debug)]
pub struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    /// Creates a generator from the given seed.
    ///
    /// A zero seed would lock the generator at zero forever, so it is
    /// replaced by [`DEFAULT_SEED`].
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { DEFAULT_SEED } else { seed },
        }
    }

    /// Advances the generator and returns the next 64-bit value.
    pub fn next_value(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Advances the generator and returns a value uniform in `[0, bound)`.
    ///
    /// # Panics
    ///
    /// Panics if `bound` is zero; callers always pass a set's associativity
    /// or a byte range, both of which are at least 1.
    pub fn next_below(&mut self, bound: u64) -> u64 {
        self.next_value() % bound
    }
}

impl Default for XorShift64 {
    /// Returns a generator seeded with [`DEFAULT_SEED`].
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}
