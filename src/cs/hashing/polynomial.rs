//! # Polynomial Key Hash
//!
//! The key hash used by [`ChainedTable`](super::chained::ChainedTable): an order-sensitive
//! polynomial accumulator over the key's bytes. For a key `c_1 c_2 ... c_n` the hash is
//!
//! `c_1 * 3 + c_2 * 3^2 + ... + c_n * 3^n`
//!
//! computed with wrapping 64-bit arithmetic. Unlike the rolling hash it is derived from,
//! the weight *grows* with the position, so the accumulator can be fed front to back
//! without ever multiplying the running sum.
//!
//! **Note**: this is a plain bucket-selection hash. It is neither collision resistant nor
//! seeded; two different keys may land in the same bucket, which chaining handles.

/// Multiplier applied to the positional weight before every byte.
pub const DEFAULT_FACTOR: u64 = 3;

/// Streaming state of the polynomial key hash.
#[derive(Debug, Clone)]
pub struct PolynomialKeyHash {
    factor: u64,
    /// Weight of the most recently fed byte (`factor^len`).
    weight: u64,
    sum: u64,
}

impl Default for PolynomialKeyHash {
    fn default() -> Self {
        Self::with_factor(DEFAULT_FACTOR)
    }
}

impl PolynomialKeyHash {
    /// Creates an empty hash state with the default factor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty hash state with a custom multiplier.
    pub fn with_factor(factor: u64) -> Self {
        Self {
            factor,
            weight: 1,
            sum: 0,
        }
    }

    /// Feeds one byte. The weight is advanced *before* it is applied.
    pub fn update(&mut self, byte: u8) {
        self.weight = self.weight.wrapping_mul(self.factor);
        self.sum = self.sum.wrapping_add(u64::from(byte).wrapping_mul(self.weight));
    }

    /// Feeds a whole slice, first byte to last.
    pub fn hash_slice(&mut self, data: &[u8]) {
        for &b in data {
            self.update(b);
        }
    }

    /// Returns the accumulated hash.
    pub fn finish(&self) -> u64 {
        self.sum
    }
}

/// Hashes a key in one shot with the default factor.
#[inline]
pub fn hash_key(key: &str) -> u64 {
    let mut state = PolynomialKeyHash::new();
    state.hash_slice(key.as_bytes());
    state.finish()
}

/// Maps a hash onto a bucket of a power-of-two sized array.
#[inline]
pub fn bucket_index(hash: u64, capacity: usize) -> usize {
    debug_assert!(capacity.is_power_of_two());
    (hash as usize) & (capacity - 1)
}
