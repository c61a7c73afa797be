//! CPython-compatible Mersenne Twister (MT19937) PRNG
//!
//! This module provides a bit-exact replica of CPython's `random.Random` for
//! deterministic stimulus generation. Operand files produced by the legacy
//! harness were generated with `random.seed(seed)`, so reproducing them means
//! consuming the exact same word stream.
//!
//! # Algorithm
//!
//! - State: 624 x 32-bit words, seeded with `init_by_array` over the 32-bit
//!   little-endian words of `|seed|`
//! - Output: tempered MT19937 words
//! - Integer ranges: rejection sampling on `getrandbits(bit_length(n))`
//!
//! # Example
//!
//! ```rust,ignore
//! use systolic_gemm_harness::stimulus::py_random::PyRandom;
//!
//! let mut rng = PyRandom::new(0);
//! let value = rng.randrange(1, 256);
//! ```

use rand::RngCore;

const N: usize = 624;
const M: usize = 397;

/// CPython-compatible Mersenne Twister
#[derive(Debug, Clone)]
pub struct PyRandom {
    mt: Box<[u32; N]>,
    index: usize,
}

impl PyRandom {
    const MATRIX_A: u32 = 0x9908_b0df;
    const UPPER_MASK: u32 = 0x8000_0000;
    const LOWER_MASK: u32 = 0x7fff_ffff;

    /// Create a generator seeded like `random.seed(seed)` for an int seed.
    ///
    /// CPython seeds from the absolute value, so `-7` and `7` give the same
    /// stream.
    pub fn new(seed: i64) -> Self {
        let magnitude = seed.unsigned_abs();
        let low = magnitude as u32;
        let high = (magnitude >> 32) as u32;
        if high == 0 {
            Self::from_key(&[low])
        } else {
            Self::from_key(&[low, high])
        }
    }

    /// `init_genrand` followed by `init_by_array(key)`.
    fn from_key(key: &[u32]) -> Self {
        let mut mt = Box::new([0u32; N]);
        mt[0] = 19_650_218;
        for i in 1..N {
            mt[i] = 1_812_433_253u32
                .wrapping_mul(mt[i - 1] ^ (mt[i - 1] >> 30))
                .wrapping_add(i as u32);
        }

        let mut i = 1;
        let mut j = 0;
        for _ in 0..N.max(key.len()) {
            mt[i] = (mt[i] ^ (mt[i - 1] ^ (mt[i - 1] >> 30)).wrapping_mul(1_664_525))
                .wrapping_add(key[j])
                .wrapping_add(j as u32);
            i += 1;
            j += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
            if j >= key.len() {
                j = 0;
            }
        }
        for _ in 0..N - 1 {
            mt[i] = (mt[i] ^ (mt[i - 1] ^ (mt[i - 1] >> 30)).wrapping_mul(1_566_083_941))
                .wrapping_sub(i as u32);
            i += 1;
            if i >= N {
                mt[0] = mt[N - 1];
                i = 1;
            }
        }
        mt[0] = 0x8000_0000;

        Self { mt, index: N }
    }

    /// Regenerate the full state block.
    fn twist(&mut self) {
        for kk in 0..N {
            let y = (self.mt[kk] & Self::UPPER_MASK) | (self.mt[(kk + 1) % N] & Self::LOWER_MASK);
            let mag = if y & 1 == 1 { Self::MATRIX_A } else { 0 };
            self.mt[kk] = self.mt[(kk + M) % N] ^ (y >> 1) ^ mag;
        }
        self.index = 0;
    }

    /// Next tempered 32-bit word (`genrand_uint32`).
    pub fn genrand_u32(&mut self) -> u32 {
        if self.index >= N {
            self.twist();
        }
        let mut y = self.mt[self.index];
        self.index += 1;

        y ^= y >> 11;
        y ^= (y << 7) & 0x9d2c_5680;
        y ^= (y << 15) & 0xefc6_0000;
        y ^ (y >> 18)
    }

    /// Equivalent to `getrandbits(k)` for `1 <= k <= 32`.
    pub fn getrandbits(&mut self, k: u32) -> u32 {
        assert!((1..=32).contains(&k), "k must be in 1..=32");
        self.genrand_u32() >> (32 - k)
    }

    /// Uniform integer in `[0, n)`, equivalent to `_randbelow(n)`.
    pub fn below(&mut self, n: u32) -> u32 {
        assert!(n > 0, "n must be positive");
        let k = u32::BITS - n.leading_zeros();
        loop {
            let r = self.getrandbits(k);
            if r < n {
                return r;
            }
        }
    }

    /// Uniform integer in `[start, stop)`, equivalent to `randrange(start, stop)`.
    pub fn randrange(&mut self, start: u32, stop: u32) -> u32 {
        assert!(stop > start, "empty range for randrange");
        start + self.below(stop - start)
    }

    /// Float in `[0.0, 1.0)` with 53 bits of precision, equivalent to `random()`.
    pub fn random(&mut self) -> f64 {
        let a = (self.genrand_u32() >> 5) as f64;
        let b = (self.genrand_u32() >> 6) as f64;
        (a * 67_108_864.0 + b) / 9_007_199_254_740_992.0
    }
}

impl RngCore for PyRandom {
    fn next_u32(&mut self) -> u32 {
        self.genrand_u32()
    }

    /// Low word first, matching `getrandbits(64)`.
    fn next_u64(&mut self) -> u64 {
        let low = self.genrand_u32() as u64;
        let high = self.genrand_u32() as u64;
        (high << 32) | low
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        for chunk in dest.chunks_mut(4) {
            let word = self.genrand_u32().to_le_bytes();
            chunk.copy_from_slice(&word[..chunk.len()]);
        }
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
