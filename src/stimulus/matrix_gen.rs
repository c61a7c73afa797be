//! GEMM Operand Generator - Bit-Exact Legacy Stream
//!
//! Generates the A and B operand matrices for an N-PE array together with the
//! reference product C.
//!
//! Both operands are drawn from ONE seeded stream, A first, then B. B's values
//! therefore depend on how many words A consumed; the draw order must not
//! change or previously recorded operand files stop reproducing.

use ndarray::Array2;

use crate::error::{HarnessError, Result};
use crate::stimulus::py_random::PyRandom;

/// Smallest generated element value (inclusive)
pub const ELEMENT_MIN: u32 = 1;

/// Upper bound of generated element values (exclusive)
pub const ELEMENT_END: u32 = 256;

/// A, B and the reference product `C = A x B`, all row-major N x N.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GemmOperands {
    pub a: Array2<u64>,
    pub b: Array2<u64>,
    pub c: Array2<u64>,
}

impl GemmOperands {
    /// Draw operands for a `num_pes` x `num_pes` array from `seed`.
    pub fn generate(num_pes: usize, seed: i64) -> Result<Self> {
        if num_pes == 0 {
            return Err(HarnessError::InvalidSize(num_pes));
        }

        let mut rng = PyRandom::new(seed);
        let a = draw_matrix(&mut rng, num_pes);
        let b = draw_matrix(&mut rng, num_pes);

        Ok(Self::from_operands(a, b))
    }

    /// Build from explicit operands, computing the reference product.
    pub fn from_operands(a: Array2<u64>, b: Array2<u64>) -> Self {
        let c = a.dot(&b);
        Self { a, b, c }
    }

    /// Side length of the matrices (number of PEs per dimension).
    pub fn num_pes(&self) -> usize {
        self.a.nrows()
    }
}

/// Fill an `n` x `n` matrix in row-major order.
fn draw_matrix(rng: &mut PyRandom, n: usize) -> Array2<u64> {
    Array2::from_shape_fn((n, n), |_| rng.randrange(ELEMENT_MIN, ELEMENT_END) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_known_scenario_2x2_seed_0() {
        let ops = GemmOperands::generate(2, 0).unwrap();
        assert_eq!(ops.a, array![[217u64, 99], [195, 228]]);
        assert_eq!(ops.b, array![[108u64, 11], [67, 248]]);
        assert_eq!(ops.c, array![[30069u64, 26939], [36336, 58689]]);
    }

    #[test]
    fn test_known_scenario_3x3_seed_7() {
        let ops = GemmOperands::generate(3, 7).unwrap();
        assert_eq!(
            ops.a,
            array![[83u64, 243, 39], [102, 167, 13], [19, 211, 138]]
        );
        assert_eq!(ops.b, array![[25u64, 94, 150], [15, 233, 130], [55, 10, 23]]);
        assert_eq!(
            ops.c,
            array![
                [7865u64, 64811, 44937],
                [5770, 48629, 37309],
                [11230, 52329, 33454]
            ]
        );
    }

    #[test]
    fn test_same_seed_same_operands() {
        let first = GemmOperands::generate(8, 1234).unwrap();
        let second = GemmOperands::generate(8, 1234).unwrap();
        assert_eq!(first, second);

        let other = GemmOperands::generate(8, 1235).unwrap();
        assert_ne!(first.a, other.a);
    }

    /// B continues the stream where A stopped.
    #[test]
    fn test_b_follows_a_in_shared_stream() {
        let n = 4;
        let ops = GemmOperands::generate(n, 5).unwrap();

        let mut rng = PyRandom::new(5);
        for _ in 0..n * n {
            rng.randrange(ELEMENT_MIN, ELEMENT_END);
        }
        let expected_b: Vec<u64> = (0..n * n)
            .map(|_| rng.randrange(ELEMENT_MIN, ELEMENT_END) as u64)
            .collect();
        assert_eq!(ops.b.iter().copied().collect::<Vec<_>>(), expected_b);
    }

    #[test]
    fn test_reference_product_over_random_seeds() {
        use crate::data_io::verify_operands;
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut picker = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20 {
            let n = picker.gen_range(1..=12);
            let seed: i64 = picker.r#gen();
            let ops = GemmOperands::generate(n, seed).unwrap();
            assert_eq!(ops, GemmOperands::generate(n, seed).unwrap());
            assert!(verify_operands(&ops).is_ok(), "n={} seed={}", n, seed);
        }
    }

    #[test]
    fn test_value_range() {
        let ops = GemmOperands::generate(16, 99).unwrap();
        for &v in ops.a.iter().chain(ops.b.iter()) {
            assert!((1..=255).contains(&v), "element {} out of range", v);
        }
    }

    #[test]
    fn test_product_matches_naive_loop() {
        let ops = GemmOperands::generate(5, 31).unwrap();
        let n = ops.num_pes();
        for i in 0..n {
            for j in 0..n {
                let expected: u64 = (0..n).map(|k| ops.a[[i, k]] * ops.b[[k, j]]).sum();
                assert_eq!(ops.c[[i, j]], expected);
            }
        }
    }

    #[test]
    fn test_zero_size_rejected() {
        assert!(matches!(
            GemmOperands::generate(0, 0),
            Err(HarnessError::InvalidSize(0))
        ));
    }

    #[test]
    fn test_single_pe() {
        let ops = GemmOperands::generate(1, 0).unwrap();
        assert_eq!(ops.a, array![[217u64]]);
        assert_eq!(ops.b, array![[99u64]]);
        assert_eq!(ops.c, array![[217u64 * 99]]);
    }
}
