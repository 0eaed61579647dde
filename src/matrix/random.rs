use rand::Rng;

use crate::matrix::{Element, Matrix, cell_count};

/// Exclusive upper bound of the values [`Matrix::random`] produces.
pub const RANDOM_VALUE_BOUND: Element = 10;

impl Matrix {
    /// A `rows × cols` matrix with cells drawn uniformly from `[0, 10)`.
    ///
    /// Pass a seeded generator for reproducible inputs:
    ///
    /// ```
    /// use matmul_tasks::Matrix;
    /// use rand::SeedableRng;
    /// use rand::rngs::StdRng;
    ///
    /// let a = Matrix::random(4, 3, &mut StdRng::seed_from_u64(7));
    /// let b = Matrix::random(4, 3, &mut StdRng::seed_from_u64(7));
    /// assert_eq!(a, b);
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn random<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Self {
        let data = (0..cell_count(rows, cols))
            .map(|_| rng.gen_range(0..RANDOM_VALUE_BOUND))
            .collect();
        Matrix { rows, cols, data }
    }
}
