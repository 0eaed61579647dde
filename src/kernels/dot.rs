use crate::matrix::{Element, Matrix};

/// Compute `C[row][col] = Σ A[row][i] * B[i][col]` for `i` in `0..A.cols`.
///
/// Multiplication and accumulation wrap on overflow, so the result is the
/// exact sum reduced modulo 2³² as a two's-complement `i32`. Inputs from
/// [`Matrix::random`] stay far away from that: each product is below 100,
/// so `k` would have to exceed ~21 million before a cell could wrap.
///
/// Preconditions (checked in debug builds only): `row < a.rows()`,
/// `col < b.cols()`, `a.cols() == b.rows()`.
///
/// ```
/// use matmul_tasks::{Matrix, compute_element};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// assert_eq!(compute_element(&a, &b, 1, 0), 43);
/// ```
#[inline]
pub fn compute_element(a: &Matrix, b: &Matrix, row: usize, col: usize) -> Element {
    debug_assert_eq!(a.cols(), b.rows(), "inner dimensions differ");
    debug_assert!(row < a.rows() && col < b.cols());

    let n = b.cols();
    let b_data = b.as_slice();

    a.row(row)
        .iter()
        .enumerate()
        .fold(0, |sum: Element, (i, &x)| {
            sum.wrapping_add(x.wrapping_mul(b_data[i * n + col]))
        })
}
