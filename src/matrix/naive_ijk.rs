use crate::error::Result;
use crate::kernels::compute_element;
use crate::matrix::{Matrix, check_product_shapes};

/// Sequential i-j-k multiplication: `a * b` computed on the calling thread.
///
/// This is the textbook triple loop, one dot product per output cell,
/// the same as running a single chunk that covers the whole output. It
/// is the reference the concurrent executors are checked against.
///
/// ```
/// use matmul_tasks::{Matrix, multiply_sequential};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
///
/// let c = multiply_sequential(&a, &b).unwrap();
/// assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
/// ```
pub fn multiply_sequential(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    let mut c = Matrix::zeros(a.rows(), b.cols());
    check_product_shapes(a, b, &c)?;

    for i in 0..a.rows() {
        for j in 0..b.cols() {
            c[(i, j)] = compute_element(a, b, i, j);
        }
    }
    Ok(c)
}
