//! Dense integer matrices and shape checks.
//!
//! `Matrix` is row-major: element `(r, c)` lives at `data[r * cols + c]`,
//! which is also the flattened index the partitioner hands out. That
//! makes every chunk a contiguous slice of the output buffer.

pub mod naive_ijk;
pub mod random;

use std::ops::{Index, IndexMut};

use crate::error::{MatmulError, Result};

/// Integer type of every matrix cell.
///
/// Products and sums wrap on overflow (two's complement), in debug and
/// release builds alike.
pub type Element = i32;

/// A `rows × cols` grid of [`Element`]s stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Element>,
}

impl Matrix {
    /// A matrix with every cell set to zero.
    ///
    /// # Panics
    ///
    /// Panics if `rows * cols` overflows `usize`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Matrix {
            rows,
            cols,
            data: vec![0; cell_count(rows, cols)],
        }
    }

    /// Build a matrix from row vectors.
    ///
    /// All rows must have the same length. An empty outer vector gives a
    /// `0 × 0` matrix.
    ///
    /// ```
    /// use matmul_tasks::Matrix;
    ///
    /// let m = Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
    /// assert_eq!((m.rows(), m.cols()), (2, 3));
    /// assert_eq!(m[(1, 2)], 6);
    /// ```
    pub fn from_rows(rows: Vec<Vec<Element>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(MatmulError::RaggedRows {
                    row: r,
                    len: row.len(),
                    expected: cols,
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Wrap an existing row-major buffer.
    ///
    /// # Errors
    ///
    /// [`MatmulError::DataLength`] if `data.len() != rows * cols`,
    /// including when `rows * cols` does not fit in `usize`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<Element>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(MatmulError::DataLength {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells (`rows * cols`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cell `(row, col)`.
    ///
    /// # Panics
    ///
    /// Panics if `row >= rows()` or `col >= cols()`.
    pub fn get(&self, row: usize, col: usize) -> Element {
        self[(row, col)]
    }

    /// Row `row` as a slice of length `cols()`.
    pub fn row(&self, row: usize) -> &[Element] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }

    /// The row-major backing buffer.
    pub fn as_slice(&self) -> &[Element] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [Element] {
        &mut self.data
    }

    /// Move the backing buffer out, leaving the matrix empty until
    /// [`Matrix::restore_data`] puts a buffer of the right length back.
    pub(crate) fn take_data(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.data)
    }

    pub(crate) fn restore_data(&mut self, data: Vec<Element>) {
        debug_assert_eq!(data.len(), self.rows * self.cols);
        self.data = data;
    }

    /// Copy out as nested row vectors.
    pub fn to_rows(&self) -> Vec<Vec<Element>> {
        (0..self.rows).map(|r| self.row(r).to_vec()).collect()
    }

    fn offset(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        row * self.cols + col
    }
}

/// `rows * cols`, panicking instead of wrapping on overflow.
pub(crate) fn cell_count(rows: usize, cols: usize) -> usize {
    rows.checked_mul(cols)
        .unwrap_or_else(|| panic!("{}x{} matrix has too many cells", rows, cols))
}

impl Index<(usize, usize)> for Matrix {
    type Output = Element;

    fn index(&self, (row, col): (usize, usize)) -> &Element {
        &self.data[self.offset(row, col)]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut Element {
        let offset = self.offset(row, col);
        &mut self.data[offset]
    }
}

/// Check that `c = a * b` is well formed: `a.cols == b.rows` and `c` is
/// `a.rows × b.cols`.
pub fn check_product_shapes(a: &Matrix, b: &Matrix, c: &Matrix) -> Result<()> {
    if a.cols() != b.rows() {
        return Err(MatmulError::DimensionMismatch {
            m: a.rows(),
            k: a.cols(),
            k2: b.rows(),
            n: b.cols(),
        });
    }
    if c.rows() != a.rows() || c.cols() != b.cols() {
        return Err(MatmulError::OutputShapeMismatch {
            expected_rows: a.rows(),
            expected_cols: b.cols(),
            rows: c.rows(),
            cols: c.cols(),
        });
    }
    Ok(())
}
