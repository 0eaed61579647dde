//! Splitting the flattened output index space into contiguous chunks.
//!
//! The output `C` has `m * n` cells. Flattened index `idx` maps to
//! `row = idx / n`, `col = idx % n`, i.e. plain row-major order. The
//! partitioner cuts `[0, m * n)` into exactly `num_tasks` half-open
//! ranges of `floor(total / num_tasks)` cells each; the last range also
//! takes the remainder.
//!
//! With 10 cells and 3 tasks that gives `[0,3) [3,6) [6,10)`. The last
//! chunk can be up to `num_tasks - 1` cells larger than the others. That
//! imbalance is kept as is: spreading the remainder would change which
//! cells each task owns.

use std::ops::Range;

use tracing::debug;

use crate::error::{MatmulError, Result};

/// Half-open range `[start, end)` of flattened output indices owned by
/// one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Chunk {
    pub start: usize,
    pub end: usize,
}

impl Chunk {
    pub fn new(start: usize, end: usize) -> Self {
        Chunk { start, end }
    }

    /// Number of cells; zero when `start >= end`.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// `(row, col)` of every cell in the chunk, in index order, for an
    /// output with `cols` columns.
    ///
    /// The iterator panics like [`coordinates`] if `cols == 0` and the
    /// chunk is not empty.
    pub fn cells(self, cols: usize) -> impl Iterator<Item = (usize, usize)> {
        self.range().map(move |idx| coordinates(idx, cols))
    }
}

/// Map flattened index `idx` to `(row, col)` in a grid with `cols` columns.
///
/// # Panics
///
/// Panics if `cols == 0`: a grid without columns has no cells to map to.
#[inline]
pub fn coordinates(idx: usize, cols: usize) -> (usize, usize) {
    (idx / cols, idx % cols)
}

/// Divide `[0, total)` into `num_tasks` contiguous chunks.
///
/// Chunk `i` starts at `i * (total / num_tasks)`; every chunk except the
/// last is `total / num_tasks` long and the last one ends at `total`.
/// When `num_tasks > total` the chunk size is zero, so all but the last
/// chunk are empty. Empty chunks are valid and simply do nothing.
///
/// ```
/// use matmul_tasks::partition::{Chunk, partition};
///
/// let chunks = partition(10, 3).unwrap();
/// assert_eq!(chunks, vec![Chunk::new(0, 3), Chunk::new(3, 6), Chunk::new(6, 10)]);
/// ```
///
/// # Errors
///
/// [`MatmulError::InvalidTaskCount`] if `num_tasks == 0`.
pub fn partition(total: usize, num_tasks: usize) -> Result<Vec<Chunk>> {
    if num_tasks == 0 {
        return Err(MatmulError::InvalidTaskCount(num_tasks));
    }

    let chunk_size = total / num_tasks;
    let chunks: Vec<Chunk> = (0..num_tasks)
        .map(|i| {
            let start = i * chunk_size;
            let end = if i == num_tasks - 1 {
                total
            } else {
                start + chunk_size
            };
            Chunk::new(start, end)
        })
        .collect();

    debug!(
        total,
        num_tasks,
        chunk_size,
        last_len = chunks.last().map_or(0, Chunk::len),
        "partitioned output"
    );
    Ok(chunks)
}
