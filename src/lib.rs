//! Integer matrix multiplication, split into output chunks and run
//! concurrently.
//!
//! The interesting part here is not the dot product (it is the naive
//! O(n³) one) but how the output work is cut up and executed. The output
//! matrix is flattened row-major and divided into `num_tasks` contiguous
//! chunks; every chunk is computed by one task that owns its cells
//! outright. Two ways of running those tasks are provided:
//!
//! - [`multiply_with_threads`]: spawn one thread per chunk, join them all
//! - [`multiply_with_thread_pool`]: submit the chunks to a fixed pool of
//!   `num_tasks` workers, then shut the pool down and wait for it to drain
//!
//! Both produce identical results for identical inputs.
//!
//! ## Usage
//!
//! ```
//! use matmul_tasks::{Matrix, multiply_with_threads};
//! use rand::SeedableRng;
//! use rand::rngs::StdRng;
//!
//! let mut rng = StdRng::seed_from_u64(1);
//! let a = Matrix::random(90, 90, &mut rng);
//! let b = Matrix::random(90, 90, &mut rng);
//! let mut c = Matrix::zeros(90, 90);
//!
//! multiply_with_threads(&a, &b, &mut c, 35).unwrap();
//! ```
//!
//! Or pick the executor at runtime:
//!
//! ```
//! use matmul_tasks::{Matrix, Strategy, multiply};
//!
//! let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
//! let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
//! let mut c = Matrix::zeros(2, 2);
//!
//! multiply(Strategy::Pool, &a, &b, &mut c, 4).unwrap();
//! assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
//! ```
//!
//! ## What's inside
//!
//! - Wrapping `i32` dot-product kernel
//! - Remainder-to-last-chunk partitioner
//! - Scoped thread-per-task executor
//! - Channel-fed worker pool with drain-and-join shutdown

pub mod error;
pub mod kernels;
pub mod matrix;
pub mod partition;
pub mod threaded;

use std::fmt;

pub use error::{ChunkFailure, MatmulError, Result};
pub use kernels::compute_element;
pub use matrix::naive_ijk::multiply_sequential;
pub use matrix::{Element, Matrix, check_product_shapes};
pub use partition::{Chunk, partition};
pub use threaded::per_task::multiply_with_threads;
pub use threaded::pool::{PoolState, WorkerPool};
pub use threaded::pooled::multiply_with_thread_pool;

/// Which executor runs the chunks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// One freshly spawned thread per chunk.
    ThreadPerTask,
    /// A fixed pool of `num_tasks` reusable workers.
    Pool,
}

impl Strategy {
    pub const ALL: [Strategy; 2] = [Strategy::ThreadPerTask, Strategy::Pool];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::ThreadPerTask => f.write_str("threads"),
            Strategy::Pool => f.write_str("thread pool"),
        }
    }
}

/// Multiply `a * b` into `c` with `num_tasks` chunks on the chosen executor.
///
/// `c` must already be `a.rows() × b.cols()`. See
/// [`multiply_with_threads`] and [`multiply_with_thread_pool`] for the
/// error cases.
pub fn multiply(
    strategy: Strategy,
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    num_tasks: usize,
) -> Result<()> {
    match strategy {
        Strategy::ThreadPerTask => multiply_with_threads(a, b, c, num_tasks),
        Strategy::Pool => multiply_with_thread_pool(a, b, c, num_tasks),
    }
}
