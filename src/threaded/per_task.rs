//! Thread-per-task executor.

use std::thread;

use tracing::{debug, error, trace};

use crate::error::{ChunkFailure, MatmulError, Result};
use crate::matrix::{Element, Matrix, check_product_shapes};
use crate::partition::{Chunk, partition};
use crate::threaded::panic_message;
use crate::threaded::task::{run_chunk, split_chunks_mut};

/// Multiply `a * b` into `c`, starting one thread per chunk.
///
/// The output is cut into `num_tasks` chunks and each chunk gets its own
/// freshly spawned thread, which owns the matching slice of `c`
/// exclusively. After every thread has been started, each one is joined
/// in turn. A thread that fails to start or panics does not stop its
/// siblings; all of them are waited on, then the failures are returned
/// together.
///
/// ```
/// use matmul_tasks::{Matrix, multiply_with_threads};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// let mut c = Matrix::zeros(2, 2);
///
/// multiply_with_threads(&a, &b, &mut c, 3).unwrap();
/// assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
/// ```
///
/// # Errors
///
/// - [`MatmulError::InvalidTaskCount`], [`MatmulError::DimensionMismatch`]
///   or [`MatmulError::OutputShapeMismatch`] before any thread is started.
/// - [`MatmulError::Incomplete`] if some chunk's thread could not be
///   spawned or panicked. The contents of `c` are then unspecified.
pub fn multiply_with_threads(
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    num_tasks: usize,
) -> Result<()> {
    run_with_threads(a, b, c, num_tasks, run_chunk)
}

/// [`multiply_with_threads`] with the per-chunk body passed in.
pub(crate) fn run_with_threads<F>(
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    num_tasks: usize,
    body: F,
) -> Result<()>
where
    F: Fn(&Matrix, &Matrix, Chunk, &mut [Element]) + Sync,
{
    check_product_shapes(a, b, c)?;
    let chunks = partition(c.len(), num_tasks)?;

    debug!(
        num_tasks,
        rows = c.rows(),
        cols = c.cols(),
        "multiplying with one thread per task"
    );

    let parts = split_chunks_mut(c.as_mut_slice(), &chunks);
    let body = &body;

    let mut failed = thread::scope(|s| {
        let mut failed = Vec::new();
        let mut handles = Vec::with_capacity(chunks.len());

        for (index, (&chunk, out)) in chunks.iter().zip(parts).enumerate() {
            let spawned = thread::Builder::new()
                .name(format!("matmul-task-{index}"))
                .spawn_scoped(s, move || {
                    trace!(index, start = chunk.start, end = chunk.end, "running chunk");
                    body(a, b, chunk, out);
                });

            match spawned {
                Ok(handle) => handles.push((index, handle)),
                Err(err) => {
                    error!(index, error = %err, "failed to start task thread");
                    failed.push(ChunkFailure {
                        index,
                        cause: format!("thread failed to start: {err}"),
                    });
                }
            }
        }

        for (index, handle) in handles {
            if let Err(payload) = handle.join() {
                let cause = panic_message(payload.as_ref());
                error!(index, %cause, "task thread panicked");
                failed.push(ChunkFailure {
                    index,
                    cause: format!("thread panicked: {cause}"),
                });
            }
        }

        failed
    });

    if failed.is_empty() {
        debug!(num_tasks, "all task threads joined");
        Ok(())
    } else {
        failed.sort_by_key(|f| f.index);
        Err(MatmulError::Incomplete {
            failed,
            total: chunks.len(),
        })
    }
}
