//! Pool executor: chunks run as jobs on a fixed-size worker pool.

use std::sync::{Arc, mpsc};

use tracing::{debug, error, trace};

use crate::error::{ChunkFailure, MatmulError, Result};
use crate::matrix::{Element, Matrix, check_product_shapes};
use crate::partition::{Chunk, partition};
use crate::threaded::pool::WorkerPool;
use crate::threaded::task::{run_chunk, split_chunks_owned};

/// Multiply `a * b` into `c` on a pool of `num_tasks` reusable workers.
///
/// One job is submitted per chunk, then the pool is shut down: no more
/// jobs are accepted and the caller blocks, with no timeout, until every
/// queued job has run and every worker has exited.
///
/// Pool jobs must be `'static`, so `a` and `b` are copied once into
/// shared `Arc`s, and `c`'s buffer is moved out and cut into one owned
/// buffer per chunk. Each job owns exactly one of those buffers while it
/// runs and hands it back when done. Only after the pool has terminated
/// are the buffers stitched back together into `c`.
///
/// That costs two extra O(m·k + k·n) copies of the inputs per call, plus
/// one move of the m·n output cells out of and back into `c`. The
/// thread-per-task executor borrows everything and copies nothing.
///
/// ```
/// use matmul_tasks::{Matrix, multiply_with_thread_pool};
///
/// let a = Matrix::from_rows(vec![vec![1, 2], vec![3, 4]]).unwrap();
/// let b = Matrix::from_rows(vec![vec![5, 6], vec![7, 8]]).unwrap();
/// let mut c = Matrix::zeros(2, 2);
///
/// multiply_with_thread_pool(&a, &b, &mut c, 2).unwrap();
/// assert_eq!(c.to_rows(), vec![vec![19, 22], vec![43, 50]]);
/// ```
///
/// # Errors
///
/// - [`MatmulError::InvalidTaskCount`], [`MatmulError::DimensionMismatch`]
///   or [`MatmulError::OutputShapeMismatch`] before the pool is created.
/// - [`MatmulError::Spawn`] if the pool cannot start its workers; `c` is
///   left untouched.
/// - [`MatmulError::Incomplete`] if some chunk could not be submitted or
///   its job panicked. The contents of `c` are then unspecified.
/// - [`MatmulError::WorkerPanicked`] if a worker could not be joined.
pub fn multiply_with_thread_pool(
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    num_tasks: usize,
) -> Result<()> {
    run_on_pool(a, b, c, num_tasks, run_chunk)
}

/// [`multiply_with_thread_pool`] with the per-chunk body passed in.
pub(crate) fn run_on_pool<F>(
    a: &Matrix,
    b: &Matrix,
    c: &mut Matrix,
    num_tasks: usize,
    body: F,
) -> Result<()>
where
    F: Fn(&Matrix, &Matrix, Chunk, &mut [Element]) + Send + Sync + 'static,
{
    check_product_shapes(a, b, c)?;
    let chunks = partition(c.len(), num_tasks)?;

    debug!(
        num_tasks,
        rows = c.rows(),
        cols = c.cols(),
        "multiplying on a worker pool"
    );

    let mut pool = WorkerPool::new(num_tasks)?;

    let a = Arc::new(a.clone());
    let b = Arc::new(b.clone());
    let body = Arc::new(body);
    let (done_tx, done_rx) = mpsc::channel::<(usize, Vec<Element>)>();
    let mut failed = Vec::new();

    let parts = split_chunks_owned(c.take_data(), &chunks);
    for (index, (&chunk, mut out)) in chunks.iter().zip(parts).enumerate() {
        let a = Arc::clone(&a);
        let b = Arc::clone(&b);
        let body = Arc::clone(&body);
        let done = done_tx.clone();

        let submitted = pool.execute(move || {
            trace!(index, start = chunk.start, end = chunk.end, "running chunk");
            (*body)(&a, &b, chunk, &mut out);
            // done_rx outlives the pool, so this cannot fail.
            let _ = done.send((index, out));
        });

        if let Err(err) = submitted {
            error!(index, error = %err, "failed to submit chunk");
            failed.push(ChunkFailure {
                index,
                cause: format!("not submitted: {err}"),
            });
        }
    }
    drop(done_tx);

    let shutdown = pool.shutdown();

    let mut finished: Vec<Option<Vec<Element>>> = vec![None; chunks.len()];
    for (index, out) in done_rx.try_iter() {
        finished[index] = Some(out);
    }

    let mut data = Vec::with_capacity(c.rows() * c.cols());
    for (index, (chunk, out)) in chunks.iter().zip(finished).enumerate() {
        match out {
            Some(out) => data.extend(out),
            None => {
                data.resize(data.len() + chunk.len(), 0);
                if !failed.iter().any(|f: &ChunkFailure| f.index == index) {
                    error!(index, "chunk job did not complete");
                    failed.push(ChunkFailure {
                        index,
                        cause: "job did not complete".to_string(),
                    });
                }
            }
        }
    }
    c.restore_data(data);

    if !failed.is_empty() {
        failed.sort_by_key(|f| f.index);
        return Err(MatmulError::Incomplete {
            failed,
            total: chunks.len(),
        });
    }
    shutdown?;

    debug!(num_tasks, "worker pool drained");
    Ok(())
}
