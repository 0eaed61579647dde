use std::fmt;
use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatmulError {
    #[error("task count must be at least 1, got {0}")]
    InvalidTaskCount(usize),
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    DimensionMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("output shape mismatch: expected {expected_rows}x{expected_cols}, got {rows}x{cols}")]
    OutputShapeMismatch {
        expected_rows: usize,
        expected_cols: usize,
        rows: usize,
        cols: usize,
    },
    #[error("ragged matrix: row {row} has {len} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        len: usize,
        expected: usize,
    },
    #[error("matrix data has {len} elements, expected {rows}x{cols}")]
    DataLength { rows: usize, cols: usize, len: usize },
    #[error("failed to spawn worker {index}: {source}")]
    Spawn {
        index: usize,
        #[source]
        source: io::Error,
    },
    #[error("worker {index} panicked")]
    WorkerPanicked { index: usize },
    #[error("worker pool no longer accepts jobs")]
    PoolClosed,
    #[error("{} of {total} chunks did not complete", .failed.len())]
    Incomplete {
        failed: Vec<ChunkFailure>,
        total: usize,
    },
}

/// One chunk that never finished writing its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkFailure {
    pub index: usize,
    pub cause: String,
}

impl fmt::Display for ChunkFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chunk {}: {}", self.index, self.cause)
    }
}

pub type Result<T> = std::result::Result<T, MatmulError>;
