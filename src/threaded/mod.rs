//! Concurrent executors.
//!
//! Both executors partition the output into chunks and run the same task
//! body on every chunk; they differ only in where the chunk runs and how
//! the caller waits for it.
//!
//! Available implementations:
//! - `per_task`: one scoped OS thread per chunk, joined individually
//! - `pooled`: chunks submitted to a fixed-size [`pool::WorkerPool`],
//!   drained by an orderly shutdown
//!
//! Neither supports cancellation or timeouts. Writes into the output are
//! not transactional, so a chunk stopped halfway would leave cells that
//! cannot be told apart from finished ones. The pool's shutdown waits
//! for as long as the queued work takes.

pub mod per_task;
pub mod pool;
pub mod pooled;
pub mod task;

use std::any::Any;

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
