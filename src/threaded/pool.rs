//! A fixed-size pool of reusable worker threads.
//!
//! Workers share one job queue (an mpsc channel behind a mutex) and loop
//! until the queue is closed and empty. The pool moves through three
//! states:
//!
//! ```text
//! Open --shutdown()--> ShuttingDown --all workers joined--> Terminated
//! ```
//!
//! Jobs are accepted only while `Open`. `shutdown` closes the queue, lets
//! the workers drain whatever is still queued, and blocks until every
//! worker has exited. There is no timeout on that wait.

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, mpsc};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, trace, warn};

use crate::error::{MatmulError, Result};
use crate::threaded::panic_message;

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Accepting jobs.
    Open,
    /// Queue closed; queued and running jobs are being drained.
    ShuttingDown,
    /// Every worker has exited.
    Terminated,
}

struct Worker {
    index: usize,
    handle: JoinHandle<()>,
}

pub struct WorkerPool {
    size: usize,
    workers: Vec<Worker>,
    sender: Option<mpsc::Sender<Job>>,
    state: PoolState,
    panicked_jobs: Arc<AtomicUsize>,
}

impl WorkerPool {
    /// Start a pool of `size` worker threads named `matmul-pool-{i}`.
    ///
    /// # Errors
    ///
    /// [`MatmulError::InvalidTaskCount`] if `size == 0`, or
    /// [`MatmulError::Spawn`] if a worker thread cannot be started. Workers
    /// that did start are shut down again before the error is returned.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(MatmulError::InvalidTaskCount(size));
        }

        let (sender, receiver) = mpsc::channel::<Job>();
        let receiver = Arc::new(Mutex::new(receiver));

        let mut pool = WorkerPool {
            size,
            workers: Vec::with_capacity(size),
            sender: Some(sender),
            state: PoolState::Open,
            panicked_jobs: Arc::new(AtomicUsize::new(0)),
        };

        for index in 0..size {
            let receiver = Arc::clone(&receiver);
            let panicked_jobs = Arc::clone(&pool.panicked_jobs);

            let handle = thread::Builder::new()
                .name(format!("matmul-pool-{index}"))
                .spawn(move || worker_loop(index, &receiver, &panicked_jobs))
                .map_err(|source| {
                    error!(index, error = %source, "failed to start pool worker");
                    MatmulError::Spawn { index, source }
                })?;

            pool.workers.push(Worker { index, handle });
        }

        debug!(size, "worker pool open");
        Ok(pool)
    }

    /// Number of worker threads the pool was started with.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Jobs that panicked so far. A panicking job is caught; its worker
    /// keeps serving the queue.
    pub fn panicked_jobs(&self) -> usize {
        self.panicked_jobs.load(Ordering::SeqCst)
    }

    /// Queue `job` to run on some worker.
    ///
    /// # Errors
    ///
    /// [`MatmulError::PoolClosed`] once [`WorkerPool::shutdown`] has been
    /// called. The job is dropped without running.
    pub fn execute<F>(&self, job: F) -> Result<()>
    where
        F: FnOnce() + Send + 'static,
    {
        match (&self.sender, self.state) {
            (Some(sender), PoolState::Open) => sender
                .send(Box::new(job))
                .map_err(|_| MatmulError::PoolClosed),
            _ => Err(MatmulError::PoolClosed),
        }
    }

    /// Stop accepting jobs, run everything already queued, and join all
    /// workers. Blocks until that is done; calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// [`MatmulError::WorkerPanicked`] for the first worker whose thread
    /// could not be joined cleanly. The remaining workers are still joined.
    pub fn shutdown(&mut self) -> Result<()> {
        if self.state == PoolState::Terminated {
            return Ok(());
        }

        self.state = PoolState::ShuttingDown;
        drop(self.sender.take());
        debug!(workers = self.workers.len(), "worker pool shutting down");

        let mut first_failure = None;
        for worker in self.workers.drain(..) {
            if worker.handle.join().is_err() {
                error!(worker = worker.index, "pool worker panicked");
                first_failure.get_or_insert(MatmulError::WorkerPanicked {
                    index: worker.index,
                });
            }
        }

        self.state = PoolState::Terminated;
        debug!(panicked_jobs = self.panicked_jobs(), "worker pool terminated");

        match first_failure {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        if self.state == PoolState::Open {
            warn!(size = self.size, "worker pool dropped without shutdown");
        }
        if let Err(err) = self.shutdown() {
            warn!(error = %err, "worker pool shutdown failed during drop");
        }
    }
}

fn worker_loop(index: usize, receiver: &Mutex<mpsc::Receiver<Job>>, panicked_jobs: &AtomicUsize) {
    loop {
        // Hold the lock only while waiting for the next job.
        let next = match receiver.lock() {
            Ok(queue) => queue.recv(),
            Err(poisoned) => poisoned.into_inner().recv(),
        };

        let Ok(job) = next else {
            break;
        };

        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(job)) {
            panicked_jobs.fetch_add(1, Ordering::SeqCst);
            error!(
                worker = index,
                cause = %panic_message(payload.as_ref()),
                "pool job panicked"
            );
        }
    }

    trace!(worker = index, "pool worker exiting");
}
