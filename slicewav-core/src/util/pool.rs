//! Bounded task pool with a drain barrier.
//!
//! A fixed number of OS worker threads (a dedicated rayon pool) run submitted
//! closures. Closures may submit more work into the same pool while they run;
//! `stop_wait` blocks until every queued and in-flight item, including work
//! added by running items, has finished.
//!
//! The pool only tracks outstanding work. Anything a caller needs back from an
//! item travels over the caller's own channel.

use std::any::Any;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::error::{CoreError, CoreResult};

#[derive(Debug, Default)]
struct Counts {
    /// Items queued or running.
    pending: usize,
    /// `stop_wait` has been called.
    stopping: bool,
    /// Stop requested and all work drained. Final.
    stopped: bool,
}

#[derive(Debug, Default)]
struct PoolState {
    counts: Mutex<Counts>,
    idle: Condvar,
}

impl PoolState {
    fn lock(&self) -> MutexGuard<'_, Counts> {
        // Counters are plain integers; a poisoned guard still holds valid data.
        self.counts.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Decrements the pending count when an item finishes, panicking or not.
struct PendingGuard(Arc<PoolState>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        let mut counts = self.0.lock();
        counts.pending -= 1;
        if counts.pending == 0 {
            self.0.idle.notify_all();
        }
    }
}

struct Inner {
    workers: ThreadPool,
    state: Arc<PoolState>,
    worker_count: usize,
}

/// Cloneable handle to a fixed-size worker pool.
///
/// Every clone refers to the same workers and queue, so a running item can
/// hold a handle and fan out further work.
#[derive(Clone)]
pub struct TaskPool {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for TaskPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskPool")
            .field("worker_count", &self.inner.worker_count)
            .field("pending", &self.pending())
            .finish()
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}

impl TaskPool {
    /// Creates a pool of `worker_count` worker threads.
    pub fn new(worker_count: usize) -> CoreResult<Self> {
        if worker_count == 0 {
            return Err(CoreError::Config(
                "task pool needs at least one worker".to_string(),
            ));
        }

        let workers = ThreadPoolBuilder::new()
            .num_threads(worker_count)
            .thread_name(|i| format!("slicewav-worker-{i}"))
            .panic_handler(|payload| {
                log::error!("Task panicked: {}", panic_message(payload.as_ref()));
            })
            .build()
            .map_err(|e| CoreError::Pool(format!("Failed to build worker pool: {e}")))?;

        log::debug!("Started task pool with {worker_count} worker(s)");

        Ok(Self {
            inner: Arc::new(Inner {
                workers,
                state: Arc::new(PoolState::default()),
                worker_count,
            }),
        })
    }

    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.inner.worker_count
    }

    /// Number of items queued or running.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inner.state.lock().pending
    }

    /// Queues `work` for execution on a worker.
    ///
    /// Safe to call from any thread, including from inside a running item.
    /// While `stop_wait` is draining, items that are still running may keep
    /// submitting; once the pool has fully stopped, submissions fail with
    /// [`CoreError::PoolStopped`].
    pub fn submit<F>(&self, work: F) -> CoreResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let mut counts = self.inner.state.lock();
            if counts.stopped || (counts.stopping && counts.pending == 0) {
                return Err(CoreError::PoolStopped);
            }
            counts.pending += 1;
        }

        let guard = PendingGuard(Arc::clone(&self.inner.state));
        self.inner.workers.spawn(move || {
            let _guard = guard;
            work();
        });
        Ok(())
    }

    /// Stops accepting new work once the queue is exhausted and blocks until
    /// every queued and in-flight item has finished. Idempotent.
    pub fn stop_wait(&self) {
        let state = &self.inner.state;
        let mut counts = state.lock();
        counts.stopping = true;
        while counts.pending > 0 {
            counts = state
                .idle
                .wait(counts)
                .unwrap_or_else(PoisonError::into_inner);
        }
        counts.stopped = true;
        log::debug!("Task pool drained and stopped");
    }
}
