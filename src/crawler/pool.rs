//! Fixed-capacity worker pool
//!
//! The pool bounds concurrency with a semaphore of execution slots: every
//! submitted task is spawned immediately but must acquire a slot before its
//! work runs, so submission never blocks or fails on capacity — excess tasks
//! simply wait their turn. Each task gets a cancellation token that is a
//! child of the pool-wide shutdown token: cancelling a handle stops that one
//! task, shutting the pool down stops all of them. A task cancelled before
//! it acquires a slot never starts at all.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio_util::sync::CancellationToken;

/// Default number of concurrent execution slots
pub const DEFAULT_WORKER_COUNT: usize = 5;

/// Fixed-size set of execution slots running submitted tasks concurrently
///
/// Cheap to clone; clones share the same slots and shutdown signal. Once
/// shut down a pool stays shut down — the scheduler re-creates a fresh pool
/// when restarted.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    slots: Arc<Semaphore>,
    shutdown: CancellationToken,
    capacity: usize,
}

/// Per-task execution context handed to a submitted task body
#[derive(Debug, Clone)]
pub struct TaskContext {
    cancel: CancellationToken,
    slots: Arc<Semaphore>,
}

/// Cancellable handle to a submitted task
#[derive(Debug)]
pub struct TaskHandle {
    cancel: CancellationToken,
}

impl WorkerPool {
    /// Creates a pool with the given number of execution slots
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Arc::new(Semaphore::new(capacity)),
            shutdown: CancellationToken::new(),
            capacity,
        }
    }

    /// Number of execution slots
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Schedules a task for execution, returning a cancellable handle
    ///
    /// The closure receives the task's [`TaskContext`]; the body is expected
    /// to call [`TaskContext::acquire_slot`] before doing real work and to
    /// treat a `None` slot as cancellation-before-start.
    pub fn submit<F, Fut>(&self, f: F) -> TaskHandle
    where
        F: FnOnce(TaskContext) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let cancel = self.shutdown.child_token();
        let ctx = TaskContext {
            cancel: cancel.clone(),
            slots: self.slots.clone(),
        };
        tokio::spawn(f(ctx));
        TaskHandle { cancel }
    }

    /// Requests cancellation of every given handle
    ///
    /// Best-effort: running tasks observe it at their next cooperative
    /// checkpoint, tasks still waiting for a slot never start.
    pub fn cancel_all<'a>(&self, handles: impl IntoIterator<Item = &'a TaskHandle>) {
        for handle in handles {
            handle.cancel();
        }
    }

    /// Stops accepting new work and cancels everything in flight; idempotent
    pub fn shutdown_now(&self) {
        if !self.shutdown.is_cancelled() {
            tracing::debug!("shutting down worker pool");
        }
        self.shutdown.cancel();
    }

    /// Returns whether the pool has been shut down
    pub fn is_shut_down(&self) -> bool {
        self.shutdown.is_cancelled()
    }
}

impl TaskContext {
    /// Waits for a free execution slot
    ///
    /// Returns `None` if the task was cancelled (individually or via pool
    /// shutdown) before a slot became available; the task must not start.
    pub async fn acquire_slot(&self) -> Option<OwnedSemaphorePermit> {
        tokio::select! {
            _ = self.cancel.cancelled() => None,
            permit = self.slots.clone().acquire_owned() => permit.ok(),
        }
    }

    /// The cancellation token for this task's cooperative checkpoints
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }
}

impl TaskHandle {
    /// Signals the task to stop at its next cooperative checkpoint
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Returns whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
