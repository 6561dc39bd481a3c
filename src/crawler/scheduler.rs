//! Crawl scheduler - control-state machine and task orchestration
//!
//! This module owns the pieces the collaborator (a UI layer, a CLI, a test)
//! interacts with:
//! - the control-state machine (idle/running/paused/stopped)
//! - draining the pending queue into the worker pool on start/resume
//! - the registry of in-flight task handles used for forced cancellation
//! - progress reporting back to the collaborator
//!
//! The scheduler is an explicit instance: all mutable state lives in fields,
//! so independent schedulers can coexist and tests stay isolated.

use crate::config::SchedulerConfig;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::pool::{TaskHandle, WorkerPool};
use crate::crawler::task::{FetchTask, TaskCompletion};
use crate::queue::{ResourceQueue, WorkItem};
use crate::state::{ControlState, PauseGate};
use crate::store::{ResultStore, TaskOutcome};
use crate::url::ensure_scheme;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Callback invoked once per completed task with `(completed_count, outcome)`
pub type ProgressCallback = Arc<dyn Fn(usize, &TaskOutcome) + Send + Sync>;

/// Orchestrates queue draining, worker submission, and control commands
///
/// All operations are safe to call from a single coordinating thread while
/// workers execute concurrently; the queue and store additionally tolerate
/// concurrent access from the collaborator.
pub struct CrawlScheduler {
    config: SchedulerConfig,
    fetcher: Arc<dyn Fetcher>,
    queue: Arc<ResourceQueue>,
    store: Arc<ResultStore>,
    pause: Arc<PauseGate>,
    state: Mutex<ControlState>,
    pool: Mutex<Option<WorkerPool>>,
    active: Arc<Mutex<HashMap<u64, TaskHandle>>>,
    next_task_id: AtomicU64,
    total_enqueued: AtomicUsize,
    completed: Arc<AtomicUsize>,
    progress: Arc<Mutex<Option<ProgressCallback>>>,
}

impl CrawlScheduler {
    /// Creates an idle scheduler with the given fetch capability
    ///
    /// The worker pool is created lazily on the first `start`.
    pub fn new(config: SchedulerConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            config,
            fetcher,
            queue: Arc::new(ResourceQueue::new()),
            store: Arc::new(ResultStore::new()),
            pause: Arc::new(PauseGate::new()),
            state: Mutex::new(ControlState::Idle),
            pool: Mutex::new(None),
            active: Arc::new(Mutex::new(HashMap::new())),
            next_task_id: AtomicU64::new(0),
            total_enqueued: AtomicUsize::new(0),
            completed: Arc::new(AtomicUsize::new(0)),
            progress: Arc::new(Mutex::new(None)),
        }
    }

    /// Registers the progress callback
    ///
    /// Invoked once per completed task (success, failure, or cancellation)
    /// with the running completion count and the outcome. The callback is
    /// looked up when a task completes, so registering after `start` still
    /// covers tasks already in flight.
    pub fn on_progress<F>(&self, callback: F)
    where
        F: Fn(usize, &TaskOutcome) + Send + Sync + 'static,
    {
        *self.progress.lock().expect("progress lock poisoned") = Some(Arc::new(callback));
    }

    /// Normalizes an identifier and appends it to the pending queue
    ///
    /// A missing scheme is replaced with the configured default. Duplicates
    /// are not suppressed. Returns the item as enqueued.
    pub fn enqueue(&self, identifier: &str) -> WorkItem {
        let item = WorkItem::new(ensure_scheme(identifier, &self.config.default_scheme));
        tracing::debug!(url = %item, "enqueued");
        self.queue.push(item.clone());
        self.total_enqueued.fetch_add(1, Ordering::SeqCst);
        item
    }

    /// Starts processing everything queued so far
    ///
    /// Valid from `Idle` or `Stopped`; otherwise a no-op. Ensures a live
    /// worker pool, transitions to `Running`, then drains the queue once and
    /// submits every drained item. Items enqueued after this point wait for
    /// the next `resume` or `start`.
    pub fn start(&self) {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            match *state {
                ControlState::Idle | ControlState::Stopped => *state = ControlState::Running,
                current => {
                    tracing::debug!(%current, "start ignored");
                    return;
                }
            }
        }
        // A pause raised before the previous stop must not leak into this run.
        self.pause.resume();
        tracing::info!("starting crawl");
        self.drain_and_submit();
    }

    /// Raises the pause flag; workers stall at their next checkpoint
    ///
    /// Valid only from `Running`; otherwise a no-op. In-flight tasks are not
    /// cancelled or interrupted.
    pub fn pause(&self) {
        let mut state = self.state.lock().expect("state lock poisoned");
        match *state {
            ControlState::Running => {
                *state = ControlState::Paused;
                self.pause.pause();
                tracing::info!("crawl paused");
            }
            current => tracing::debug!(%current, "pause ignored"),
        }
    }

    /// Clears the pause flag and submits anything queued since `start`
    ///
    /// Valid only from `Paused`; otherwise a no-op.
    pub fn resume(&self) {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            match *state {
                ControlState::Paused => *state = ControlState::Running,
                current => {
                    tracing::debug!(%current, "resume ignored");
                    return;
                }
            }
        }
        self.pause.resume();
        tracing::info!("resuming crawl");
        self.drain_and_submit();
    }

    /// Cancels all in-flight work and tears the pool down
    ///
    /// Valid from `Running` or `Paused`; idempotent from `Stopped`. The stop
    /// signal takes precedence over the pause flag, so tasks stalled at the
    /// pause checkpoint terminate as well. Does not wait for in-flight
    /// fetches: they observe cancellation at their next checkpoint or are
    /// interrupted mid-fetch. A later `start` re-creates the pool.
    pub fn stop(&self) {
        {
            let mut state = self.state.lock().expect("state lock poisoned");
            match *state {
                ControlState::Running | ControlState::Paused | ControlState::Stopped => {
                    *state = ControlState::Stopped;
                }
                current => {
                    tracing::debug!(%current, "stop ignored");
                    return;
                }
            }
        }

        let handles: Vec<TaskHandle> = {
            let mut active = self.active.lock().expect("active registry lock poisoned");
            active.drain().map(|(_, handle)| handle).collect()
        };

        let pool = self.pool.lock().expect("pool lock poisoned");
        if let Some(pool) = pool.as_ref() {
            pool.cancel_all(&handles);
            pool.shutdown_now();
        }
        tracing::info!(cancelled = handles.len(), "crawl stopped");
    }

    /// Current control state
    pub fn state(&self) -> ControlState {
        *self.state.lock().expect("state lock poisoned")
    }

    /// Read-only copy of all recorded outcomes
    pub fn snapshot(&self) -> Vec<TaskOutcome> {
        self.store.snapshot()
    }

    /// Clears accumulated outcomes; counters are unaffected
    pub fn clear_results(&self) {
        self.store.clear();
    }

    /// Total items enqueued over this scheduler's lifetime
    pub fn total_enqueued(&self) -> usize {
        self.total_enqueued.load(Ordering::SeqCst)
    }

    /// Total tasks completed (including failures and cancellations)
    pub fn completed_count(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of items waiting in the queue (not yet submitted)
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Returns the live pool, re-creating it after a shutdown
    fn ensure_live_pool(&self) -> WorkerPool {
        let mut pool = self.pool.lock().expect("pool lock poisoned");
        match pool.as_ref() {
            Some(p) if !p.is_shut_down() => p.clone(),
            _ => {
                tracing::debug!(capacity = self.config.worker_count, "creating worker pool");
                let fresh = WorkerPool::new(self.config.worker_count);
                *pool = Some(fresh.clone());
                fresh
            }
        }
    }

    /// Drains the queue once and submits every drained item
    ///
    /// Items pushed concurrently with the drain are left for the next
    /// drain, never lost. Submission order matches queue order.
    fn drain_and_submit(&self) {
        let pool = self.ensure_live_pool();
        let items = self.queue.drain_all();
        tracing::info!(count = items.len(), "submitting drained items");
        for item in items {
            self.submit_item(&pool, item);
        }
    }

    /// Submits one item to the pool and registers its handle
    fn submit_item(&self, pool: &WorkerPool, item: WorkItem) {
        let id = self.next_task_id.fetch_add(1, Ordering::Relaxed);
        let fetcher = self.fetcher.clone();
        let store = self.store.clone();
        let pause = self.pause.clone();
        let active = self.active.clone();
        let completed = self.completed.clone();
        let progress = self.progress.clone();

        // Holding the registry lock across submit: the task's own
        // deregistration blocks until the handle is inserted, so a task that
        // finishes instantly cannot leave a stale entry behind.
        let mut registry = self.active.lock().expect("active registry lock poisoned");
        let handle = pool.submit(move |ctx| async move {
            let completion = match ctx.acquire_slot().await {
                Some(_permit) => {
                    FetchTask::new(item.clone(), fetcher, store, pause)
                        .run(ctx.cancellation())
                        .await
                }
                None => TaskCompletion::Cancelled,
            };

            active
                .lock()
                .expect("active registry lock poisoned")
                .remove(&id);
            let done = completed.fetch_add(1, Ordering::SeqCst) + 1;

            let outcome = match completion {
                TaskCompletion::Finished(outcome) => outcome,
                TaskCompletion::Cancelled => TaskOutcome::Failure {
                    item,
                    reason: "cancelled".to_string(),
                },
            };
            // Looked up at completion time so late registrations still fire.
            let callback = progress.lock().expect("progress lock poisoned").clone();
            if let Some(callback) = callback {
                callback(done, &outcome);
            }
        });
        registry.insert(id, handle);
    }
}
