//! Crawler module - concurrent URL fetching and scheduling
//!
//! This module contains the scheduler core:
//! - the fetch capability seam and its HTTP implementation
//! - title extraction from fetched content
//! - the fixed-capacity worker pool with cancellable task handles
//! - the per-item fetch task
//! - the control-state machine orchestrating it all

mod extract;
mod fetcher;
mod pool;
mod scheduler;
mod task;

pub use extract::{extract_title, NO_TITLE_FOUND};
pub use fetcher::{build_http_client, FetchError, Fetcher, HttpFetcher};
pub use pool::{TaskContext, TaskHandle, WorkerPool, DEFAULT_WORKER_COUNT};
pub use scheduler::{CrawlScheduler, ProgressCallback};
pub use task::{FetchTask, TaskCompletion};
