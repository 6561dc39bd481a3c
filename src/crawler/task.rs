//! Per-item fetch task
//!
//! A [`FetchTask`] processes exactly one work item: wait out the pause gate,
//! invoke the fetch capability, derive the title, record the outcome. Every
//! fetch failure is absorbed into a failure outcome at this boundary — a
//! task never takes down its worker slot.

use crate::crawler::extract::extract_title;
use crate::crawler::fetcher::Fetcher;
use crate::queue::WorkItem;
use crate::state::PauseGate;
use crate::store::{ResultStore, TaskOutcome};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// How a task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCompletion {
    /// The task ran and recorded an outcome
    Finished(TaskOutcome),
    /// The task was cancelled at a checkpoint; nothing was recorded
    Cancelled,
}

/// Unit of work: fetch one resource and record the result
pub struct FetchTask {
    item: WorkItem,
    fetcher: Arc<dyn Fetcher>,
    store: Arc<ResultStore>,
    pause: Arc<PauseGate>,
}

impl FetchTask {
    pub fn new(
        item: WorkItem,
        fetcher: Arc<dyn Fetcher>,
        store: Arc<ResultStore>,
        pause: Arc<PauseGate>,
    ) -> Self {
        Self {
            item,
            fetcher,
            store,
            pause,
        }
    }

    /// Runs the task to completion or cancellation
    ///
    /// Checkpoints: the pause gate before the fetch, and the fetch itself is
    /// raced against the cancellation token so stop interrupts in-flight
    /// requests instead of letting them run out in the background.
    pub async fn run(self, cancel: &CancellationToken) -> TaskCompletion {
        if !self.pause.wait_while_paused(cancel).await {
            tracing::debug!(url = %self.item, "task cancelled while paused");
            return TaskCompletion::Cancelled;
        }
        if cancel.is_cancelled() {
            return TaskCompletion::Cancelled;
        }

        let fetched = tokio::select! {
            _ = cancel.cancelled() => {
                tracing::debug!(url = %self.item, "task cancelled mid-fetch");
                return TaskCompletion::Cancelled;
            }
            result = self.fetcher.fetch(self.item.url()) => result,
        };

        let outcome = match fetched {
            Ok(content) => TaskOutcome::Success {
                item: self.item.clone(),
                title: extract_title(&content),
            },
            Err(e) => {
                tracing::debug!(url = %self.item, error = %e, "fetch failed");
                TaskOutcome::Failure {
                    item: self.item.clone(),
                    reason: e.to_string(),
                }
            }
        };

        self.store.record(outcome.clone());
        TaskCompletion::Finished(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::extract::NO_TITLE_FOUND;
    use crate::crawler::fetcher::FetchError;
    use async_trait::async_trait;

    struct FixedFetcher(Result<String, FetchError>);

    #[async_trait]
    impl Fetcher for FixedFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            self.0.clone()
        }
    }

    fn make_task(fetcher: FixedFetcher, store: &Arc<ResultStore>) -> FetchTask {
        FetchTask::new(
            WorkItem::new("http://example.com"),
            Arc::new(fetcher),
            store.clone(),
            Arc::new(PauseGate::new()),
        )
    }

    #[tokio::test]
    async fn test_success_records_title() {
        let store = Arc::new(ResultStore::new());
        let task = make_task(
            FixedFetcher(Ok("<html><title>Example</title></html>".to_string())),
            &store,
        );

        let completion = task.run(&CancellationToken::new()).await;
        assert_eq!(
            completion,
            TaskCompletion::Finished(TaskOutcome::Success {
                item: WorkItem::new("http://example.com"),
                title: "Example".to_string(),
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_markerless_content_records_sentinel() {
        let store = Arc::new(ResultStore::new());
        let task = make_task(FixedFetcher(Ok("no markers here".to_string())), &store);

        task.run(&CancellationToken::new()).await;
        match &store.snapshot()[0] {
            TaskOutcome::Success { title, .. } => assert_eq!(title, NO_TITLE_FOUND),
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_failure_records_reason() {
        let store = Arc::new(ResultStore::new());
        let task = make_task(FixedFetcher(Err(FetchError::Timeout)), &store);

        let completion = task.run(&CancellationToken::new()).await;
        match completion {
            TaskCompletion::Finished(TaskOutcome::Failure { reason, .. }) => {
                assert_eq!(reason, "timeout");
            }
            other => panic!("expected failure, got {:?}", other),
        }
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_cancelled_before_checkpoint_records_nothing() {
        let store = Arc::new(ResultStore::new());
        let task = make_task(FixedFetcher(Ok("<title>x</title>".to_string())), &store);

        let cancel = CancellationToken::new();
        cancel.cancel();
        assert_eq!(task.run(&cancel).await, TaskCompletion::Cancelled);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_pause_blocks_task_until_resume() {
        let store = Arc::new(ResultStore::new());
        let pause = Arc::new(PauseGate::new());
        pause.pause();

        let task = FetchTask::new(
            WorkItem::new("http://example.com"),
            Arc::new(FixedFetcher(Ok("<title>x</title>".to_string()))),
            store.clone(),
            pause.clone(),
        );

        let cancel = CancellationToken::new();
        let running = tokio::spawn(async move { task.run(&cancel).await });

        // Give the task time to reach the pause checkpoint, then resume.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!running.is_finished());
        pause.resume();

        let completion = running.await.unwrap();
        assert!(matches!(completion, TaskCompletion::Finished(_)));
    }
}
