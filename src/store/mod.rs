//! Completed-outcome accumulation
//!
//! Every finished fetch task records a [`TaskOutcome`] here. Appends from
//! different workers are serialized by a single mutex, so no outcome is ever
//! lost or observed half-written; `snapshot` hands the collaborator a copy it
//! can display without holding the lock.

use crate::queue::WorkItem;
use std::sync::Mutex;

/// Result of processing one work item
///
/// Outcomes are append-only: once recorded they are never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    /// The fetch succeeded and a title was derived from the content
    Success {
        /// The item that was processed
        item: WorkItem,
        /// The derived title (a sentinel value if no markers were found)
        title: String,
    },

    /// The fetch capability failed
    Failure {
        /// The item that was processed
        item: WorkItem,
        /// Human-readable failure reason
        reason: String,
    },
}

impl TaskOutcome {
    /// The work item this outcome belongs to
    pub fn item(&self) -> &WorkItem {
        match self {
            TaskOutcome::Success { item, .. } | TaskOutcome::Failure { item, .. } => item,
        }
    }

    /// Returns whether this outcome is a success
    pub fn is_success(&self) -> bool {
        matches!(self, TaskOutcome::Success { .. })
    }
}

/// Append-only, mutex-guarded sequence of task outcomes
///
/// Ordering of concurrent appends is undefined, but each append is atomic
/// and `record`/`snapshot` observe one total order of appends.
#[derive(Debug, Default)]
pub struct ResultStore {
    outcomes: Mutex<Vec<TaskOutcome>>,
}

impl ResultStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an outcome under the store lock
    pub fn record(&self, outcome: TaskOutcome) {
        self.outcomes
            .lock()
            .expect("result store lock poisoned")
            .push(outcome);
    }

    /// Returns a read-only copy of the current outcome sequence
    pub fn snapshot(&self) -> Vec<TaskOutcome> {
        self.outcomes
            .lock()
            .expect("result store lock poisoned")
            .clone()
    }

    /// Number of recorded outcomes
    pub fn len(&self) -> usize {
        self.outcomes.lock().expect("result store lock poisoned").len()
    }

    /// Returns whether no outcomes have been recorded
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes every recorded outcome
    pub fn clear(&self) {
        self.outcomes
            .lock()
            .expect("result store lock poisoned")
            .clear();
    }
}
