//! Pending-work queue
//!
//! This module defines the unit of input (`WorkItem`) and the FIFO queue of
//! items waiting to be submitted to the worker pool. The queue is shared
//! between the collaborator (pushing new items) and the scheduler (draining
//! on start/resume), so every operation takes the internal lock.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

/// One unit of input: a normalized URL to be fetched and processed.
///
/// Immutable once enqueued. Repeated identifiers are allowed and are
/// processed independently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    url: String,
}

impl WorkItem {
    /// Creates a work item from an already-normalized URL string
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }

    /// The URL this item refers to
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url)
    }
}

/// FIFO queue of pending work items
///
/// Insertion order is processing priority. `push` never blocks and never
/// fails; `drain_all` atomically removes everything currently present, so
/// items pushed concurrently with a drain are either seen by that drain or
/// left for the next one, never lost.
#[derive(Debug, Default)]
pub struct ResourceQueue {
    items: Mutex<VecDeque<WorkItem>>,
}

impl ResourceQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an item to the tail of the queue
    pub fn push(&self, item: WorkItem) {
        self.items
            .lock()
            .expect("resource queue lock poisoned")
            .push_back(item);
    }

    /// Atomically removes and returns every item currently queued, in FIFO order
    pub fn drain_all(&self) -> Vec<WorkItem> {
        let mut items = self.items.lock().expect("resource queue lock poisoned");
        items.drain(..).collect()
    }

    /// Number of items currently queued
    pub fn len(&self) -> usize {
        self.items.lock().expect("resource queue lock poisoned").len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_push_and_drain_preserves_fifo_order() {
        let queue = ResourceQueue::new();
        queue.push(WorkItem::new("http://a.example"));
        queue.push(WorkItem::new("http://b.example"));
        queue.push(WorkItem::new("http://c.example"));

        let drained = queue.drain_all();
        let urls: Vec<&str> = drained.iter().map(WorkItem::url).collect();
        assert_eq!(
            urls,
            vec!["http://a.example", "http://b.example", "http://c.example"]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_drain_empty_queue() {
        let queue = ResourceQueue::new();
        assert!(queue.drain_all().is_empty());
    }

    #[test]
    fn test_duplicates_are_kept() {
        let queue = ResourceQueue::new();
        queue.push(WorkItem::new("http://a.example"));
        queue.push(WorkItem::new("http://a.example"));
        assert_eq!(queue.drain_all().len(), 2);
    }

    #[test]
    fn test_push_after_drain_lands_in_next_drain() {
        let queue = ResourceQueue::new();
        queue.push(WorkItem::new("http://a.example"));

        assert_eq!(queue.drain_all().len(), 1);
        queue.push(WorkItem::new("http://b.example"));
        assert_eq!(queue.drain_all().len(), 1);
    }

    #[test]
    fn test_concurrent_push_and_drain_loses_nothing() {
        let queue = Arc::new(ResourceQueue::new());
        let pusher = {
            let queue = queue.clone();
            std::thread::spawn(move || {
                for i in 0..500 {
                    queue.push(WorkItem::new(format!("http://host{}.example", i)));
                }
            })
        };

        let mut drained = Vec::new();
        while drained.len() < 500 {
            drained.extend(queue.drain_all());
        }
        pusher.join().unwrap();

        assert_eq!(drained.len(), 500);
        assert!(queue.is_empty());
    }
}
