//! Pull-only task queue shared by all workers.

use handlescout_core::Candidate;
use std::collections::VecDeque;
use tokio::sync::Mutex;

/// Unordered-delivery queue of pending candidates.
///
/// Seeded once before the pool starts; nothing is ever re-enqueued. `take`
/// hands each candidate to exactly one caller, and returns `None` forever
/// once drained.
#[derive(Debug)]
pub struct TaskQueue {
    inner: Mutex<VecDeque<Candidate>>,
}

impl TaskQueue {
    /// Build a queue from the prepared candidate list.
    #[must_use]
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self {
            inner: Mutex::new(candidates.into()),
        }
    }

    /// Take the next pending candidate, or `None` if the queue is drained.
    pub async fn take(&self) -> Option<Candidate> {
        self.inner.lock().await.pop_front()
    }

    /// Number of candidates still pending.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.len()
    }

    /// Whether the queue is drained.
    pub async fn is_empty(&self) -> bool {
        self.inner.lock().await.is_empty()
    }
}
