//! Concurrency-safe sink for terminal records and the raw response log.

use crate::record::{LogEntry, ResultRecord};
use tokio::sync::Mutex;

/// Append-only collector shared by all workers.
///
/// Appends are exclusion-safe under concurrent writers; no ordering is
/// guaranteed between workers. Read back via [`ResultAggregator::drain`]
/// only after the pool has fully drained.
#[derive(Debug, Default)]
pub struct ResultAggregator {
    results: Mutex<Vec<ResultRecord>>,
    log: Mutex<Vec<LogEntry>>,
}

impl ResultAggregator {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a terminal outcome for a resolved candidate.
    pub async fn record_result(&self, record: ResultRecord) {
        self.results.lock().await.push(record);
    }

    /// Append a raw response log entry.
    pub async fn record_log(&self, entry: LogEntry) {
        self.log.lock().await.push(entry);
    }

    /// Take everything collected so far, leaving the aggregator empty.
    pub async fn drain(&self) -> (Vec<ResultRecord>, Vec<LogEntry>) {
        let results = std::mem::take(&mut *self.results.lock().await);
        let log = std::mem::take(&mut *self.log.lock().await);
        (results, log)
    }
}
