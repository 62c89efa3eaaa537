//! First-match completion signal.
//!
//! A single-writer-wins winner slot paired with a broadcast stop token. The
//! claim is one atomic operation, never a check-then-set across two steps, so
//! exactly one winner survives any number of concurrent claims.

use handlescout_core::Candidate;
use std::sync::OnceLock;
use tokio_util::sync::CancellationToken;

/// Write-once "found it" flag shared by every worker.
#[derive(Debug, Default)]
pub struct CompletionSignal {
    winner: OnceLock<Candidate>,
    stop: CancellationToken,
}

impl CompletionSignal {
    /// Create an unset signal.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Attempt to record `candidate` as the winning identifier.
    ///
    /// Returns whether this call won. Only the first successful claim is
    /// retained; once set, the winner never changes and every worker observes
    /// the stop within one attempt's polling latency.
    pub fn try_claim(&self, candidate: Candidate) -> bool {
        let won = self.winner.set(candidate).is_ok();
        if won {
            self.stop.cancel();
        }
        won
    }

    /// Request a stop without recording a winner (operator interrupt).
    pub fn stop(&self) {
        self.stop.cancel();
    }

    /// Whether workers should cease issuing network calls.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stop.is_cancelled()
    }

    /// The winning identifier, if one was claimed.
    #[must_use]
    pub fn winner(&self) -> Option<&Candidate> {
        self.winner.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    fn candidate(s: &str) -> Candidate {
        Candidate::new(s).expect("valid candidate")
    }

    #[test]
    fn test_first_claim_wins() {
        let signal = CompletionSignal::new();
        assert!(!signal.is_stopped());
        assert_eq!(signal.winner(), None);

        assert!(signal.try_claim(candidate("alice")));
        assert!(signal.is_stopped());
        assert_eq!(signal.winner(), Some(&candidate("alice")));

        // A later claim is discarded and the winner is unchanged.
        assert!(!signal.try_claim(candidate("bob")));
        assert_eq!(signal.winner(), Some(&candidate("alice")));
    }

    #[test]
    fn test_stop_without_winner() {
        let signal = CompletionSignal::new();
        signal.stop();
        assert!(signal.is_stopped());
        assert_eq!(signal.winner(), None);
    }

    #[tokio::test]
    async fn test_exactly_one_winner_under_race() {
        let signal = Arc::new(CompletionSignal::new());
        let wins = Arc::new(AtomicU32::new(0));

        let mut handles = Vec::new();
        for i in 0..50 {
            let signal = signal.clone();
            let wins = wins.clone();
            handles.push(tokio::spawn(async move {
                if signal.try_claim(candidate(&format!("name{i}"))) {
                    wins.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }
        for handle in handles {
            handle.await.expect("claim task");
        }

        assert_eq!(wins.load(Ordering::SeqCst), 1);
        let winner = signal.winner().expect("a winner was recorded");
        assert!(winner.as_str().starts_with("name"));
    }
}
