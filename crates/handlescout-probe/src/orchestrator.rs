//! Probe orchestrator: shared state construction and worker pool fan-out.

use crate::aggregator::ResultAggregator;
use crate::backoff::BackoffSettings;
use crate::client::ValidationTransport;
use crate::limiter::{AdaptiveRateLimiter, LimiterSettings};
use crate::queue::TaskQueue;
use crate::record::{LogEntry, ResultRecord};
use crate::signal::CompletionSignal;
use crate::worker::{run_worker, Notifier, WorkerContext};
use futures::stream::{FuturesUnordered, StreamExt};
use handlescout_core::{Candidate, ProbeConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Engine settings derived from [`ProbeConfig`], with durations resolved.
#[derive(Debug, Clone)]
pub struct ProbeSettings {
    /// Number of concurrent workers
    pub workers: usize,
    /// Shared limiter tuning
    pub limiter: LimiterSettings,
    /// Minimum pre-request jitter
    pub jitter_min: Duration,
    /// Maximum pre-request jitter
    pub jitter_max: Duration,
    /// Minimum extra pause after a 429
    pub rate_limit_pause_min: Duration,
    /// Maximum extra pause after a 429
    pub rate_limit_pause_max: Duration,
    /// Transport-retry backoff tuning
    pub backoff: BackoffSettings,
    /// Limiter penalty hint for transport errors
    pub transport_penalty: Duration,
    /// Limiter penalty hint for undecodable responses
    pub bad_response_penalty: Duration,
}

impl From<&ProbeConfig> for ProbeSettings {
    fn from(config: &ProbeConfig) -> Self {
        Self {
            workers: config.workers,
            limiter: LimiterSettings {
                start_rate: config.start_rate,
                min_rate: config.min_rate,
                max_rate: config.max_rate,
                recovery_step: config.recovery_step,
            },
            jitter_min: Duration::from_millis(config.jitter_min_ms),
            jitter_max: Duration::from_millis(config.jitter_max_ms),
            rate_limit_pause_min: Duration::from_millis(config.rate_limit_pause_min_ms),
            rate_limit_pause_max: Duration::from_millis(config.rate_limit_pause_max_ms),
            backoff: BackoffSettings {
                floor: Duration::from_millis(config.transport_backoff_floor_ms),
                ceiling: Duration::from_millis(config.transport_backoff_ceiling_ms),
                growth: config.backoff_growth,
                jitter: Duration::from_millis(config.backoff_jitter_ms),
            },
            transport_penalty: Duration::from_millis(config.transport_penalty_ms),
            bad_response_penalty: Duration::from_millis(config.bad_response_penalty_ms),
        }
    }
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self::from(&ProbeConfig::default())
    }
}

/// Everything a finished run produced.
#[derive(Debug)]
pub struct ProbeReport {
    /// The confirmed-available identifier, if one was found
    pub winner: Option<Candidate>,
    /// Terminal outcomes, one per resolved candidate
    pub results: Vec<ResultRecord>,
    /// Raw response log
    pub log: Vec<LogEntry>,
    /// Number of candidates that reached a terminal record
    pub checked: usize,
    /// Wall-clock duration of the run
    pub elapsed: Duration,
    /// Limiter rate at the end of the run
    pub final_rate: f64,
    /// Whether the run was stopped by an interrupt rather than a find or a drain
    pub interrupted: bool,
}

/// Coordinates one probing run over a prepared candidate list.
///
/// Owns the shared execution scope: queue, limiter, completion signal, and
/// aggregator all live behind `Arc`s handed to a fixed pool of workers.
pub struct ProbeOrchestrator {
    transport: Arc<dyn ValidationTransport>,
    settings: ProbeSettings,
    signal: Arc<CompletionSignal>,
    notifier: Option<Notifier>,
}

impl ProbeOrchestrator {
    /// Create an orchestrator over the given transport and settings.
    #[must_use]
    pub fn new(transport: Arc<dyn ValidationTransport>, settings: ProbeSettings) -> Self {
        Self {
            transport,
            settings,
            signal: Arc::new(CompletionSignal::new()),
            notifier: None,
        }
    }

    /// Set the callback invoked once when an available identifier is claimed.
    #[must_use]
    pub fn with_notifier(
        mut self,
        notifier: impl Fn(&Candidate) + Send + Sync + 'static,
    ) -> Self {
        self.notifier = Some(Arc::new(notifier));
        self
    }

    /// Handle to the completion signal, for wiring external interrupts.
    #[must_use]
    pub fn signal(&self) -> Arc<CompletionSignal> {
        self.signal.clone()
    }

    /// Run the pool to completion: first confirmed-available identifier,
    /// queue drained, or external stop.
    pub async fn run(self, candidates: Vec<Candidate>) -> ProbeReport {
        let started = Instant::now();

        let queue = Arc::new(TaskQueue::new(candidates));
        let limiter = Arc::new(AdaptiveRateLimiter::new(&self.settings.limiter));
        let aggregator = Arc::new(ResultAggregator::new());

        // One throwaway probe to seed the workers' token copies; starting
        // without a token is fine, the first AuthRequired refreshes it.
        let initial_token = self.transport.bootstrap_token().await;
        if initial_token.is_none() {
            debug!("starting without a bootstrap token");
        }

        let worker_count = self.settings.workers;
        let ctx = Arc::new(WorkerContext {
            queue,
            limiter: limiter.clone(),
            signal: self.signal.clone(),
            aggregator: aggregator.clone(),
            transport: self.transport.clone(),
            settings: self.settings,
            notifier: self.notifier,
        });

        info!(workers = worker_count, "starting probe pool");
        let mut workers: FuturesUnordered<_> = (0..worker_count)
            .map(|worker| run_worker(worker, ctx.clone(), initial_token.clone()))
            .collect();
        while workers.next().await.is_some() {}

        let (results, log) = aggregator.drain().await;
        let winner = self.signal.winner().cloned();
        let interrupted = winner.is_none() && self.signal.is_stopped();

        ProbeReport {
            checked: results.len(),
            winner,
            results,
            log,
            elapsed: started.elapsed(),
            final_rate: limiter.current_rate().await,
            interrupted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::AttemptOutcome;
    use async_trait::async_trait;

    struct UnreachableTransport;

    #[async_trait]
    impl ValidationTransport for UnreachableTransport {
        async fn probe(&self, _candidate: &Candidate, _token: Option<&str>) -> AttemptOutcome {
            unreachable!("no candidates were queued")
        }

        async fn bootstrap_token(&self) -> Option<String> {
            None
        }
    }

    #[tokio::test]
    async fn test_empty_queue_drains_immediately() {
        let orchestrator =
            ProbeOrchestrator::new(Arc::new(UnreachableTransport), ProbeSettings::default());
        let report = orchestrator.run(Vec::new()).await;

        assert_eq!(report.winner, None);
        assert!(report.results.is_empty());
        assert!(report.log.is_empty());
        assert_eq!(report.checked, 0);
        assert!(!report.interrupted);
    }

    #[test]
    fn test_settings_from_config() {
        let settings = ProbeSettings::from(&ProbeConfig::default());
        assert_eq!(settings.workers, 20);
        assert!((settings.limiter.start_rate - 8.0).abs() < f64::EPSILON);
        assert_eq!(settings.backoff.floor, Duration::from_millis(1000));
        assert_eq!(settings.backoff.ceiling, Duration::from_millis(5000));
        assert_eq!(settings.transport_penalty, Duration::from_millis(200));
    }
}
