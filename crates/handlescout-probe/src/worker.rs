//! Worker loop: pull candidates and drive each through the retry state machine.
//!
//! The per-candidate loop is the explicit form of the retry state machine:
//! every attempt produces one [`AttemptOutcome`], and the match below is the
//! complete transition table. Non-resolved outcomes loop back to another
//! attempt after their delay; `Resolved` is terminal for the candidate, and
//! an available verdict is terminal for the whole run.
//!
//! The completion signal is polled at queue pull, at the top of every
//! attempt, after every sleep, and after every network call. An in-flight
//! call is never aborted, but its result is discarded once the signal is
//! observed set.

use crate::aggregator::ResultAggregator;
use crate::backoff::{jitter_in, TransportBackoff};
use crate::client::ValidationTransport;
use crate::limiter::AdaptiveRateLimiter;
use crate::orchestrator::ProbeSettings;
use crate::outcome::{AttemptOutcome, OutcomeKind};
use crate::queue::TaskQueue;
use crate::record::{LogEntry, ResolvedKind, ResultRecord};
use crate::signal::CompletionSignal;
use handlescout_core::Candidate;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Callback invoked once by the worker that claims the winning identifier.
pub type Notifier = Arc<dyn Fn(&Candidate) + Send + Sync>;

/// Shared state handed to every worker.
pub(crate) struct WorkerContext {
    pub queue: Arc<TaskQueue>,
    pub limiter: Arc<AdaptiveRateLimiter>,
    pub signal: Arc<CompletionSignal>,
    pub aggregator: Arc<ResultAggregator>,
    pub transport: Arc<dyn ValidationTransport>,
    pub settings: ProbeSettings,
    pub notifier: Option<Notifier>,
}

/// Outer worker loop: pull, resolve, repeat until drained or stopped.
///
/// `token` is this worker's private copy of the auth token; refreshes are
/// not propagated to other workers.
pub(crate) async fn run_worker(worker: usize, ctx: Arc<WorkerContext>, mut token: Option<String>) {
    loop {
        if ctx.signal.is_stopped() {
            return;
        }
        let Some(candidate) = ctx.queue.take().await else {
            debug!(worker, "queue drained, worker exiting");
            return;
        };
        resolve_candidate(worker, &candidate, &mut token, &ctx).await;
    }
}

/// Drive one candidate to resolution or abandonment.
async fn resolve_candidate(
    worker: usize,
    candidate: &Candidate,
    token: &mut Option<String>,
    ctx: &WorkerContext,
) {
    let settings = &ctx.settings;
    let mut backoff = TransportBackoff::new(settings.backoff.clone());
    let mut last_kind: Option<OutcomeKind> = None;

    loop {
        if ctx.signal.is_stopped() {
            return;
        }

        ctx.limiter.acquire().await;
        sleep(jitter_in(settings.jitter_min, settings.jitter_max)).await;
        if ctx.signal.is_stopped() {
            return;
        }

        let outcome = ctx.transport.probe(candidate, token.as_deref()).await;

        if ctx.signal.is_stopped() {
            // The run ended while this call was in flight; discard the result.
            return;
        }

        note_transition(worker, candidate, outcome.kind(), &mut last_kind);

        match outcome {
            AttemptOutcome::RateLimited { retry_after } => {
                ctx.limiter.penalize(retry_after).await;
                sleep(jitter_in(
                    settings.rate_limit_pause_min,
                    settings.rate_limit_pause_max,
                ))
                .await;
            }
            AttemptOutcome::AuthRequired { token: fresh } => {
                *token = Some(fresh);
                // Retry immediately; the next pass re-acquires the limiter.
            }
            AttemptOutcome::Transport { error } => {
                ctx.aggregator
                    .record_log(LogEntry::Transport {
                        candidate: candidate.clone(),
                        error,
                    })
                    .await;
                ctx.limiter.penalize(Some(settings.transport_penalty)).await;
                sleep(backoff.next_delay()).await;
            }
            AttemptOutcome::BadResponse { status, body } => {
                // Unlike a transport failure, a response was actually
                // received here, so it goes in the response log.
                ctx.aggregator
                    .record_log(LogEntry::Response {
                        candidate: candidate.clone(),
                        status,
                        payload: body,
                    })
                    .await;
                ctx.limiter
                    .penalize(Some(settings.bad_response_penalty))
                    .await;
                sleep(backoff.next_delay()).await;
            }
            AttemptOutcome::Resolved {
                verdict,
                status,
                raw,
            } => {
                ctx.limiter.reward().await;
                ctx.aggregator
                    .record_log(LogEntry::Response {
                        candidate: candidate.clone(),
                        status,
                        payload: raw,
                    })
                    .await;

                if verdict.is_available() {
                    if ctx.signal.try_claim(candidate.clone()) {
                        info!(worker, %candidate, "candidate is AVAILABLE");
                        if let Some(notify) = &ctx.notifier {
                            notify(candidate);
                        }
                        ctx.aggregator
                            .record_result(ResultRecord {
                                candidate: candidate.clone(),
                                kind: ResolvedKind::Available,
                                message: verdict.message,
                            })
                            .await;
                    }
                    // Losing the claim race means another identifier already
                    // won; this result is discarded.
                } else {
                    let trimmed = verdict.message.trim();
                    let message = if trimmed.is_empty() {
                        "not available".to_string()
                    } else {
                        trimmed.to_string()
                    };
                    info!(worker, %candidate, "not available");
                    ctx.aggregator
                        .record_result(ResultRecord {
                            candidate: candidate.clone(),
                            kind: ResolvedKind::Taken,
                            message,
                        })
                        .await;
                }
                return;
            }
        }
    }
}

/// Log a candidate's failure at most once per transition into each kind.
fn note_transition(
    worker: usize,
    candidate: &Candidate,
    kind: OutcomeKind,
    last: &mut Option<OutcomeKind>,
) {
    if *last == Some(kind) {
        return;
    }
    match kind {
        OutcomeKind::RateLimited => warn!(worker, %candidate, "rate limited, backing off"),
        OutcomeKind::AuthRequired => debug!(worker, %candidate, "token rejected, refreshing"),
        OutcomeKind::Transport => warn!(worker, %candidate, "network error, retrying"),
        OutcomeKind::BadResponse => warn!(worker, %candidate, "unexpected response, retrying"),
        OutcomeKind::Resolved => {}
    }
    *last = Some(kind);
}
