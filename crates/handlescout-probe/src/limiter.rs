//! Process-wide adaptive rate limiter.
//!
//! One shared gate paces all outbound requests: the remote server imposes its
//! limit on the whole process, not on any single worker, so a single
//! exclusive-access critical section over `{rate, next_allowed}` is the
//! simplest construct that stays correct under N concurrent callers.
//!
//! The control loop is AIMD: additive increase on every successful parseable
//! response, multiplicative decrease on any rejection or failure signal.

use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{self, Instant};

/// Immutable limiter tuning, fixed at construction.
#[derive(Debug, Clone)]
pub struct LimiterSettings {
    /// Initial aggregate rate in requests/second
    pub start_rate: f64,
    /// Floor the rate never drops below
    pub min_rate: f64,
    /// Ceiling the rate never exceeds
    pub max_rate: f64,
    /// Additive increase per successful response
    pub recovery_step: f64,
}

#[derive(Debug)]
struct LimiterState {
    current_rate: f64,
    next_allowed: Instant,
}

/// Shared AIMD pacing gate.
///
/// All three operations serialize on one internal lock; `acquire` holds it
/// across its wait so the leaky-bucket interval applies to the aggregate
/// request stream, not per caller.
#[derive(Debug)]
pub struct AdaptiveRateLimiter {
    min_rate: f64,
    max_rate: f64,
    recovery_step: f64,
    state: Mutex<LimiterState>,
}

impl AdaptiveRateLimiter {
    /// Create a limiter starting at `settings.start_rate`.
    #[must_use]
    pub fn new(settings: &LimiterSettings) -> Self {
        Self {
            min_rate: settings.min_rate,
            max_rate: settings.max_rate,
            recovery_step: settings.recovery_step,
            state: Mutex::new(LimiterState {
                current_rate: settings.start_rate.clamp(settings.min_rate, settings.max_rate),
                next_allowed: Instant::now(),
            }),
        }
    }

    /// Wait for the next request slot.
    ///
    /// Suspends the caller until `next_allowed`, then reserves the following
    /// slot `1 / current_rate` later. At most `current_rate` requests per
    /// second are granted across all callers combined.
    pub async fn acquire(&self) {
        let mut state = self.state.lock().await;
        let interval = Duration::from_secs_f64(1.0 / state.current_rate.max(0.001));
        if Instant::now() < state.next_allowed {
            time::sleep_until(state.next_allowed).await;
        }
        state.next_allowed = Instant::now() + interval;
    }

    /// Multiplicative decrease on a rejection or failure signal.
    ///
    /// Halves the rate (floored at `min_rate`). If the server asked for a
    /// positive wait, pushes `next_allowed` out to honor it; the deadline is
    /// never rewound.
    pub async fn penalize(&self, retry_after: Option<Duration>) {
        let mut state = self.state.lock().await;
        if let Some(wait) = retry_after {
            if wait > Duration::ZERO {
                state.next_allowed = state.next_allowed.max(Instant::now() + wait);
            }
        }
        state.current_rate = (state.current_rate / 2.0).max(self.min_rate);
    }

    /// Additive increase after a successful, parseable response.
    pub async fn reward(&self) {
        let mut state = self.state.lock().await;
        state.current_rate = (state.current_rate + self.recovery_step).min(self.max_rate);
    }

    /// Snapshot of the current rate, for observability and tests.
    pub async fn current_rate(&self) -> f64 {
        self.state.lock().await.current_rate
    }
}
