//! Retry delay shaping for transport-level failures.
//!
//! Transport errors and undecodable responses retry the same candidate with
//! an exponentially growing delay, floored and capped, plus bounded random
//! jitter so concurrent workers don't retry in lockstep.

use rand::Rng;
use std::time::Duration;

/// Immutable backoff tuning, fixed at construction.
#[derive(Debug, Clone)]
pub struct BackoffSettings {
    /// First retry delay
    pub floor: Duration,
    /// Largest base delay the sequence may reach
    pub ceiling: Duration,
    /// Multiplier applied to the base after each failure
    pub growth: f64,
    /// Upper bound of the random additive jitter
    pub jitter: Duration,
}

/// Per-task exponential backoff state.
///
/// Constructed fresh for each candidate pulled off the queue; the base delay
/// never decreases and never exceeds the ceiling.
#[derive(Debug)]
pub struct TransportBackoff {
    base: Duration,
    settings: BackoffSettings,
}

impl TransportBackoff {
    /// Start a new backoff sequence at the configured floor.
    #[must_use]
    pub fn new(settings: BackoffSettings) -> Self {
        Self {
            base: settings.floor,
            settings,
        }
    }

    /// The delay to sleep before the next retry: current base plus jitter.
    ///
    /// Grows the base for the following call.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.base + jitter_up_to(self.settings.jitter);
        self.base = self
            .base
            .mul_f64(self.settings.growth)
            .min(self.settings.ceiling);
        delay
    }

    /// The current base delay, without jitter.
    #[must_use]
    pub fn current_base(&self) -> Duration {
        self.base
    }
}

/// Uniform random duration in `[0, max]`.
fn jitter_up_to(max: Duration) -> Duration {
    if max.is_zero() {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::thread_rng().gen_range(0..=max.as_millis() as u64))
}

/// Uniform random duration in `[min, max]`.
///
/// Used for the pre-request jitter that decorrelates worker phase at the
/// pacing boundary, and for the extra pause after a 429.
#[must_use]
pub fn jitter_in(min: Duration, max: Duration) -> Duration {
    if max <= min {
        return min;
    }
    Duration::from_millis(rand::thread_rng().gen_range(min.as_millis() as u64..=max.as_millis() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> BackoffSettings {
        BackoffSettings {
            floor: Duration::from_millis(1000),
            ceiling: Duration::from_millis(5000),
            growth: 1.5,
            jitter: Duration::ZERO,
        }
    }

    #[test]
    fn test_backoff_grows_to_ceiling_and_caps() {
        let mut backoff = TransportBackoff::new(settings());
        let delays: Vec<u64> = (0..8).map(|_| backoff.next_delay().as_millis() as u64).collect();

        assert_eq!(delays[0], 1000);
        assert_eq!(delays[1], 1500);
        assert_eq!(delays[2], 2250);
        assert_eq!(delays[3], 3375);
        // Capped from here on.
        assert!(delays[4..].iter().all(|&d| d == 5000));

        // Non-decreasing throughout.
        for pair in delays.windows(2) {
            assert!(pair[1] >= pair[0]);
        }
    }

    #[test]
    fn test_backoff_jitter_bounds() {
        let mut with_jitter = TransportBackoff::new(BackoffSettings {
            jitter: Duration::from_millis(300),
            ..settings()
        });
        for _ in 0..20 {
            let base = with_jitter.current_base();
            let delay = with_jitter.next_delay();
            assert!(delay >= base);
            assert!(delay <= base + Duration::from_millis(300));
        }
    }

    #[test]
    fn test_jitter_in_range() {
        let min = Duration::from_millis(20);
        let max = Duration::from_millis(100);
        for _ in 0..100 {
            let jitter = jitter_in(min, max);
            assert!(jitter >= min && jitter <= max, "jitter {jitter:?} out of range");
        }
    }

    #[test]
    fn test_jitter_in_degenerate_range() {
        let fixed = Duration::from_millis(50);
        assert_eq!(jitter_in(fixed, fixed), fixed);
        assert_eq!(
            jitter_in(Duration::from_millis(100), Duration::from_millis(20)),
            Duration::from_millis(100)
        );
    }
}
