//! Handlescout Probe - Concurrent availability probing engine.
//!
//! This crate implements the interesting part of handlescout: sustained
//! high-concurrency request dispatch against a single upstream under an
//! unknown, adaptive rate limit, with per-candidate retry discipline and
//! first-match cooperative cancellation across the pool.
//!
//! # Features
//!
//! - Process-wide AIMD rate limiter shared by all workers
//! - Explicit per-candidate retry state machine over tagged attempt outcomes
//! - Fixed-size worker pool pulling from a shared queue
//! - Single-writer-wins completion signal with broadcast stop
//! - Concurrency-safe result and response-log aggregation
//! - reqwest transport behind a trait seam, so tests script the wire
//!
//! # Example
//!
//! ```rust,ignore
//! use handlescout_probe::{HttpValidator, ProbeOrchestrator, ProbeSettings};
//! use std::sync::Arc;
//!
//! let transport = Arc::new(HttpValidator::new(config.endpoint.clone())?);
//! let orchestrator = ProbeOrchestrator::new(transport, ProbeSettings::from(&config.probe))
//!     .with_notifier(|candidate| println!("{candidate} is available!"));
//!
//! let report = orchestrator.run(candidates).await;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::cast_possible_truncation)]

pub mod aggregator;
pub mod backoff;
pub mod client;
pub mod error;
pub mod limiter;
pub mod orchestrator;
pub mod outcome;
pub mod queue;
pub mod record;
pub mod signal;
mod worker;

// Re-export commonly used types
pub use aggregator::ResultAggregator;
pub use backoff::{jitter_in, BackoffSettings, TransportBackoff};
pub use client::{HttpValidator, ValidationTransport};
pub use error::{ProbeError, Result};
pub use limiter::{AdaptiveRateLimiter, LimiterSettings};
pub use orchestrator::{ProbeOrchestrator, ProbeReport, ProbeSettings};
pub use outcome::{AttemptOutcome, OutcomeKind, ValidationVerdict};
pub use queue::TaskQueue;
pub use record::{LogEntry, ResolvedKind, ResultRecord};
pub use signal::CompletionSignal;
pub use worker::Notifier;
