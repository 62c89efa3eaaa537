//! Error types for the probe engine.
//!
//! Only setup failures surface as errors here. Everything that can go wrong
//! during a probing run — rate limits, auth churn, transport failures,
//! undecodable responses — is a recoverable [`AttemptOutcome`](crate::AttemptOutcome)
//! variant handled by the retry loop, never an error that aborts the run.

use thiserror::Error;

/// Errors raised while constructing the probe engine.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// Failed to build the underlying HTTP client
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[from] reqwest::Error),

    /// A configured header value is not a legal HTTP header
    #[error("invalid header value for {header}: {reason}")]
    InvalidHeader {
        /// Header name
        header: String,
        /// Reason the value was rejected
        reason: String,
    },
}

/// Result type alias for probe setup operations.
pub type Result<T> = std::result::Result<T, ProbeError>;
