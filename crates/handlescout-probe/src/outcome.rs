//! Attempt outcomes and response payload classification.
//!
//! Every network round-trip produces exactly one [`AttemptOutcome`], which the
//! worker's retry loop pattern-matches to decide between "retry the same
//! candidate", "advance to the next candidate", and "stop the whole run".
//! Making the outcome an explicit tagged variant keeps each transition
//! independently testable.

use serde::Deserialize;
use std::time::Duration;

/// The business verdict payload returned by the validation endpoint.
///
/// A response only counts as resolved when this decodes, which requires the
/// `code` discriminator to be present. An HTTP 200 with no discriminator is
/// a [`AttemptOutcome::BadResponse`], never availability.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationVerdict {
    /// Numeric status discriminator; zero means the identifier passed validation
    pub code: i64,
    /// Human-readable message accompanying the code
    #[serde(default)]
    pub message: String,
}

impl ValidationVerdict {
    /// Whether this verdict confirms the identifier is available for signup.
    ///
    /// Requires both the zero success code and a message confirming validity;
    /// either alone is not proof.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.code == 0 && self.message.to_lowercase().contains("valid")
    }
}

/// Result of one validation round-trip for a candidate.
#[derive(Debug, Clone)]
pub enum AttemptOutcome {
    /// A well-formed verdict payload was received
    Resolved {
        /// The decoded business verdict
        verdict: ValidationVerdict,
        /// HTTP status of the response
        status: u16,
        /// Raw response body, kept for the response log
        raw: String,
    },
    /// HTTP 429, with the parsed `Retry-After` duration if the server sent one
    RateLimited {
        /// Server-requested minimum wait before retrying
        retry_after: Option<Duration>,
    },
    /// HTTP 401/403 carrying a refreshed token header
    AuthRequired {
        /// The refreshed token to use on subsequent requests
        token: String,
    },
    /// The request never produced a response (connect, timeout, DNS, TLS)
    Transport {
        /// Transport error text
        error: String,
    },
    /// A response arrived but was not a decodable verdict payload
    BadResponse {
        /// HTTP status of the response
        status: u16,
        /// Raw response body
        body: String,
    },
}

impl AttemptOutcome {
    /// The coarse kind of this outcome, used for transition-edge logging.
    #[must_use]
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Resolved { .. } => OutcomeKind::Resolved,
            Self::RateLimited { .. } => OutcomeKind::RateLimited,
            Self::AuthRequired { .. } => OutcomeKind::AuthRequired,
            Self::Transport { .. } => OutcomeKind::Transport,
            Self::BadResponse { .. } => OutcomeKind::BadResponse,
        }
    }
}

/// Coarse outcome classification.
///
/// The worker logs a candidate's failure at most once per *transition* into
/// each kind, so a candidate stuck behind a flaky link produces one line, not
/// one per retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeKind {
    /// A well-formed verdict was received
    Resolved,
    /// HTTP 429
    RateLimited,
    /// HTTP 401/403 with a refreshed token
    AuthRequired,
    /// Transport-level failure
    Transport,
    /// Undecodable response
    BadResponse,
}
