//! Terminal records produced by a probing run.

use handlescout_core::Candidate;
use serde::Serialize;
use std::fmt;

/// How a candidate was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolvedKind {
    /// The identifier is unavailable
    Taken,
    /// The identifier is available for signup
    Available,
}

impl fmt::Display for ResolvedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Taken => write!(f, "taken"),
            Self::Available => write!(f, "available"),
        }
    }
}

/// Terminal outcome for a candidate that reached resolution.
///
/// Appended exactly once per resolved candidate; abandoned candidates (run
/// stopped while they were pending or in flight) get no record at all.
#[derive(Debug, Clone, Serialize)]
pub struct ResultRecord {
    /// The candidate identifier
    pub candidate: Candidate,
    /// How it resolved
    pub kind: ResolvedKind,
    /// The server's message, or a placeholder when it sent none
    pub message: String,
}

/// One line of the raw response log.
#[derive(Debug, Clone)]
pub enum LogEntry {
    /// A round-trip that produced a response which reached the parse stage
    Response {
        /// The candidate identifier
        candidate: Candidate,
        /// HTTP status code
        status: u16,
        /// Response payload, or empty when the body was unreadable
        payload: String,
    },
    /// A round-trip that never produced a response
    Transport {
        /// The candidate identifier
        candidate: Candidate,
        /// Transport error text
        error: String,
    },
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Response {
                candidate,
                status,
                payload,
            } => write!(f, "{candidate} -> {status} {payload}"),
            Self::Transport { candidate, error } => {
                write!(f, "{candidate} -> network error: {error}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(s: &str) -> Candidate {
        Candidate::new(s).expect("valid candidate")
    }

    #[test]
    fn test_resolved_kind_display() {
        assert_eq!(ResolvedKind::Taken.to_string(), "taken");
        assert_eq!(ResolvedKind::Available.to_string(), "available");
    }

    #[test]
    fn test_log_entry_response_display() {
        let entry = LogEntry::Response {
            candidate: candidate("alice"),
            status: 200,
            payload: r#"{"code":1,"message":"taken"}"#.to_string(),
        };
        assert_eq!(entry.to_string(), r#"alice -> 200 {"code":1,"message":"taken"}"#);
    }

    #[test]
    fn test_log_entry_transport_display() {
        let entry = LogEntry::Transport {
            candidate: candidate("bob"),
            error: "connection refused".to_string(),
        };
        assert_eq!(entry.to_string(), "bob -> network error: connection refused");
    }
}
