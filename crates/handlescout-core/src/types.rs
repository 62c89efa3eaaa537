//! Shared types used across the handlescout workspace.

use crate::error::CoreError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Newtype for a candidate identifier with validation.
///
/// Candidates are opaque once constructed: the probe engine never inspects
/// their content, only forwards them to the validation endpoint. Validation
/// happens here, at the boundary, so nothing downstream has to re-check.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Candidate(String);

impl Candidate {
    /// Create a new `Candidate` from a string.
    ///
    /// # Errors
    /// Returns error if the candidate is empty, longer than 64 characters,
    /// or contains whitespace.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        Self::validate(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate candidate format: 1-64 non-whitespace characters.
    fn validate(id: &str) -> Result<(), CoreError> {
        static CANDIDATE_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex =
            CANDIDATE_REGEX.get_or_init(|| Regex::new(r"^\S{1,64}$").expect("valid regex"));

        if regex.is_match(id) {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "invalid candidate: must be 1-64 non-whitespace characters, got '{id}'"
            )))
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_valid() {
        let valid = vec!["alice", "blue_falcon", "x", "user-42", "Ab3"];
        for id in valid {
            assert!(Candidate::new(id).is_ok(), "Failed for: {id}");
        }
    }

    #[test]
    fn test_candidate_invalid() {
        let too_long = "a".repeat(65);
        let invalid = vec!["", "has space", "tab\there", "new\nline", too_long.as_str()];
        for id in invalid {
            assert!(Candidate::new(id).is_err(), "Should fail for: {id:?}");
        }
    }

    #[test]
    fn test_candidate_display() {
        let candidate = Candidate::new("alice").expect("valid candidate");
        assert_eq!(candidate.to_string(), "alice");
        assert_eq!(candidate.as_str(), "alice");
    }

    #[test]
    fn test_candidate_serialization() {
        let candidate = Candidate::new("alice").expect("valid candidate");
        let json = serde_json::to_string(&candidate).expect("serialize candidate");
        assert_eq!(json, "\"alice\"");

        let parsed: Candidate = serde_json::from_str(&json).expect("deserialize candidate");
        assert_eq!(parsed, candidate);
    }
}
