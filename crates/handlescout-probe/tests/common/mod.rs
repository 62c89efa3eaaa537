//! Scripted transport for driving the pool without a network.

use async_trait::async_trait;
use handlescout_core::Candidate;
use handlescout_probe::{AttemptOutcome, ValidationTransport, ValidationVerdict};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// A `ValidationTransport` that replays a fixed outcome sequence per
/// candidate (the last outcome repeats forever) and records every call.
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, Vec<AttemptOutcome>>>,
    delays: HashMap<String, Duration>,
    calls: Mutex<HashMap<String, Vec<CallRecord>>>,
    bootstrap: Option<String>,
}

/// One observed probe call.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub at: Instant,
    pub token: Option<String>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            scripts: Mutex::new(HashMap::new()),
            delays: HashMap::new(),
            calls: Mutex::new(HashMap::new()),
            bootstrap: None,
        }
    }

    /// Script the outcome sequence for one candidate.
    pub fn script(mut self, name: &str, outcomes: Vec<AttemptOutcome>) -> Self {
        self.scripts
            .get_mut()
            .insert(name.to_string(), outcomes);
        self
    }

    /// Delay every response for one candidate (simulates a slow round-trip).
    pub fn delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Token handed out by the bootstrap probe.
    pub fn with_bootstrap(mut self, token: &str) -> Self {
        self.bootstrap = Some(token.to_string());
        self
    }

    pub async fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .await
            .get(name)
            .map_or(0, Vec::len)
    }

    pub async fn calls(&self, name: &str) -> Vec<CallRecord> {
        self.calls
            .lock()
            .await
            .get(name)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ValidationTransport for ScriptedTransport {
    async fn probe(&self, candidate: &Candidate, token: Option<&str>) -> AttemptOutcome {
        let name = candidate.as_str().to_string();
        self.calls
            .lock()
            .await
            .entry(name.clone())
            .or_default()
            .push(CallRecord {
                at: Instant::now(),
                token: token.map(str::to_string),
            });

        if let Some(delay) = self.delays.get(&name) {
            tokio::time::sleep(*delay).await;
        }

        let mut scripts = self.scripts.lock().await;
        let outcomes = scripts
            .get_mut(&name)
            .unwrap_or_else(|| panic!("no script for candidate {name}"));
        if outcomes.len() > 1 {
            outcomes.remove(0)
        } else {
            outcomes[0].clone()
        }
    }

    async fn bootstrap_token(&self) -> Option<String> {
        self.bootstrap.clone()
    }
}

/// A resolved "unavailable" outcome with the given message.
pub fn taken(message: &str) -> AttemptOutcome {
    AttemptOutcome::Resolved {
        verdict: ValidationVerdict {
            code: 1,
            message: message.to_string(),
        },
        status: 200,
        raw: format!(r#"{{"code":1,"message":"{message}"}}"#),
    }
}

/// A resolved "available" outcome.
pub fn available() -> AttemptOutcome {
    AttemptOutcome::Resolved {
        verdict: ValidationVerdict {
            code: 0,
            message: "Username is valid".to_string(),
        },
        status: 200,
        raw: r#"{"code":0,"message":"Username is valid"}"#.to_string(),
    }
}

/// Build validated candidates from plain names.
pub fn candidates(names: &[&str]) -> Vec<Candidate> {
    names
        .iter()
        .map(|n| Candidate::new(*n).expect("valid candidate"))
        .collect()
}
