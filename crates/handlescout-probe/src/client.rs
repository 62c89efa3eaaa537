//! Validation endpoint transport.
//!
//! [`ValidationTransport`] is the seam between the retry machinery and the
//! network: workers drive candidates through it and receive classified
//! [`AttemptOutcome`]s. [`HttpValidator`] is the production implementation
//! over reqwest; tests substitute scripted transports.

use crate::error::{ProbeError, Result};
use crate::outcome::{AttemptOutcome, ValidationVerdict};
use async_trait::async_trait;
use handlescout_core::{Candidate, EndpointConfig};
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE, ORIGIN, REFERER, RETRY_AFTER,
    USER_AGENT,
};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;

/// Identifier used for the throwaway token-harvesting probe.
const BOOTSTRAP_PROBE: &str = "token_probe";

/// One validation round-trip against the upstream endpoint.
///
/// Implementations must be thread-safe (`Send + Sync`): a single transport
/// instance is shared by every worker in the pool.
#[async_trait]
pub trait ValidationTransport: Send + Sync {
    /// Probe one candidate, attaching `token` to the request if present.
    ///
    /// Never fails: every way the round-trip can go is a classified
    /// [`AttemptOutcome`] for the retry loop to act on.
    async fn probe(&self, candidate: &Candidate, token: Option<&str>) -> AttemptOutcome;

    /// Send a throwaway probe solely to harvest an initial token.
    ///
    /// Failure is tolerated; `None` means workers start without a token and
    /// pick one up on their first `AuthRequired` transition.
    async fn bootstrap_token(&self) -> Option<String>;
}

/// Production transport speaking the upstream validation HTTP contract.
pub struct HttpValidator {
    client: Client,
    endpoint: EndpointConfig,
}

impl HttpValidator {
    /// Build the HTTP client with the configured header mimicry and timeouts.
    pub fn new(endpoint: EndpointConfig) -> Result<Self> {
        let client = Client::builder()
            .default_headers(build_headers(&endpoint)?)
            .timeout(Duration::from_secs(endpoint.timeout_secs))
            .connect_timeout(Duration::from_secs(endpoint.connect_timeout_secs))
            .build()?;

        Ok(Self { client, endpoint })
    }

    async fn send(&self, identifier: &str, token: Option<&str>) -> reqwest::Result<Response> {
        let body = serde_json::json!({
            "username": identifier,
            "context": self.endpoint.context,
            "birthday": self.endpoint.birthday,
        });

        let mut request = self.client.post(&self.endpoint.url).json(&body);
        if let Some(token) = token {
            request = request.header(self.endpoint.token_header.as_str(), token);
        }
        request.send().await
    }

    /// Classify a received response into an attempt outcome.
    async fn classify(&self, response: Response) -> AttemptOutcome {
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return AttemptOutcome::RateLimited {
                retry_after: parse_retry_after(response.headers()),
            };
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if let Some(token) = header_str(response.headers(), &self.endpoint.token_header) {
                return AttemptOutcome::AuthRequired {
                    token: token.to_string(),
                };
            }
            // No refreshed token means no recovery for this attempt; fall
            // through to the undecodable-response path.
        }

        let status = status.as_u16();
        let body = response.text().await.unwrap_or_default();

        if status != 200 {
            return AttemptOutcome::BadResponse { status, body };
        }

        match serde_json::from_str::<ValidationVerdict>(&body) {
            Ok(verdict) => AttemptOutcome::Resolved {
                verdict,
                status,
                raw: body,
            },
            Err(_) => AttemptOutcome::BadResponse { status, body },
        }
    }
}

#[async_trait]
impl ValidationTransport for HttpValidator {
    async fn probe(&self, candidate: &Candidate, token: Option<&str>) -> AttemptOutcome {
        match self.send(candidate.as_str(), token).await {
            Ok(response) => self.classify(response).await,
            Err(e) => AttemptOutcome::Transport {
                error: e.to_string(),
            },
        }
    }

    async fn bootstrap_token(&self) -> Option<String> {
        match self.send(BOOTSTRAP_PROBE, None).await {
            Ok(response) => {
                header_str(response.headers(), &self.endpoint.token_header).map(str::to_string)
            }
            Err(e) => {
                tracing::debug!("bootstrap token probe failed: {e}");
                None
            }
        }
    }
}

fn build_headers(endpoint: &EndpointConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let pairs = [
        (ACCEPT, &endpoint.accept),
        (CONTENT_TYPE, &endpoint.content_type),
        (ORIGIN, &endpoint.origin),
        (REFERER, &endpoint.referer),
        (ACCEPT_LANGUAGE, &endpoint.accept_language),
        (USER_AGENT, &endpoint.user_agent),
    ];
    for (name, value) in pairs {
        let value = HeaderValue::from_str(value).map_err(|e| ProbeError::InvalidHeader {
            header: name.as_str().to_string(),
            reason: e.to_string(),
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// Extract a non-empty header value as a string.
fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
}

/// Parse a `Retry-After` header given in (optionally fractional) seconds.
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse::<f64>().ok())
        .filter(|secs| *secs > 0.0)
        .map(Duration::from_secs_f64)
}
