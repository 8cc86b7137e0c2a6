//! HTTP attempt executor backed by reqwest

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::debug;

use crate::domain::stats::{AttemptExecutor, AttemptOutcome, Candidate, DEFAULT_SNIPPET_CAP};
use crate::domain::DomainError;
use crate::infrastructure::observability::record_upstream_attempt;

/// Default ceiling for a single upstream attempt
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(5);

/// Issues one GET per candidate and classifies whatever comes back
#[derive(Debug, Clone)]
pub struct HttpAttemptExecutor {
    client: Client,
    timeout: Duration,
    snippet_cap: usize,
}

impl HttpAttemptExecutor {
    pub fn new(timeout: Duration, snippet_cap: usize) -> Result<Self, DomainError> {
        let client = Client::builder()
            .connect_timeout(timeout)
            .build()
            .map_err(|e| DomainError::internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(client, timeout, snippet_cap))
    }

    pub fn with_client(client: Client, timeout: Duration, snippet_cap: usize) -> Self {
        Self {
            client,
            timeout,
            snippet_cap,
        }
    }

    async fn fetch(&self, candidate: Candidate) -> AttemptOutcome {
        let mut request = self.client.get(candidate.url()).timeout(self.timeout);

        for (name, value) in candidate.headers() {
            request = request.header(name, value);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                let detail = self.describe_error(e);
                return AttemptOutcome::network_error(candidate, detail);
            }
        };

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        match response.text().await {
            Ok(body) if body.is_empty() => AttemptOutcome::network_error(
                candidate,
                format!("empty response body (HTTP {})", status),
            ),
            Ok(body) => AttemptOutcome::from_response(
                candidate,
                status,
                content_type,
                &body,
                self.snippet_cap,
            ),
            Err(e) => {
                let detail = format!("failed to read response body: {}", self.describe_error(e));
                AttemptOutcome::network_error(candidate, detail)
            }
        }
    }

    fn describe_error(&self, error: reqwest::Error) -> String {
        if error.is_timeout() {
            format!("request timed out after {} ms", self.timeout.as_millis())
        } else if error.is_connect() {
            "connection failed".to_string()
        } else if error.is_builder() {
            "invalid request".to_string()
        } else {
            format!("request failed: {}", error.without_url())
        }
    }
}

impl Default for HttpAttemptExecutor {
    fn default() -> Self {
        Self::with_client(Client::new(), DEFAULT_ATTEMPT_TIMEOUT, DEFAULT_SNIPPET_CAP)
    }
}

#[async_trait]
impl AttemptExecutor for HttpAttemptExecutor {
    async fn execute(&self, candidate: Candidate) -> AttemptOutcome {
        let strategy = candidate.strategy();
        let start = Instant::now();

        let outcome = self.fetch(candidate).await;
        let elapsed = start.elapsed();

        debug!(
            strategy = %strategy,
            classification = %outcome.classification(),
            duration_ms = %elapsed.as_millis(),
            "Attempt executed"
        );
        record_upstream_attempt(strategy, outcome.classification(), elapsed);

        outcome
    }
}
