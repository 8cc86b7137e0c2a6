//! Outbound stats envelopes

use axum::{
    http::{header::CACHE_CONTROL, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::domain::stats::{AttemptOutcome, Classification, Strategy};
use crate::domain::{ResolutionError, ResolutionResult};

/// JSON body shared by every stats response.
///
/// `status` and `url` are always present (possibly `null`); the rest depend on the outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsEnvelope {
    pub ok: bool,
    pub status: Option<u16>,
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attempts: Option<Vec<AttemptView>>,
}

/// Diagnostic view of one attempt; request headers are never included
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptView {
    pub url: String,
    pub strategy: Strategy,
    pub http_status: Option<u16>,
    pub content_type: Option<String>,
    pub classification: Classification,
    pub body_snippet: String,
    pub error_detail: Option<String>,
}

impl From<&AttemptOutcome> for AttemptView {
    fn from(outcome: &AttemptOutcome) -> Self {
        Self {
            url: outcome.candidate().url().to_string(),
            strategy: outcome.candidate().strategy(),
            http_status: outcome.http_status(),
            content_type: outcome.content_type().map(str::to_string),
            classification: outcome.classification(),
            body_snippet: outcome.body_snippet().to_string(),
            error_detail: outcome.error_detail().map(str::to_string),
        }
    }
}

/// Status code, caching directive and body, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundEnvelope {
    pub status: StatusCode,
    pub cache_control: String,
    pub body: StatsEnvelope,
}

impl IntoResponse for OutboundEnvelope {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();

        if let Ok(value) = HeaderValue::from_str(&self.cache_control) {
            response.headers_mut().insert(CACHE_CONTROL, value);
        }

        response
    }
}

/// Shared-cache freshness for successful responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub max_age_secs: u64,
    pub stale_while_revalidate_secs: u64,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            max_age_secs: 30,
            stale_while_revalidate_secs: 60,
        }
    }
}

impl CachePolicy {
    fn success_header(&self) -> String {
        format!(
            "public, s-maxage={}, stale-while-revalidate={}",
            self.max_age_secs, self.stale_while_revalidate_secs
        )
    }
}

const NO_STORE: &str = "no-store";

/// Maps resolution results and pre-flight errors onto envelopes
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseBuilder {
    policy: CachePolicy,
}

impl ResponseBuilder {
    pub fn new(policy: CachePolicy) -> Self {
        Self { policy }
    }

    pub fn build(&self, result: ResolutionResult) -> OutboundEnvelope {
        let last = result.last_attempt();
        let status = last.and_then(AttemptOutcome::http_status);
        let url = last.map(|a| a.candidate().url().to_string());

        if result.succeeded {
            return OutboundEnvelope {
                status: StatusCode::OK,
                cache_control: self.policy.success_header(),
                body: StatsEnvelope {
                    ok: true,
                    status,
                    url,
                    data: result.data,
                    error: None,
                    detail: None,
                    attempts: None,
                },
            };
        }

        let error = result
            .terminal_classification()
            .map(ResolutionError::from_terminal)
            .unwrap_or(ResolutionError::UpstreamUnreachable);

        OutboundEnvelope {
            status: StatusCode::BAD_GATEWAY,
            cache_control: NO_STORE.to_string(),
            body: StatsEnvelope {
                ok: false,
                status,
                url,
                data: None,
                error: Some(error.to_string()),
                detail: None,
                attempts: Some(result.attempts.iter().map(AttemptView::from).collect()),
            },
        }
    }

    /// Envelope for an error raised before any upstream attempt
    pub fn reject(&self, error: &ResolutionError) -> OutboundEnvelope {
        let (status, message, detail) = match error {
            ResolutionError::ConfigurationInvalid { reason } => (
                StatusCode::BAD_REQUEST,
                "configuration invalid".to_string(),
                Some(reason.clone()),
            ),
            ResolutionError::Disabled => (StatusCode::BAD_REQUEST, error.to_string(), None),
            ResolutionError::Internal { .. } => {
                (StatusCode::INTERNAL_SERVER_ERROR, error.to_string(), None)
            }
            other => (StatusCode::BAD_GATEWAY, other.to_string(), None),
        };

        OutboundEnvelope {
            status,
            cache_control: NO_STORE.to_string(),
            body: StatsEnvelope {
                ok: false,
                status: None,
                url: None,
                data: None,
                error: Some(message),
                detail,
                attempts: None,
            },
        }
    }
}
