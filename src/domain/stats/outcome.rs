//! Outcome of a single upstream attempt

use serde_json::Value;

use super::classifier::{classify, Classification};
use super::Candidate;

/// Default cap for diagnostic body snippets, in characters
pub const DEFAULT_SNIPPET_CAP: usize = 1500;

/// Everything observed while executing one [`Candidate`].
///
/// `parsed_body` is present if and only if the classification is
/// [`Classification::JsonSuccess`]; the constructors are the only way to build one.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptOutcome {
    candidate: Candidate,
    http_status: Option<u16>,
    content_type: Option<String>,
    body_snippet: String,
    classification: Classification,
    parsed_body: Option<Value>,
    error_detail: Option<String>,
}

impl AttemptOutcome {
    /// Classify a response whose body has been read as text
    pub fn from_response(
        candidate: Candidate,
        http_status: u16,
        content_type: Option<String>,
        raw_body: &str,
        snippet_cap: usize,
    ) -> Self {
        let classified = classify(raw_body, http_status, content_type.as_deref());

        Self {
            candidate,
            http_status: Some(http_status),
            content_type,
            body_snippet: snippet(raw_body, snippet_cap),
            classification: classified.classification,
            parsed_body: classified.parsed_body,
            error_detail: classified.detail,
        }
    }

    /// Transport-level failure; no status or body was received
    pub fn network_error(candidate: Candidate, detail: impl Into<String>) -> Self {
        Self {
            candidate,
            http_status: None,
            content_type: None,
            body_snippet: String::new(),
            classification: Classification::NetworkError,
            parsed_body: None,
            error_detail: Some(detail.into()),
        }
    }

    pub fn candidate(&self) -> &Candidate {
        &self.candidate
    }

    pub fn http_status(&self) -> Option<u16> {
        self.http_status
    }

    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn body_snippet(&self) -> &str {
        &self.body_snippet
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn parsed_body(&self) -> Option<&Value> {
        self.parsed_body.as_ref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn is_success(&self) -> bool {
        self.classification == Classification::JsonSuccess
    }
}

/// First `cap` characters of `text`
pub fn snippet(text: &str, cap: usize) -> String {
    match text.char_indices().nth(cap) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}
