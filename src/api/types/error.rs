//! JSON error bodies for non-stats routes

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Error body: `{ "error": "...", "code": "..." }`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: message.into(),
                code: None,
            },
        }
    }

    /// Add error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.response.code = Some(code.into());
        self
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message } => Self::bad_request(message),
            DomainError::Provider { .. } => Self::internal("upstream provider failed"),
            DomainError::Configuration { .. } | DomainError::Internal { .. } => {
                Self::internal("internal error")
            }
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status, self.response.error)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_creation() {
        let err = ApiError::bad_request("No content provided");
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert_eq!(err.response.error, "No content provided");
        assert!(err.response.code.is_none());
    }

    #[test]
    fn test_validation_maps_to_bad_request() {
        let api_err: ApiError = DomainError::validation("No content provided").into();

        assert_eq!(api_err.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_err.response.error, "No content provided");
    }

    #[test]
    fn test_provider_details_are_not_exposed() {
        let api_err: ApiError = DomainError::provider("cohere", "HTTP 401: bad token").into();

        assert_eq!(api_err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api_err.response.error.contains("401"));
    }

    #[test]
    fn test_error_serialization() {
        let err = ApiError::bad_request("Invalid JSON").with_code("json_parse_error");
        let json = serde_json::to_string(&err.response).unwrap();

        assert_eq!(json, r#"{"error":"Invalid JSON","code":"json_parse_error"}"#);
    }
}
