//! AI summary endpoint

use axum::{
    extract::State,
    http::HeaderName,
    response::IntoResponse,
    routing::post,
    Router,
};
use tracing::{error, info};

use super::state::AppState;
use super::types::{ApiError, Json};
use crate::domain::{DomainError, SummaryRequest};

static SUMMARY_CACHE_HEADER: HeaderName = HeaderName::from_static("x-summary-cache");

/// Summary routes
pub fn create_summary_router() -> Router<AppState> {
    Router::new().route("/api/ai-summary", post(create_summary))
}

/// POST /api/ai-summary
pub async fn create_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!(
        slug = ?request.slug,
        content_chars = request.content.chars().count(),
        "Processing summary request"
    );

    let response = state
        .summary_service
        .summarize(request)
        .await
        .map_err(|e| match e {
            DomainError::Validation { .. } => ApiError::from(e),
            other => {
                error!(error = %other, "AI summary failed");
                ApiError::internal("AI summary failed")
            }
        })?;

    let cache_status = if response.cached { "hit" } else { "miss" };

    Ok((
        [(SUMMARY_CACHE_HEADER.clone(), cache_status)],
        Json(response),
    ))
}
