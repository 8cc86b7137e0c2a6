//! Stats proxy handlers

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use serde::Deserialize;
use tracing::{debug, instrument};

use super::envelope::OutboundEnvelope;
use crate::api::state::AppState;
use crate::domain::stats::ResolutionError;

/// Query parameters of the parameterized variant
#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    #[serde(rename = "baseUrl")]
    pub base_url: Option<String>,
    #[serde(rename = "websiteId", alias = "siteId")]
    pub website_id: Option<String>,
    pub timezone: Option<String>,
}

/// GET /api/umami-proxy
#[instrument(skip(state))]
pub async fn configured_stats(State(state): State<AppState>) -> OutboundEnvelope {
    match state.stats_service.resolve_configured().await {
        Ok(result) => state.responses.build(result),
        Err(e) => state.responses.reject(&e),
    }
}

/// GET /api/umami-proxy/query
#[instrument(skip(state))]
pub async fn query_stats(
    State(state): State<AppState>,
    params: Result<Query<StatsQuery>, QueryRejection>,
) -> OutboundEnvelope {
    let Query(params) = match params {
        Ok(params) => params,
        Err(rejection) => {
            debug!(error = %rejection.body_text(), "Rejected stats query string");
            return state.responses.reject(&ResolutionError::configuration_invalid(
                rejection.body_text(),
            ));
        }
    };

    let result = state
        .stats_service
        .resolve_query(
            params.base_url.as_deref(),
            params.website_id.as_deref(),
            params.timezone.as_deref(),
        )
        .await;

    match result {
        Ok(result) => state.responses.build(result),
        Err(e) => state.responses.reject(&e),
    }
}
