//! Stats proxy endpoints

mod envelope;
mod handlers;

use axum::{routing::get, Router};

use super::state::AppState;

pub use envelope::{AttemptView, CachePolicy, OutboundEnvelope, ResponseBuilder, StatsEnvelope};
pub use handlers::{configured_stats, query_stats, StatsQuery};

/// Stats proxy routes
pub fn create_stats_router() -> Router<AppState> {
    Router::new()
        .route("/api/umami-proxy", get(configured_stats))
        .route("/api/umami-proxy/query", get(query_stats))
}
