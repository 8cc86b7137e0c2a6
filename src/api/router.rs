use axum::{
    http::{HeaderValue, Method, Request},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use super::health;
use super::middleware::{logging_middleware, metrics_middleware};
use super::state::AppState;
use super::stats;
use super::summary;
use crate::infrastructure::observability::{create_metrics_router, PrometheusMetrics};

/// Stamps requests lacking an `x-request-id` with a random UUID
#[derive(Debug, Clone, Copy, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Create a minimal router without state (for testing)
/// Note: /ready endpoint is not available without state
pub fn create_router() -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/live", get(health::live_check))
        .layer(TraceLayer::new_for_http())
}

/// Create the full router with application state
pub fn create_router_with_state(state: AppState, metrics: Option<PrometheusMetrics>) -> Router {
    let mut api = Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check))
        // Stats proxy
        .merge(stats::create_stats_router());

    if state.summary_enabled {
        api = api.merge(summary::create_summary_router());
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    let mut router = api
        .with_state(state)
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId));

    // Add metrics endpoint if enabled
    if let Some(m) = metrics {
        router = router.merge(create_metrics_router(m));
    }

    router
}
