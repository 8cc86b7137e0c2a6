//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use once_cell::sync::Lazy;
use regex::Regex;

use super::config::MetricsConfig;
use crate::domain::stats::{Classification, Strategy};

static NUMERIC_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/\d+(/|$)").expect("numeric segment pattern is valid"));

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
    path: String,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            gauge!("analytics_relay_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
                path: config.path.clone(),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics) -> Router {
    let path = metrics.path.clone();

    Router::new()
        .route(&path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record one upstream attempt
pub fn record_upstream_attempt(
    strategy: Strategy,
    classification: Classification,
    duration: Duration,
) {
    let labels = [
        ("strategy", strategy.as_str()),
        ("classification", classification.as_str()),
    ];

    counter!("stats_upstream_attempts_total", &labels).increment(1);
    histogram!("stats_upstream_attempt_duration_seconds", &labels)
        .record(duration.as_secs_f64());
}

/// Record how a resolution ended (`succeeded`, `exhausted`, `config_invalid`, ...)
pub fn record_resolution(outcome: &'static str, attempts: usize) {
    counter!("stats_resolutions_total", "outcome" => outcome).increment(1);
    histogram!("stats_resolution_attempts", "outcome" => outcome).record(attempts as f64);
}

/// Record where a summary came from (`cache`, `provider`, `error`)
pub fn record_summary(source: &'static str) {
    counter!("summary_requests_total", "source" => source).increment(1);
}

/// Sanitize URL path for metric labels (remove IDs, limit cardinality)
fn sanitize_path(path: &str) -> String {
    let path = NUMERIC_SEGMENT.replace_all(path, "/{id}$1");

    path.chars().take(50).collect()
}
