//! Observability configuration

use serde::Deserialize;

/// `[observability]` section of the application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ObservabilityConfig {
    #[serde(default)]
    pub tracing: TracingConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// OpenTelemetry span export
#[derive(Debug, Clone, Deserialize)]
pub struct TracingConfig {
    #[serde(default)]
    pub enabled: bool,
    /// OTLP gRPC endpoint (e.g., http://localhost:4317)
    #[serde(default = "default_otlp_endpoint")]
    pub otlp_endpoint: String,
    #[serde(default = "default_service_name")]
    pub service_name: String,
    /// Fraction of traces kept, 0.0 to 1.0
    #[serde(default = "default_sampling_ratio")]
    pub sampling_ratio: f64,
}

/// Prometheus scrape endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    #[serde(default = "default_metrics_enabled")]
    pub enabled: bool,
    #[serde(default = "default_metrics_path")]
    pub path: String,
}

fn default_otlp_endpoint() -> String {
    "http://localhost:4317".to_string()
}

fn default_service_name() -> String {
    "analytics-relay".to_string()
}

fn default_sampling_ratio() -> f64 {
    1.0
}

fn default_metrics_enabled() -> bool {
    true
}

fn default_metrics_path() -> String {
    "/metrics".to_string()
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: default_otlp_endpoint(),
            service_name: default_service_name(),
            sampling_ratio: default_sampling_ratio(),
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: default_metrics_enabled(),
            path: default_metrics_path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ObservabilityConfig::default();

        assert!(!config.tracing.enabled);
        assert_eq!(config.tracing.service_name, "analytics-relay");
        assert_eq!(config.tracing.sampling_ratio, 1.0);
        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.path, "/metrics");
    }

    #[test]
    fn test_partial_section_uses_defaults() {
        let config: ObservabilityConfig = serde_json::from_value(serde_json::json!({
            "tracing": { "enabled": true, "sampling_ratio": 0.5 }
        }))
        .unwrap();

        assert!(config.tracing.enabled);
        assert_eq!(config.tracing.sampling_ratio, 0.5);
        assert_eq!(config.tracing.otlp_endpoint, "http://localhost:4317");
        assert!(config.metrics.enabled);
    }
}
