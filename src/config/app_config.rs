use serde::Deserialize;

use crate::infrastructure::observability::ObservabilityConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub summary: SummaryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Analytics deployment proxied by `GET /api/umami-proxy`
#[derive(Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default)]
    pub base_url: Option<String>,
    /// Share identifier (also accepted as `website_id`)
    #[serde(default, alias = "website_id")]
    pub site_id: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    /// Bearer token; falls back to the `auth_token_env` variable when unset
    #[serde(default)]
    pub auth_token: Option<String>,
    #[serde(default = "default_auth_token_env")]
    pub auth_token_env: String,
    /// Stats window requested from the authenticated API
    #[serde(default = "default_period")]
    pub period: String,
    /// Per-attempt timeout
    #[serde(default = "default_upstream_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum characters of upstream body kept for diagnostics
    #[serde(default = "default_snippet_cap")]
    pub snippet_cap: usize,
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
    #[serde(default = "default_stale_while_revalidate_secs")]
    pub stale_while_revalidate_secs: u64,
}

/// AI summary companion endpoint
#[derive(Clone, Deserialize)]
pub struct SummaryConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_summary_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_summary_model")]
    pub model: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_summary_token_env")]
    pub api_token_env: String,
    #[serde(default = "default_summary_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_summary_temperature")]
    pub temperature: f32,
    #[serde(default = "default_summary_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum number of memoised summaries
    #[serde(default = "default_summary_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_true() -> bool {
    true
}

fn default_auth_token_env() -> String {
    "UMAMI_TOKEN".to_string()
}

fn default_period() -> String {
    "30d".to_string()
}

fn default_upstream_timeout_ms() -> u64 {
    5_000
}

fn default_snippet_cap() -> usize {
    1_500
}

fn default_max_age_secs() -> u64 {
    30
}

fn default_stale_while_revalidate_secs() -> u64 {
    60
}

fn default_summary_endpoint() -> String {
    "https://api.cohere.ai/v1/generate".to_string()
}

fn default_summary_model() -> String {
    "command-r-plus".to_string()
}

fn default_summary_token_env() -> String {
    "COHERE_API_TOKEN".to_string()
}

fn default_summary_max_tokens() -> u32 {
    200
}

fn default_summary_temperature() -> f32 {
    0.3
}

fn default_summary_timeout_ms() -> u64 {
    20_000
}

fn default_summary_cache_capacity() -> u64 {
    1_000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
            site_id: None,
            timezone: None,
            auth_token: None,
            auth_token_env: default_auth_token_env(),
            period: default_period(),
            timeout_ms: default_upstream_timeout_ms(),
            snippet_cap: default_snippet_cap(),
            max_age_secs: default_max_age_secs(),
            stale_while_revalidate_secs: default_stale_while_revalidate_secs(),
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            endpoint: default_summary_endpoint(),
            model: default_summary_model(),
            api_token: None,
            api_token_env: default_summary_token_env(),
            max_tokens: default_summary_max_tokens(),
            temperature: default_summary_temperature(),
            timeout_ms: default_summary_timeout_ms(),
            cache_capacity: default_summary_cache_capacity(),
        }
    }
}

impl UpstreamConfig {
    /// Configured token, or the value of the `auth_token_env` variable
    pub fn resolve_auth_token(&self) -> Option<String> {
        non_empty(self.auth_token.clone())
            .or_else(|| non_empty(std::env::var(&self.auth_token_env).ok()))
    }
}

impl SummaryConfig {
    /// Configured token, or the value of the `api_token_env` variable
    pub fn resolve_api_token(&self) -> Option<String> {
        non_empty(self.api_token.clone())
            .or_else(|| non_empty(std::env::var(&self.api_token_env).ok()))
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl std::fmt::Debug for UpstreamConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpstreamConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("site_id", &self.site_id)
            .field("timezone", &self.timezone)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("auth_token_env", &self.auth_token_env)
            .field("period", &self.period)
            .field("timeout_ms", &self.timeout_ms)
            .field("snippet_cap", &self.snippet_cap)
            .finish()
    }
}

impl std::fmt::Debug for SummaryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummaryConfig")
            .field("enabled", &self.enabled)
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("api_token_env", &self.api_token_env)
            .field("cache_capacity", &self.cache_capacity)
            .finish()
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "info");
        assert!(config.upstream.enabled);
        assert!(config.upstream.base_url.is_none());
        assert_eq!(config.upstream.timeout_ms, 5_000);
        assert_eq!(config.upstream.snippet_cap, 1_500);
        assert_eq!(config.upstream.auth_token_env, "UMAMI_TOKEN");
        assert_eq!(config.summary.model, "command-r-plus");
        assert_eq!(config.summary.max_tokens, 200);
    }

    #[test]
    fn test_partial_deserialization_fills_defaults() {
        let json = serde_json::json!({
            "upstream": {
                "base_url": "https://umami.example",
                "website_id": "abc123",
                "timezone": "Asia/Taipei"
            }
        });

        let config: AppConfig = serde_json::from_value(json).unwrap();

        assert_eq!(config.upstream.site_id.as_deref(), Some("abc123"));
        assert_eq!(config.upstream.period, "30d");
        assert!(config.upstream.enabled);
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_explicit_token_wins() {
        let config = UpstreamConfig {
            auth_token: Some("configured".to_string()),
            auth_token_env: "ANALYTICS_RELAY_TEST_UNSET_VAR".to_string(),
            ..UpstreamConfig::default()
        };

        assert_eq!(config.resolve_auth_token().as_deref(), Some("configured"));
    }

    #[test]
    fn test_blank_token_is_ignored() {
        let config = UpstreamConfig {
            auth_token: Some("  ".to_string()),
            auth_token_env: "ANALYTICS_RELAY_TEST_UNSET_VAR".to_string(),
            ..UpstreamConfig::default()
        };

        assert!(config.resolve_auth_token().is_none());
    }

    #[test]
    fn test_debug_redacts_tokens() {
        let upstream = UpstreamConfig {
            auth_token: Some("secret-one".to_string()),
            ..UpstreamConfig::default()
        };
        let summary = SummaryConfig {
            api_token: Some("secret-two".to_string()),
            ..SummaryConfig::default()
        };

        assert!(!format!("{:?}", upstream).contains("secret-one"));
        assert!(!format!("{:?}", summary).contains("secret-two"));
    }
}
