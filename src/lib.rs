//! Analytics Relay
//!
//! Server-side proxy that resolves usable statistics JSON from an Umami deployment:
//! - Ordered fallback over token API, public share and browser-emulated share requests
//! - Bot/WAF challenge detection with per-attempt diagnostics
//! - Memoised AI summaries of article content

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use api::stats::{CachePolicy, ResponseBuilder};
use config::SummaryConfig;
use domain::SummaryProvider;
use infrastructure::{
    cache::{InMemoryCache, InMemoryCacheConfig},
    llm::{CohereProvider, CohereSettings, HttpClient},
    services::{StatsService, StatsServiceConfig, SummaryService},
    stats::HttpAttemptExecutor,
};
use tracing::{info, warn};

/// Create the application state with default configuration
pub fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default())
}

/// Create the application state with custom configuration
pub fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let upstream = &config.upstream;

    let executor = HttpAttemptExecutor::new(
        Duration::from_millis(upstream.timeout_ms),
        upstream.snippet_cap,
    )?;
    let stats_config = StatsServiceConfig::from_upstream(upstream);

    info!(
        enabled = stats_config.enabled,
        base_url = ?stats_config.base_url,
        has_token = stats_config.auth_token.is_some(),
        timeout_ms = upstream.timeout_ms,
        "Stats proxy configured"
    );

    let stats_service = Arc::new(StatsService::new(Arc::new(executor), stats_config));

    let cache = Arc::new(InMemoryCache::with_config(
        InMemoryCacheConfig::default().with_max_capacity(config.summary.cache_capacity),
    ));
    let provider = create_summary_provider(&config.summary)?;
    let summary_service = Arc::new(SummaryService::new(provider, cache));

    let responses = ResponseBuilder::new(CachePolicy {
        max_age_secs: upstream.max_age_secs,
        stale_while_revalidate_secs: upstream.stale_while_revalidate_secs,
    });

    Ok(AppState::new(stats_service, summary_service, responses)
        .with_summary_enabled(config.summary.enabled))
}

fn create_summary_provider(
    config: &SummaryConfig,
) -> anyhow::Result<Option<Arc<dyn SummaryProvider>>> {
    if !config.enabled {
        info!("AI summary endpoint disabled");
        return Ok(None);
    }

    let Some(token) = config.resolve_api_token() else {
        warn!(
            env = %config.api_token_env,
            "Summary API token not set; /api/ai-summary will fail"
        );
        return Ok(None);
    };

    let client = HttpClient::with_timeout(Duration::from_millis(config.timeout_ms))?;
    let settings = CohereSettings {
        endpoint: config.endpoint.clone(),
        model: config.model.clone(),
        max_tokens: config.max_tokens,
        temperature: config.temperature,
    };

    info!(model = %config.model, "Summary provider configured");

    Ok(Some(Arc::new(CohereProvider::new(client, token, settings))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_builds() {
        let state = create_app_state().unwrap();

        assert!(state.summary_enabled);
        assert!(!state.stats_service.is_configured());
    }

    #[test]
    fn test_state_with_upstream_settings() {
        let mut config = AppConfig::default();
        config.upstream.base_url = Some("https://umami.example".to_string());
        config.upstream.site_id = Some("abc123".to_string());
        config.summary.enabled = false;

        let state = create_app_state_with_config(&config).unwrap();

        assert!(state.stats_service.is_configured());
        assert!(!state.summary_enabled);
    }

    #[test]
    fn test_summary_provider_requires_token() {
        let config = SummaryConfig {
            api_token: None,
            api_token_env: "ANALYTICS_RELAY_TEST_UNSET_VAR".to_string(),
            ..SummaryConfig::default()
        };

        assert!(create_summary_provider(&config).unwrap().is_none());

        let config = SummaryConfig {
            api_token: Some("key".to_string()),
            ..config
        };

        assert!(create_summary_provider(&config).unwrap().is_some());
    }
}
