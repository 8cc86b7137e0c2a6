//! Stats service - turns request inputs into a resolved analytics payload

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, instrument, warn};

use crate::config::UpstreamConfig;
use crate::domain::stats::{
    AttemptExecutor, FallbackChain, ResolutionError, ResolutionResult, TargetConfig,
    DEFAULT_STATS_PERIOD,
};
use crate::infrastructure::observability::record_resolution;

/// Server-side settings for the config-driven variant
#[derive(Clone, Default)]
pub struct StatsServiceConfig {
    pub enabled: bool,
    pub base_url: Option<String>,
    pub site_id: Option<String>,
    pub timezone: Option<String>,
    pub auth_token: Option<String>,
    pub period: String,
}

impl StatsServiceConfig {
    /// Snapshot the upstream section, resolving the token from the environment once
    pub fn from_upstream(upstream: &UpstreamConfig) -> Self {
        Self {
            enabled: upstream.enabled,
            base_url: upstream.base_url.clone(),
            site_id: upstream.site_id.clone(),
            timezone: upstream.timezone.clone(),
            auth_token: upstream.resolve_auth_token(),
            period: upstream.period.clone(),
        }
    }

    fn has_required(&self) -> bool {
        let present = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
        present(&self.base_url) && present(&self.site_id)
    }
}

impl Debug for StatsServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StatsServiceConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("site_id", &self.site_id)
            .field("timezone", &self.timezone)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .field("period", &self.period)
            .finish()
    }
}

/// Trait for the stats service (for dynamic dispatch in AppState)
#[async_trait]
pub trait StatsServiceTrait: Send + Sync + Debug {
    /// Resolve using the server-side settings
    async fn resolve_configured(&self) -> Result<ResolutionResult, ResolutionError>;

    /// Resolve against a caller-supplied deployment; the server token is never attached
    async fn resolve_query(
        &self,
        base_url: Option<&str>,
        site_id: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<ResolutionResult, ResolutionError>;

    /// Whether the config-driven variant has everything it needs
    fn is_configured(&self) -> bool;
}

/// Stats service running the fallback chain over an attempt executor
#[derive(Debug)]
pub struct StatsService {
    chain: FallbackChain,
    config: StatsServiceConfig,
}

impl StatsService {
    pub fn new(executor: Arc<dyn AttemptExecutor>, config: StatsServiceConfig) -> Self {
        let period = if config.period.trim().is_empty() {
            DEFAULT_STATS_PERIOD.to_string()
        } else {
            config.period.clone()
        };

        Self {
            chain: FallbackChain::with_period(executor, period),
            config,
        }
    }

    fn ensure_enabled(&self) -> Result<(), ResolutionError> {
        if self.config.enabled {
            Ok(())
        } else {
            record_resolution("disabled", 0);
            Err(ResolutionError::Disabled)
        }
    }

    fn configured_target(&self) -> Result<TargetConfig, ResolutionError> {
        let target = TargetConfig::new(
            self.config.base_url.as_deref(),
            self.config.site_id.as_deref(),
            self.config.timezone.as_deref(),
            self.config.auth_token.as_deref(),
        );

        match target {
            Ok(target) => Ok(target),
            // Both values are present, so the settings themselves are malformed
            Err(ResolutionError::ConfigurationInvalid { reason }) if self.config.has_required() => {
                Err(ResolutionError::internal(reason))
            }
            Err(e) => Err(e),
        }
    }

    async fn run(&self, target: TargetConfig) -> ResolutionResult {
        let result = self.chain.resolve(&target).await;
        let outcome = if result.succeeded {
            "succeeded"
        } else {
            "exhausted"
        };

        record_resolution(outcome, result.attempts.len());
        result
    }
}

#[async_trait]
impl StatsServiceTrait for StatsService {
    #[instrument(skip(self))]
    async fn resolve_configured(&self) -> Result<ResolutionResult, ResolutionError> {
        self.ensure_enabled()?;

        let target = self.configured_target().inspect_err(|e| {
            warn!(error = ?e, "Stats proxy settings rejected");
            record_resolution("config_invalid", 0);
        })?;

        info!(
            base_url = %target.base_url(),
            has_token = target.auth_token().is_some(),
            "Resolving configured stats"
        );

        Ok(self.run(target).await)
    }

    #[instrument(skip(self))]
    async fn resolve_query(
        &self,
        base_url: Option<&str>,
        site_id: Option<&str>,
        timezone: Option<&str>,
    ) -> Result<ResolutionResult, ResolutionError> {
        self.ensure_enabled()?;

        let target = TargetConfig::new(base_url, site_id, timezone, None).inspect_err(|e| {
            warn!(error = %e, "Stats query rejected");
            record_resolution("config_invalid", 0);
        })?;

        Ok(self.run(target).await)
    }

    fn is_configured(&self) -> bool {
        self.config.enabled && self.configured_target().is_ok()
    }
}
