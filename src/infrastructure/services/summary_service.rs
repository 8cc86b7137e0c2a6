//! Summary service - memoised article abstracts

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, error, info, instrument};

use crate::domain::summary::build_prompt;
use crate::domain::{DomainError, MemoCache, SummaryProvider, SummaryRequest};
use crate::infrastructure::observability::record_summary;
use crate::infrastructure::summary::flatten_markdown;

/// Generated (or remembered) summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
    #[serde(skip)]
    pub cached: bool,
}

/// Trait for the summary service (for dynamic dispatch in AppState)
#[async_trait]
pub trait SummaryServiceTrait: Send + Sync + Debug {
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse, DomainError>;
}

/// Summary service backed by a provider and a memo cache
#[derive(Debug)]
pub struct SummaryService {
    provider: Option<Arc<dyn SummaryProvider>>,
    cache: Arc<dyn MemoCache>,
}

impl SummaryService {
    /// `provider` is `None` when no API token is configured; requests then fail
    /// without touching the cache
    pub fn new(provider: Option<Arc<dyn SummaryProvider>>, cache: Arc<dyn MemoCache>) -> Self {
        Self { provider, cache }
    }
}

#[async_trait]
impl SummaryServiceTrait for SummaryService {
    #[instrument(skip(self, request), fields(slug = ?request.slug))]
    async fn summarize(&self, request: SummaryRequest) -> Result<SummaryResponse, DomainError> {
        request.validate()?;

        let key = request.cache_key();

        if let Some(summary) = self.cache.get(&key).await {
            debug!(key = %key, "Summary served from cache");
            record_summary("cache");
            return Ok(SummaryResponse {
                summary,
                cached: true,
            });
        }

        let provider = self.provider.as_ref().ok_or_else(|| {
            record_summary("error");
            DomainError::configuration("summary provider API token is not set")
        })?;

        let prompt = build_prompt(&flatten_markdown(&request.content));

        let summary = provider.summarize(&prompt).await.inspect_err(|e| {
            error!(provider = provider.name(), error = %e, "Summary generation failed");
            record_summary("error");
        })?;

        self.cache.put(&key, summary.clone()).await;
        record_summary("provider");
        info!(provider = provider.name(), "Summary generated");

        Ok(SummaryResponse {
            summary,
            cached: false,
        })
    }
}
