//! Summary provider trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::domain::DomainError;

/// Text-generation backend that turns a prompt into a summary
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SummaryProvider: Send + Sync + std::fmt::Debug {
    /// Provider name for logs and metrics
    fn name(&self) -> &'static str;

    /// Generate a summary for an already rendered prompt
    async fn summarize(&self, prompt: &str) -> Result<String, DomainError>;
}
