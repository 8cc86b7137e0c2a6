//! Summary request and prompt

use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::domain::DomainError;

/// Request body for a summary
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub content: String,
    /// Stable identifier of the article (e.g. its slug); used as the memo key
    #[serde(default)]
    pub slug: Option<String>,
}

impl SummaryRequest {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.content.trim().is_empty() {
            return Err(DomainError::validation("No content provided"));
        }

        Ok(())
    }

    /// Memo key: the slug when given, otherwise a digest of the content
    pub fn cache_key(&self) -> String {
        match self.slug.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) => format!("summary:slug:{}", slug),
            None => {
                let digest = Sha256::digest(self.content.as_bytes());
                format!("summary:sha256:{}", hex::encode(digest))
            }
        }
    }
}

/// Wrap article text in the summarisation instructions
pub fn build_prompt(article: &str) -> String {
    format!(
        "Read the article below, extract its key points and write one concise summary.\n\
         \n\
         Rules:\n\
         - Output the summary only\n\
         - No advice, commentary or follow-up remarks\n\
         - Do not address the reader in the second person\n\
         - No introduction or closing sentence\n\
         - Keep it between 60 and 120 words\n\
         - Keep the tone neutral, objective and informative\n\
         - Write in the same language as the article\n\
         \n\
         Article:\n\
         {}",
        article.trim()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_blank_content() {
        let err = SummaryRequest::new("  \n ").validate().unwrap_err();
        assert_eq!(err.to_string(), "Validation error: No content provided");

        assert!(SummaryRequest::new("Hello").validate().is_ok());
    }

    #[test]
    fn test_cache_key_prefers_slug() {
        let request = SummaryRequest::new("body").with_slug("my-post");
        assert_eq!(request.cache_key(), "summary:slug:my-post");
    }

    #[test]
    fn test_cache_key_hashes_content() {
        let a = SummaryRequest::new("same text");
        let b = SummaryRequest::new("same text").with_slug("  ");
        let c = SummaryRequest::new("other text");

        assert_eq!(a.cache_key(), b.cache_key());
        assert_ne!(a.cache_key(), c.cache_key());
        assert!(a.cache_key().starts_with("summary:sha256:"));
        assert_eq!(a.cache_key().len(), "summary:sha256:".len() + 64);
    }

    #[test]
    fn test_deserialize_defaults() {
        let request: SummaryRequest = serde_json::from_str("{}").unwrap();
        assert!(request.content.is_empty());
        assert!(request.slug.is_none());
    }

    #[test]
    fn test_build_prompt_embeds_article() {
        let prompt = build_prompt("  The article body.  ");
        assert!(prompt.ends_with("Article:\nThe article body."));
        assert!(prompt.contains("60 and 120 words"));
    }
}
