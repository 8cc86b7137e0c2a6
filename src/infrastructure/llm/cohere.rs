use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use crate::domain::{DomainError, SummaryProvider};

pub const DEFAULT_COHERE_GENERATE_URL: &str = "https://api.cohere.ai/v1/generate";

/// Generation parameters sent with every request
#[derive(Debug, Clone)]
pub struct CohereSettings {
    pub endpoint: String,
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for CohereSettings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_COHERE_GENERATE_URL.to_string(),
            model: "command-r-plus".to_string(),
            max_tokens: 200,
            temperature: 0.3,
        }
    }
}

/// Cohere generate API provider
pub struct CohereProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    settings: CohereSettings,
}

impl<C: HttpClientTrait> CohereProvider<C> {
    pub fn new(client: C, api_key: impl AsRef<str>, settings: CohereSettings) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.as_ref()),
            settings,
        }
    }

    fn build_request(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "model": self.settings.model,
            "prompt": prompt,
            "max_tokens": self.settings.max_tokens,
            "temperature": self.settings.temperature,
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn parse_response(&self, json: serde_json::Value) -> Result<String, DomainError> {
        let response: CohereGenerateResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::provider("cohere", format!("Failed to parse response: {}", e))
        })?;

        let text = response
            .generations
            .into_iter()
            .next()
            .map(|g| g.text.trim().to_string())
            .ok_or_else(|| DomainError::provider("cohere", "No generations in response"))?;

        if text.is_empty() {
            return Err(DomainError::provider("cohere", "Empty generation"));
        }

        Ok(text)
    }
}

impl<C: HttpClientTrait> std::fmt::Debug for CohereProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CohereProvider")
            .field("client", &self.client)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<C: HttpClientTrait> SummaryProvider for CohereProvider<C> {
    fn name(&self) -> &'static str {
        "cohere"
    }

    async fn summarize(&self, prompt: &str) -> Result<String, DomainError> {
        let body = self.build_request(prompt);
        let response = self
            .client
            .post_json(&self.settings.endpoint, self.headers(), &body)
            .await?;

        self.parse_response(response)
    }
}

#[derive(Debug, Deserialize)]
struct CohereGenerateResponse {
    #[serde(default)]
    generations: Vec<CohereGeneration>,
}

#[derive(Debug, Deserialize)]
struct CohereGeneration {
    text: String,
}
