//! Candidate upstream requests

use std::collections::HashMap;

use reqwest::Url;
use serde::Serialize;

use super::TargetConfig;

const JSON_ACCEPT: &str = "application/json";
const BROWSER_ACCEPT: &str = "application/json, text/plain, */*";
const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// How a candidate reaches the upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Authenticated stats API using a bearer token
    TokenApi,
    /// Public share endpoint, no credentials
    PublicShare,
    /// Public share endpoint retried with browser-like headers
    BrowserShare,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TokenApi => "token_api",
            Self::PublicShare => "public_share",
            Self::BrowserShare => "browser_share",
        }
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully specified GET request, ready to execute
#[derive(Clone, PartialEq, Eq)]
pub struct Candidate {
    url: String,
    headers: HashMap<String, String>,
    strategy: Strategy,
}

impl Candidate {
    pub fn new(url: impl Into<String>, headers: HashMap<String, String>, strategy: Strategy) -> Self {
        Self {
            url: url.into(),
            headers,
            strategy,
        }
    }

    /// `{base}/api/websites/{id}/stats` authenticated with the target's token.
    ///
    /// Returns `None` when the target carries no token.
    pub fn token_api(target: &TargetConfig, period: &str) -> Option<Self> {
        let token = target.auth_token()?;

        let mut query = vec![("period", period)];

        if let Some(tz) = target.timezone() {
            query.push(("timezone", tz));
        }

        let url = build_url(
            target.base_url(),
            &["api", "websites", target.site_id(), "stats"],
            &query,
        );

        let headers = HashMap::from([
            ("Accept".to_string(), JSON_ACCEPT.to_string()),
            ("Authorization".to_string(), format!("Bearer {}", token)),
        ]);

        Some(Self::new(url, headers, Strategy::TokenApi))
    }

    /// `{base}/share/{id}` without credentials
    pub fn public_share(target: &TargetConfig) -> Self {
        let url = build_url(
            target.base_url(),
            &["share", target.site_id()],
            &timezone_query(target),
        );

        let headers = HashMap::from([("Accept".to_string(), JSON_ACCEPT.to_string())]);

        Self::new(url, headers, Strategy::PublicShare)
    }

    /// Same URL as [`Candidate::public_share`], dressed up as a regular browser
    pub fn browser_share(target: &TargetConfig) -> Self {
        let url = build_url(
            target.base_url(),
            &["share", target.site_id()],
            &timezone_query(target),
        );

        let headers = HashMap::from([
            ("Accept".to_string(), BROWSER_ACCEPT.to_string()),
            (
                "Accept-Language".to_string(),
                BROWSER_ACCEPT_LANGUAGE.to_string(),
            ),
            ("User-Agent".to_string(), BROWSER_USER_AGENT.to_string()),
            ("Referer".to_string(), format!("{}/", target.base_url())),
        ]);

        Self::new(url, headers, Strategy::BrowserShare)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

impl std::fmt::Debug for Candidate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut header_names: Vec<&str> = self.headers.keys().map(String::as_str).collect();
        header_names.sort_unstable();

        f.debug_struct("Candidate")
            .field("url", &self.url)
            .field("strategy", &self.strategy)
            .field("headers", &header_names)
            .finish()
    }
}

fn timezone_query(target: &TargetConfig) -> Vec<(&'static str, &str)> {
    target
        .timezone()
        .map(|tz| vec![("timezone", tz)])
        .unwrap_or_default()
}

/// Join percent-encoded path segments and query pairs onto `base`.
///
/// `base` has already been validated as an http(s) URL.
fn build_url(base: &str, segments: &[&str], query: &[(&str, &str)]) -> String {
    let Ok(mut url) = Url::parse(base) else {
        return base.to_string();
    };

    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }

    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query);
    }

    url.to_string()
}
