//! Upstream response classification

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::Serialize;
use serde_json::Value;

/// Phrases emitted by bot-mitigation layers (CDN interstitials, JS challenges, CAPTCHAs)
static CHALLENGE_INDICATORS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)just a moment|cf-chl-bypass|cloudflare|please enable javascript|captcha|attention required|ddos protection",
    )
    .expect("challenge indicator pattern is valid")
});

const MAX_TITLE_LEN: usize = 120;

/// What an upstream body turned out to be
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    JsonSuccess,
    HtmlChallenge,
    Unparseable,
    NetworkError,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::JsonSuccess => "json_success",
            Self::HtmlChallenge => "html_challenge",
            Self::Unparseable => "unparseable",
            Self::NetworkError => "network_error",
        }
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying one body
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedBody {
    pub classification: Classification,
    /// Set only for [`Classification::JsonSuccess`]
    pub parsed_body: Option<Value>,
    pub detail: Option<String>,
}

/// Classify a raw upstream body.
///
/// Never produces [`Classification::NetworkError`]; transport failures are detected
/// by the executor, which also treats an empty body as one.
pub fn classify(raw_body: &str, http_status: u16, content_type: Option<&str>) -> ClassifiedBody {
    if let Ok(value) = serde_json::from_str::<Value>(raw_body) {
        return ClassifiedBody {
            classification: Classification::JsonSuccess,
            parsed_body: Some(value),
            detail: None,
        };
    }

    let trimmed = raw_body.trim_start();

    if (trimmed.starts_with('<') && CHALLENGE_INDICATORS.is_match(trimmed)) || http_status == 403 {
        let detail = match page_title(trimmed) {
            Some(title) => format!("challenge page detected (HTTP {}): {}", http_status, title),
            None => format!("challenge page detected (HTTP {})", http_status),
        };

        return ClassifiedBody {
            classification: Classification::HtmlChallenge,
            parsed_body: None,
            detail: Some(detail),
        };
    }

    ClassifiedBody {
        classification: Classification::Unparseable,
        parsed_body: None,
        detail: Some(format!(
            "expected JSON but received {} (HTTP {})",
            content_type.unwrap_or("an unknown content type"),
            http_status
        )),
    }
}

/// `<title>` of an HTML page, if it has one
fn page_title(body: &str) -> Option<String> {
    if !body.starts_with('<') {
        return None;
    }

    let document = Html::parse_document(body);
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.text().collect::<String>())
        .map(|title| title.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|title| !title.is_empty())
        .map(|title| title.chars().take(MAX_TITLE_LEN).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOUDFLARE_PAGE: &str = r#"<!DOCTYPE html>
<html><head><title>Just a moment...</title></head>
<body><div id="cf-chl-bypass">Checking your browser</div></body></html>"#;

    #[test]
    fn test_json_success() {
        let result = classify(r#"{"pageviews":10}"#, 200, Some("application/json"));

        assert_eq!(result.classification, Classification::JsonSuccess);
        assert_eq!(result.parsed_body, Some(serde_json::json!({"pageviews": 10})));
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_json_with_text_content_type_is_still_json() {
        let result = classify("[1,2,3]", 200, Some("text/plain"));
        assert_eq!(result.classification, Classification::JsonSuccess);
    }

    #[test]
    fn test_json_with_error_status_is_still_json() {
        let result = classify(r#"{"error":"Unauthorized"}"#, 401, Some("application/json"));

        assert_eq!(result.classification, Classification::JsonSuccess);
        assert_eq!(
            result.parsed_body,
            Some(serde_json::json!({"error": "Unauthorized"}))
        );
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_json_on_forbidden_is_not_a_challenge() {
        let result = classify(r#"{"pageviews":1}"#, 403, Some("application/json"));
        assert_eq!(result.classification, Classification::JsonSuccess);
    }

    #[test]
    fn test_cloudflare_challenge() {
        let result = classify(CLOUDFLARE_PAGE, 503, Some("text/html"));

        assert_eq!(result.classification, Classification::HtmlChallenge);
        assert!(result.parsed_body.is_none());
        assert_eq!(
            result.detail.as_deref(),
            Some("challenge page detected (HTTP 503): Just a moment...")
        );
    }

    #[test]
    fn test_indicator_match_is_case_insensitive() {
        let body = "  <html><body>Please complete the CAPTCHA</body></html>";
        let result = classify(body, 200, Some("text/html"));
        assert_eq!(result.classification, Classification::HtmlChallenge);
    }

    #[test]
    fn test_forbidden_status_is_challenge() {
        let result = classify("Access denied", 403, Some("text/plain"));
        assert_eq!(result.classification, Classification::HtmlChallenge);
    }

    #[test]
    fn test_plain_html_is_unparseable() {
        let body = "<html><head><title>Not Found</title></head><body>404</body></html>";
        let result = classify(body, 404, Some("text/html"));

        assert_eq!(result.classification, Classification::Unparseable);
        assert_eq!(
            result.detail.as_deref(),
            Some("expected JSON but received text/html (HTTP 404)")
        );
    }

    #[test]
    fn test_indicator_without_html_is_unparseable() {
        let result = classify("cloudflare says hi", 200, None);
        assert_eq!(result.classification, Classification::Unparseable);
    }

    #[test]
    fn test_whitespace_body_is_unparseable() {
        let result = classify("  \n", 200, Some("application/json"));
        assert_eq!(result.classification, Classification::Unparseable);
    }

    #[test]
    fn test_classification_serialization() {
        assert_eq!(
            serde_json::to_string(&Classification::HtmlChallenge).unwrap(),
            "\"html_challenge\""
        );
        assert_eq!(Classification::NetworkError.to_string(), "network_error");
    }
}
