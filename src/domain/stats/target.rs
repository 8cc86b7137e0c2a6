//! Target analytics deployment

use reqwest::Url;

use super::ResolutionError;

/// Which analytics deployment a single resolution talks to.
///
/// Built once per request and never mutated afterwards.
#[derive(Clone, PartialEq, Eq)]
pub struct TargetConfig {
    base_url: String,
    site_id: String,
    timezone: Option<String>,
    auth_token: Option<String>,
}

impl TargetConfig {
    /// Validate raw values into a target.
    ///
    /// Blank optional values are treated as absent.
    pub fn new(
        base_url: Option<&str>,
        site_id: Option<&str>,
        timezone: Option<&str>,
        auth_token: Option<&str>,
    ) -> Result<Self, ResolutionError> {
        let base_url = non_blank(base_url)
            .map(|b| b.trim_end_matches('/').to_string())
            .filter(|b| !b.is_empty());
        let site_id = non_blank(site_id);

        let (base_url, site_id) = match (base_url, site_id) {
            (Some(base_url), Some(site_id)) => (base_url, site_id),
            (None, Some(_)) => {
                return Err(ResolutionError::configuration_invalid("baseUrl is required"));
            }
            (Some(_), None) => {
                return Err(ResolutionError::configuration_invalid("siteId is required"));
            }
            (None, None) => {
                return Err(ResolutionError::configuration_invalid(
                    "baseUrl and siteId are required",
                ));
            }
        };

        let parsed = Url::parse(&base_url).map_err(|e| {
            ResolutionError::configuration_invalid(format!("baseUrl is not a valid URL: {}", e))
        })?;

        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ResolutionError::configuration_invalid(
                "baseUrl must start with http:// or https://",
            ));
        }

        Ok(Self {
            base_url,
            site_id,
            timezone: non_blank(timezone),
            auth_token: non_blank(auth_token),
        })
    }

    /// Base URL without trailing slashes
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn site_id(&self) -> &str {
        &self.site_id
    }

    pub fn timezone(&self) -> Option<&str> {
        self.timezone.as_deref()
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.auth_token.as_deref()
    }
}

impl std::fmt::Debug for TargetConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TargetConfig")
            .field("base_url", &self.base_url)
            .field("site_id", &self.site_id)
            .field("timezone", &self.timezone)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
