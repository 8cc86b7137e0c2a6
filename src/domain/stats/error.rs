//! Resolution error taxonomy

use thiserror::Error;

use super::Classification;

/// Errors surfaced by stats resolution.
///
/// `ConfigurationInvalid`, `Disabled` and `Internal` are raised before any upstream call;
/// the upstream variants describe why an exhausted chain produced no data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("configuration invalid: {reason}")]
    ConfigurationInvalid { reason: String },

    #[error("stats proxy disabled")]
    Disabled,

    #[error("upstream unreachable")]
    UpstreamUnreachable,

    #[error(
        "upstream returned a bot/WAF interstitial instead of JSON; whitelist this server's \
         IP addresses or disable the JavaScript challenge for the analytics host, or \
         configure an API token"
    )]
    UpstreamChallenge,

    #[error("upstream did not return structured data")]
    UpstreamUnparseable,

    /// Unexpected failure; `reason` goes to the logs, never to the caller
    #[error("internal error")]
    Internal { reason: String },
}

impl ResolutionError {
    pub fn configuration_invalid(reason: impl Into<String>) -> Self {
        Self::ConfigurationInvalid {
            reason: reason.into(),
        }
    }

    pub fn internal(reason: impl Into<String>) -> Self {
        Self::Internal {
            reason: reason.into(),
        }
    }

    /// Error describing an exhausted chain whose last attempt had `classification`.
    pub fn from_terminal(classification: Classification) -> Self {
        match classification {
            Classification::HtmlChallenge => Self::UpstreamChallenge,
            Classification::NetworkError => Self::UpstreamUnreachable,
            Classification::Unparseable | Classification::JsonSuccess => {
                Self::UpstreamUnparseable
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_invalid_message() {
        let error = ResolutionError::configuration_invalid("siteId is required");
        assert_eq!(error.to_string(), "configuration invalid: siteId is required");
    }

    #[test]
    fn test_from_terminal_classification() {
        assert_eq!(
            ResolutionError::from_terminal(Classification::HtmlChallenge),
            ResolutionError::UpstreamChallenge
        );
        assert_eq!(
            ResolutionError::from_terminal(Classification::NetworkError),
            ResolutionError::UpstreamUnreachable
        );
        assert_eq!(
            ResolutionError::from_terminal(Classification::Unparseable),
            ResolutionError::UpstreamUnparseable
        );
    }

    #[test]
    fn test_challenge_message_mentions_interstitial() {
        let message = ResolutionError::UpstreamChallenge.to_string();
        assert!(message.contains("interstitial"));
        assert!(message.contains("API token"));
    }

    #[test]
    fn test_internal_hides_reason() {
        let error = ResolutionError::internal("baseUrl is not a valid URL: relative URL without a base");
        assert_eq!(error.to_string(), "internal error");
    }
}
