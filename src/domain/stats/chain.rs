//! Fallback chain - bounded, deterministic resolution over a fixed candidate plan

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{AttemptOutcome, Candidate, Classification, DiagnosticsCollector, Strategy, TargetConfig};

/// Default stats window requested from the authenticated API
pub const DEFAULT_STATS_PERIOD: &str = "30d";

/// Executes exactly one upstream request.
///
/// Implementations never fail: every failure mode is encoded in the outcome so a
/// single bad attempt cannot abort the chain.
#[async_trait]
pub trait AttemptExecutor: Send + Sync + std::fmt::Debug {
    async fn execute(&self, candidate: Candidate) -> AttemptOutcome;
}

/// When a planned step runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Runs whenever the chain reaches it
    Always,
    /// Runs only if the previous attempt used `strategy` and hit a challenge page
    AfterChallenge(Strategy),
}

/// One entry of the precomputed plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedStep {
    pub candidate: Candidate,
    pub trigger: Trigger,
}

/// Chain progress
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    NotStarted,
    Trying(usize),
    Succeeded,
    Exhausted,
}

/// Terminal output of a resolution
#[derive(Debug, Clone, PartialEq)]
pub struct ResolutionResult {
    pub succeeded: bool,
    pub data: Option<Value>,
    pub attempts: Vec<AttemptOutcome>,
}

impl ResolutionResult {
    pub fn last_attempt(&self) -> Option<&AttemptOutcome> {
        self.attempts.last()
    }

    /// Classification of the attempt that ended the chain
    pub fn terminal_classification(&self) -> Option<Classification> {
        self.last_attempt().map(AttemptOutcome::classification)
    }
}

/// Build the ordered candidate plan for `target`.
///
/// Token-authenticated access comes first, then the public share endpoint, then a
/// browser-emulation retry of the share endpoint that only fires on a challenge.
pub fn plan(target: &TargetConfig, period: &str) -> Vec<PlannedStep> {
    let mut steps = Vec::with_capacity(3);

    if let Some(candidate) = Candidate::token_api(target, period) {
        steps.push(PlannedStep {
            candidate,
            trigger: Trigger::Always,
        });
    }

    steps.push(PlannedStep {
        candidate: Candidate::public_share(target),
        trigger: Trigger::Always,
    });

    steps.push(PlannedStep {
        candidate: Candidate::browser_share(target),
        trigger: Trigger::AfterChallenge(Strategy::PublicShare),
    });

    steps
}

fn should_run(trigger: Trigger, previous: Option<&AttemptOutcome>) -> bool {
    match trigger {
        Trigger::Always => true,
        Trigger::AfterChallenge(strategy) => previous.is_some_and(|outcome| {
            outcome.candidate().strategy() == strategy
                && outcome.classification() == Classification::HtmlChallenge
        }),
    }
}

/// Drives an [`AttemptExecutor`] over the plan, stopping at the first JSON success
#[derive(Debug, Clone)]
pub struct FallbackChain {
    executor: Arc<dyn AttemptExecutor>,
    period: String,
}

impl FallbackChain {
    pub fn new(executor: Arc<dyn AttemptExecutor>) -> Self {
        Self::with_period(executor, DEFAULT_STATS_PERIOD)
    }

    pub fn with_period(executor: Arc<dyn AttemptExecutor>, period: impl Into<String>) -> Self {
        Self {
            executor,
            period: period.into(),
        }
    }

    pub async fn resolve(&self, target: &TargetConfig) -> ResolutionResult {
        let steps = plan(target, &self.period);
        let mut diagnostics = DiagnosticsCollector::new();
        let mut state = ChainState::NotStarted;
        let mut data = None;

        for (index, step) in steps.into_iter().enumerate() {
            if !should_run(step.trigger, diagnostics.last()) {
                debug!(
                    strategy = %step.candidate.strategy(),
                    "Skipping conditional step"
                );
                continue;
            }

            state = ChainState::Trying(index);
            debug!(?state, url = %step.candidate.url(), "Executing candidate");

            let outcome = self.executor.execute(step.candidate).await;

            info!(
                url = %outcome.candidate().url(),
                strategy = %outcome.candidate().strategy(),
                status = ?outcome.http_status(),
                classification = %outcome.classification(),
                "Upstream attempt finished"
            );

            if let Some(value) = outcome.parsed_body() {
                data = Some(value.clone());
                diagnostics.record(outcome);
                state = ChainState::Succeeded;
                break;
            }

            diagnostics.record(outcome);
        }

        if state != ChainState::Succeeded {
            state = ChainState::Exhausted;
            warn!(
                attempts = diagnostics.len(),
                terminal = ?diagnostics.last().map(AttemptOutcome::classification),
                "Fallback chain exhausted without usable data"
            );
        }

        ResolutionResult {
            succeeded: state == ChainState::Succeeded,
            data,
            attempts: diagnostics.into_attempts(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::mock::{Reply, ScriptedExecutor};
    use super::*;

    const CAPTCHA_PAGE: &str =
        "<html><head><title>Attention</title></head><body>Solve this captcha</body></html>";

    fn target(token: Option<&str>) -> TargetConfig {
        TargetConfig::new(Some("https://a.example"), Some("abc123"), None, token).unwrap()
    }

    fn chain(executor: &Arc<ScriptedExecutor>) -> FallbackChain {
        FallbackChain::new(executor.clone())
    }

    #[test]
    fn test_plan_without_token() {
        let steps = plan(&target(None), "30d");

        let strategies: Vec<Strategy> = steps.iter().map(|s| s.candidate.strategy()).collect();
        assert_eq!(strategies, vec![Strategy::PublicShare, Strategy::BrowserShare]);
        assert_eq!(steps[0].trigger, Trigger::Always);
        assert_eq!(
            steps[1].trigger,
            Trigger::AfterChallenge(Strategy::PublicShare)
        );
    }

    #[test]
    fn test_plan_with_token_puts_token_first() {
        let steps = plan(&target(Some("tok")), "7d");

        let strategies: Vec<Strategy> = steps.iter().map(|s| s.candidate.strategy()).collect();
        assert_eq!(
            strategies,
            vec![Strategy::TokenApi, Strategy::PublicShare, Strategy::BrowserShare]
        );
        assert!(steps[0].candidate.url().ends_with("/stats?period=7d"));
    }

    #[tokio::test]
    async fn test_first_json_short_circuits() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Reply::json(
            200,
            r#"{"pageviews":10}"#,
        )]));

        let result = chain(&executor).resolve(&target(None)).await;

        assert!(result.succeeded);
        assert_eq!(result.data, Some(serde_json::json!({"pageviews": 10})));
        assert_eq!(result.attempts.len(), 1);
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_token_success_never_contacts_share() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Reply::json(
            200,
            r#"{"visitors":{"value":3}}"#,
        )]));

        let result = chain(&executor).resolve(&target(Some("tok"))).await;

        assert!(result.succeeded);
        assert_eq!(executor.calls(), 1);
        assert_eq!(executor.seen()[0].strategy(), Strategy::TokenApi);
    }

    #[tokio::test]
    async fn test_token_json_error_is_returned_as_data() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Reply::json(
            401,
            r#"{"error":"Unauthorized"}"#,
        )]));

        let result = chain(&executor).resolve(&target(Some("bad"))).await;

        assert!(result.succeeded);
        assert_eq!(result.data, Some(serde_json::json!({"error": "Unauthorized"})));
        assert_eq!(result.last_attempt().unwrap().http_status(), Some(401));
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_token_failure_falls_back_to_share() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Reply::html(502, "<html><body>Bad Gateway</body></html>"),
            Reply::json(200, r#"{"pageviews":5}"#),
        ]));

        let result = chain(&executor).resolve(&target(Some("tok"))).await;

        assert!(result.succeeded);
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(
            result.attempts[0].classification(),
            Classification::Unparseable
        );
        assert_eq!(
            result.last_attempt().unwrap().candidate().strategy(),
            Strategy::PublicShare
        );
    }

    #[tokio::test]
    async fn test_json_on_forbidden_share_skips_browser_retry() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Reply::json(
            403,
            r#"{"pageviews":1}"#,
        )]));

        let result = chain(&executor).resolve(&target(None)).await;

        assert!(result.succeeded);
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_challenge_triggers_single_browser_retry() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Reply::html(403, CAPTCHA_PAGE),
            Reply::html(403, CAPTCHA_PAGE),
        ]));

        let result = chain(&executor).resolve(&target(None)).await;

        assert!(!result.succeeded);
        assert!(result.data.is_none());
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(executor.calls(), 2);

        assert_eq!(
            result.attempts[0].content_type(),
            Some("text/html; charset=utf-8")
        );

        let seen = executor.seen();
        assert_eq!(seen[0].url(), seen[1].url());
        assert_eq!(seen[1].strategy(), Strategy::BrowserShare);
        assert_eq!(
            result.terminal_classification(),
            Some(Classification::HtmlChallenge)
        );
    }

    #[tokio::test]
    async fn test_browser_retry_can_succeed() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Reply::html(403, CAPTCHA_PAGE),
            Reply::json(200, r#"{"pageviews":1}"#),
        ]));

        let result = chain(&executor).resolve(&target(None)).await;

        assert!(result.succeeded);
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(
            result.last_attempt().unwrap().candidate().strategy(),
            Strategy::BrowserShare
        );
    }

    #[tokio::test]
    async fn test_unparseable_share_does_not_retry() {
        let executor = Arc::new(ScriptedExecutor::new(vec![Reply::html(
            500,
            "<html><body>Internal Server Error</body></html>",
        )]));

        let result = chain(&executor).resolve(&target(None)).await;

        assert!(!result.succeeded);
        assert_eq!(executor.calls(), 1);
        assert_eq!(
            result.terminal_classification(),
            Some(Classification::Unparseable)
        );
    }

    #[tokio::test]
    async fn test_network_errors_exhaust_chain() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Reply::NetworkError("connection failed".to_string()),
            Reply::NetworkError("request timed out".to_string()),
        ]));

        let result = chain(&executor).resolve(&target(Some("tok"))).await;

        assert!(!result.succeeded);
        assert_eq!(result.attempts.len(), 2);
        assert_eq!(
            result.terminal_classification(),
            Some(Classification::NetworkError)
        );
        assert!(result.attempts.iter().all(|a| a.http_status().is_none()));
    }

    #[tokio::test]
    async fn test_token_challenge_does_not_trigger_browser_retry() {
        let executor = Arc::new(ScriptedExecutor::new(vec![
            Reply::html(403, CAPTCHA_PAGE),
            Reply::html(500, "<html>down</html>"),
        ]));

        let result = chain(&executor).resolve(&target(Some("tok"))).await;

        let strategies: Vec<Strategy> = executor.seen().iter().map(Candidate::strategy).collect();
        assert_eq!(strategies, vec![Strategy::TokenApi, Strategy::PublicShare]);
        assert!(!result.succeeded);
    }

    #[tokio::test]
    async fn test_resolution_is_repeatable() {
        let body = r#"{"pageviews":10,"visitors":4}"#;
        let first = Arc::new(ScriptedExecutor::new(vec![Reply::json(200, body)]));
        let second = Arc::new(ScriptedExecutor::new(vec![Reply::json(200, body)]));

        let a = chain(&first).resolve(&target(None)).await;
        let b = chain(&second).resolve(&target(None)).await;

        assert_eq!(a, b);
    }
}
