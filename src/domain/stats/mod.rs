//! Stats domain - resolving which upstream call yields usable analytics JSON

mod candidate;
mod chain;
mod classifier;
mod diagnostics;
mod error;
mod outcome;
mod target;

pub use candidate::{Candidate, Strategy};
pub use chain::{
    plan, AttemptExecutor, ChainState, FallbackChain, PlannedStep, ResolutionResult, Trigger,
    DEFAULT_STATS_PERIOD,
};
pub use classifier::{classify, Classification, ClassifiedBody};
pub use diagnostics::DiagnosticsCollector;
pub use error::ResolutionError;
pub use outcome::{snippet, AttemptOutcome, DEFAULT_SNIPPET_CAP};
pub use target::TargetConfig;

#[cfg(test)]
pub use chain::mock::{Reply, ScriptedExecutor};
