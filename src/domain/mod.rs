//! Domain layer - Core resolution logic and entities

pub mod cache;
pub mod error;
pub mod stats;
pub mod summary;

pub use cache::MemoCache;
pub use error::DomainError;
pub use stats::{
    AttemptExecutor, AttemptOutcome, Candidate, Classification, FallbackChain, ResolutionError,
    ResolutionResult, Strategy, TargetConfig,
};
pub use summary::{SummaryProvider, SummaryRequest};
