//! Stats infrastructure - upstream HTTP attempts

mod executor;

pub use executor::{HttpAttemptExecutor, DEFAULT_ATTEMPT_TIMEOUT};
