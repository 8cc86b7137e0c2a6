//! Summary domain - short neutral abstracts of article content

mod provider;
mod request;

pub use provider::SummaryProvider;
pub use request::{build_prompt, SummaryRequest};

#[cfg(test)]
pub use provider::MockSummaryProvider;
