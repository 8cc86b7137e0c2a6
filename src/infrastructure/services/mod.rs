//! Infrastructure services

mod stats_service;
mod summary_service;

pub use stats_service::{StatsService, StatsServiceConfig, StatsServiceTrait};
pub use summary_service::{SummaryResponse, SummaryService, SummaryServiceTrait};
