//! Application state for shared services

use std::sync::Arc;

use super::stats::ResponseBuilder;
use crate::infrastructure::services::{StatsServiceTrait, SummaryServiceTrait};

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub stats_service: Arc<dyn StatsServiceTrait>,
    pub summary_service: Arc<dyn SummaryServiceTrait>,
    pub responses: ResponseBuilder,
    /// Whether `POST /api/ai-summary` is mounted
    pub summary_enabled: bool,
}

impl AppState {
    pub fn new(
        stats_service: Arc<dyn StatsServiceTrait>,
        summary_service: Arc<dyn SummaryServiceTrait>,
        responses: ResponseBuilder,
    ) -> Self {
        Self {
            stats_service,
            summary_service,
            responses,
            summary_enabled: true,
        }
    }

    pub fn with_summary_enabled(mut self, enabled: bool) -> Self {
        self.summary_enabled = enabled;
        self
    }
}
