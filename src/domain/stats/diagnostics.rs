//! Per-resolution attempt history

use super::AttemptOutcome;

/// Append-only, ordered record of every attempt made during one resolution
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    attempts: Vec<AttemptOutcome>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, outcome: AttemptOutcome) {
        self.attempts.push(outcome);
    }

    pub fn all(&self) -> &[AttemptOutcome] {
        &self.attempts
    }

    pub fn last(&self) -> Option<&AttemptOutcome> {
        self.attempts.last()
    }

    pub fn len(&self) -> usize {
        self.attempts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attempts.is_empty()
    }

    pub fn into_attempts(self) -> Vec<AttemptOutcome> {
        self.attempts
    }
}
