// State module - outcome counters for one reporting process

use crate::model::{ReportStatus, Status};
use serde::Serialize;

/// Scenario outcomes seen by this process
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    total: usize,
    passed: usize,
    failed: usize,
    skipped: usize,
    features: usize,
    log_entries: usize,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished scenario
    pub fn record(&mut self, status: &Status) {
        self.total += 1;
        match status.report_status() {
            ReportStatus::Passed => self.passed += 1,
            ReportStatus::Failed => self.failed += 1,
            ReportStatus::Skipped => self.skipped += 1,
        }
    }

    pub fn record_feature(&mut self) {
        self.features += 1;
    }

    pub fn record_logs(&mut self, count: usize) {
        self.log_entries += count;
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn passed(&self) -> usize {
        self.passed
    }

    pub fn failed(&self) -> usize {
        self.failed
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn features(&self) -> usize {
        self.features
    }

    pub fn log_entries(&self) -> usize {
        self.log_entries
    }

    /// Check if no scenario failed
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_by_report_status() {
        let mut summary = RunSummary::new();
        summary.record(&Status::Passed);
        summary.record(&Status::Undefined);
        summary.record(&Status::Skipped);
        summary.record(&Status::Failed);

        assert_eq!(summary.total(), 4);
        assert_eq!(summary.passed(), 1);
        assert_eq!(summary.failed(), 2);
        assert_eq!(summary.skipped(), 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_empty_summary_passes() {
        let summary = RunSummary::default();
        assert_eq!(summary.total(), 0);
        assert!(summary.all_passed());
    }
}
