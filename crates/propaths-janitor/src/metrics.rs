//! Metrics collection for Janitor operations

use crate::{BackfillStats, CorruptionStats, DedupStats, DirectionStats, RestoreStats};
use serde::Serialize;

/// Metrics collected during Janitor operations
///
/// Holds the latest report of each job plus running change counters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct JanitorMetrics {
    /// Latest corruption repair report
    pub corruption: Option<CorruptionStats>,

    /// Latest deduplication report
    pub dedup: Option<DedupStats>,

    /// Latest direction migration report
    pub directions: Option<DirectionStats>,

    /// Latest backfill report
    pub backfill: Option<BackfillStats>,

    /// Latest restore report
    pub restore: Option<RestoreStats>,

    /// Row changes planned across all jobs
    pub changes_planned: usize,

    /// Row changes committed across all jobs
    pub changes_applied: usize,

    /// Jobs run
    pub job_runs: usize,

    /// Total sweep iterations completed
    pub sweep_count: usize,

    /// Total runtime in milliseconds
    pub total_runtime_ms: u64,
}

impl JanitorMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one job's planned and committed change counts
    pub fn record_job(&mut self, planned: usize, applied: usize) {
        self.job_runs += 1;
        self.changes_planned += planned;
        self.changes_applied += applied;
    }

    /// Record a sweep cycle completion
    pub fn record_sweep(&mut self) {
        self.sweep_count += 1;
    }

    /// Changes planned but not committed (dry runs)
    pub fn pending_changes(&self) -> usize {
        self.changes_planned - self.changes_applied
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Janitor Metrics Summary".to_string(),
            "=======================".to_string(),
            format!("Sweep cycles: {}", self.sweep_count),
            format!("Jobs run: {}", self.job_runs),
            format!("Total runtime: {}ms", self.total_runtime_ms),
            format!(
                "Changes: {} planned, {} applied",
                self.changes_planned, self.changes_applied
            ),
            String::new(),
        ];

        if let Some(stats) = &self.corruption {
            lines.push(format!("Corruption: {}", stats));
        }
        if let Some(stats) = &self.dedup {
            lines.push(format!("Dedup: {}", stats));
        }
        if let Some(stats) = &self.directions {
            lines.push(format!("Directions: {}", stats));
        }
        if let Some(stats) = &self.backfill {
            lines.push(format!("Backfill: {}", stats));
        }
        if let Some(stats) = &self.restore {
            lines.push(format!("Restore: {}", stats));
        }

        lines.join("\n")
    }
}
