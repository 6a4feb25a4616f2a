//! Configuration for Janitor operations
//!
//! Selects which maintenance jobs a sweep runs and whether changes are
//! committed.

use serde::{Deserialize, Serialize};

/// Configuration for the Janitor service
///
/// # Examples
///
/// ```
/// use propaths_janitor::JanitorConfig;
///
/// // Default configuration: every job, nothing written
/// let config = JanitorConfig::default();
/// assert!(config.dry_run);
///
/// // Same jobs, changes committed
/// let config = JanitorConfig::apply();
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JanitorConfig {
    /// Dry-run mode: plan and report changes without writing them
    /// Default: true
    #[serde(default = "default_true")]
    pub dry_run: bool,

    /// Reset rows whose upstream interactor is one of their own proteins
    #[serde(default = "default_true")]
    pub repair_corruption: bool,

    /// Collapse duplicate pairs and reorder rows into canonical slots
    #[serde(default = "default_true")]
    pub deduplicate: bool,

    /// Convert query-relative directions to pair-absolute ones
    #[serde(default = "default_true")]
    pub normalize_directions: bool,

    /// Fill `arrows` and `function_context` on older rows
    #[serde(default = "default_true")]
    pub backfill: bool,
}

fn default_true() -> bool {
    true
}

impl Default for JanitorConfig {
    /// Every job enabled, dry run
    fn default() -> Self {
        Self {
            dry_run: true,
            repair_corruption: true,
            deduplicate: true,
            normalize_directions: true,
            backfill: true,
        }
    }
}

impl JanitorConfig {
    /// Every job enabled, changes committed
    pub fn apply() -> Self {
        Self {
            dry_run: false,
            ..Self::default()
        }
    }

    /// Number of jobs a sweep runs
    pub fn enabled_jobs(&self) -> usize {
        [
            self.repair_corruption,
            self.deduplicate,
            self.normalize_directions,
            self.backfill,
        ]
        .iter()
        .filter(|enabled| **enabled)
        .count()
    }
}
