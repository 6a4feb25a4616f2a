//! Core Janitor implementation: maintenance jobs over persisted rows

use crate::backfill::plan_backfill;
use crate::corruption::plan_corruption_repair;
use crate::dedup::plan_dedup;
use crate::directions::plan_direction_migration;
use crate::restore::plan_restore;
use crate::{
    BackfillStats, CorruptionStats, DedupStats, DirectionStats, JanitorConfig, JanitorError,
    JanitorMetrics, RestoreStats,
};
use chrono::Utc;
use propaths_domain::traits::{InteractionStore, PayloadCache};
use propaths_domain::{DirectionNormalizer, InteractionRow, RowChange};
use serde::Serialize;
use std::fmt::Display;
use std::time::Instant;

/// Current time as written into audit stamps
fn current_timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// Result of one maintenance job
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobOutcome<T> {
    /// Job-specific counts
    pub stats: T,

    /// Row changes the job planned
    pub planned: usize,

    /// Row changes committed (zero in dry-run mode)
    pub applied: usize,

    /// Whether the job ran in dry-run mode
    pub dry_run: bool,
}

/// Janitor service for batch maintenance of persisted interactions
///
/// Every job reads all rows, plans a batch of changes, and commits the batch
/// in one transaction unless the janitor is in dry-run mode.
///
/// # Examples
///
/// ```no_run
/// use propaths_janitor::{Janitor, JanitorConfig};
/// use propaths_store::SqliteStore;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut store = SqliteStore::new("propaths.db")?;
/// let mut janitor = Janitor::new(JanitorConfig::apply());
///
/// let metrics = janitor.sweep(&mut store)?;
/// println!("{}", metrics.summary());
/// # Ok(())
/// # }
/// ```
pub struct Janitor {
    config: JanitorConfig,
    metrics: JanitorMetrics,
    normalizer: DirectionNormalizer,
}

impl Janitor {
    /// Create a new Janitor with the given configuration
    pub fn new(config: JanitorConfig) -> Self {
        Self {
            config,
            metrics: JanitorMetrics::new(),
            normalizer: DirectionNormalizer,
        }
    }

    /// Create a Janitor with default configuration (dry run)
    pub fn default_config() -> Self {
        Self::new(JanitorConfig::default())
    }

    /// Current configuration
    pub fn config(&self) -> &JanitorConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &JanitorMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Run every enabled job once
    ///
    /// Order: corruption repair, deduplication, direction migration,
    /// backfill. Restoring functions needs a cache and is run on its own.
    ///
    /// Returns the updated metrics after the sweep.
    pub fn sweep<S: InteractionStore>(&mut self, store: &mut S) -> Result<JanitorMetrics, JanitorError>
    where
        S::Error: Display,
    {
        let start = Instant::now();

        if self.config.repair_corruption {
            self.repair_corruption(store)?;
        }
        if self.config.deduplicate {
            self.deduplicate(store)?;
        }
        if self.config.normalize_directions {
            self.normalize_directions(store)?;
        }
        if self.config.backfill {
            self.backfill(store)?;
        }

        self.metrics.record_sweep();
        self.metrics.total_runtime_ms += start.elapsed().as_millis() as u64;

        Ok(self.metrics.clone())
    }

    /// Reset rows whose upstream interactor is one of their own proteins
    pub fn repair_corruption<S: InteractionStore>(
        &mut self,
        store: &mut S,
    ) -> Result<JobOutcome<CorruptionStats>, JanitorError>
    where
        S::Error: Display,
    {
        let rows = load_rows(store)?;
        let (changes, stats) = plan_corruption_repair(&rows, &current_timestamp());
        let outcome = self.commit(store, "fix-corruption", changes, stats)?;
        self.metrics.corruption = Some(outcome.stats.clone());
        Ok(outcome)
    }

    /// Collapse duplicate pairs and move rows into canonical slot order
    pub fn deduplicate<S: InteractionStore>(
        &mut self,
        store: &mut S,
    ) -> Result<JobOutcome<DedupStats>, JanitorError>
    where
        S::Error: Display,
    {
        let rows = load_rows(store)?;
        let (changes, stats) = plan_dedup(&rows, &self.normalizer, &current_timestamp());
        let outcome = self.commit(store, "dedup", changes, stats)?;
        self.metrics.dedup = Some(outcome.stats.clone());
        Ok(outcome)
    }

    /// Convert every stored direction to pair-absolute form
    pub fn normalize_directions<S: InteractionStore>(
        &mut self,
        store: &mut S,
    ) -> Result<JobOutcome<DirectionStats>, JanitorError>
    where
        S::Error: Display,
    {
        let rows = load_rows(store)?;
        let (changes, stats) =
            plan_direction_migration(&rows, &self.normalizer, &current_timestamp());
        let outcome = self.commit(store, "fix-directions", changes, stats)?;
        self.metrics.directions = Some(outcome.stats.clone());
        Ok(outcome)
    }

    /// Fill `arrows` and `function_context` on older rows
    pub fn backfill<S: InteractionStore>(
        &mut self,
        store: &mut S,
    ) -> Result<JobOutcome<BackfillStats>, JanitorError>
    where
        S::Error: Display,
    {
        let rows = load_rows(store)?;
        let (changes, stats) = plan_backfill(&rows, &current_timestamp());
        let outcome = self.commit(store, "backfill", changes, stats)?;
        self.metrics.backfill = Some(outcome.stats.clone());
        Ok(outcome)
    }

    /// Restore missing functions from cached query results
    ///
    /// Unreadable cache entries are counted, not fatal.
    pub fn restore_functions<S, C>(
        &mut self,
        store: &mut S,
        cache: &C,
    ) -> Result<JobOutcome<RestoreStats>, JanitorError>
    where
        S: InteractionStore,
        S::Error: Display,
        C: PayloadCache,
        C::Error: Display,
    {
        let rows = load_rows(store)?;
        let (changes, stats) = plan_restore(&rows, cache, &current_timestamp());
        let outcome = self.commit(store, "restore-functions", changes, stats)?;
        self.metrics.restore = Some(outcome.stats.clone());
        Ok(outcome)
    }

    /// Commit a planned batch unless in dry-run mode
    fn commit<S, T>(
        &mut self,
        store: &mut S,
        job: &str,
        changes: Vec<RowChange>,
        stats: T,
    ) -> Result<JobOutcome<T>, JanitorError>
    where
        S: InteractionStore,
        S::Error: Display,
        T: Display,
    {
        let planned = changes.len();
        tracing::info!("{}: {}", job, stats);

        let applied = if planned == 0 {
            tracing::info!("{}: nothing to change", job);
            0
        } else if self.config.dry_run {
            tracing::info!("DRY RUN: {} would change {} row(s)", job, planned);
            0
        } else {
            store
                .apply_batch(&changes)
                .map_err(|e| JanitorError::Store(e.to_string()))?;
            tracing::info!("{}: committed {} change(s)", job, planned);
            planned
        };

        self.metrics.record_job(planned, applied);
        Ok(JobOutcome {
            stats,
            planned,
            applied,
            dry_run: self.config.dry_run,
        })
    }
}

fn load_rows<S: InteractionStore>(store: &S) -> Result<Vec<InteractionRow>, JanitorError>
where
    S::Error: Display,
{
    store
        .list_interactions()
        .map_err(|e| JanitorError::Store(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use propaths_domain::{PayloadDocument, Protein};
    use serde_json::json;

    // Mock store for testing
    struct MockStore {
        rows: Vec<InteractionRow>,
        fail: bool,
    }

    impl MockStore {
        fn new(rows: Vec<InteractionRow>) -> Self {
            Self { rows, fail: false }
        }
    }

    impl InteractionStore for MockStore {
        type Error = String;

        fn list_interactions(&self) -> Result<Vec<InteractionRow>, Self::Error> {
            if self.fail {
                return Err("database is locked".to_string());
            }
            let mut rows = self.rows.clone();
            rows.sort_by_key(|r| r.id);
            Ok(rows)
        }

        fn get_interaction(&self, id: i64) -> Result<Option<InteractionRow>, Self::Error> {
            Ok(self.rows.iter().find(|r| r.id == id).cloned())
        }

        fn find_protein(&self, symbol: &str) -> Result<Option<Protein>, Self::Error> {
            Ok(self.rows.iter().find_map(|r| {
                if r.protein_a_symbol == symbol {
                    Some(Protein { id: r.protein_a_id, symbol: symbol.to_string() })
                } else if r.protein_b_symbol == symbol {
                    Some(Protein { id: r.protein_b_id, symbol: symbol.to_string() })
                } else {
                    None
                }
            }))
        }

        fn apply_batch(&mut self, changes: &[RowChange]) -> Result<(), Self::Error> {
            let mut rows = self.rows.clone();
            for change in changes {
                if let RowChange::Delete(id) = change {
                    rows.retain(|r| r.id != *id);
                }
            }
            for change in changes {
                if let RowChange::Update(row) = change {
                    let slot = rows
                        .iter_mut()
                        .find(|r| r.id == row.id)
                        .ok_or_else(|| format!("no row {}", row.id))?;
                    *slot = row.clone();
                }
            }
            self.rows = rows;
            Ok(())
        }
    }

    struct MockCache(PayloadDocument);

    impl PayloadCache for MockCache {
        type Error = String;

        fn load(&self, symbol: &str) -> Result<Option<PayloadDocument>, Self::Error> {
            Ok((self.0.main() == symbol).then(|| self.0.clone()))
        }
    }

    fn protein_symbol(id: i64) -> String {
        match id {
            1 => "ATXN3".to_string(),
            2 => "VCP".to_string(),
            other => format!("P{}", other),
        }
    }

    fn create_test_row(id: i64, a: i64, b: i64) -> InteractionRow {
        InteractionRow {
            id,
            protein_a_id: a,
            protein_b_id: b,
            protein_a_symbol: protein_symbol(a),
            protein_b_symbol: protein_symbol(b),
            direction: Some("main_to_primary".into()),
            arrow: Some("activates".into()),
            discovered_in_query: Some(protein_symbol(a)),
            ..Default::default()
        }
    }

    fn messy_rows() -> Vec<InteractionRow> {
        let mut corrupted = create_test_row(3, 1, 3);
        corrupted.interaction_type = Some("indirect".into());
        corrupted.upstream_interactor = Some("ATXN3".into());
        corrupted.depth = Some(2);

        vec![
            create_test_row(1, 1, 2),
            create_test_row(2, 2, 1),
            corrupted,
            create_test_row(4, 4, 1),
        ]
    }

    #[test]
    fn test_janitor_creation() {
        let janitor = Janitor::default_config();
        assert!(janitor.config().dry_run);
        assert_eq!(janitor.metrics().sweep_count, 0);
        assert_eq!(janitor.metrics().changes_planned, 0);
    }

    #[test]
    fn test_dry_run_leaves_store_untouched() {
        let mut store = MockStore::new(messy_rows());
        let mut janitor = Janitor::default_config();

        let outcome = janitor.deduplicate(&mut store).unwrap();

        assert!(outcome.dry_run);
        assert_eq!(outcome.stats.duplicate_pairs_found, 1);
        assert!(outcome.planned > 0);
        assert_eq!(outcome.applied, 0);
        assert_eq!(store.rows, messy_rows());
    }

    #[test]
    fn test_apply_deduplicates() {
        let mut store = MockStore::new(messy_rows());
        let mut janitor = Janitor::new(JanitorConfig::apply());

        let outcome = janitor.deduplicate(&mut store).unwrap();
        assert_eq!(outcome.applied, outcome.planned);
        assert_eq!(store.rows.len(), 3);
        assert!(store.rows.iter().all(|r| r.is_canonical()));

        let again = janitor.deduplicate(&mut store).unwrap();
        assert_eq!(again.planned, 0);
        assert_eq!(again.stats.duplicate_pairs_found, 0);
    }

    #[test]
    fn test_repair_corruption() {
        let mut store = MockStore::new(messy_rows());
        let mut janitor = Janitor::new(JanitorConfig::apply());

        let outcome = janitor.repair_corruption(&mut store).unwrap();
        assert_eq!(outcome.stats.corrupted, 1);

        let fixed = store.get_interaction(3).unwrap().unwrap();
        assert_eq!(fixed.interaction_type.as_deref(), Some("direct"));
        assert_eq!(fixed.depth, Some(1));
        assert!(fixed.data.contains_key("_migration_fixed"));
    }

    #[test]
    fn test_full_sweep_cycle() {
        let mut store = MockStore::new(messy_rows());
        let mut janitor = Janitor::new(JanitorConfig::apply());

        let metrics = janitor.sweep(&mut store).unwrap();
        assert_eq!(metrics.sweep_count, 1);
        assert_eq!(metrics.job_runs, 4);
        assert!(metrics.changes_applied > 0);

        for row in &store.rows {
            assert!(row.is_canonical());
            assert!(row.pair_direction().is_some(), "{} not migrated", row.label());
            assert!(row.arrows.is_some());
            assert_eq!(row.function_context.as_deref(), Some("direct"));
        }

        janitor.reset_metrics();
        let metrics = janitor.sweep(&mut store).unwrap();
        assert_eq!(metrics.changes_planned, 0);
    }

    #[test]
    fn test_disabled_jobs_skipped() {
        let mut store = MockStore::new(messy_rows());
        let config = JanitorConfig {
            deduplicate: false,
            normalize_directions: false,
            ..JanitorConfig::default()
        };
        let mut janitor = Janitor::new(config);

        let metrics = janitor.sweep(&mut store).unwrap();
        assert_eq!(metrics.job_runs, 2);
        assert!(metrics.dedup.is_none());
        assert!(metrics.corruption.is_some());
        assert_eq!(metrics.pending_changes(), metrics.changes_planned);
    }

    #[test]
    fn test_restore_functions() {
        let mut vcp = propaths_domain::Interactor::new("VCP");
        vcp.functions = Some(vec![propaths_domain::FunctionRecord::named("ERAD")]);
        let cache = MockCache(PayloadDocument::with_interactors("ATXN3", vec![vcp]));

        let mut store = MockStore::new(vec![create_test_row(1, 1, 2)]);
        let mut janitor = Janitor::new(JanitorConfig::apply());
        let outcome = janitor.restore_functions(&mut store, &cache).unwrap();

        assert_eq!(outcome.stats.restored, 1);
        let row = store.get_interaction(1).unwrap().unwrap();
        assert_eq!(row.data["functions"][0]["function"], json!("ERAD"));
        assert_eq!(row.data["_restored_from_cache"], json!("ATXN3.json"));
    }

    #[test]
    fn test_store_errors_propagate() {
        let mut store = MockStore::new(Vec::new());
        store.fail = true;
        let mut janitor = Janitor::default_config();

        let result = janitor.sweep(&mut store);
        assert!(matches!(result, Err(JanitorError::Store(msg)) if msg.contains("locked")));
        assert_eq!(janitor.metrics().sweep_count, 0);
    }
}
