//! ProPaths Janitor
//!
//! Batch maintenance jobs over persisted interaction rows.
//!
//! # Overview
//!
//! The Janitor is responsible for:
//! - **Corruption repair**: resetting rows whose upstream interactor is one of
//!   their own two proteins
//! - **Deduplication**: collapsing rows that describe the same unordered pair
//!   and moving every row into canonical slot order
//! - **Direction migration**: converting query-relative directions to
//!   pair-absolute ones
//! - **Backfill**: filling `arrows` and `function_context` on older rows
//! - **Function restore**: recovering lost function lists from cached query
//!   results
//!
//! Every job is split into a pure planner (rows in, [`RowChange`] batch and
//! counts out) and a commit step. The Janitor is a dry run by default: the
//! batch is reported but only written with [`JanitorConfig::apply`] or
//! `dry_run = false`. A committed batch is one transaction, and a second run
//! of any job after a successful commit plans no changes.
//!
//! [`RowChange`]: propaths_domain::RowChange
//!
//! # Usage
//!
//! ```no_run
//! use propaths_janitor::{Janitor, JanitorConfig};
//! use propaths_store::SqliteStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut store = SqliteStore::new("propaths.db")?;
//!
//! // Preview first
//! let mut janitor = Janitor::default_config();
//! let outcome = janitor.deduplicate(&mut store)?;
//! println!("{} duplicate pair(s)", outcome.stats.duplicate_pairs_found);
//!
//! // Then commit everything
//! let mut janitor = Janitor::new(JanitorConfig::apply());
//! let metrics = janitor.sweep(&mut store)?;
//! println!("{}", metrics.summary());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The Janitor can be configured via TOML:
//!
//! ```toml
//! [janitor]
//! dry_run = true
//! repair_corruption = true
//! deduplicate = true
//! normalize_directions = true
//! backfill = true
//! ```

#![warn(missing_docs)]

mod backfill;
mod config;
mod corruption;
mod dedup;
mod directions;
mod error;
mod janitor;
mod metrics;
mod restore;

pub use backfill::{plan_backfill, BackfillStats};
pub use config::JanitorConfig;
pub use corruption::{is_self_referential, plan_corruption_repair, CorruptionStats};
pub use dedup::{group_by_pair, plan_dedup, DedupStats};
pub use directions::{plan_direction_migration, DirectionStats};
pub use error::JanitorError;
pub use janitor::{Janitor, JobOutcome};
pub use metrics::JanitorMetrics;
pub use restore::{plan_restore, RestoreStats};
