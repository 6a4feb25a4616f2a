//! Maintenance job commands (dedup, fix-directions, fix-corruption,
//! backfill, restore-functions, sweep).

use crate::cli::JobArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use propaths_janitor::{Janitor, JanitorConfig, JobOutcome};
use propaths_store::{CacheDirectory, SqliteStore};
use serde::Serialize;
use serde_json::Value;
use std::io::{self, Write};

/// A maintenance job selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Collapse duplicate pairs
    Dedup,
    /// Migrate directions to pair-absolute labels
    FixDirections,
    /// Reset self-referential rows
    FixCorruption,
    /// Fill arrows and function_context
    Backfill,
    /// Restore functions from the cache
    RestoreFunctions,
    /// Every job enabled in the janitor config
    Sweep,
}

impl Job {
    /// Command name.
    pub fn name(&self) -> &'static str {
        match self {
            Job::Dedup => "dedup",
            Job::FixDirections => "fix-directions",
            Job::FixCorruption => "fix-corruption",
            Job::Backfill => "backfill",
            Job::RestoreFunctions => "restore-functions",
            Job::Sweep => "sweep",
        }
    }
}

/// What one job run planned and wrote.
#[derive(Debug, Clone, Serialize)]
pub struct JobSummary {
    /// Command name
    pub job: &'static str,
    /// Nothing was written
    pub dry_run: bool,
    /// Row changes planned
    pub planned: usize,
    /// Row changes written
    pub applied: usize,
    /// Job statistics (janitor metrics for a sweep)
    pub stats: Value,
}

impl JobSummary {
    fn from_outcome<T: Serialize>(job: Job, outcome: JobOutcome<T>) -> Result<Self> {
        Ok(Self {
            job: job.name(),
            dry_run: outcome.dry_run,
            planned: outcome.planned,
            applied: outcome.applied,
            stats: serde_json::to_value(&outcome.stats)?,
        })
    }
}

/// Execute a maintenance job.
///
/// Without `--apply` the job is a dry run. With `--apply` the planned
/// changes are shown and confirmed first unless `--yes` is given.
pub fn execute_job(
    job: Job,
    args: JobArgs,
    config: &Config,
    store: &mut SqliteStore,
    cache: &CacheDirectory,
    formatter: &Formatter,
) -> Result<()> {
    if args.apply && !args.yes {
        let preview = run_job(job, janitor_for(config, true), store, cache)?;
        println!("{}", formatter.format_stats(&preview)?);

        if preview.planned == 0 {
            println!("{}", formatter.success("Nothing to change"));
            return Ok(());
        }
        let prompt = format!("About to write {} change(s) ({}).", preview.planned, job.name());
        if !confirm(&prompt)? {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    let summary = run_job(job, janitor_for(config, !args.apply), store, cache)?;
    println!("{}", formatter.format_stats(&summary)?);

    if summary.dry_run && summary.planned > 0 {
        println!(
            "{}",
            formatter.info(&format!(
                "Dry run: re-run with --apply to write {} change(s)",
                summary.planned
            ))
        );
    } else if !summary.dry_run {
        println!("{}", formatter.success(&format!("Wrote {} change(s)", summary.applied)));
    }

    Ok(())
}

fn janitor_for(config: &Config, dry_run: bool) -> Janitor {
    Janitor::new(JanitorConfig {
        dry_run,
        ..config.janitor.clone()
    })
}

/// Run one job with the given janitor.
pub fn run_job(
    job: Job,
    mut janitor: Janitor,
    store: &mut SqliteStore,
    cache: &CacheDirectory,
) -> Result<JobSummary> {
    match job {
        Job::Dedup => JobSummary::from_outcome(job, janitor.deduplicate(store)?),
        Job::FixDirections => JobSummary::from_outcome(job, janitor.normalize_directions(store)?),
        Job::FixCorruption => JobSummary::from_outcome(job, janitor.repair_corruption(store)?),
        Job::Backfill => JobSummary::from_outcome(job, janitor.backfill(store)?),
        Job::RestoreFunctions => JobSummary::from_outcome(job, janitor.restore_functions(store, cache)?),
        Job::Sweep => {
            let metrics = janitor.sweep(store)?;
            tracing::debug!("{}", metrics.summary());
            Ok(JobSummary {
                job: job.name(),
                dry_run: janitor.config().dry_run,
                planned: metrics.changes_planned,
                applied: metrics.changes_applied,
                stats: serde_json::to_value(&metrics)?,
            })
        }
    }
}

fn confirm(prompt: &str) -> Result<bool> {
    println!("{}", prompt);
    print!("Continue? [y/N] ");
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
