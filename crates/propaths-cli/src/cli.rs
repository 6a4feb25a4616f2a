//! CLI command definitions and argument parsing.

use clap::{ArgAction, ArgGroup, Parser, Subcommand};
use std::path::PathBuf;

/// ProPaths CLI - Maintain protein interaction data.
#[derive(Debug, Parser)]
#[command(name = "propaths")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database path
    #[arg(long, global = true, env = "PROPATHS_DB")]
    pub db: Option<PathBuf>,

    /// Directory of cached query results (<SYMBOL>.json)
    #[arg(long, global = true, env = "PROPATHS_CACHE_DIR")]
    pub cache_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Collapse duplicate pairs and reorder rows into canonical slots
    Dedup(JobArgs),

    /// Convert stored directions to pair-absolute labels
    FixDirections(JobArgs),

    /// Reset rows whose upstream interactor is one of their own proteins
    FixCorruption(JobArgs),

    /// Fill arrows and function_context on older rows
    Backfill(JobArgs),

    /// Restore missing functions from cached query results
    RestoreFunctions(JobArgs),

    /// Run corruption repair, dedup, direction migration and backfill
    Sweep(JobArgs),

    /// Copy cached query results into the database
    Sync(SyncArgs),

    /// Write the stored interactions of one protein as a payload document
    Export(ExportArgs),

    /// Merge update fragments into a payload document
    Merge(MergeArgs),

    /// Check and repair a payload document
    Validate(ValidateArgs),

    /// Summarize a payload document
    Report(ReportArgs),
}

/// Arguments shared by the maintenance jobs.
#[derive(Debug, Clone, Parser)]
pub struct JobArgs {
    /// Write the planned changes (default is a dry run)
    #[arg(long)]
    pub apply: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the sync command.
#[derive(Debug, Parser)]
#[command(group(ArgGroup::new("target").required(true).args(["symbol", "all"])))]
pub struct SyncArgs {
    /// Query protein whose cached result is synced
    pub symbol: Option<String>,

    /// Sync every cached result
    #[arg(long)]
    pub all: bool,
}

/// Arguments for the export command.
#[derive(Debug, Parser)]
pub struct ExportArgs {
    /// Protein whose interactions are exported
    pub symbol: String,

    /// Add arrow notation to every interactor
    #[arg(long)]
    pub finalize: bool,

    /// Write the document here (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the merge command.
#[derive(Debug, Parser)]
pub struct MergeArgs {
    /// Payload document to merge into
    pub base: PathBuf,

    /// Fragment files, applied in order
    #[arg(required = true)]
    pub fragments: Vec<PathBuf>,

    /// Replace functions instead of appending them
    #[arg(long)]
    pub replace_functions: bool,

    /// Write the merged document here (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Payload document to validate
    pub file: PathBuf,

    /// Report arrow problems without fixing them
    #[arg(long)]
    pub no_fix_arrows: bool,

    /// Report chain problems without fixing them
    #[arg(long)]
    pub no_fix_chains: bool,

    /// Report direction problems without fixing them
    #[arg(long)]
    pub no_fix_directions: bool,

    /// Also coerce invalid function fields and fill placeholders
    #[arg(long)]
    pub strict: bool,

    /// Add arrow notation and sync the snapshot after validation
    #[arg(long)]
    pub finalize: bool,

    /// Write the repaired document here
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the report command.
#[derive(Debug, Parser)]
pub struct ReportArgs {
    /// Payload document to summarize
    pub file: PathBuf,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
