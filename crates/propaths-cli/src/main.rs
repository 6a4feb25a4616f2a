//! ProPaths CLI - Command-line interface for protein interaction maintenance.

use clap::Parser;
use propaths_cli::commands::{self, Job};
use propaths_cli::cli::JobArgs;
use propaths_cli::{Cli, Command, Config, Formatter};
use propaths_store::{CacheDirectory, SqliteStore};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> propaths_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Load config; an explicit path must exist
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    let Cli {
        db,
        cache_dir,
        command,
        ..
    } = cli;

    // Handle commands
    match command {
        Command::Merge(args) => commands::execute_merge(args, &config, &formatter).await,
        Command::Validate(args) => commands::execute_validate(args, &config, &formatter),
        Command::Report(args) => commands::execute_report(args, &formatter),
        Command::Sync(args) => {
            let (mut store, cache) = open_store(&config, db, cache_dir)?;
            commands::execute_sync(args, &mut store, &cache, &formatter)
        }
        Command::Export(args) => {
            let (store, _) = open_store(&config, db, cache_dir)?;
            commands::execute_export(args, &store, &formatter)
        }
        Command::Dedup(args) => run_job(Job::Dedup, args, &config, db, cache_dir, &formatter),
        Command::FixDirections(args) => run_job(Job::FixDirections, args, &config, db, cache_dir, &formatter),
        Command::FixCorruption(args) => run_job(Job::FixCorruption, args, &config, db, cache_dir, &formatter),
        Command::Backfill(args) => run_job(Job::Backfill, args, &config, db, cache_dir, &formatter),
        Command::RestoreFunctions(args) => {
            run_job(Job::RestoreFunctions, args, &config, db, cache_dir, &formatter)
        }
        Command::Sweep(args) => run_job(Job::Sweep, args, &config, db, cache_dir, &formatter),
    }
}

fn run_job(
    job: Job,
    args: JobArgs,
    config: &Config,
    db: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
    formatter: &Formatter,
) -> propaths_cli::Result<()> {
    let (mut store, cache) = open_store(config, db, cache_dir)?;
    commands::execute_job(job, args, config, &mut store, &cache, formatter)
}

/// Open the database (creating its directory) and the cache.
fn open_store(
    config: &Config,
    db: Option<PathBuf>,
    cache_dir: Option<PathBuf>,
) -> propaths_cli::Result<(SqliteStore, CacheDirectory)> {
    let db_path = config.database(db)?;
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let store = SqliteStore::new(&db_path)?;
    let cache = CacheDirectory::new(config.cache(cache_dir)?);
    tracing::info!("Database: {}, cache: {}", db_path.display(), cache.root().display());
    Ok((store, cache))
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
