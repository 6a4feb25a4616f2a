//! Sync command implementation.

use crate::cli::SyncArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use propaths_domain::traits::PayloadCache;
use propaths_store::{sync_document, CacheDirectory, SqliteStore, SyncStats};
use serde::Serialize;

/// Totals over every synced cache entry.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncSummary {
    /// Cache entries synced
    pub documents: usize,
    /// Cache entries that could not be read
    pub failed: Vec<String>,
    /// Row and protein counts
    pub stats: SyncStats,
}

/// Execute the sync command.
pub fn execute_sync(
    args: SyncArgs,
    store: &mut SqliteStore,
    cache: &CacheDirectory,
    formatter: &Formatter,
) -> Result<()> {
    let summary = if args.all {
        let symbols = cache.symbols()?;
        if symbols.is_empty() {
            println!(
                "{}",
                formatter.warning(&format!("No cached results in {}", cache.root().display()))
            );
            return Ok(());
        }
        sync_all(&symbols, store, cache)?
    } else {
        let symbol = args
            .symbol
            .ok_or_else(|| CliError::InvalidInput("Give a symbol or --all".to_string()))?;
        sync_one(&symbol, store, cache)?
    };

    println!("{}", formatter.format_stats(&summary)?);
    if !summary.failed.is_empty() {
        println!(
            "{}",
            formatter.warning(&format!("{} cache entry(ies) could not be read", summary.failed.len()))
        );
    }
    Ok(())
}

/// Sync a single query protein; a missing cache entry is an error.
pub fn sync_one(symbol: &str, store: &mut SqliteStore, cache: &CacheDirectory) -> Result<SyncSummary> {
    let document = cache.load(symbol)?.ok_or_else(|| {
        CliError::InvalidInput(format!(
            "No cached result for {} ({})",
            symbol,
            cache.path_for(symbol).display()
        ))
    })?;

    let stats = sync_document(store, symbol, &document)?;
    tracing::info!("{}: {}", symbol, stats);
    Ok(SyncSummary {
        documents: 1,
        failed: Vec::new(),
        stats,
    })
}

/// Sync every listed entry; unreadable entries are skipped and reported.
///
/// Each document is its own transaction.
pub fn sync_all(symbols: &[String], store: &mut SqliteStore, cache: &CacheDirectory) -> Result<SyncSummary> {
    let mut summary = SyncSummary::default();

    for symbol in symbols {
        let document = match cache.load(symbol) {
            Ok(Some(document)) => document,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Skipping {}: {}", cache.path_for(symbol).display(), e);
                summary.failed.push(symbol.clone());
                continue;
            }
        };

        let stats = sync_document(store, symbol, &document)?;
        tracing::info!("{}: {}", symbol, stats);
        summary.stats.absorb(&stats);
        summary.documents += 1;
    }

    Ok(summary)
}
