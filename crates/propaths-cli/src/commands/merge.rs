//! Merge command implementation.

use crate::cli::MergeArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use propaths_domain::{PayloadDocument, PayloadUpdate};
use propaths_merge::{FragmentCoordinator, MergeConfig, MergeEngine, MergeError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Counts reported after a merge.
#[derive(Debug, Clone, Serialize)]
struct MergeSummary {
    main: String,
    fragments: usize,
    added: usize,
    updated: usize,
    unchanged: usize,
    functions_appended: usize,
    functions_deduplicated: usize,
    interactors: usize,
}

/// Execute the merge command.
///
/// Fragments are read by a worker task and applied by the coordinator in
/// command-line order. The merged document goes to `--output`, or to stdout
/// with the summary on stderr.
pub async fn execute_merge(args: MergeArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let merge_config = MergeConfig {
        replace_functions: args.replace_functions || config.merge.replace_functions,
        ..config.merge.clone()
    };

    let base = read_document(&args.base)?;
    let (document, summary) = merge_files(base, args.fragments, merge_config).await?;

    let rendered = formatter.format_stats(&summary)?;
    match &args.output {
        Some(path) => {
            write_document(&document, path)?;
            println!("{}", rendered);
            println!("{}", formatter.success(&format!("Wrote {}", path.display())));
        }
        None => {
            eprintln!("{}", rendered);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(())
}

async fn merge_files(
    base: PayloadDocument,
    fragments: Vec<PathBuf>,
    config: MergeConfig,
) -> Result<(PayloadDocument, MergeSummary)> {
    let (coordinator, sender) = FragmentCoordinator::new(MergeEngine::new(config), base);

    let reader = tokio::spawn(async move {
        for path in fragments {
            let text = tokio::fs::read_to_string(&path).await.map_err(|e| {
                MergeError::Worker(format!("{}: {}", path.display(), e))
            })?;
            let update = PayloadUpdate::parse(&text)?;
            tracing::debug!("{}: {}", path.display(), update.primaries().join(", "));
            sender.send(update).await?;
        }
        Ok::<(), MergeError>(())
    });

    let outcome = coordinator.run().await;
    reader
        .await
        .map_err(|e| MergeError::Worker(e.to_string()))??;

    let summary = MergeSummary {
        main: outcome.document.main().to_string(),
        fragments: outcome.fragments,
        added: outcome.report.added,
        updated: outcome.report.updated,
        unchanged: outcome.report.unchanged,
        functions_appended: outcome.report.functions_appended,
        functions_deduplicated: outcome.report.functions_deduplicated,
        interactors: outcome.document.interactors().len(),
    };
    Ok((outcome.document, summary))
}

/// Read a payload document (full document or bare context).
pub fn read_document(path: &Path) -> Result<PayloadDocument> {
    let text = std::fs::read_to_string(path)?;
    let value = serde_json::from_str(&text)?;
    PayloadDocument::from_value(value)
        .map_err(|e| CliError::InvalidInput(format!("{}: {}", path.display(), e)))
}

/// Write a payload document as pretty JSON.
pub fn write_document(document: &PayloadDocument, path: &Path) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(document)?)?;
    Ok(())
}
