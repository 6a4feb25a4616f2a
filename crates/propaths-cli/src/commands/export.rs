//! Export command implementation.

use crate::cli::ExportArgs;
use crate::commands::merge::write_document;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use propaths_domain::PayloadDocument;
use propaths_store::{export_document, SqliteStore};
use propaths_validator::finalize;

/// Execute the export command.
pub fn execute_export(args: ExportArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let document = export_for(&args, store)?;
    match &args.output {
        Some(path) => {
            write_document(&document, path)?;
            println!(
                "{}",
                formatter.success(&format!(
                    "Exported {} interactor(s) of {} to {}",
                    document.interactors().len(),
                    document.main(),
                    path.display()
                ))
            );
        }
        None => println!("{}", serde_json::to_string_pretty(&document)?),
    }
    Ok(())
}

/// Build the exported document; an unknown protein is an error.
pub fn export_for(args: &ExportArgs, store: &SqliteStore) -> Result<PayloadDocument> {
    let mut document = export_document(store, &args.symbol)?.ok_or_else(|| {
        CliError::InvalidInput(format!("No protein '{}' in the database", args.symbol))
    })?;
    if args.finalize {
        finalize(&mut document, true);
    }
    Ok(document)
}
