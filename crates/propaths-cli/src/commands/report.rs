//! Report command implementation.

use crate::cli::ReportArgs;
use crate::commands::merge::read_document;
use crate::error::Result;
use crate::output::Formatter;
use propaths_validator::DocumentReport;

/// Execute the report command.
pub fn execute_report(args: ReportArgs, formatter: &Formatter) -> Result<()> {
    let document = read_document(&args.file)?;
    let report = DocumentReport::from_document(&document);
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}
