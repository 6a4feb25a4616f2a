//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::commands::merge::write_document;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use propaths_domain::PayloadDocument;
use propaths_validator::{finalize, SchemaValidator, ValidationSummary, ValidatorConfig};
use std::fs;

/// Execute the validate command.
///
/// Findings are always printed; the repaired document is only written when
/// `--output` is given.
pub fn execute_validate(args: ValidateArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let validator = SchemaValidator::new(validator_config(&args, config));
    let text = fs::read_to_string(&args.file)?;
    let (document, summary) = validate_text(&validator, &text, args.finalize)?;

    println!("{}", formatter.format_findings(&summary)?);

    match &args.output {
        Some(path) => {
            write_document(&document, path)?;
            println!("{}", formatter.success(&format!("Wrote {}", path.display())));
        }
        None if summary.issues_fixed() > 0 => {
            println!(
                "{}",
                formatter.info("Repairs were not saved; use --output to write the document")
            );
        }
        None => {}
    }
    Ok(())
}

/// Config file settings with the command-line switches applied.
fn validator_config(args: &ValidateArgs, config: &Config) -> ValidatorConfig {
    let mut validator = config.validator.clone();
    if args.no_fix_arrows {
        validator.fix_arrows = false;
    }
    if args.no_fix_chains {
        validator.fix_chains = false;
    }
    if args.no_fix_directions {
        validator.fix_directions = false;
    }
    if args.strict {
        validator.fix_function_fields = true;
    }
    validator
}

fn validate_text(
    validator: &SchemaValidator,
    text: &str,
    add_notation: bool,
) -> Result<(PayloadDocument, ValidationSummary)> {
    let (mut document, summary) = validator.validate_str(text)?;
    if add_notation {
        finalize(&mut document, true);
    }
    Ok((document, summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    const DOCUMENT: &str = r#"{
        "ctx_json": {
            "main": "ATXN3",
            "interactors": [
                {"primary": "VCP", "arrow": "inhibits", "direction": "primary_to_main"},
                {"primary": "LC3", "interaction_type": "indirect", "upstream_interactor": "BECN1"}
            ]
        }
    }"#;

    fn validate_args(argv: &[&str]) -> ValidateArgs {
        let mut full = vec!["propaths", "validate", "doc.json"];
        full.extend_from_slice(argv);
        match Cli::parse_from(full).command {
            Command::Validate(args) => args,
            _ => panic!("Expected Validate command"),
        }
    }

    #[test]
    fn test_switches_override_file() {
        let mut config = Config::default();
        config.validator.fix_function_fields = false;

        let validator = validator_config(&validate_args(&["--no-fix-chains", "--strict"]), &config);
        assert!(!validator.fix_chains);
        assert!(validator.fix_arrows);
        assert!(validator.fix_function_fields);
    }

    #[test]
    fn test_repairs_chain() {
        let validator = SchemaValidator::default_config();
        let (document, summary) = validate_text(&validator, DOCUMENT, false).unwrap();

        assert!(summary.issues_fixed() > 0);
        let lc3 = document.interactor("LC3").unwrap();
        assert_eq!(lc3.mediator_chain.as_deref(), Some(&["BECN1".to_string()][..]));
        assert!(document.snapshot_in_sync());
    }

    #[test]
    fn test_finalize_adds_notation() {
        let validator = SchemaValidator::default_config();
        let (document, _) = validate_text(&validator, DOCUMENT, true).unwrap();
        assert_eq!(
            document.interactor("VCP").unwrap().arrow_notation.as_deref(),
            Some("ATXN3 <--inhibits-- VCP:")
        );
    }

    #[test]
    fn test_report_only_leaves_chain() {
        let validator = SchemaValidator::new(validator_config(&validate_args(&["--no-fix-chains"]), &Config::default()));
        let (document, summary) = validate_text(&validator, DOCUMENT, false).unwrap();

        assert!(summary.remaining() > 0);
        assert!(document.interactor("LC3").unwrap().mediator_chain.is_none());
    }
}
