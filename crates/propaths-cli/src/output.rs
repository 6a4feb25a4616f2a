//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::{Color, Colorize};
use propaths_validator::{DocumentReport, ValidationSummary};
use serde::Serialize;
use serde_json::Value;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format any statistics struct.
    ///
    /// Tables show one row per field; nested fields use dotted names and
    /// absent (null) fields are left out.
    pub fn format_stats<T: Serialize>(&self, stats: &T) -> Result<String> {
        let value = serde_json::to_value(stats)?;
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&value)?),
            OutputFormat::Table => {
                let mut rows = Vec::new();
                flatten("", &value, &mut rows);

                let mut builder = Builder::default();
                builder.push_record(["Field", "Value"]);
                for (field, value) in rows {
                    builder.push_record([field, value]);
                }
                Ok(self.style(builder))
            }
        }
    }

    /// Format validation findings.
    pub fn format_findings(&self, summary: &ValidationSummary) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let findings: Vec<Value> = summary
                    .findings
                    .iter()
                    .map(|f| {
                        serde_json::json!({
                            "primary": f.primary,
                            "issue": f.issue.to_string(),
                            "ambiguous": f.issue.is_ambiguous(),
                            "fixed": f.fixed
                        })
                    })
                    .collect();

                Ok(serde_json::to_string_pretty(&serde_json::json!({
                    "interactors_checked": summary.interactors_checked,
                    "issues_found": summary.issues_found(),
                    "issues_fixed": summary.issues_fixed(),
                    "issues_remaining": summary.remaining(),
                    "ambiguous": summary.ambiguous(),
                    "findings": findings
                }))?)
            }
            OutputFormat::Table => {
                if summary.is_clean() {
                    return Ok(self.success(&format!(
                        "No issues found in {} interactor(s)",
                        summary.interactors_checked
                    )));
                }

                let mut builder = Builder::default();
                builder.push_record(["Interactor", "Issue", "Fixed"]);
                for finding in &summary.findings {
                    let fixed = if finding.fixed { "yes" } else { "no" };
                    builder.push_record([finding.primary.clone(), finding.issue.to_string(), fixed.to_string()]);
                }
                Ok(format!("{}\n{}", self.style(builder), summary.summary()))
            }
        }
    }

    /// Format a document report.
    pub fn format_report(&self, report: &DocumentReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            OutputFormat::Table => Ok(report.to_string()),
        }
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.paint(format!("✓ {}", message), Color::Green)
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.paint(format!("ℹ {}", message), Color::Blue)
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.paint(format!("⚠ {}", message), Color::Yellow)
    }

    fn style(&self, builder: Builder) -> String {
        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn paint(&self, text: String, color: Color) -> String {
        if self.color_enabled {
            text.color(color).to_string()
        } else {
            text
        }
    }
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Null => {}
        Value::Object(map) => {
            for (key, nested) in map {
                let name = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten(&name, nested, rows);
            }
        }
        Value::Array(items) => {
            let joined: Vec<String> = items.iter().map(scalar_text).collect();
            rows.push((prefix.to_string(), joined.join(", ")));
        }
        scalar => rows.push((prefix.to_string(), scalar_text(scalar))),
    }
}

fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propaths_domain::{Interactor, PayloadDocument};
    use propaths_validator::SchemaValidator;
    use serde_json::json;

    #[derive(Serialize)]
    struct Sample {
        total: usize,
        skipped: Option<usize>,
        nested: Value,
    }

    fn sample() -> Sample {
        Sample {
            total: 3,
            skipped: None,
            nested: json!({"by_protein": {"ATXN3": 2}, "names": ["VCP", "LC3"]}),
        }
    }

    #[test]
    fn test_stats_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_stats(&sample()).unwrap();
        assert!(output.contains("total"));
        assert!(output.contains("nested.by_protein.ATXN3"));
        assert!(output.contains("VCP, LC3"));
        assert!(!output.contains("skipped"));
    }

    #[test]
    fn test_stats_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_stats(&sample()).unwrap();
        let value: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], json!(3));
        assert_eq!(value["skipped"], Value::Null);
    }

    #[test]
    fn test_findings_table() {
        let document = PayloadDocument::with_interactors("ATXN3", vec![Interactor::new("VCP")]);
        let (_, summary) = SchemaValidator::default_config().validate_and_fix(&document);

        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_findings(&summary).unwrap();
        assert!(output.contains("Interactor"));
        assert!(output.contains("Issues found"));
    }

    #[test]
    fn test_clean_findings() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_findings(&ValidationSummary::default()).unwrap();
        assert!(output.contains("No issues found"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.warning("test"), "⚠ test");
    }
}
