//! Function-level defaults and field validation

use propaths_domain::{FunctionRecord, QueryDirection};
use std::fmt;

/// Arrow labels accepted on function records
pub const VALID_FUNCTION_ARROWS: &[&str] =
    &["activates", "inhibits", "binds", "complex", "regulates", "modulates"];

/// Arrow given to functions without a usable one
pub const DEFAULT_FUNCTION_ARROW: &str = "complex";

/// Text fields every function record should carry
pub const REQUIRED_TEXT_FIELDS: [&str; 3] = ["function", "cellular_process", "effect_description"];

/// A problem with one function record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionIssue {
    /// No arrow label
    MissingArrow,

    /// No direction label
    MissingDirection,

    /// Arrow label outside [`VALID_FUNCTION_ARROWS`]
    InvalidArrow(String),

    /// Direction label outside the query-relative set
    InvalidDirection(String),

    /// Required text field missing or blank
    MissingField(&'static str),
}

impl fmt::Display for FunctionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionIssue::MissingArrow => write!(f, "missing arrow"),
            FunctionIssue::MissingDirection => write!(f, "missing direction"),
            FunctionIssue::InvalidArrow(arrow) => write!(f, "invalid arrow '{}'", arrow),
            FunctionIssue::InvalidDirection(direction) => {
                write!(f, "invalid direction '{}'", direction)
            }
            FunctionIssue::MissingField(field) => write!(f, "missing '{}'", field),
        }
    }
}

/// Placeholder text for a missing field
pub fn placeholder(field: &str) -> String {
    format!("[Data not available for {}]", field)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

/// Default a missing arrow to `complex` and a missing direction to `main_to_primary`
pub(crate) fn apply_function_defaults(record: &mut FunctionRecord, apply: bool) -> Vec<FunctionIssue> {
    let mut issues = Vec::new();

    if is_blank(&record.arrow) {
        issues.push(FunctionIssue::MissingArrow);
        if apply {
            record.arrow = Some(DEFAULT_FUNCTION_ARROW.to_string());
        }
    }

    if is_blank(&record.direction) {
        issues.push(FunctionIssue::MissingDirection);
        if apply {
            record.direction = Some(QueryDirection::MainToPrimary.as_str().to_string());
        }
    }

    issues
}

/// Check a function record's arrow, direction and text fields
///
/// Present but unrecognized arrows become `complex` and unrecognized
/// directions `main_to_primary`; blank text fields get a [`placeholder`].
/// Absent arrows and directions are left to the default rule.
pub fn validate_function_fields(record: &mut FunctionRecord, apply: bool) -> Vec<FunctionIssue> {
    let mut issues = Vec::new();

    if let Some(arrow) = record.arrow.as_deref().filter(|a| !a.trim().is_empty()) {
        let known = VALID_FUNCTION_ARROWS
            .iter()
            .any(|valid| valid.eq_ignore_ascii_case(arrow.trim()));
        if !known {
            issues.push(FunctionIssue::InvalidArrow(arrow.to_string()));
            if apply {
                record.arrow = Some(DEFAULT_FUNCTION_ARROW.to_string());
            }
        }
    }

    if let Some(direction) = record.direction.as_deref().filter(|d| !d.trim().is_empty()) {
        if QueryDirection::parse(direction).is_none() {
            issues.push(FunctionIssue::InvalidDirection(direction.to_string()));
            if apply {
                record.direction = Some(QueryDirection::MainToPrimary.as_str().to_string());
            }
        }
    }

    for field in REQUIRED_TEXT_FIELDS {
        let slot = match field {
            "function" => &mut record.function,
            "cellular_process" => &mut record.cellular_process,
            _ => &mut record.effect_description,
        };
        if is_blank(slot) {
            issues.push(FunctionIssue::MissingField(field));
            if apply {
                *slot = Some(placeholder(field));
            }
        }
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let mut record = FunctionRecord::named("ERAD");
        let issues = apply_function_defaults(&mut record, true);
        assert_eq!(issues, vec![FunctionIssue::MissingArrow, FunctionIssue::MissingDirection]);
        assert_eq!(record.arrow.as_deref(), Some("complex"));
        assert_eq!(record.direction.as_deref(), Some("main_to_primary"));
        assert!(apply_function_defaults(&mut record, true).is_empty());
    }

    #[test]
    fn test_defaults_report_only() {
        let mut record = FunctionRecord::named("ERAD").with_direction("bidirectional");
        let issues = apply_function_defaults(&mut record, false);
        assert_eq!(issues, vec![FunctionIssue::MissingArrow]);
        assert!(record.arrow.is_none());
    }

    #[test]
    fn test_invalid_values_coerced() {
        let mut record = FunctionRecord::named("ERAD")
            .with_arrow("upregulates")
            .with_direction("sideways");
        record.cellular_process = Some("proteostasis".into());
        record.effect_description = Some("clears misfolded proteins".into());

        let issues = validate_function_fields(&mut record, true);
        assert_eq!(issues.len(), 2);
        assert_eq!(record.arrow.as_deref(), Some("complex"));
        assert_eq!(record.direction.as_deref(), Some("main_to_primary"));
    }

    #[test]
    fn test_valid_arrow_case_insensitive() {
        let mut record = FunctionRecord::named("ERAD").with_arrow("Regulates");
        let issues = validate_function_fields(&mut record, true);
        assert!(!issues.iter().any(|i| matches!(i, FunctionIssue::InvalidArrow(_))));
        assert_eq!(record.arrow.as_deref(), Some("Regulates"));
    }

    #[test]
    fn test_placeholders() {
        let mut record = FunctionRecord {
            cellular_process: Some("  ".into()),
            ..Default::default()
        };
        let issues = validate_function_fields(&mut record, true);
        assert_eq!(issues.len(), 3);
        assert_eq!(record.function.as_deref(), Some("[Data not available for function]"));
        assert_eq!(
            record.cellular_process.as_deref(),
            Some("[Data not available for cellular_process]")
        );
        assert!(record.arrow.is_none());
    }
}
