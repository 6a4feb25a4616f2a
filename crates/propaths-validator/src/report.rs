//! Read-only document statistics

use propaths_domain::{PayloadDocument, QueryDirection};
use serde::Serialize;
use std::fmt;

/// Maximum names listed per problem category in the text report
const LISTED_NAMES: usize = 5;

/// Structural overview of a payload document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentReport {
    /// Query protein
    pub main: String,

    /// Total interactors
    pub total: usize,

    /// Interactors marked direct
    pub direct: usize,

    /// Interactors marked indirect
    pub indirect: usize,

    /// Interactors with `main_to_primary`
    pub main_to_primary: usize,

    /// Interactors with `primary_to_main`
    pub primary_to_main: usize,

    /// Interactors with `bidirectional`
    pub bidirectional: usize,

    /// Interactors without an arrow
    pub missing_arrows: Vec<String>,

    /// Indirect interactors without an upstream
    pub missing_chains: Vec<String>,
}

impl DocumentReport {
    /// Build the report for a document
    pub fn from_document(document: &PayloadDocument) -> Self {
        let mut report = DocumentReport {
            main: document.main().to_string(),
            total: document.interactors().len(),
            ..Default::default()
        };

        for interactor in document.interactors() {
            if interactor.is_indirect() {
                report.indirect += 1;
                if !interactor.has_upstream() {
                    report.missing_chains.push(interactor.primary.clone());
                }
            } else {
                report.direct += 1;
            }

            match interactor.query_direction() {
                Some(QueryDirection::MainToPrimary) => report.main_to_primary += 1,
                Some(QueryDirection::PrimaryToMain) => report.primary_to_main += 1,
                Some(QueryDirection::Bidirectional) => report.bidirectional += 1,
                None => {}
            }

            if interactor.arrow.as_deref().map_or(true, |a| a.trim().is_empty()) {
                report.missing_arrows.push(interactor.primary.clone());
            }
        }

        report
    }

    fn percent(&self, count: usize) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            100.0 * count as f64 / self.total as f64
        }
    }
}

fn write_names(f: &mut fmt::Formatter<'_>, title: &str, names: &[String]) -> fmt::Result {
    if names.is_empty() {
        return Ok(());
    }
    writeln!(f, "{} ({}):", title, names.len())?;
    for name in names.iter().take(LISTED_NAMES) {
        writeln!(f, "  - {}", name)?;
    }
    if names.len() > LISTED_NAMES {
        writeln!(f, "  ... and {} more", names.len() - LISTED_NAMES)?;
    }
    Ok(())
}

impl fmt::Display for DocumentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation report: {}", self.main)?;
        writeln!(f, "Total interactors: {}", self.total)?;
        writeln!(f, "  Direct: {}", self.direct)?;
        writeln!(f, "  Indirect: {}", self.indirect)?;
        writeln!(f, "Direction distribution:")?;
        for (label, count) in [
            ("main_to_primary", self.main_to_primary),
            ("primary_to_main", self.primary_to_main),
            ("bidirectional", self.bidirectional),
        ] {
            writeln!(f, "  {}: {} ({:.1}%)", label, count, self.percent(count))?;
        }
        write_names(f, "Interactors missing arrows", &self.missing_arrows)?;
        write_names(f, "Indirect interactors missing chain data", &self.missing_chains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propaths_domain::{InteractionType, Interactor};

    #[test]
    fn test_counts() {
        let mut vcp = Interactor::new("VCP");
        vcp.arrow = Some("binds".into());
        vcp.direction = Some("bidirectional".into());
        let mut lc3 = Interactor::new("LC3");
        lc3.set_kind(InteractionType::Indirect);
        lc3.direction = Some("main_to_primary".into());

        let document = PayloadDocument::with_interactors("ATXN3", vec![vcp, lc3]);
        let report = DocumentReport::from_document(&document);

        assert_eq!(report.total, 2);
        assert_eq!(report.direct, 1);
        assert_eq!(report.indirect, 1);
        assert_eq!(report.bidirectional, 1);
        assert_eq!(report.main_to_primary, 1);
        assert_eq!(report.missing_arrows, vec!["LC3"]);
        assert_eq!(report.missing_chains, vec!["LC3"]);

        let text = report.to_string();
        assert!(text.contains("bidirectional: 1 (50.0%)"));
        assert!(text.contains("  - LC3"));
    }

    #[test]
    fn test_empty_document() {
        let report = DocumentReport::from_document(&PayloadDocument::new("ATXN3"));
        assert_eq!(report.total, 0);
        assert!(report.to_string().contains("main_to_primary: 0 (0.0%)"));
    }

    #[test]
    fn test_long_lists_truncated() {
        let interactors = (0..7).map(|i| Interactor::new(format!("P{}", i))).collect();
        let document = PayloadDocument::with_interactors("ATXN3", interactors);
        let text = DocumentReport::from_document(&document).to_string();
        assert!(text.contains("... and 2 more"));
    }
}
