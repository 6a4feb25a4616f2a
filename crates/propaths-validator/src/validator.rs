//! Schema consistency validation

use crate::chain::infer_chain;
use crate::functions::{apply_function_defaults, validate_function_fields, FunctionIssue};
use crate::{ValidatorConfig, ValidatorError};
use propaths_domain::{
    aggregate_function_arrows, Aggregation, ArrowClassifier, ArrowKind, Classify,
    DirectionNormalizer, InteractionType, Interactor, Normalize, PayloadDocument, QueryDirection,
};
use std::fmt;

/// A structural problem found on one interactor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    /// No usable `primary` symbol; left for a curator
    MissingPrimary,

    /// A function record problem
    Function {
        /// Position in the interactor's function list
        index: usize,
        /// What was wrong
        issue: FunctionIssue,
    },

    /// Interactor arrow missing or not canonical
    ArrowNormalized {
        /// Previous value
        from: Option<String>,
        /// Canonical kind
        to: ArrowKind,
    },

    /// Direction filled from function evidence or rewritten in canonical form
    DirectionRefreshed {
        /// Previous value
        from: Option<String>,
        /// New direction
        to: QueryDirection,
    },

    /// Direction missing or unrecognized with no evidence; defaults to bidirectional
    DirectionDefaulted {
        /// Previous value
        from: Option<String>,
    },

    /// Upstream interactor is the query protein or the interactor itself
    SelfReferentialUpstream {
        /// The offending upstream
        upstream: String,
    },

    /// No `interaction_type`; treated as direct
    InteractionTypeMissing,

    /// Indirect interactor with neither upstream nor chain
    ChainGap {
        /// Upstream found in function text, if any
        inferred: Option<String>,
    },

    /// Upstream missing; taken from the end of the chain
    UpstreamFromChain {
        /// Chosen upstream
        upstream: String,
    },

    /// Chain missing; built from the upstream
    ChainFromUpstream {
        /// Upstream used as the single mediator
        upstream: String,
    },

    /// Indirect depth missing or below 2
    IndirectDepth {
        /// Previous value
        from: Option<u32>,
        /// Required depth
        to: u32,
    },

    /// Direct interactor with depth other than 1
    DirectDepth {
        /// Previous value
        from: Option<u32>,
    },
}

impl Issue {
    /// True when the repair had to fall back to a default instead of evidence
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            Issue::DirectionDefaulted { .. } | Issue::ChainGap { inferred: None }
        )
    }
}

fn shown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("none")
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Issue::MissingPrimary => write!(f, "missing primary symbol"),
            Issue::Function { index, issue } => write!(f, "function {}: {}", index, issue),
            Issue::ArrowNormalized { from, to } => {
                write!(f, "arrow '{}' -> '{}'", shown(from), to)
            }
            Issue::DirectionRefreshed { from, to } => {
                write!(f, "direction '{}' -> '{}'", shown(from), to)
            }
            Issue::DirectionDefaulted { from } => {
                write!(f, "direction '{}' unusable, defaulted to bidirectional", shown(from))
            }
            Issue::SelfReferentialUpstream { upstream } => {
                write!(f, "self-referential upstream '{}'", upstream)
            }
            Issue::InteractionTypeMissing => write!(f, "missing interaction_type"),
            Issue::ChainGap { inferred: Some(upstream) } => {
                write!(f, "missing chain, inferred upstream '{}'", upstream)
            }
            Issue::ChainGap { inferred: None } => write!(f, "missing chain, no mediator found"),
            Issue::UpstreamFromChain { upstream } => {
                write!(f, "missing upstream, taken from chain: '{}'", upstream)
            }
            Issue::ChainFromUpstream { upstream } => {
                write!(f, "missing chain, built from upstream '{}'", upstream)
            }
            Issue::IndirectDepth { from, to } => match from {
                Some(depth) => write!(f, "indirect depth {} -> {}", depth, to),
                None => write!(f, "missing depth -> {}", to),
            },
            Issue::DirectDepth { from } => match from {
                Some(depth) => write!(f, "direct depth {} -> 1", depth),
                None => write!(f, "missing depth -> 1"),
            },
        }
    }
}

/// An issue together with where it was found and whether it was repaired
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Interactor `primary`
    pub primary: String,

    /// The problem
    pub issue: Issue,

    /// Whether the document was changed to repair it
    pub fixed: bool,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.fixed { "fixed" } else { "found" };
        write!(f, "[{}] {}: {}", state, self.primary, self.issue)
    }
}

/// Outcome of a validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Interactors examined
    pub interactors_checked: usize,

    /// Every finding, in document order
    pub findings: Vec<Finding>,
}

impl ValidationSummary {
    /// Number of issues found
    pub fn issues_found(&self) -> usize {
        self.findings.len()
    }

    /// Number of issues repaired
    pub fn issues_fixed(&self) -> usize {
        self.findings.iter().filter(|f| f.fixed).count()
    }

    /// Number of issues left as found
    pub fn remaining(&self) -> usize {
        self.issues_found() - self.issues_fixed()
    }

    /// Number of issues resolved by fallback defaults
    pub fn ambiguous(&self) -> usize {
        self.findings.iter().filter(|f| f.issue.is_ambiguous()).count()
    }

    /// Findings for one interactor
    pub fn for_interactor<'a>(&'a self, primary: &'a str) -> impl Iterator<Item = &'a Finding> + 'a {
        self.findings.iter().filter(move |f| f.primary == primary)
    }

    /// True when nothing was found
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    /// Human-readable summary lines
    pub fn summary(&self) -> String {
        [
            format!("Interactors checked: {}", self.interactors_checked),
            format!("Issues found: {}", self.issues_found()),
            format!("Issues fixed: {}", self.issues_fixed()),
            format!("Issues remaining: {}", self.remaining()),
            format!("Ambiguous: {}", self.ambiguous()),
        ]
        .join("\n")
    }
}

/// Collects findings for one interactor
struct Findings<'a> {
    primary: String,
    out: &'a mut Vec<Finding>,
}

impl Findings<'_> {
    fn push(&mut self, issue: Issue, fixed: bool) {
        tracing::debug!("{}: {} ({})", self.primary, issue, if fixed { "fixed" } else { "not fixed" });
        self.out.push(Finding {
            primary: self.primary.clone(),
            issue,
            fixed,
        });
    }
}

/// The schema validator repairs merged payload documents
///
/// The classifier and normalizer are injected so alternative rule sets can be
/// tested in isolation.
///
/// # Examples
///
/// ```
/// use propaths_domain::{FunctionRecord, Interactor, PayloadDocument};
/// use propaths_validator::SchemaValidator;
///
/// let mut vcp = Interactor::new("VCP");
/// vcp.functions = Some(vec![FunctionRecord::named("ERAD")]);
/// let mut document = PayloadDocument::with_interactors("ATXN3", vec![vcp]);
///
/// let summary = SchemaValidator::default_config().validate_in_place(&mut document);
/// let vcp = document.interactor("VCP").unwrap();
/// assert_eq!(vcp.functions()[0].arrow.as_deref(), Some("complex"));
/// assert_eq!(vcp.depth, Some(1));
/// assert_eq!(summary.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct SchemaValidator<C = ArrowClassifier, N = DirectionNormalizer> {
    config: ValidatorConfig,
    classifier: C,
    normalizer: N,
}

impl SchemaValidator {
    /// Create a validator with the standard classifier and normalizer
    pub fn new(config: ValidatorConfig) -> Self {
        Self::with_components(config, ArrowClassifier::new(), DirectionNormalizer)
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidatorConfig::default())
    }
}

impl<C: Classify, N: Normalize> SchemaValidator<C, N> {
    /// Create a validator with custom components
    pub fn with_components(config: ValidatorConfig, classifier: C, normalizer: N) -> Self {
        Self {
            config,
            classifier,
            normalizer,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a copy of the document
    pub fn validate_and_fix(&self, document: &PayloadDocument) -> (PayloadDocument, ValidationSummary) {
        let mut fixed = document.clone();
        let summary = self.validate_in_place(&mut fixed);
        (fixed, summary)
    }

    /// Parse a document from JSON text and validate it
    pub fn validate_str(&self, text: &str) -> Result<(PayloadDocument, ValidationSummary), ValidatorError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        let document = PayloadDocument::from_value(value)?;
        Ok(self.validate_and_fix(&document))
    }

    /// Validate the document in place and resync its snapshot
    pub fn validate_in_place(&self, document: &mut PayloadDocument) -> ValidationSummary {
        let main = document.main().to_string();
        let mut summary = ValidationSummary {
            interactors_checked: document.ctx_json.interactors.len(),
            findings: Vec::new(),
        };

        for interactor in document.ctx_json.interactors.iter_mut() {
            let mut findings = Findings {
                primary: interactor.primary.clone(),
                out: &mut summary.findings,
            };

            if interactor.primary.trim().is_empty() {
                findings.push(Issue::MissingPrimary, false);
            }

            let evidence = aggregate_function_arrows(interactor, &self.classifier);
            self.check_functions(interactor, &mut findings);
            self.check_arrow(interactor, &evidence, &mut findings);

            // Direction is recomputed with function defaults in place.
            let evidence = aggregate_function_arrows(interactor, &self.classifier);
            self.check_direction(interactor, &evidence, &mut findings);
            self.check_corruption(interactor, &main, &mut findings);
        }

        // Chain inference reads the whole document, corruption repairs included.
        let snapshot = document.ctx_json.interactors.clone();
        for interactor in document.ctx_json.interactors.iter_mut() {
            let mut findings = Findings {
                primary: interactor.primary.clone(),
                out: &mut summary.findings,
            };
            self.check_chain(interactor, &snapshot, &mut findings);
            self.check_direct_depth(interactor, &mut findings);
        }

        document.sync_snapshot();

        tracing::info!(
            "Schema validation for {}: {} issue(s) found, {} fixed, {} remaining",
            main,
            summary.issues_found(),
            summary.issues_fixed(),
            summary.remaining()
        );
        if summary.ambiguous() > 0 {
            tracing::warn!("{} issue(s) resolved by fallback defaults", summary.ambiguous());
        }

        summary
    }

    fn check_functions(&self, interactor: &mut Interactor, findings: &mut Findings<'_>) {
        let Some(functions) = interactor.functions.as_mut() else {
            return;
        };

        for (index, record) in functions.iter_mut().enumerate() {
            for issue in apply_function_defaults(record, self.config.fix_arrows) {
                findings.push(Issue::Function { index, issue }, self.config.fix_arrows);
            }
            if self.config.fix_function_fields {
                for issue in validate_function_fields(record, true) {
                    findings.push(Issue::Function { index, issue }, true);
                }
            }
        }
    }

    fn check_arrow(&self, interactor: &mut Interactor, evidence: &Aggregation, findings: &mut Findings<'_>) {
        let current = interactor
            .arrow
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());

        let target = match current {
            Some(raw) if ArrowKind::parse(raw).is_some_and(|kind| kind.as_str() == raw) => None,
            Some(raw) => Some(self.classifier.classify(
                Some(raw),
                interactor.intent.as_deref(),
                interactor.direction.as_deref(),
            )),
            None => Some(evidence.arrow),
        };

        let apply = self.config.fix_arrows;
        if let Some(kind) = target {
            findings.push(
                Issue::ArrowNormalized {
                    from: interactor.arrow.clone(),
                    to: kind,
                },
                apply,
            );
            if apply {
                interactor.arrow = Some(kind.as_str().to_string());
            }
        }

        let buckets_missing = interactor.arrows.as_ref().map_or(true, |a| a.is_empty());
        if apply && buckets_missing && !evidence.arrows.is_empty() {
            interactor.arrows = Some(evidence.arrows.clone());
        }
    }

    fn check_direction(&self, interactor: &mut Interactor, evidence: &Aggregation, findings: &mut Findings<'_>) {
        let stored = interactor.direction.clone();
        let (current, recognized) = self.normalizer.normalize_query_relative(stored.as_deref());
        let apply = self.config.fix_directions;

        // Function evidence wins; a stored label is only canonicalized.
        let target = match evidence.direction {
            Some(direction) => direction,
            None if recognized => current,
            None => {
                findings.push(Issue::DirectionDefaulted { from: stored }, apply);
                if apply {
                    interactor.direction = Some(QueryDirection::Bidirectional.as_str().to_string());
                }
                return;
            }
        };

        if stored.as_deref() != Some(target.as_str()) {
            if apply {
                tracing::info!(
                    "{}: direction changed from '{}' to '{}'",
                    interactor.primary,
                    shown(&stored),
                    target
                );
                interactor.direction = Some(target.as_str().to_string());
            }
            findings.push(
                Issue::DirectionRefreshed {
                    from: stored,
                    to: target,
                },
                apply,
            );
        }
    }

    fn check_corruption(&self, interactor: &mut Interactor, main: &str, findings: &mut Findings<'_>) {
        let Some(upstream) = interactor.upstream_interactor.as_deref().map(str::trim) else {
            return;
        };
        let self_referential = !upstream.is_empty()
            && (upstream.eq_ignore_ascii_case(main) || upstream.eq_ignore_ascii_case(&interactor.primary));
        if !self_referential {
            return;
        }

        let apply = self.config.fix_corruption;
        findings.push(
            Issue::SelfReferentialUpstream {
                upstream: upstream.to_string(),
            },
            apply,
        );
        if apply {
            interactor.set_kind(InteractionType::Direct);
            interactor.upstream_interactor = None;
            interactor.mediator_chain = None;
            interactor.depth = Some(1);
            interactor.chain_inferred = false;
            interactor.chain_missing = false;
            interactor.inferred_mediators = None;
        }
    }

    /// Direct interactors always sit at depth 1, whatever the rule switches say
    fn check_direct_depth(&self, interactor: &mut Interactor, findings: &mut Findings<'_>) {
        if interactor.is_indirect() || interactor.depth == Some(1) {
            return;
        }
        findings.push(Issue::DirectDepth { from: interactor.depth }, true);
        interactor.depth = Some(1);
    }

    fn check_chain(&self, interactor: &mut Interactor, all: &[Interactor], findings: &mut Findings<'_>) {
        let apply = self.config.fix_chains;

        let type_known = interactor
            .interaction_type
            .as_deref()
            .and_then(InteractionType::parse)
            .is_some();
        if !type_known {
            findings.push(Issue::InteractionTypeMissing, apply);
            if apply {
                interactor.set_kind(interactor.kind());
            }
        }

        if !interactor.is_indirect() {
            return;
        }

        // An earlier pass that found no mediator leaves an empty chain and the marker.
        let already_unresolved = interactor.chain_missing && interactor.mediator_chain.is_some();

        match (interactor.has_upstream(), interactor.has_chain()) {
            (false, false) if !already_unresolved => {
                let inference = infer_chain(interactor, all);
                findings.push(
                    Issue::ChainGap {
                        inferred: inference.as_ref().map(|c| c.upstream.clone()),
                    },
                    apply,
                );
                if apply {
                    interactor.chain_inferred = true;
                    match inference {
                        Some(found) => {
                            interactor.upstream_interactor = Some(found.upstream.clone());
                            interactor.mediator_chain = Some(vec![found.upstream]);
                            interactor.inferred_mediators = Some(found.candidates);
                            interactor.chain_missing = false;
                        }
                        None => {
                            interactor.upstream_interactor = None;
                            interactor.mediator_chain = Some(Vec::new());
                            interactor.chain_missing = true;
                        }
                    }
                }
            }
            (false, true) => {
                let upstream = interactor
                    .mediator_chain
                    .as_ref()
                    .and_then(|chain| chain.last())
                    .cloned()
                    .unwrap_or_default();
                findings.push(
                    Issue::UpstreamFromChain {
                        upstream: upstream.clone(),
                    },
                    apply,
                );
                if apply {
                    interactor.upstream_interactor = Some(upstream);
                }
            }
            (true, false) => {
                let upstream = interactor.upstream_interactor.clone().unwrap_or_default();
                findings.push(
                    Issue::ChainFromUpstream {
                        upstream: upstream.clone(),
                    },
                    apply,
                );
                if apply {
                    interactor.mediator_chain = Some(vec![upstream]);
                }
            }
            _ => {}
        }

        let chain_len = interactor.mediator_chain.as_ref().map_or(0, Vec::len);
        let required = u32::try_from(chain_len).unwrap_or(u32::MAX).saturating_add(1).max(2);
        if interactor.depth.map_or(true, |depth| depth < 2) {
            findings.push(
                Issue::IndirectDepth {
                    from: interactor.depth,
                    to: required,
                },
                apply,
            );
            if apply {
                interactor.depth = Some(required);
            }
        }
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propaths_domain::{FunctionRecord, PayloadDocument};

    fn indirect(primary: &str) -> Interactor {
        let mut i = Interactor::new(primary);
        i.set_kind(InteractionType::Indirect);
        i
    }

    fn direct(primary: &str) -> Interactor {
        let mut i = Interactor::new(primary);
        i.set_kind(InteractionType::Direct);
        i.depth = Some(1);
        i.arrow = Some("binds".into());
        i.direction = Some("bidirectional".into());
        i
    }

    fn validate(interactors: Vec<Interactor>) -> (PayloadDocument, ValidationSummary) {
        let document = PayloadDocument::with_interactors("ATXN3", interactors);
        SchemaValidator::default_config().validate_and_fix(&document)
    }

    #[test]
    fn test_clean_document_has_no_findings() {
        let (_, summary) = validate(vec![direct("VCP")]);
        assert!(summary.is_clean(), "{}", summary.summary());
    }

    #[test]
    fn test_function_defaults_and_arrow_aggregation() {
        let mut vcp = Interactor::new("VCP");
        vcp.functions = Some(vec![
            FunctionRecord::named("ERAD").with_arrow("enhances"),
            FunctionRecord::named("Autophagy"),
        ]);
        let (doc, summary) = validate(vec![vcp]);
        let vcp = doc.interactor("VCP").unwrap();

        assert_eq!(vcp.functions()[1].arrow.as_deref(), Some("complex"));
        assert!(vcp.functions().iter().all(|f| f.direction.as_deref() == Some("main_to_primary")));
        assert_eq!(vcp.arrow.as_deref(), Some("activates"));
        assert!(vcp.arrows.is_some());
        // Defaulted function directions count once they are written.
        assert_eq!(vcp.direction.as_deref(), Some("main_to_primary"));
        assert_eq!(summary.ambiguous(), 0);
    }

    #[test]
    fn test_non_canonical_arrow_classified() {
        let mut vcp = direct("VCP");
        vcp.arrow = Some("Suppresses".into());
        let (doc, _) = validate(vec![vcp]);
        assert_eq!(doc.interactor("VCP").unwrap().arrow.as_deref(), Some("inhibits"));
    }

    #[test]
    fn test_missing_direction_from_function_evidence() {
        let mut vcp = direct("VCP");
        vcp.direction = None;
        vcp.functions = Some(vec![
            FunctionRecord::named("ERAD").with_arrow("binds").with_direction("primary_to_main"),
        ]);
        let (doc, summary) = validate(vec![vcp]);
        assert_eq!(doc.interactor("VCP").unwrap().direction.as_deref(), Some("primary_to_main"));
        assert!(summary
            .for_interactor("VCP")
            .any(|f| matches!(f.issue, Issue::DirectionRefreshed { .. })));
        assert_eq!(summary.ambiguous(), 0);
    }

    #[test]
    fn test_stored_direction_refreshed_from_functions() {
        let mut vcp = direct("VCP");
        vcp.direction = Some("main_to_primary".into());
        vcp.functions = Some(vec![
            FunctionRecord::named("ERAD").with_arrow("binds").with_direction("primary_to_main"),
            FunctionRecord::named("Autophagy").with_arrow("binds").with_direction("primary_to_main"),
        ]);
        let (doc, summary) = validate(vec![vcp]);
        assert_eq!(doc.interactor("VCP").unwrap().direction.as_deref(), Some("primary_to_main"));
        assert!(summary.for_interactor("VCP").any(|f| f.fixed
            && f.issue
                == Issue::DirectionRefreshed {
                    from: Some("main_to_primary".into()),
                    to: QueryDirection::PrimaryToMain,
                }));
    }

    #[test]
    fn test_stored_direction_canonicalized_without_evidence() {
        let mut vcp = direct("VCP");
        vcp.direction = Some(" Primary_To_Main".into());
        let (doc, summary) = validate(vec![vcp]);
        assert_eq!(doc.interactor("VCP").unwrap().direction.as_deref(), Some("primary_to_main"));
        assert_eq!(summary.ambiguous(), 0);
    }

    #[test]
    fn test_direction_refresh_report_only() {
        let validator = SchemaValidator::new(ValidatorConfig {
            fix_directions: false,
            ..ValidatorConfig::default()
        });
        let mut vcp = direct("VCP");
        vcp.functions = Some(vec![
            FunctionRecord::named("ERAD").with_arrow("binds").with_direction("primary_to_main"),
        ]);
        let document = PayloadDocument::with_interactors("ATXN3", vec![vcp]);

        let (doc, summary) = validator.validate_and_fix(&document);
        assert_eq!(doc.interactor("VCP").unwrap().direction.as_deref(), Some("bidirectional"));
        assert_eq!(summary.remaining(), 1);
    }

    #[test]
    fn test_unrecognized_direction_defaults_to_bidirectional() {
        let mut vcp = direct("VCP");
        vcp.direction = Some("a_to_b".into());
        let (doc, summary) = validate(vec![vcp]);
        assert_eq!(doc.interactor("VCP").unwrap().direction.as_deref(), Some("bidirectional"));
        assert_eq!(summary.ambiguous(), 1);
    }

    #[test]
    fn test_upstream_from_chain_and_depth() {
        let mut lc3 = indirect("LC3");
        lc3.mediator_chain = Some(vec!["BECN1".into(), "ATG7".into()]);
        let (doc, _) = validate(vec![lc3]);
        let lc3 = doc.interactor("LC3").unwrap();
        assert_eq!(lc3.upstream_interactor.as_deref(), Some("ATG7"));
        assert_eq!(lc3.depth, Some(3));
    }

    #[test]
    fn test_chain_from_upstream() {
        let mut lc3 = indirect("LC3");
        lc3.upstream_interactor = Some("BECN1".into());
        lc3.depth = Some(1);
        let (doc, _) = validate(vec![lc3]);
        let lc3 = doc.interactor("LC3").unwrap();
        assert_eq!(lc3.mediator_chain, Some(vec!["BECN1".to_string()]));
        assert_eq!(lc3.depth, Some(2));
    }

    #[test]
    fn test_chain_inferred_from_text() {
        let mut lc3 = indirect("LC3");
        lc3.direction = Some("main_to_primary".into());
        lc3.functions = Some(vec![FunctionRecord {
            effect_description: Some("BECN1 complex promotes LC3 lipidation".into()),
            ..FunctionRecord::named("Autophagy").with_arrow("activates")
        }]);
        let (doc, summary) = validate(vec![direct("BECN1"), lc3]);
        let lc3 = doc.interactor("LC3").unwrap();
        assert_eq!(lc3.upstream_interactor.as_deref(), Some("BECN1"));
        assert_eq!(lc3.mediator_chain, Some(vec!["BECN1".to_string()]));
        assert!(lc3.chain_inferred);
        assert!(!lc3.chain_missing);
        assert_eq!(lc3.depth, Some(2));
        assert_eq!(summary.ambiguous(), 0);
    }

    #[test]
    fn test_chain_missing_marker_is_stable() {
        let validator = SchemaValidator::default_config();
        let document = PayloadDocument::with_interactors("ATXN3", vec![indirect("LC3")]);
        let (once, _) = validator.validate_and_fix(&document);
        let lc3 = once.interactor("LC3").unwrap();
        assert!(lc3.chain_missing);
        assert!(lc3.upstream_interactor.is_none());
        assert_eq!(lc3.mediator_chain, Some(vec![]));

        let (twice, summary) = validator.validate_and_fix(&once);
        assert_eq!(once, twice);
        assert!(summary.is_clean(), "{}", summary.summary());
    }

    #[test]
    fn test_direct_depth_forced_to_one() {
        let mut vcp = direct("VCP");
        vcp.depth = Some(3);
        let (doc, _) = validate(vec![vcp]);
        assert_eq!(doc.interactor("VCP").unwrap().depth, Some(1));
    }

    #[test]
    fn test_direct_depth_forced_with_chain_rules_off() {
        let validator = SchemaValidator::new(ValidatorConfig {
            fix_chains: false,
            ..ValidatorConfig::default()
        });
        let mut vcp = direct("VCP");
        vcp.depth = Some(3);
        let mut lc3 = Interactor::new("LC3");
        lc3.depth = None;
        let document = PayloadDocument::with_interactors("ATXN3", vec![vcp, lc3]);

        let (doc, summary) = validator.validate_and_fix(&document);
        assert_eq!(doc.interactor("VCP").unwrap().depth, Some(1));
        assert_eq!(doc.interactor("LC3").unwrap().depth, Some(1));
        assert!(summary
            .for_interactor("VCP")
            .any(|f| f.fixed && f.issue == Issue::DirectDepth { from: Some(3) }));
    }

    #[test]
    fn test_disabled_rules_report_without_fixing() {
        let validator = SchemaValidator::new(ValidatorConfig::lenient());
        let mut lc3 = indirect("LC3");
        lc3.upstream_interactor = Some("BECN1".into());
        let document = PayloadDocument::with_interactors("ATXN3", vec![lc3.clone()]);

        let (doc, summary) = validator.validate_and_fix(&document);
        assert_eq!(doc.interactor("LC3").unwrap().mediator_chain, None);
        assert!(summary.remaining() > 0);
        assert_eq!(summary.issues_fixed(), 0);
    }

    #[test]
    fn test_validate_str() {
        let text = r#"{"ctx_json":{"main":"ATXN3","interactors":[{"primary":"VCP"}]}}"#;
        let (doc, summary) = SchemaValidator::default_config().validate_str(text).unwrap();
        assert_eq!(doc.interactor("VCP").unwrap().arrow.as_deref(), Some("binds"));
        assert!(summary.issues_found() > 0);
        assert!(SchemaValidator::default_config().validate_str("[1]").is_err());
    }

    #[test]
    fn test_validate_str_missing_primary_is_flagged() {
        let text = r#"{"ctx_json":{"main":"ATXN3","interactors":[{"arrow":"binds"},{"primary":"VCP"}]}}"#;
        let (doc, summary) = SchemaValidator::default_config().validate_str(text).unwrap();

        assert_eq!(doc.interactors().len(), 2);
        assert!(doc.interactor("VCP").is_some());
        let flagged: Vec<_> = summary.for_interactor("").collect();
        assert!(flagged.iter().any(|f| f.issue == Issue::MissingPrimary && !f.fixed));
        assert!(summary.remaining() >= 1);
    }

    #[test]
    fn test_validate_str_string_depth_coerced() {
        let text = r#"{"ctx_json":{"main":"ATXN3","interactors":[
            {"primary":"LC3","interaction_type":"indirect","mediator_chain":["BECN1"],"depth":"2"},
            {"primary":"VCP","depth":"one"}
        ]}}"#;
        let (doc, _) = SchemaValidator::default_config().validate_str(text).unwrap();

        assert_eq!(doc.interactor("LC3").unwrap().depth, Some(2));
        assert_eq!(doc.interactor("VCP").unwrap().depth, Some(1));
    }

    #[test]
    fn test_validate_str_null_buckets_read_as_empty() {
        let text = r#"{"ctx_json":{"main":"ATXN3","interactors":[{
            "primary":"VCP",
            "arrows":{"main_to_primary":null,"primary_to_main":["inhibits"]},
            "functions":[{"function":"ERAD","arrow":"inhibits","direction":"primary_to_main"}]
        }]}}"#;
        let (doc, _) = SchemaValidator::default_config().validate_str(text).unwrap();

        let vcp = doc.interactor("VCP").unwrap();
        let arrows = vcp.arrows.as_ref().unwrap();
        assert!(arrows.get("main_to_primary").is_empty());
        assert_eq!(arrows.get("primary_to_main"), ["inhibits"]);
        assert_eq!(vcp.direction.as_deref(), Some("primary_to_main"));
    }
}
