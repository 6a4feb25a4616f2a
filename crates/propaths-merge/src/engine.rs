//! Policy-driven fragment merging

use crate::functions::dedup_functions;
use crate::policy::{FieldMerge, InteractorField, PolicyTable};
use crate::MergeConfig;
use propaths_domain::{Interactor, PayloadDocument, PayloadUpdate};

/// Counts from one merge
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Interactors appended because their primary was new
    pub added: usize,

    /// Existing interactors that changed
    pub updated: usize,

    /// Existing interactors the fragment did not change
    pub unchanged: usize,

    /// Function records added to existing interactors
    pub functions_appended: usize,

    /// Repeated function records dropped
    pub functions_deduplicated: usize,
}

impl MergeReport {
    /// Accumulate another report into this one
    pub fn absorb(&mut self, other: &MergeReport) {
        self.added += other.added;
        self.updated += other.updated;
        self.unchanged += other.unchanged;
        self.functions_appended += other.functions_appended;
        self.functions_deduplicated += other.functions_deduplicated;
    }

    /// True when the merge changed nothing
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.updated == 0
    }
}

/// Folds update fragments into payload documents
///
/// # Examples
///
/// ```
/// use propaths_domain::{Interactor, PayloadDocument, PayloadUpdate};
/// use propaths_merge::{MergeConfig, MergeEngine};
///
/// let engine = MergeEngine::new(MergeConfig::default());
/// let mut document = PayloadDocument::new("ATXN3");
/// let report = engine.merge_in_place(&mut document, &PayloadUpdate::new(vec![Interactor::new("VCP")]));
/// assert_eq!(report.added, 1);
/// assert!(document.snapshot_in_sync());
/// ```
#[derive(Debug, Clone)]
pub struct MergeEngine {
    config: MergeConfig,
    policies: PolicyTable,
}

impl MergeEngine {
    /// Create an engine with the given configuration
    pub fn new(config: MergeConfig) -> Self {
        let policies = if config.replace_functions {
            PolicyTable::replacing_functions()
        } else {
            PolicyTable::standard()
        };
        Self { config, policies }
    }

    /// Create an engine with default configuration
    pub fn default_config() -> Self {
        Self::new(MergeConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &MergeConfig {
        &self.config
    }

    /// Get the policy table in use
    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    /// Merge a fragment into a copy of the document
    ///
    /// Neither `document` nor `update` is modified.
    pub fn merge(&self, document: &PayloadDocument, update: &PayloadUpdate) -> PayloadDocument {
        let mut merged = document.clone();
        self.merge_in_place(&mut merged, update);
        merged
    }

    /// Merge a fragment into the document, then resync the snapshot
    ///
    /// The query protein is set once: a document without `main` takes the
    /// fragment's, and a later fragment naming a different one is logged and
    /// ignored.
    pub fn merge_in_place(&self, document: &mut PayloadDocument, update: &PayloadUpdate) -> MergeReport {
        let mut report = MergeReport::default();

        match (&document.ctx_json.main, &update.ctx_json.main) {
            (None, incoming) => document.ctx_json.main = incoming.clone(),
            (Some(current), Some(incoming)) if !current.eq_ignore_ascii_case(incoming) => {
                tracing::warn!(
                    "Fragment names query protein '{}' but the document is for '{}'; keeping '{}'",
                    incoming,
                    current,
                    current
                );
            }
            _ => {}
        }

        for incoming in &update.ctx_json.interactors {
            if incoming.primary.trim().is_empty() {
                tracing::warn!("Skipping fragment interactor without a primary symbol");
                continue;
            }

            match document.ctx_json.interactor_mut(&incoming.primary) {
                Some(existing) => {
                    if self.merge_interactor(existing, incoming, &mut report) {
                        report.updated += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                None => {
                    let mut copy = incoming.clone();
                    if self.config.dedup_functions {
                        if let Some(functions) = copy.functions.as_mut() {
                            report.functions_deduplicated += dedup_functions(functions);
                        }
                    }
                    document.ctx_json.interactors.push(copy);
                    report.added += 1;
                }
            }
        }

        document.sync_snapshot();

        tracing::debug!(
            "Merged fragment for [{}]: {} added, {} updated, {} unchanged",
            update.primaries().join(", "),
            report.added,
            report.updated,
            report.unchanged
        );

        report
    }

    /// Merge one interactor field by field; returns true when it changed
    fn merge_interactor(
        &self,
        existing: &mut Interactor,
        incoming: &Interactor,
        report: &mut MergeReport,
    ) -> bool {
        let before = existing.clone();
        let policy = |field| self.policies.policy(field);

        existing.arrow.merge_with(&incoming.arrow, policy(InteractorField::Arrow));
        existing.direction.merge_with(&incoming.direction, policy(InteractorField::Direction));
        existing.intent.merge_with(&incoming.intent, policy(InteractorField::Intent));
        existing
            .upstream_interactor
            .merge_with(&incoming.upstream_interactor, policy(InteractorField::UpstreamInteractor));
        existing
            .interaction_type
            .merge_with(&incoming.interaction_type, policy(InteractorField::InteractionType));
        existing.depth.merge_with(&incoming.depth, policy(InteractorField::Depth));
        existing.arrows.merge_with(&incoming.arrows, policy(InteractorField::Arrows));
        existing
            .mediator_chain
            .merge_with(&incoming.mediator_chain, policy(InteractorField::MediatorChain));

        let functions_before = existing.functions().len();
        if existing
            .functions
            .merge_with(&incoming.functions, policy(InteractorField::Functions))
            && self.config.dedup_functions
        {
            if let Some(functions) = existing.functions.as_mut() {
                report.functions_deduplicated += dedup_functions(functions);
            }
        }
        report.functions_appended += existing.functions().len().saturating_sub(functions_before);

        let annotations = policy(InteractorField::Annotations);
        existing.arrow_notation.merge_with(&incoming.arrow_notation, annotations);
        existing
            .inferred_mediators
            .merge_with(&incoming.inferred_mediators, annotations);
        existing.chain_inferred |= incoming.chain_inferred;
        existing.chain_missing |= incoming.chain_missing;

        for (key, value) in &incoming.extra {
            let absent = existing.extra.get(key).map_or(true, |v| v.is_null());
            if absent {
                existing.extra.insert(key.clone(), value.clone());
            }
        }

        *existing != before
    }
}

impl Default for MergeEngine {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use propaths_domain::{ArrowBuckets, FunctionRecord};
    use serde_json::json;

    fn base() -> PayloadDocument {
        let a = Interactor {
            functions: Some(vec![FunctionRecord::named("activates")]),
            ..Interactor::new("InteractorA")
        };
        let b = Interactor {
            functions: Some(vec![FunctionRecord::named("inhibits")]),
            ..Interactor::new("InteractorB")
        };
        PayloadDocument::with_interactors("MAIN_PROTEIN", vec![a, b])
    }

    fn fragment(primary: &str) -> Interactor {
        Interactor::new(primary)
    }

    #[test]
    fn test_scalars_overwrite() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        let mut first = fragment("InteractorA");
        first.arrow = Some("binds".into());
        first.depth = Some(2);
        engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![first]));

        let mut second = fragment("InteractorA");
        second.arrow = Some("activates".into());
        let report = engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![second]));

        let a = doc.interactor("InteractorA").unwrap();
        assert_eq!(a.arrow.as_deref(), Some("activates"));
        assert_eq!(a.depth, Some(2));
        assert_eq!(report.updated, 1);
    }

    #[test]
    fn test_absent_scalar_keeps_existing() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        doc.ctx_json.interactors[0].intent = Some("activation".into());
        engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![fragment("InteractorA")]));
        assert_eq!(doc.interactor("InteractorA").unwrap().intent.as_deref(), Some("activation"));
    }

    #[test]
    fn test_functions_append_and_dedup() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        let incoming = Interactor {
            functions: Some(vec![
                FunctionRecord::named("activates"),
                FunctionRecord::named("autophagy").with_arrow("activates"),
            ]),
            ..fragment("InteractorA")
        };
        let report = engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![incoming]));

        let names: Vec<_> = doc
            .interactor("InteractorA")
            .unwrap()
            .functions()
            .iter()
            .filter_map(|f| f.function.as_deref())
            .collect();
        assert_eq!(names, vec!["activates", "autophagy"]);
        assert_eq!(report.functions_appended, 1);
        assert_eq!(report.functions_deduplicated, 1);
    }

    #[test]
    fn test_functions_replace_when_requested() {
        let engine = MergeEngine::new(MergeConfig::replacing());
        let mut doc = base();
        let incoming = Interactor {
            functions: Some(vec![FunctionRecord::named("replacement")]),
            ..fragment("InteractorA")
        };
        engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![incoming]));
        let functions = doc.interactor("InteractorA").unwrap().functions();
        assert_eq!(functions.len(), 1);
        assert_eq!(functions[0].function.as_deref(), Some("replacement"));

        let empty = Interactor {
            functions: Some(vec![]),
            ..fragment("InteractorA")
        };
        engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![empty]));
        assert_eq!(doc.interactor("InteractorA").unwrap().functions().len(), 1);
    }

    #[test]
    fn test_arrows_union() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        let mut buckets = ArrowBuckets::new();
        buckets.insert("main_to_primary", "activates");
        doc.ctx_json.interactors[0].arrows = Some(buckets);

        let mut incoming_buckets = ArrowBuckets::new();
        incoming_buckets.insert("main_to_primary", "activates");
        incoming_buckets.insert("main_to_primary", "inhibits");
        let incoming = Interactor {
            arrows: Some(incoming_buckets),
            ..fragment("InteractorA")
        };
        engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![incoming]));

        let arrows = doc.interactor("InteractorA").unwrap().arrows.clone().unwrap();
        assert_eq!(arrows.get("main_to_primary"), ["activates", "inhibits"]);
    }

    #[test]
    fn test_extra_fields_fill_only() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        doc.ctx_json.interactors[0].extra.insert("confidence".into(), json!(0.4));

        let mut incoming = fragment("InteractorA");
        incoming.extra.insert("confidence".into(), json!(0.9));
        incoming.extra.insert("pmids".into(), json!(["123"]));
        engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![incoming]));

        let a = doc.interactor("InteractorA").unwrap();
        assert_eq!(a.extra["confidence"], json!(0.4));
        assert_eq!(a.extra["pmids"], json!(["123"]));
    }

    #[test]
    fn test_new_interactor_appended_and_snapshot_synced() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        let report = engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![fragment("VCP")]));
        assert_eq!(report.added, 1);
        assert_eq!(doc.interactors().last().unwrap().primary, "VCP");
        assert!(doc.snapshot_in_sync());
    }

    #[test]
    fn test_merge_does_not_touch_inputs() {
        let engine = MergeEngine::default_config();
        let doc = base();
        let update = PayloadUpdate::new(vec![Interactor {
            arrow: Some("inhibits".into()),
            ..fragment("InteractorB")
        }]);
        let original_doc = doc.clone();
        let original_update = update.clone();

        let merged = engine.merge(&doc, &update);
        assert_eq!(doc, original_doc);
        assert_eq!(update, original_update);
        assert_eq!(merged.interactor("InteractorB").unwrap().arrow.as_deref(), Some("inhibits"));
    }

    #[test]
    fn test_fills_main_from_update() {
        let engine = MergeEngine::default_config();
        let mut doc = PayloadDocument::default();
        let mut update = PayloadUpdate::new(vec![]);
        update.ctx_json.main = Some("ATXN3".into());
        engine.merge_in_place(&mut doc, &update);
        assert_eq!(doc.main(), "ATXN3");
    }

    #[test]
    fn test_first_main_wins_in_either_order() {
        let engine = MergeEngine::default_config();
        let named = |main: &str| {
            let mut update = PayloadUpdate::new(vec![fragment("VCP")]);
            update.ctx_json.main = Some(main.into());
            update
        };

        let mut doc = PayloadDocument::default();
        engine.merge_in_place(&mut doc, &named("ATXN3"));
        engine.merge_in_place(&mut doc, &named("HTT"));
        assert_eq!(doc.main(), "ATXN3");

        let mut flipped = PayloadDocument::default();
        engine.merge_in_place(&mut flipped, &named("HTT"));
        engine.merge_in_place(&mut flipped, &named("ATXN3"));
        assert_eq!(flipped.main(), "HTT");

        // An established document never changes its query protein.
        let mut doc = base();
        engine.merge_in_place(&mut doc, &named("HTT"));
        assert_eq!(doc.main(), "MAIN_PROTEIN");
    }

    #[test]
    fn test_blank_primary_skipped() {
        let engine = MergeEngine::default_config();
        let mut doc = base();
        let report = engine.merge_in_place(&mut doc, &PayloadUpdate::new(vec![fragment("  ")]));
        assert!(report.is_noop());
        assert_eq!(doc.interactors().len(), 2);
    }
}
