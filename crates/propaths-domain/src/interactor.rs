//! Interactor module - one partner of the query protein in a payload document

use crate::direction::QueryDirection;
use crate::lenient;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Whether an interactor touches the query protein directly or through mediators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractionType {
    /// Physical or functional contact with the query protein
    Direct,

    /// Connected through one or more mediator proteins
    Indirect,
}

impl InteractionType {
    /// Get the type label
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Direct => "direct",
            InteractionType::Indirect => "indirect",
        }
    }

    /// Parse a type label (trimmed, case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Some(InteractionType::Direct),
            "indirect" => Some(InteractionType::Indirect),
            _ => None,
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Arrow kinds grouped by direction bucket
///
/// Keys are direction labels (`main_to_primary`, ...); values are arrow labels
/// in first-seen order without duplicates. A null or malformed bucket reads
/// as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ArrowBuckets(pub BTreeMap<String, Vec<String>>);

impl<'de> Deserialize<'de> for ArrowBuckets {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        lenient::buckets(deserializer).map(ArrowBuckets)
    }
}

impl ArrowBuckets {
    /// Create an empty mapping
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an arrow to a bucket unless it is already there
    ///
    /// Returns true when the arrow was new.
    pub fn insert(&mut self, bucket: &str, arrow: &str) -> bool {
        let entries = self.0.entry(bucket.to_string()).or_default();
        if entries.iter().any(|a| a == arrow) {
            false
        } else {
            entries.push(arrow.to_string());
            true
        }
    }

    /// Union another mapping into this one, bucket by bucket
    ///
    /// Returns the number of arrows that were new.
    pub fn union(&mut self, other: &ArrowBuckets) -> usize {
        let mut added = 0;
        for (bucket, arrows) in &other.0 {
            if arrows.is_empty() {
                self.0.entry(bucket.clone()).or_default();
            }
            for arrow in arrows {
                if self.insert(bucket, arrow) {
                    added += 1;
                }
            }
        }
        added
    }

    /// Arrows in one bucket
    pub fn get(&self, bucket: &str) -> &[String] {
        self.0.get(bucket).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when no bucket holds an arrow
    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }
}

/// One biological function attributed to an interaction
///
/// Every field is optional on the wire. Unknown keys are kept in `extra` so a
/// round trip never drops data.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunctionRecord {
    /// Function name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function: Option<String>,

    /// Raw arrow label for this function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<String>,

    /// Query-relative direction label for this function
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Cellular process affected
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cellular_process: Option<String>,

    /// Free-text description of the effect
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effect_description: Option<String>,

    /// Consequence chain, usually a list of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub biological_consequence: Option<Value>,

    /// Specific effects, usually a list of strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_effects: Option<Value>,

    /// Supporting evidence entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<Value>,

    /// PubMed identifiers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmids: Option<Value>,

    /// Any other keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FunctionRecord {
    /// Create a function record with a name
    pub fn named(function: impl Into<String>) -> Self {
        Self {
            function: Some(function.into()),
            ..Default::default()
        }
    }

    /// Builder: set the arrow label
    pub fn with_arrow(mut self, arrow: impl Into<String>) -> Self {
        self.arrow = Some(arrow.into());
        self
    }

    /// Builder: set the direction label
    pub fn with_direction(mut self, direction: impl Into<String>) -> Self {
        self.direction = Some(direction.into());
        self
    }

    /// Free text that may mention other proteins
    ///
    /// Collects the effect description and every string inside the
    /// biological consequence.
    pub fn mention_text(&self) -> Vec<String> {
        let mut texts = Vec::new();
        if let Some(consequence) = &self.biological_consequence {
            collect_strings(consequence, &mut texts);
        }
        if let Some(description) = &self.effect_description {
            texts.push(description.clone());
        }
        texts
    }
}

fn collect_strings(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(s.clone()),
        Value::Array(items) => items.iter().for_each(|v| collect_strings(v, out)),
        Value::Object(map) => map.values().for_each(|v| collect_strings(v, out)),
        _ => {}
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// An interactor of the query protein, keyed by `primary`
///
/// Mistyped `primary`, `depth`, `arrows` and `mediator_chain` values are
/// coerced or dropped on read; a missing `primary` reads as empty.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Interactor {
    /// Gene symbol of the interactor (merge key)
    #[serde(default, deserialize_with = "lenient::symbol")]
    pub primary: String,

    /// Interactor-level arrow label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow: Option<String>,

    /// Query-relative direction label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<String>,

    /// Intent reported by the arrow worker
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    /// Arrows per direction bucket
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrows: Option<ArrowBuckets>,

    /// Function records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub functions: Option<Vec<FunctionRecord>>,

    /// `direct` or `indirect`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction_type: Option<String>,

    /// Protein directly upstream of this one in the chain
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upstream_interactor: Option<String>,

    /// Mediators between the query protein and this one, in order
    #[serde(
        default,
        deserialize_with = "lenient::symbol_list",
        skip_serializing_if = "Option::is_none"
    )]
    pub mediator_chain: Option<Vec<String>>,

    /// Hops from the query protein
    #[serde(
        default,
        deserialize_with = "lenient::depth",
        skip_serializing_if = "Option::is_none"
    )]
    pub depth: Option<u32>,

    /// Display notation added by the finalizer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrow_notation: Option<String>,

    /// Chain data was filled in by inference
    #[serde(rename = "_chain_inferred", default, skip_serializing_if = "is_false")]
    pub chain_inferred: bool,

    /// Chain data could not be inferred
    #[serde(rename = "_chain_missing", default, skip_serializing_if = "is_false")]
    pub chain_missing: bool,

    /// Every candidate mediator found during inference
    #[serde(rename = "_inferred_mediators", default, skip_serializing_if = "Option::is_none")]
    pub inferred_mediators: Option<Vec<String>>,

    /// Any other keys
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Interactor {
    /// Create a bare interactor
    pub fn new(primary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            ..Default::default()
        }
    }

    /// Interaction type, defaulting to direct when absent or unknown
    pub fn kind(&self) -> InteractionType {
        self.interaction_type
            .as_deref()
            .and_then(InteractionType::parse)
            .unwrap_or(InteractionType::Direct)
    }

    /// True when explicitly marked indirect
    pub fn is_indirect(&self) -> bool {
        self.kind() == InteractionType::Indirect
    }

    /// Set the interaction type
    pub fn set_kind(&mut self, kind: InteractionType) {
        self.interaction_type = Some(kind.as_str().to_string());
    }

    /// Query-relative direction, if the label is recognized
    pub fn query_direction(&self) -> Option<QueryDirection> {
        self.direction.as_deref().and_then(QueryDirection::parse)
    }

    /// Function records, empty when absent
    pub fn functions(&self) -> &[FunctionRecord] {
        self.functions.as_deref().unwrap_or(&[])
    }

    /// True when an upstream interactor is named
    pub fn has_upstream(&self) -> bool {
        self.upstream_interactor
            .as_deref()
            .is_some_and(|u| !u.trim().is_empty())
    }

    /// True when the mediator chain has at least one entry
    pub fn has_chain(&self) -> bool {
        self.mediator_chain.as_ref().is_some_and(|c| !c.is_empty())
    }

    /// Protein an arrow to this interactor is drawn from
    ///
    /// Indirect interactors with an upstream are shown relative to that
    /// upstream protein; everything else relative to the query protein.
    pub fn display_anchor<'a>(&'a self, main: &'a str) -> &'a str {
        match (&self.upstream_interactor, self.is_indirect()) {
            (Some(upstream), true) if !upstream.is_empty() => upstream.as_str(),
            _ => main,
        }
    }
}
