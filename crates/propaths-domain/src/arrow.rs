//! Arrow module - canonical relationship kinds and the label classifier

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical relationship kind between two proteins
///
/// Every raw arrow label coming out of the query pipeline resolves to exactly
/// one of these. `Binds` is the least specific claim and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowKind {
    /// One protein increases the activity or abundance of the other
    Activates,

    /// One protein decreases the activity or abundance of the other
    Inhibits,

    /// Physical association without a known causal sign
    Binds,
}

impl ArrowKind {
    /// All kinds, in display order
    pub const ALL: [ArrowKind; 3] = [ArrowKind::Activates, ArrowKind::Inhibits, ArrowKind::Binds];

    /// Get the kind name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ArrowKind::Activates => "activates",
            ArrowKind::Inhibits => "inhibits",
            ArrowKind::Binds => "binds",
        }
    }

    /// Parse a canonical kind name (exact, case-insensitive)
    ///
    /// This does not classify free text; use [`ArrowClassifier`] for that.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "activates" => Some(ArrowKind::Activates),
            "inhibits" => Some(ArrowKind::Inhibits),
            "binds" => Some(ArrowKind::Binds),
            _ => None,
        }
    }
}

impl Default for ArrowKind {
    fn default() -> Self {
        ArrowKind::Binds
    }
}

impl fmt::Display for ArrowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ArrowKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid arrow kind: {}", s))
    }
}

/// Substrings that mark a label as activating
pub const ACTIVATION_SYNONYMS: &[&str] = &[
    "activate",
    "activates",
    "activation",
    "enhance",
    "enhances",
    "promote",
    "promotes",
    "upregulate",
    "upregulates",
    "stabilize",
    "stabilizes",
];

/// Substrings that mark a label as inhibiting
pub const INHIBITION_SYNONYMS: &[&str] = &[
    "inhibit",
    "inhibits",
    "inhibition",
    "suppress",
    "suppresses",
    "repress",
    "represses",
    "downregulate",
    "downregulates",
    "block",
    "blocks",
    "reduce",
    "reduces",
];

/// Exact labels meaning physical binding
pub const BINDING_LABELS: &[&str] = &["binds", "binding"];

/// Exact labels meaning a positive effect
pub const POSITIVE_LABELS: &[&str] = &["activator", "positive"];

/// Exact labels meaning a negative effect
pub const NEGATIVE_LABELS: &[&str] = &["negative"];

/// Labels that carry no sign; classification falls back to the intent
pub const NEUTRAL_LABELS: &[&str] = &[
    "undirected",
    "unknown",
    "none",
    "na",
    "n/a",
    "bidirectional",
    "both",
    "reciprocal",
    "neutral",
    "modulates",
    "regulates",
];

/// Intent values and the kind each one maps to
pub const INTENT_KINDS: &[(&str, ArrowKind)] = &[
    ("activation", ArrowKind::Activates),
    ("inhibition", ArrowKind::Inhibits),
    ("binding", ArrowKind::Binds),
];

/// One step of the ordered classification rule list
#[derive(Debug, Clone, Copy)]
pub enum ArrowRule {
    /// Label contains any of the substrings
    Contains(&'static [&'static str], ArrowKind),

    /// Label equals one of the values
    Equals(&'static [&'static str], ArrowKind),

    /// Label is empty or one of the values; resolve from the intent
    IntentIfNeutral(&'static [&'static str]),
}

impl ArrowRule {
    /// Evaluate this rule against a normalized label
    ///
    /// Returns `None` when the rule does not apply.
    fn evaluate(&self, label: &str, intent: &str) -> Option<ArrowKind> {
        match *self {
            ArrowRule::Contains(needles, kind) => {
                if !label.is_empty() && needles.iter().any(|n| label.contains(n)) {
                    Some(kind)
                } else {
                    None
                }
            }
            ArrowRule::Equals(values, kind) => values.contains(&label).then_some(kind),
            ArrowRule::IntentIfNeutral(values) => {
                if label.is_empty() || values.contains(&label) {
                    Some(classify_intent(intent))
                } else {
                    None
                }
            }
        }
    }
}

/// The classification rules, evaluated top to bottom; first match wins
pub const ARROW_RULES: &[ArrowRule] = &[
    ArrowRule::Contains(ACTIVATION_SYNONYMS, ArrowKind::Activates),
    ArrowRule::Contains(INHIBITION_SYNONYMS, ArrowKind::Inhibits),
    ArrowRule::Equals(BINDING_LABELS, ArrowKind::Binds),
    ArrowRule::Equals(POSITIVE_LABELS, ArrowKind::Activates),
    ArrowRule::Equals(NEGATIVE_LABELS, ArrowKind::Inhibits),
    ArrowRule::IntentIfNeutral(NEUTRAL_LABELS),
];

fn normalize(value: Option<&str>) -> String {
    value.map(|v| v.trim().to_lowercase()).unwrap_or_default()
}

fn classify_intent(intent: &str) -> ArrowKind {
    INTENT_KINDS
        .iter()
        .find(|(name, _)| *name == intent)
        .map(|(_, kind)| *kind)
        .unwrap_or_default()
}

/// Trait for turning raw arrow labels into canonical kinds
///
/// Implemented by [`ArrowClassifier`]; the validator takes any implementation
/// so alternative rule sets can be injected.
pub trait Classify {
    /// Classify a raw arrow label, using the intent when the label is not decisive
    ///
    /// Must be total: every input, including `None`, yields a kind.
    fn classify(
        &self,
        raw_arrow: Option<&str>,
        intent: Option<&str>,
        direction: Option<&str>,
    ) -> ArrowKind;
}

/// Ordered-rule arrow classifier
///
/// # Examples
///
/// ```
/// use propaths_domain::{ArrowClassifier, ArrowKind, Classify};
///
/// let classifier = ArrowClassifier::new();
/// assert_eq!(classifier.classify(Some("Upregulates"), None, None), ArrowKind::Activates);
/// assert_eq!(classifier.classify(Some("unknown"), Some("inhibition"), None), ArrowKind::Inhibits);
/// assert_eq!(classifier.classify(None, None, None), ArrowKind::Binds);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ArrowClassifier {
    rules: &'static [ArrowRule],
}

impl ArrowClassifier {
    /// Create a classifier over the standard rule list
    pub fn new() -> Self {
        Self { rules: ARROW_RULES }
    }

    /// Create a classifier over a custom rule list
    pub fn with_rules(rules: &'static [ArrowRule]) -> Self {
        Self { rules }
    }
}

impl Default for ArrowClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classify for ArrowClassifier {
    // Direction is accepted for interface parity; no rule depends on it yet.
    fn classify(
        &self,
        raw_arrow: Option<&str>,
        intent: Option<&str>,
        _direction: Option<&str>,
    ) -> ArrowKind {
        let label = normalize(raw_arrow);
        let intent = normalize(intent);

        self.rules
            .iter()
            .find_map(|rule| rule.evaluate(&label, &intent))
            .unwrap_or_else(|| classify_intent(&intent))
    }
}
