//! Direction module - query-relative and pair-absolute encodings
//!
//! A direction stored in a payload document is *query-relative*: its meaning
//! depends on which protein was searched. Once a pair is persisted it is
//! *pair-absolute*: its meaning depends only on the canonical ordering of the
//! two proteins (`a` holds the lower identifier).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction relative to the protein that was queried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDirection {
    /// The query protein acts on the interactor
    MainToPrimary,

    /// The interactor acts on the query protein
    PrimaryToMain,

    /// Both act on each other, or the sense is unknown
    Bidirectional,
}

impl QueryDirection {
    /// Get the direction label
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryDirection::MainToPrimary => "main_to_primary",
            QueryDirection::PrimaryToMain => "primary_to_main",
            QueryDirection::Bidirectional => "bidirectional",
        }
    }

    /// Parse a query-relative label (trimmed, case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "main_to_primary" => Some(QueryDirection::MainToPrimary),
            "primary_to_main" => Some(QueryDirection::PrimaryToMain),
            "bidirectional" => Some(QueryDirection::Bidirectional),
            _ => None,
        }
    }
}

impl fmt::Display for QueryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction relative to the canonical pair ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairDirection {
    /// Protein `a` acts on protein `b`
    AToB,

    /// Protein `b` acts on protein `a`
    BToA,

    /// Both act on each other, or the sense is unknown
    Bidirectional,
}

impl PairDirection {
    /// Get the direction label
    pub fn as_str(&self) -> &'static str {
        match self {
            PairDirection::AToB => "a_to_b",
            PairDirection::BToA => "b_to_a",
            PairDirection::Bidirectional => "bidirectional",
        }
    }

    /// Parse a pair-absolute label (trimmed, case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "a_to_b" => Some(PairDirection::AToB),
            "b_to_a" => Some(PairDirection::BToA),
            "bidirectional" => Some(PairDirection::Bidirectional),
            _ => None,
        }
    }

    /// The same direction after swapping which protein is `a`
    pub fn flipped(&self) -> Self {
        match self {
            PairDirection::AToB => PairDirection::BToA,
            PairDirection::BToA => PairDirection::AToB,
            PairDirection::Bidirectional => PairDirection::Bidirectional,
        }
    }
}

impl fmt::Display for PairDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened while converting a stored direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversionOutcome {
    /// No direction was stored
    Missing,

    /// Already pair-absolute, returned unchanged
    AlreadyAbsolute,

    /// Stored as bidirectional, returned unchanged
    Bidirectional,

    /// Converted from a query-relative label
    Converted {
        /// The label that was converted
        from: QueryDirection,
        /// Whether the query protein is protein `a`
        query_is_a: bool,
    },

    /// Not a known label; defaulted to bidirectional
    Unrecognized(String),
}

/// Result of [`Normalize::to_absolute`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    /// The pair-absolute direction
    pub direction: PairDirection,

    /// How it was obtained
    pub outcome: ConversionOutcome,
}

impl Conversion {
    /// True when the stored value has to be rewritten
    pub fn changed(&self) -> bool {
        matches!(
            self.outcome,
            ConversionOutcome::Missing
                | ConversionOutcome::Converted { .. }
                | ConversionOutcome::Unrecognized(_)
        )
    }

    /// Non-fatal diagnostic for unrecognized input
    pub fn diagnostic(&self) -> Option<String> {
        match &self.outcome {
            ConversionOutcome::Unrecognized(raw) => {
                Some(format!("Unrecognized direction '{}', defaulted to bidirectional", raw))
            }
            _ => None,
        }
    }
}

/// Trait for converting between direction encodings
///
/// Implemented by [`DirectionNormalizer`]; injected into the validator next to
/// the arrow classifier.
pub trait Normalize {
    /// Convert a stored direction to its pair-absolute form
    ///
    /// Total: unknown input becomes bidirectional with a diagnostic.
    fn to_absolute(
        &self,
        stored: Option<&str>,
        protein_a: &str,
        protein_b: &str,
        discovered_in_query: &str,
    ) -> Conversion;

    /// Read a pair-absolute direction from one protein's perspective
    fn to_query_relative(
        &self,
        absolute: PairDirection,
        protein_a: &str,
        protein_b: &str,
        query: &str,
    ) -> QueryDirection;

    /// Coerce a document direction label into the query-relative set
    ///
    /// Returns the coerced direction and whether the input was recognized.
    fn normalize_query_relative(&self, stored: Option<&str>) -> (QueryDirection, bool);
}

/// Standard direction normalizer
///
/// # Examples
///
/// ```
/// use propaths_domain::{DirectionNormalizer, Normalize, PairDirection};
///
/// let normalizer = DirectionNormalizer;
/// let c = normalizer.to_absolute(Some("main_to_primary"), "A", "B", "B");
/// assert_eq!(c.direction, PairDirection::BToA);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionNormalizer;

impl Normalize for DirectionNormalizer {
    fn to_absolute(
        &self,
        stored: Option<&str>,
        protein_a: &str,
        _protein_b: &str,
        discovered_in_query: &str,
    ) -> Conversion {
        let raw = stored.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Conversion {
                direction: PairDirection::Bidirectional,
                outcome: ConversionOutcome::Missing,
            };
        }

        if let Some(absolute) = PairDirection::parse(raw) {
            let outcome = if absolute == PairDirection::Bidirectional {
                ConversionOutcome::Bidirectional
            } else {
                ConversionOutcome::AlreadyAbsolute
            };
            return Conversion { direction: absolute, outcome };
        }

        match QueryDirection::parse(raw) {
            Some(from @ (QueryDirection::MainToPrimary | QueryDirection::PrimaryToMain)) => {
                let query_is_a = discovered_in_query == protein_a;
                let direction = match (from, query_is_a) {
                    (QueryDirection::MainToPrimary, true) => PairDirection::AToB,
                    (QueryDirection::PrimaryToMain, true) => PairDirection::BToA,
                    (QueryDirection::MainToPrimary, false) => PairDirection::BToA,
                    _ => PairDirection::AToB,
                };
                Conversion {
                    direction,
                    outcome: ConversionOutcome::Converted { from, query_is_a },
                }
            }
            // Bidirectional is caught by PairDirection::parse above.
            _ => Conversion {
                direction: PairDirection::Bidirectional,
                outcome: ConversionOutcome::Unrecognized(raw.to_string()),
            },
        }
    }

    fn to_query_relative(
        &self,
        absolute: PairDirection,
        protein_a: &str,
        _protein_b: &str,
        query: &str,
    ) -> QueryDirection {
        let query_is_a = query == protein_a;
        match (absolute, query_is_a) {
            (PairDirection::Bidirectional, _) => QueryDirection::Bidirectional,
            (PairDirection::AToB, true) | (PairDirection::BToA, false) => {
                QueryDirection::MainToPrimary
            }
            (PairDirection::BToA, true) | (PairDirection::AToB, false) => {
                QueryDirection::PrimaryToMain
            }
        }
    }

    fn normalize_query_relative(&self, stored: Option<&str>) -> (QueryDirection, bool) {
        match stored.and_then(QueryDirection::parse) {
            Some(direction) => (direction, true),
            None => (QueryDirection::Bidirectional, false),
        }
    }
}

/// Render the display notation for one interactor
///
/// `anchor` is the protein the arrow is drawn from: the query protein for
/// direct interactors, the upstream interactor for indirect ones. Unknown
/// directions render as a neutral link.
///
/// ```
/// use propaths_domain::arrow_notation;
///
/// assert_eq!(arrow_notation("ATXN3", "inhibits", Some("primary_to_main"), "VCP"),
///            "ATXN3 <--inhibits-- VCP:");
/// ```
pub fn arrow_notation(anchor: &str, arrow: &str, direction: Option<&str>, primary: &str) -> String {
    match direction.and_then(QueryDirection::parse) {
        Some(QueryDirection::MainToPrimary) => format!("{} --{}--> {}:", anchor, arrow, primary),
        Some(QueryDirection::PrimaryToMain) => format!("{} <--{}-- {}:", anchor, arrow, primary),
        Some(QueryDirection::Bidirectional) => format!("{} <--{}--> {}:", anchor, arrow, primary),
        None => format!("{} --{}-- {}:", anchor, arrow, primary),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn stored_direction() -> impl Strategy<Value = Option<String>> {
        prop_oneof![
            Just(None),
            Just(Some("main_to_primary".to_string())),
            Just(Some("primary_to_main".to_string())),
            Just(Some("bidirectional".to_string())),
            Just(Some("a_to_b".to_string())),
            Just(Some("b_to_a".to_string())),
            "[a-z_]{0,16}".prop_map(Some),
        ]
    }

    proptest! {
        /// Property: converting an already converted direction changes nothing
        #[test]
        fn test_to_absolute_idempotent(stored in stored_direction(), query_is_a: bool) {
            let n = DirectionNormalizer;
            let query = if query_is_a { "A" } else { "B" };
            let once = n.to_absolute(stored.as_deref(), "A", "B", query);
            let twice = n.to_absolute(Some(once.direction.as_str()), "A", "B", query);
            prop_assert_eq!(once.direction, twice.direction);
            prop_assert!(!twice.changed());
        }

        /// Property: reading back from the discovering protein restores the label
        #[test]
        fn test_query_relative_round_trip(relative_idx in 0usize..3, query_is_a: bool) {
            let n = DirectionNormalizer;
            let relative = [
                QueryDirection::MainToPrimary,
                QueryDirection::PrimaryToMain,
                QueryDirection::Bidirectional,
            ][relative_idx];
            let query = if query_is_a { "A" } else { "B" };
            let absolute = n.to_absolute(Some(relative.as_str()), "A", "B", query).direction;
            prop_assert_eq!(n.to_query_relative(absolute, "A", "B", query), relative);
        }
    }
}
