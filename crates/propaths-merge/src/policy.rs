//! Per-field merge policies

use propaths_domain::ArrowBuckets;
use std::fmt;

/// How an incoming field value combines with an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MergePolicy {
    /// Incoming value replaces the existing one (last write wins)
    Overwrite,

    /// Collections are combined without duplicates
    Union,

    /// Non-empty incoming collections are appended
    Append,

    /// Incoming value replaces the existing one unless it is empty
    ReplaceIfNonEmpty,

    /// Incoming value is used only when the existing one is absent or empty
    FillIfAbsent,
}

impl MergePolicy {
    /// Get the policy name
    pub fn as_str(&self) -> &'static str {
        match self {
            MergePolicy::Overwrite => "overwrite",
            MergePolicy::Union => "union",
            MergePolicy::Append => "append",
            MergePolicy::ReplaceIfNonEmpty => "replace_if_nonempty",
            MergePolicy::FillIfAbsent => "fill_if_absent",
        }
    }

    /// True when applying the same value twice equals applying it once
    ///
    /// Append is only idempotent together with function de-duplication.
    pub fn is_idempotent(&self) -> bool {
        !matches!(self, MergePolicy::Append)
    }
}

impl fmt::Display for MergePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interactor fields governed by the policy table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractorField {
    /// `arrow`
    Arrow,
    /// `direction`
    Direction,
    /// `intent`
    Intent,
    /// `upstream_interactor`
    UpstreamInteractor,
    /// `interaction_type`
    InteractionType,
    /// `depth`
    Depth,
    /// `arrows`
    Arrows,
    /// `functions`
    Functions,
    /// `mediator_chain`
    MediatorChain,
    /// `arrow_notation` and the `_chain_*` markers
    Annotations,
    /// Any key not modeled explicitly
    Extra,
}

impl InteractorField {
    /// Every governed field
    pub const ALL: [InteractorField; 11] = [
        InteractorField::Arrow,
        InteractorField::Direction,
        InteractorField::Intent,
        InteractorField::UpstreamInteractor,
        InteractorField::InteractionType,
        InteractorField::Depth,
        InteractorField::Arrows,
        InteractorField::Functions,
        InteractorField::MediatorChain,
        InteractorField::Annotations,
        InteractorField::Extra,
    ];

    /// Wire name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractorField::Arrow => "arrow",
            InteractorField::Direction => "direction",
            InteractorField::Intent => "intent",
            InteractorField::UpstreamInteractor => "upstream_interactor",
            InteractorField::InteractionType => "interaction_type",
            InteractorField::Depth => "depth",
            InteractorField::Arrows => "arrows",
            InteractorField::Functions => "functions",
            InteractorField::MediatorChain => "mediator_chain",
            InteractorField::Annotations => "annotations",
            InteractorField::Extra => "extra",
        }
    }
}

/// Field-to-policy mapping used by the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyTable {
    functions: MergePolicy,
}

impl PolicyTable {
    /// Standard table: functions are appended
    pub fn standard() -> Self {
        Self {
            functions: MergePolicy::Append,
        }
    }

    /// Table for schema re-aggregation: functions are replaced when non-empty
    pub fn replacing_functions() -> Self {
        Self {
            functions: MergePolicy::ReplaceIfNonEmpty,
        }
    }

    /// Policy for a field
    pub fn policy(&self, field: InteractorField) -> MergePolicy {
        match field {
            InteractorField::Arrow
            | InteractorField::Direction
            | InteractorField::Intent
            | InteractorField::UpstreamInteractor
            | InteractorField::InteractionType
            | InteractorField::Depth => MergePolicy::Overwrite,
            InteractorField::Arrows => MergePolicy::Union,
            InteractorField::Functions => self.functions,
            InteractorField::MediatorChain
            | InteractorField::Annotations
            | InteractorField::Extra => MergePolicy::FillIfAbsent,
        }
    }

    /// Every field with its policy, for audit output
    pub fn entries(&self) -> Vec<(InteractorField, MergePolicy)> {
        InteractorField::ALL
            .iter()
            .map(|field| (*field, self.policy(*field)))
            .collect()
    }
}

impl Default for PolicyTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// A value that can take part in a policy-driven merge
///
/// Scalars only ever overwrite; collections override `append` and `union`.
pub trait MergeValue: Clone + PartialEq {
    /// True for values that `ReplaceIfNonEmpty` and `Append` ignore
    fn is_blank(&self) -> bool {
        false
    }

    /// Append another value
    fn append(&mut self, other: &Self) {
        *self = other.clone();
    }

    /// Union another value, skipping duplicates
    fn union(&mut self, other: &Self) {
        *self = other.clone();
    }
}

impl MergeValue for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl MergeValue for u32 {}

impl MergeValue for bool {}

impl<T: Clone + PartialEq> MergeValue for Vec<T> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }

    fn append(&mut self, other: &Self) {
        self.extend(other.iter().cloned());
    }

    fn union(&mut self, other: &Self) {
        for item in other {
            if !self.contains(item) {
                self.push(item.clone());
            }
        }
    }
}

impl MergeValue for ArrowBuckets {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }

    fn append(&mut self, other: &Self) {
        ArrowBuckets::union(self, other);
    }

    fn union(&mut self, other: &Self) {
        ArrowBuckets::union(self, other);
    }
}

/// Apply a policy to one optional field
pub trait FieldMerge {
    /// Merge `incoming` into `self`; returns true when `self` changed
    ///
    /// An absent incoming value never changes anything.
    fn merge_with(&mut self, incoming: &Self, policy: MergePolicy) -> bool;
}

impl<T: MergeValue> FieldMerge for Option<T> {
    fn merge_with(&mut self, incoming: &Self, policy: MergePolicy) -> bool {
        let Some(incoming) = incoming else {
            return false;
        };
        let before = self.clone();

        match policy {
            MergePolicy::Overwrite => *self = Some(incoming.clone()),
            MergePolicy::FillIfAbsent => {
                if self.as_ref().map_or(true, MergeValue::is_blank) {
                    *self = Some(incoming.clone());
                }
            }
            MergePolicy::ReplaceIfNonEmpty => {
                if !incoming.is_blank() {
                    *self = Some(incoming.clone());
                }
            }
            MergePolicy::Append => {
                if !incoming.is_blank() {
                    match self {
                        Some(existing) => existing.append(incoming),
                        None => *self = Some(incoming.clone()),
                    }
                }
            }
            MergePolicy::Union => match self {
                Some(existing) => existing.union(incoming),
                None => *self = Some(incoming.clone()),
            },
        }

        *self != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_table() {
        let table = PolicyTable::standard();
        assert_eq!(table.policy(InteractorField::Arrow), MergePolicy::Overwrite);
        assert_eq!(table.policy(InteractorField::Depth), MergePolicy::Overwrite);
        assert_eq!(table.policy(InteractorField::Arrows), MergePolicy::Union);
        assert_eq!(table.policy(InteractorField::Functions), MergePolicy::Append);
        assert_eq!(table.policy(InteractorField::Extra), MergePolicy::FillIfAbsent);
        assert_eq!(table.entries().len(), InteractorField::ALL.len());
    }

    #[test]
    fn test_replacing_table() {
        let table = PolicyTable::replacing_functions();
        assert_eq!(table.policy(InteractorField::Functions), MergePolicy::ReplaceIfNonEmpty);
        assert!(table
            .entries()
            .iter()
            .filter(|(f, _)| *f != InteractorField::Functions)
            .all(|(_, p)| p.is_idempotent()));
    }

    #[test]
    fn test_overwrite() {
        let mut value = Some("binds".to_string());
        assert!(value.merge_with(&Some("activates".to_string()), MergePolicy::Overwrite));
        assert_eq!(value.as_deref(), Some("activates"));
        assert!(!value.merge_with(&None, MergePolicy::Overwrite));
        assert!(!value.merge_with(&Some("activates".to_string()), MergePolicy::Overwrite));
    }

    #[test]
    fn test_fill_if_absent() {
        let mut value: Option<Vec<String>> = None;
        assert!(value.merge_with(&Some(vec!["A".into()]), MergePolicy::FillIfAbsent));
        assert!(!value.merge_with(&Some(vec!["B".into()]), MergePolicy::FillIfAbsent));
        assert_eq!(value, Some(vec!["A".to_string()]));
    }

    #[test]
    fn test_append_and_union() {
        let mut value = Some(vec![1u32, 2]);
        value.merge_with(&Some(vec![2, 3]), MergePolicy::Append);
        assert_eq!(value, Some(vec![1, 2, 2, 3]));

        let mut value = Some(vec![1u32, 2]);
        value.merge_with(&Some(vec![2, 3]), MergePolicy::Union);
        assert_eq!(value, Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_replace_if_nonempty() {
        let mut value = Some(vec![1u32]);
        assert!(!value.merge_with(&Some(vec![]), MergePolicy::ReplaceIfNonEmpty));
        assert!(value.merge_with(&Some(vec![5]), MergePolicy::ReplaceIfNonEmpty));
        assert_eq!(value, Some(vec![5]));
    }

    #[test]
    fn test_arrow_buckets_union() {
        let mut existing = ArrowBuckets::new();
        existing.insert("main_to_primary", "activates");
        let mut incoming = ArrowBuckets::new();
        incoming.insert("main_to_primary", "activates");
        incoming.insert("primary_to_main", "binds");

        let mut value = Some(existing);
        assert!(value.merge_with(&Some(incoming.clone()), MergePolicy::Union));
        assert!(!value.merge_with(&Some(incoming), MergePolicy::Union));
        assert_eq!(value.unwrap().get("primary_to_main"), ["binds"]);
    }
}
