//! Pair module - persisted interaction rows
//!
//! A row stores an unordered protein pair. The canonical form keeps the lower
//! protein identifier in `protein_a_id`.

use crate::direction::PairDirection;
use crate::interactor::ArrowBuckets;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A protein known to the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Protein {
    /// Row identifier
    pub id: i64,

    /// Gene symbol
    pub symbol: String,
}

/// Unordered pair key: the two protein identifiers, lower first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PairKey {
    /// Lower identifier
    pub low: i64,

    /// Higher identifier
    pub high: i64,
}

impl PairKey {
    /// Build the key for two identifiers in any order
    pub fn new(a: i64, b: i64) -> Self {
        Self {
            low: a.min(b),
            high: a.max(b),
        }
    }

    /// True for a protein paired with itself
    pub fn is_self_pair(&self) -> bool {
        self.low == self.high
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.low, self.high)
    }
}

/// Where an interaction's functions come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionContext {
    /// Functions describe the direct pair
    Direct,

    /// Functions describe the whole mediator chain
    Chain,

    /// Both kinds are present
    Mixed,
}

impl FunctionContext {
    /// Get the context label
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionContext::Direct => "direct",
            FunctionContext::Chain => "chain",
            FunctionContext::Mixed => "mixed",
        }
    }

    /// Parse a context label
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "direct" => Some(FunctionContext::Direct),
            "chain" => Some(FunctionContext::Chain),
            "mixed" => Some(FunctionContext::Mixed),
            _ => None,
        }
    }
}

/// A persisted interaction between two proteins
///
/// Symbols are carried alongside the identifiers so batch jobs can work
/// without further lookups.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct InteractionRow {
    /// Row identifier
    pub id: i64,

    /// First protein (lower identifier once canonical)
    pub protein_a_id: i64,

    /// Second protein
    pub protein_b_id: i64,

    /// Symbol of the first protein
    pub protein_a_symbol: String,

    /// Symbol of the second protein
    pub protein_b_symbol: String,

    /// Direction label; pair-absolute once migrated
    pub direction: Option<String>,

    /// Primary arrow label
    pub arrow: Option<String>,

    /// Arrows per direction bucket; absent on legacy rows
    pub arrows: Option<ArrowBuckets>,

    /// `direct` or `indirect`
    pub interaction_type: Option<String>,

    /// Upstream protein for indirect interactions
    pub upstream_interactor: Option<String>,

    /// Mediator symbols in order
    pub mediator_chain: Option<Vec<String>>,

    /// Chain description
    pub chain_context: Option<Value>,

    /// Chain links with their arrows
    pub chain_with_arrows: Option<Value>,

    /// Hops from the query protein
    pub depth: Option<i64>,

    /// `direct`, `chain` or `mixed`
    pub function_context: Option<String>,

    /// Loosely typed payload: functions, evidence, audit keys
    pub data: Map<String, Value>,

    /// Protein whose query first produced this row
    pub discovered_in_query: Option<String>,

    /// RFC 3339 creation time
    pub created_at: Option<String>,

    /// RFC 3339 modification time
    pub updated_at: Option<String>,
}

impl InteractionRow {
    /// Unordered pair key
    pub fn pair_key(&self) -> PairKey {
        PairKey::new(self.protein_a_id, self.protein_b_id)
    }

    /// True when the lower identifier is in slot `a`
    pub fn is_canonical(&self) -> bool {
        self.protein_a_id < self.protein_b_id
    }

    /// Length of `data.evidence`, zero when absent or not a list
    pub fn evidence_len(&self) -> usize {
        self.data
            .get("evidence")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Length of `data.functions`, zero when absent or not a list
    pub fn functions_len(&self) -> usize {
        self.data
            .get("functions")
            .and_then(Value::as_array)
            .map(Vec::len)
            .unwrap_or(0)
    }

    /// Pair-absolute direction, if the stored label is one
    pub fn pair_direction(&self) -> Option<PairDirection> {
        self.direction.as_deref().and_then(PairDirection::parse)
    }

    /// Symbol of the protein that is not `symbol`, if `symbol` is in the pair
    pub fn partner_of(&self, symbol: &str) -> Option<&str> {
        if self.protein_a_symbol == symbol {
            Some(self.protein_b_symbol.as_str())
        } else if self.protein_b_symbol == symbol {
            Some(self.protein_a_symbol.as_str())
        } else {
            None
        }
    }

    /// Swap slots `a` and `b`, flipping an absolute direction to match
    pub fn swap_slots(&mut self) {
        std::mem::swap(&mut self.protein_a_id, &mut self.protein_b_id);
        std::mem::swap(&mut self.protein_a_symbol, &mut self.protein_b_symbol);
        if let Some(direction) = self.pair_direction() {
            self.direction = Some(direction.flipped().as_str().to_string());
        }
    }

    /// Short label for logs
    pub fn label(&self) -> String {
        format!("{} <-> {}", self.protein_a_symbol, self.protein_b_symbol)
    }
}

/// One change in a batch applied atomically by a store
#[derive(Debug, Clone, PartialEq)]
pub enum RowChange {
    /// Rewrite every column of an existing row (matched by `id`)
    Update(InteractionRow),

    /// Remove a row
    Delete(i64),
}

impl RowChange {
    /// Identifier of the affected row
    pub fn row_id(&self) -> i64 {
        match self {
            RowChange::Update(row) => row.id,
            RowChange::Delete(id) => *id,
        }
    }
}
