//! Repair of rows whose upstream interactor is one of their own proteins

use propaths_domain::{InteractionRow, InteractionType, RowChange};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Counts from a corruption scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorruptionStats {
    /// Rows scanned
    pub total: usize,

    /// Rows reset to direct
    pub corrupted: usize,

    /// Repaired rows per protein symbol
    pub by_protein: BTreeMap<String, usize>,
}

impl fmt::Display for CorruptionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} scanned: {} corrupted", self.total, self.corrupted)
    }
}

/// True when the row names one of its own proteins as upstream
pub fn is_self_referential(row: &InteractionRow) -> bool {
    row.upstream_interactor
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .is_some_and(|upstream| {
            upstream.eq_ignore_ascii_case(&row.protein_a_symbol)
                || upstream.eq_ignore_ascii_case(&row.protein_b_symbol)
        })
}

/// Plan the reset of every self-referential row to a direct interaction
///
/// The typed columns and their copies in `data` are reset together, and
/// `data._migration_fixed` records when.
pub fn plan_corruption_repair(rows: &[InteractionRow], now: &str) -> (Vec<RowChange>, CorruptionStats) {
    let mut stats = CorruptionStats {
        total: rows.len(),
        ..Default::default()
    };
    let mut changes = Vec::new();

    for row in rows.iter().filter(|r| is_self_referential(r)) {
        tracing::info!(
            "{}: type={}, upstream={} reset to direct",
            row.label(),
            row.interaction_type.as_deref().unwrap_or("<none>"),
            row.upstream_interactor.as_deref().unwrap_or_default()
        );

        let direct = InteractionType::Direct.as_str();
        let mut fixed = row.clone();
        fixed.interaction_type = Some(direct.to_string());
        fixed.upstream_interactor = None;
        fixed.mediator_chain = None;
        fixed.depth = Some(1);
        fixed.updated_at = Some(now.to_string());

        fixed.data.insert("interaction_type".to_string(), json!(direct));
        fixed.data.insert("upstream_interactor".to_string(), Value::Null);
        fixed.data.insert("mediator_chain".to_string(), Value::Null);
        fixed.data.insert("depth".to_string(), json!(1));
        fixed
            .data
            .insert("_migration_fixed".to_string(), Value::String(now.to_string()));

        stats.corrupted += 1;
        for symbol in [&row.protein_a_symbol, &row.protein_b_symbol] {
            *stats.by_protein.entry(symbol.clone()).or_insert(0) += 1;
        }
        changes.push(RowChange::Update(fixed));
    }

    (changes, stats)
}
