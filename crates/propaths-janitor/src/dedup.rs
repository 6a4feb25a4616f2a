//! Deduplication and canonical ordering of protein pairs
//!
//! Rows are grouped by their unordered pair key. A group with more than one
//! row collapses into a single keeper in canonical slot order (lower protein
//! identifier in slot `a`) carrying the richest payload; the other rows are
//! deleted. Lone rows stored in reverse order are swapped into canonical order.

use crate::directions::canonicalize_direction;
use propaths_domain::{InteractionRow, Normalize, PairKey, RowChange};
use serde::Serialize;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Counts from a deduplication pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    /// Rows scanned
    pub total_interactions: usize,

    /// Pair keys held by more than one row
    pub duplicate_pairs_found: usize,

    /// Keepers written back with merged data
    pub interactions_kept: usize,

    /// Duplicate rows removed
    pub interactions_deleted: usize,

    /// Rows updated (keepers plus reordered singletons)
    pub interactions_updated: usize,

    /// Lone rows moved into canonical slot order
    pub rows_reordered: usize,

    /// Rows pairing a protein with itself, left alone
    pub self_pairs: usize,
}

impl DedupStats {
    /// Rows left after the pass is applied
    pub fn interactions_after(&self) -> usize {
        self.total_interactions - self.interactions_deleted
    }
}

impl fmt::Display for DedupStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned: {} duplicate pair(s), {} kept, {} deleted, {} reordered",
            self.total_interactions,
            self.duplicate_pairs_found,
            self.interactions_kept,
            self.interactions_deleted,
            self.rows_reordered
        )
    }
}

/// Group rows by unordered pair, each group in ascending row id order
pub fn group_by_pair(rows: &[InteractionRow]) -> BTreeMap<PairKey, Vec<&InteractionRow>> {
    let mut groups: BTreeMap<PairKey, Vec<&InteractionRow>> = BTreeMap::new();
    for row in rows {
        groups.entry(row.pair_key()).or_default().push(row);
    }
    for group in groups.values_mut() {
        group.sort_by_key(|r| r.id);
    }
    groups
}

/// Payload of a duplicate group: the largest evidence list wins, ties go to
/// the earliest row
fn merged_data(group: &[&InteractionRow], now: &str) -> serde_json::Map<String, Value> {
    let richest = group
        .iter()
        .copied()
        .reduce(|best, row| {
            if row.evidence_len() > best.evidence_len() {
                row
            } else {
                best
            }
        })
        .unwrap_or(group[0]);

    let mut data = richest.data.clone();
    let discovered_in: Vec<Value> = group
        .iter()
        .map(|r| r.discovered_in_query.clone().map(Value::String).unwrap_or(Value::Null))
        .collect();
    let created_at: Vec<Value> = group
        .iter()
        .map(|r| r.created_at.clone().map(Value::String).unwrap_or(Value::Null))
        .collect();
    data.insert(
        "_merged_from".to_string(),
        json!({
            "discovered_in": discovered_in,
            "created_at": created_at,
            "migration_date": now,
        }),
    );
    data
}

/// Plan the deduplication of every pair
pub fn plan_dedup<N: Normalize>(
    rows: &[InteractionRow],
    normalizer: &N,
    now: &str,
) -> (Vec<RowChange>, DedupStats) {
    let mut stats = DedupStats {
        total_interactions: rows.len(),
        ..Default::default()
    };
    let mut updates = Vec::new();
    let mut deletes = Vec::new();

    for (key, group) in group_by_pair(rows) {
        if key.is_self_pair() {
            tracing::warn!("{}: protein paired with itself, skipped", group[0].label());
            stats.self_pairs += group.len();
            continue;
        }

        if let [row] = group.as_slice() {
            if row.is_canonical() {
                continue;
            }
            let mut reordered = (*row).clone();
            reordered.swap_slots();
            canonicalize_direction(&mut reordered, normalizer);
            reordered.updated_at = Some(now.to_string());
            tracing::debug!("{}: reordered to canonical slots", reordered.label());
            stats.rows_reordered += 1;
            stats.interactions_updated += 1;
            updates.push(RowChange::Update(reordered));
            continue;
        }

        stats.duplicate_pairs_found += 1;
        let keeper_index = group.iter().position(|r| r.is_canonical()).unwrap_or(0);
        let mut keeper = group[keeper_index].clone();
        if !keeper.is_canonical() {
            keeper.swap_slots();
        }
        keeper.data = merged_data(&group, now);
        canonicalize_direction(&mut keeper, normalizer);
        keeper.updated_at = Some(now.to_string());

        tracing::info!(
            "{}: keeping row {}, deleting {} duplicate(s)",
            keeper.label(),
            keeper.id,
            group.len() - 1
        );

        for (index, row) in group.iter().enumerate() {
            if index != keeper_index {
                deletes.push(RowChange::Delete(row.id));
                stats.interactions_deleted += 1;
            }
        }
        stats.interactions_kept += 1;
        stats.interactions_updated += 1;
        updates.push(RowChange::Update(keeper));
    }

    // Deletes first: a keeper moved into canonical order takes the slot
    // order a deleted row held
    deletes.extend(updates);
    (deletes, stats)
}
