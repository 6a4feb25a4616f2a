//! Direction migration: query-relative labels to pair-absolute ones

use propaths_domain::{ConversionOutcome, InteractionRow, Normalize, PairDirection, RowChange};
use serde::Serialize;
use serde_json::Value;
use std::fmt;

/// Counts from a direction migration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirectionStats {
    /// Rows scanned
    pub total: usize,

    /// Query-relative labels converted to `a_to_b` / `b_to_a`
    pub migrated: usize,

    /// Rows without a direction, written as `bidirectional`
    pub bidirectional: usize,

    /// Rows already holding a canonical pair-absolute label
    pub already_migrated: usize,

    /// Query-relative rows without `discovered_in_query`, written as `bidirectional`
    pub missing_discovered_in: usize,

    /// Unknown labels, written as `bidirectional`
    pub unrecognized: usize,
}

impl fmt::Display for DirectionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned: {} migrated, {} bidirectional, {} already migrated, {} missing discovered_in, {} unrecognized",
            self.total,
            self.migrated,
            self.bidirectional,
            self.already_migrated,
            self.missing_discovered_in,
            self.unrecognized
        )
    }
}

/// How a row's stored direction resolves
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Stored label is already canonical
    Unchanged,

    /// Query-relative label with no query to read it against
    MissingDiscoveredIn,

    /// Rewrite with the given label
    Rewrite(PairDirection, ConversionOutcome),
}

pub(crate) fn resolve_direction<N: Normalize>(row: &InteractionRow, normalizer: &N) -> Resolution {
    let discovered = row
        .discovered_in_query
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty());

    let conversion = normalizer.to_absolute(
        row.direction.as_deref(),
        &row.protein_a_symbol,
        &row.protein_b_symbol,
        discovered.unwrap_or_default(),
    );

    match conversion.outcome {
        ConversionOutcome::Converted { .. } if discovered.is_none() => Resolution::MissingDiscoveredIn,
        ConversionOutcome::AlreadyAbsolute | ConversionOutcome::Bidirectional
            if row.direction.as_deref() == Some(conversion.direction.as_str()) =>
        {
            Resolution::Unchanged
        }
        outcome => Resolution::Rewrite(conversion.direction, outcome),
    }
}

/// Rewrite a row's direction in place; true when it changed
///
/// Leaves the data audit stamps to the caller.
pub(crate) fn canonicalize_direction<N: Normalize>(row: &mut InteractionRow, normalizer: &N) -> bool {
    match resolve_direction(row, normalizer) {
        Resolution::Unchanged => false,
        Resolution::MissingDiscoveredIn => {
            row.direction = Some(PairDirection::Bidirectional.as_str().to_string());
            true
        }
        Resolution::Rewrite(direction, _) => {
            row.direction = Some(direction.as_str().to_string());
            true
        }
    }
}

/// Plan the conversion of every stored direction to pair-absolute form
///
/// Rewritten rows are stamped with `_direction_migrated` (time) and
/// `_old_direction` (previous label, or null).
pub fn plan_direction_migration<N: Normalize>(
    rows: &[InteractionRow],
    normalizer: &N,
    now: &str,
) -> (Vec<RowChange>, DirectionStats) {
    let mut stats = DirectionStats {
        total: rows.len(),
        ..Default::default()
    };
    let mut changes = Vec::new();

    for row in rows {
        let new_direction = match resolve_direction(row, normalizer) {
            Resolution::Unchanged => {
                stats.already_migrated += 1;
                continue;
            }
            Resolution::MissingDiscoveredIn => {
                tracing::warn!(
                    "{}: missing discovered_in_query, defaulting to bidirectional",
                    row.label()
                );
                stats.missing_discovered_in += 1;
                PairDirection::Bidirectional
            }
            Resolution::Rewrite(direction, outcome) => {
                match outcome {
                    ConversionOutcome::Missing => stats.bidirectional += 1,
                    ConversionOutcome::Unrecognized(raw) => {
                        tracing::warn!("{}: unrecognized direction '{}'", row.label(), raw);
                        stats.unrecognized += 1;
                    }
                    _ => stats.migrated += 1,
                }
                direction
            }
        };

        let mut updated = row.clone();
        updated.direction = Some(new_direction.as_str().to_string());
        updated
            .data
            .insert("_direction_migrated".to_string(), Value::String(now.to_string()));
        updated.data.insert(
            "_old_direction".to_string(),
            row.direction.clone().map(Value::String).unwrap_or(Value::Null),
        );
        updated.updated_at = Some(now.to_string());

        tracing::debug!(
            "{}: {} -> {}",
            row.label(),
            row.direction.as_deref().unwrap_or("<none>"),
            new_direction
        );
        changes.push(RowChange::Update(updated));
    }

    (changes, stats)
}
