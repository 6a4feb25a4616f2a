//! Backfill of columns added after rows were written

use propaths_domain::{ArrowBuckets, ArrowKind, FunctionContext, InteractionRow, QueryDirection, RowChange};
use serde::Serialize;
use std::fmt;

/// Counts from a backfill pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BackfillStats {
    /// Rows scanned
    pub total: usize,

    /// Rows given an `arrows` mapping built from `arrow`
    pub arrows_filled: usize,

    /// Rows given `function_context = direct`
    pub function_context_filled: usize,

    /// Rows with neither `arrows` nor `arrow`, left for the reader's fallback
    pub arrows_still_missing: usize,
}

impl fmt::Display for BackfillStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned: {} arrows filled, {} function_context filled, {} without arrow data",
            self.total, self.arrows_filled, self.function_context_filled, self.arrows_still_missing
        )
    }
}

/// Plan the backfill of `arrows` and `function_context`
///
/// A row with an `arrow` but no `arrows` gets `{"main_to_primary": [arrow]}`
/// (`binds` when the arrow is blank). A row without `function_context` gets
/// `direct`.
pub fn plan_backfill(rows: &[InteractionRow], now: &str) -> (Vec<RowChange>, BackfillStats) {
    let mut stats = BackfillStats {
        total: rows.len(),
        ..Default::default()
    };
    let mut changes = Vec::new();

    for row in rows {
        let mut filled = row.clone();
        let mut changed = false;

        if row.arrows.is_none() {
            match row.arrow.as_deref().map(str::trim) {
                Some(arrow) => {
                    let arrow = if arrow.is_empty() {
                        ArrowKind::Binds.as_str()
                    } else {
                        arrow
                    };
                    let mut buckets = ArrowBuckets::new();
                    buckets.insert(QueryDirection::MainToPrimary.as_str(), arrow);
                    filled.arrows = Some(buckets);
                    stats.arrows_filled += 1;
                    changed = true;
                }
                None => stats.arrows_still_missing += 1,
            }
        }

        if row.function_context.is_none() {
            filled.function_context = Some(FunctionContext::Direct.as_str().to_string());
            stats.function_context_filled += 1;
            changed = true;
        }

        if changed {
            filled.updated_at = Some(now.to_string());
            changes.push(RowChange::Update(filled));
        }
    }

    if stats.arrows_still_missing > 0 {
        tracing::info!(
            "{} row(s) have no arrow data and keep arrows=NULL",
            stats.arrows_still_missing
        );
    }
    (changes, stats)
}
