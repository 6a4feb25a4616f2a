//! Restore functions lost from persisted rows using cached query results

use propaths_domain::traits::PayloadCache;
use propaths_domain::{InteractionRow, PayloadDocument, RowChange};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Counts from a restore pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RestoreStats {
    /// Rows scanned
    pub total: usize,

    /// Rows with no functions
    pub missing_functions: usize,

    /// Rows whose functions were restored
    pub restored: usize,

    /// No cache entry for the query protein
    pub cache_not_found: usize,

    /// Cache entry without the partner protein
    pub interactor_not_found: usize,

    /// Partner found, but with no functions either
    pub no_functions_in_cache: usize,

    /// Cache entries that could not be read
    pub errors: usize,
}

impl fmt::Display for RestoreStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} scanned, {} missing functions: {} restored, {} cache not found, {} interactor not found, {} no functions in cache, {} errors",
            self.total,
            self.missing_functions,
            self.restored,
            self.cache_not_found,
            self.interactor_not_found,
            self.no_functions_in_cache,
            self.errors
        )
    }
}

/// Which protein's cache entry describes a row, and the partner to look up
///
/// The query is `discovered_in_query` when it names one of the two proteins,
/// otherwise protein `a`.
fn query_and_partner(row: &InteractionRow) -> (&str, &str) {
    let a = row.protein_a_symbol.as_str();
    let b = row.protein_b_symbol.as_str();
    match row.discovered_in_query.as_deref() {
        Some(query) if query == b => (b, a),
        Some(query) if query == a => (a, b),
        other => {
            tracing::debug!(
                "{}: unknown query context {:?}, trying {}",
                row.label(),
                other,
                a
            );
            (a, b)
        }
    }
}

/// Plan the restoration of functions for every row that has none
///
/// Each cache entry is read at most once. Restored rows are stamped with
/// `_functions_restored` (time) and `_restored_from_cache` (entry name).
pub fn plan_restore<C>(rows: &[InteractionRow], cache: &C, now: &str) -> (Vec<RowChange>, RestoreStats)
where
    C: PayloadCache,
    C::Error: fmt::Display,
{
    let mut stats = RestoreStats {
        total: rows.len(),
        ..Default::default()
    };
    let mut changes = Vec::new();
    let mut loaded: HashMap<String, Option<PayloadDocument>> = HashMap::new();
    let mut unreadable: HashSet<String> = HashSet::new();

    for row in rows {
        if row.functions_len() > 0 {
            continue;
        }
        stats.missing_functions += 1;

        let (query, partner) = query_and_partner(row);
        if unreadable.contains(query) {
            stats.errors += 1;
            continue;
        }
        if !loaded.contains_key(query) {
            match cache.load(query) {
                Ok(document) => {
                    loaded.insert(query.to_string(), document);
                }
                Err(e) => {
                    tracing::warn!("Could not read cache entry {}: {}", cache.entry_name(query), e);
                    unreadable.insert(query.to_string());
                    stats.errors += 1;
                    continue;
                }
            }
        }

        let Some(document) = loaded.get(query).and_then(Option::as_ref) else {
            stats.cache_not_found += 1;
            continue;
        };
        let Some(interactor) = document.interactor(partner) else {
            stats.interactor_not_found += 1;
            continue;
        };
        if interactor.functions().is_empty() {
            stats.no_functions_in_cache += 1;
            continue;
        }

        let functions = match serde_json::to_value(interactor.functions()) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("{}: could not encode functions: {}", row.label(), e);
                stats.errors += 1;
                continue;
            }
        };

        let mut restored = row.clone();
        restored.data.insert("functions".to_string(), functions);
        restored
            .data
            .insert("_functions_restored".to_string(), Value::String(now.to_string()));
        restored.data.insert(
            "_restored_from_cache".to_string(),
            Value::String(cache.entry_name(query)),
        );
        restored.updated_at = Some(now.to_string());

        tracing::info!(
            "{}: restoring {} function(s) from {}",
            row.label(),
            interactor.functions().len(),
            cache.entry_name(query)
        );
        stats.restored += 1;
        changes.push(RowChange::Update(restored));
    }

    (changes, stats)
}
