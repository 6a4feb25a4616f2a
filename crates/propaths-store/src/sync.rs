//! Copy a cached query result into the database
//!
//! Each interactor of the document becomes one canonical row for the pair
//! (query, interactor). Rows that already exist are updated rather than
//! replaced: the payload with more evidence wins and function lists are
//! unioned, so a sync never drops functions recorded by an earlier query.

use crate::{
    find_interaction_in, get_or_create_protein_in, insert_interaction_in, timestamp,
    update_interaction_in, SqliteStore, StoreError,
};
use propaths_domain::{
    DirectionNormalizer, FunctionContext, InteractionRow, Interactor, Normalize, PayloadDocument,
    Protein,
};
use rusqlite::{params, Connection};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;

/// Counts from one document sync
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    /// Proteins that did not exist before
    pub proteins_created: usize,

    /// New interaction rows
    pub interactions_created: usize,

    /// Existing rows merged with the document
    pub interactions_updated: usize,

    /// Interactors without a usable symbol, or naming the query itself
    pub skipped: usize,
}

impl SyncStats {
    /// Fold another sync's counts into this one
    pub fn absorb(&mut self, other: &SyncStats) {
        self.proteins_created += other.proteins_created;
        self.interactions_created += other.interactions_created;
        self.interactions_updated += other.interactions_updated;
        self.skipped += other.skipped;
    }
}

impl fmt::Display for SyncStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} protein(s) created, {} interaction(s) created, {} updated, {} skipped",
            self.proteins_created, self.interactions_created, self.interactions_updated, self.skipped
        )
    }
}

/// Sync one document into the store, in a single transaction
///
/// `symbol` is the query protein the document was produced for.
pub fn sync_document(
    store: &mut SqliteStore,
    symbol: &str,
    document: &PayloadDocument,
) -> Result<SyncStats, StoreError> {
    let now = timestamp();
    let tx = store.connection_mut().transaction()?;
    let mut stats = SyncStats::default();

    let (query, created) = get_or_create_protein_in(&tx, symbol, &now)?;
    if created {
        stats.proteins_created += 1;
    }

    for interactor in document.interactors() {
        let partner_symbol = interactor.primary.trim();
        if partner_symbol.is_empty() || partner_symbol == query.symbol {
            tracing::warn!("{}: skipping interactor '{}'", symbol, interactor.primary);
            stats.skipped += 1;
            continue;
        }

        let (partner, created) = get_or_create_protein_in(&tx, partner_symbol, &now)?;
        if created {
            stats.proteins_created += 1;
        }

        let (a, b) = if query.id < partner.id {
            (&query, &partner)
        } else {
            (&partner, &query)
        };
        let incoming = row_from_interactor(interactor, a, b, &query.symbol, &now)?;

        match existing_row(&tx, a.id, b.id)? {
            Some(existing) => {
                let merged = merge_rows(existing, incoming, &now);
                update_interaction_in(&tx, &merged)?;
                stats.interactions_updated += 1;
            }
            None => {
                insert_interaction_in(&tx, &incoming)?;
                stats.interactions_created += 1;
            }
        }
    }

    tx.execute(
        "UPDATE proteins SET query_count = query_count + 1,
             total_interactions = (SELECT COUNT(*) FROM interactions
                                   WHERE protein_a_id = ?1 OR protein_b_id = ?1),
             updated_at = ?2
         WHERE id = ?1",
        params![query.id, now],
    )?;
    tx.commit()?;

    tracing::info!("Synced {}: {}", symbol, stats);
    Ok(stats)
}

/// The stored row for a pair, moved into canonical slot order if needed
fn existing_row(conn: &Connection, low: i64, high: i64) -> Result<Option<InteractionRow>, StoreError> {
    if let Some(row) = find_interaction_in(conn, low, high)? {
        return Ok(Some(row));
    }
    Ok(find_interaction_in(conn, high, low)?.map(|mut legacy| {
        legacy.swap_slots();
        legacy
    }))
}

fn row_from_interactor(
    interactor: &Interactor,
    a: &Protein,
    b: &Protein,
    query: &str,
    now: &str,
) -> Result<InteractionRow, StoreError> {
    let conversion = DirectionNormalizer.to_absolute(
        interactor.direction.as_deref(),
        &a.symbol,
        &b.symbol,
        query,
    );
    if let Some(message) = conversion.diagnostic() {
        tracing::warn!("{} <-> {}: {}", a.symbol, b.symbol, message);
    }

    let data = match serde_json::to_value(interactor)? {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    let indirect = interactor.is_indirect();
    let context = if indirect {
        FunctionContext::Chain
    } else {
        FunctionContext::Direct
    };

    Ok(InteractionRow {
        id: 0,
        protein_a_id: a.id,
        protein_b_id: b.id,
        protein_a_symbol: a.symbol.clone(),
        protein_b_symbol: b.symbol.clone(),
        direction: Some(conversion.direction.as_str().to_string()),
        arrow: interactor.arrow.clone(),
        arrows: interactor.arrows.clone(),
        interaction_type: Some(interactor.kind().as_str().to_string()),
        upstream_interactor: interactor.upstream_interactor.clone(),
        mediator_chain: interactor.mediator_chain.clone(),
        chain_context: data.get("chain_context").cloned(),
        chain_with_arrows: data.get("chain_with_arrows").cloned(),
        depth: Some(interactor.depth.map(i64::from).unwrap_or(if indirect { 2 } else { 1 })),
        function_context: Some(context.as_str().to_string()),
        data,
        discovered_in_query: Some(query.to_string()),
        created_at: Some(now.to_string()),
        updated_at: Some(now.to_string()),
    })
}

/// Merge an incoming row into the stored one
///
/// The stored row keeps its identity (`id`, `created_at`,
/// `discovered_in_query`); present incoming columns overwrite.
fn merge_rows(existing: InteractionRow, incoming: InteractionRow, now: &str) -> InteractionRow {
    let functions = union_functions(&existing.data, &incoming.data);
    let mut merged = existing;

    if incoming.evidence_len() >= merged.evidence_len() {
        merged.data = incoming.data;
    }
    if !functions.is_empty() {
        merged.data.insert("functions".to_string(), Value::Array(functions));
    }

    if let Some(new) = incoming.arrows {
        match merged.arrows.as_mut() {
            Some(stored) => {
                stored.union(&new);
            }
            None => merged.arrows = Some(new),
        }
    }

    overwrite(&mut merged.direction, incoming.direction);
    overwrite(&mut merged.arrow, incoming.arrow);
    overwrite(&mut merged.interaction_type, incoming.interaction_type);
    overwrite(&mut merged.upstream_interactor, incoming.upstream_interactor);
    overwrite(&mut merged.mediator_chain, incoming.mediator_chain);
    overwrite(&mut merged.chain_context, incoming.chain_context);
    overwrite(&mut merged.chain_with_arrows, incoming.chain_with_arrows);
    overwrite(&mut merged.depth, incoming.depth);
    overwrite(&mut merged.function_context, incoming.function_context);

    if merged.discovered_in_query.is_none() {
        merged.discovered_in_query = incoming.discovered_in_query;
    }
    merged.updated_at = Some(now.to_string());
    merged
}

fn overwrite<T>(slot: &mut Option<T>, value: Option<T>) {
    if value.is_some() {
        *slot = value;
    }
}

/// Stored functions first, then incoming functions not already present
fn union_functions(stored: &Map<String, Value>, incoming: &Map<String, Value>) -> Vec<Value> {
    let mut functions: Vec<Value> = stored
        .get("functions")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    if let Some(new) = incoming.get("functions").and_then(Value::as_array) {
        for function in new {
            if !functions.contains(function) {
                functions.push(function.clone());
            }
        }
    }
    functions
}
