//! Integration tests for the SQLite store

use propaths_domain::traits::{InteractionStore, PayloadCache};
use propaths_domain::{ArrowBuckets, InteractionRow, Interactor, PayloadDocument, RowChange};
use propaths_store::{sync_document, CacheDirectory, SqliteStore, StoreError};
use rusqlite::Connection;
use serde_json::json;
use tempfile::TempDir;

fn insert_pair(store: &mut SqliteStore, a: &str, b: &str) -> InteractionRow {
    let (a, _) = store.get_or_create_protein(a).unwrap();
    let (b, _) = store.get_or_create_protein(b).unwrap();
    let row = InteractionRow {
        protein_a_id: a.id,
        protein_b_id: b.id,
        arrow: Some("binds".into()),
        ..Default::default()
    };
    let id = store.insert_interaction(&row).unwrap();
    store.get_interaction(id).unwrap().unwrap()
}

#[test]
fn test_fresh_database_has_all_columns() {
    let store = SqliteStore::new(":memory:").unwrap();
    let columns = store.columns("interactions").unwrap();
    for column in [
        "arrows",
        "interaction_type",
        "upstream_interactor",
        "function_context",
        "mediator_chain",
        "depth",
        "chain_context",
        "chain_with_arrows",
    ] {
        assert!(columns.iter().any(|c| c == column), "missing column {}", column);
    }
}

#[test]
fn test_older_database_is_upgraded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.db");

    {
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE proteins (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 symbol TEXT NOT NULL UNIQUE,
                 query_count INTEGER NOT NULL DEFAULT 0,
                 total_interactions INTEGER NOT NULL DEFAULT 0,
                 created_at TEXT,
                 updated_at TEXT
             );
             CREATE TABLE interactions (
                 id INTEGER PRIMARY KEY AUTOINCREMENT,
                 protein_a_id INTEGER NOT NULL,
                 protein_b_id INTEGER NOT NULL,
                 direction TEXT,
                 arrow TEXT,
                 data TEXT NOT NULL DEFAULT '{}',
                 discovered_in_query TEXT,
                 created_at TEXT,
                 updated_at TEXT,
                 UNIQUE(protein_a_id, protein_b_id)
             );
             INSERT INTO proteins (symbol) VALUES ('ATXN3'), ('VCP');
             INSERT INTO interactions (protein_a_id, protein_b_id, direction, arrow, data)
                 VALUES (1, 2, 'main_to_primary', 'activates', '{\"functions\": []}');",
        )
        .unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert!(store.columns("interactions").unwrap().iter().any(|c| c == "chain_with_arrows"));

    let rows = store.list_interactions().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].protein_a_symbol, "ATXN3");
    assert_eq!(rows[0].arrows, None);
    assert_eq!(rows[0].depth, Some(1));

    // Opening again is a no-op
    drop(store);
    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.interaction_count().unwrap(), 1);
}

#[test]
fn test_json_columns_round_trip() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let mut row = insert_pair(&mut store, "ATXN3", "LC3");

    let mut arrows = ArrowBuckets::new();
    arrows.insert("main_to_primary", "activates");
    row.arrows = Some(arrows.clone());
    row.mediator_chain = Some(vec!["BECN1".into()]);
    row.chain_with_arrows = Some(json!([{"from": "ATXN3", "to": "BECN1", "arrow": "binds"}]));
    row.data.insert("functions".into(), json!([{"function": "Autophagy"}]));
    store.update_interaction(&row).unwrap();

    let stored = store.get_interaction(row.id).unwrap().unwrap();
    assert_eq!(stored.arrows, Some(arrows));
    assert_eq!(stored.mediator_chain, Some(vec!["BECN1".to_string()]));
    assert_eq!(stored.functions_len(), 1);
    assert!(stored.updated_at.is_some());
}

#[test]
fn test_apply_batch_deletes_before_updates() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let canonical = insert_pair(&mut store, "ATXN3", "VCP");
    let mut reversed = insert_pair(&mut store, "VCP", "ATXN3");

    // Moving the reversed row into canonical order only works once the
    // canonical row is gone
    reversed.swap_slots();
    store
        .apply_batch(&[RowChange::Update(reversed.clone()), RowChange::Delete(canonical.id)])
        .unwrap();

    let rows = store.list_interactions().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, reversed.id);
    assert!(rows[0].is_canonical());
}

#[test]
fn test_failed_batch_rolls_back() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let row = insert_pair(&mut store, "ATXN3", "VCP");

    let ghost = InteractionRow {
        id: 999,
        ..row.clone()
    };
    let result = store.apply_batch(&[RowChange::Delete(row.id), RowChange::Update(ghost)]);
    assert!(matches!(result, Err(StoreError::NotFound(999))));
    assert_eq!(store.interaction_count().unwrap(), 1);
}

#[test]
fn test_find_protein() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let (created, was_created) = store.get_or_create_protein("ATXN3").unwrap();
    assert!(was_created);
    let (again, was_created) = store.get_or_create_protein("ATXN3").unwrap();
    assert!(!was_created);
    assert_eq!(created, again);
    assert_eq!(store.find_protein("ATXN3").unwrap(), Some(created));
    assert_eq!(store.find_protein("VCP").unwrap(), None);
}

#[test]
fn test_sync_every_cached_document() {
    let dir = TempDir::new().unwrap();
    let cache = CacheDirectory::new(dir.path());

    let mut vcp = Interactor::new("VCP");
    vcp.direction = Some("main_to_primary".into());
    cache
        .save(&PayloadDocument::with_interactors("ATXN3", vec![vcp]))
        .unwrap();
    let mut atxn3 = Interactor::new("ATXN3");
    atxn3.direction = Some("primary_to_main".into());
    cache
        .save(&PayloadDocument::with_interactors("VCP", vec![atxn3]))
        .unwrap();

    let mut store = SqliteStore::new(dir.path().join("propaths.db")).unwrap();
    let mut created = 0;
    let mut updated = 0;
    for symbol in cache.symbols().unwrap() {
        let document = cache.load(&symbol).unwrap().unwrap();
        let stats = sync_document(&mut store, &symbol, &document).unwrap();
        created += stats.interactions_created;
        updated += stats.interactions_updated;
    }

    assert_eq!((created, updated), (1, 1));
    let rows = store.list_interactions().unwrap();
    assert_eq!(rows.len(), 1);
    // Both queries describe ATXN3 acting on VCP
    assert_eq!(rows[0].protein_a_symbol, "ATXN3");
    assert_eq!(rows[0].direction.as_deref(), Some("a_to_b"));
}
