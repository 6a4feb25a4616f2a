//! ProPaths Storage Layer
//!
//! Implements the InteractionStore trait using SQLite.
//!
//! # Architecture
//!
//! - `proteins`: one row per gene symbol
//! - `interactions`: one row per unordered protein pair, with the loosely
//!   typed payload in the `data` JSON column
//! - JSON columns (`data`, `arrows`, `mediator_chain`, `chain_context`,
//!   `chain_with_arrows`) are stored as TEXT
//!
//! Databases created by older releases are upgraded in place: columns added
//! since the first schema are created with `ALTER TABLE` when missing.
//!
//! # Examples
//!
//! ```no_run
//! use propaths_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for batch jobs and cache syncs
//! ```

#![warn(missing_docs)]

mod cache;
mod export;
mod sync;

pub use cache::CacheDirectory;
pub use export::{export_document, interactor_from_row};
pub use sync::{sync_document, SyncStats};

use chrono::Utc;
use propaths_domain::traits::InteractionStore;
use propaths_domain::{InteractionRow, Protein, RowChange};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// JSON column or cache file could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Interaction not found
    #[error("Interaction not found: {0}")]
    NotFound(i64),
}

/// Columns added after the base schema, with their SQL definitions
const MIGRATED_COLUMNS: &[(&str, &str)] = &[
    ("arrows", "TEXT"),
    ("interaction_type", "TEXT"),
    ("upstream_interactor", "TEXT"),
    ("function_context", "TEXT"),
    ("mediator_chain", "TEXT"),
    ("depth", "INTEGER DEFAULT 1"),
    ("chain_context", "TEXT"),
    ("chain_with_arrows", "TEXT"),
];

const SELECT_INTERACTIONS: &str = "
    SELECT i.id, i.protein_a_id, i.protein_b_id, pa.symbol, pb.symbol,
           i.direction, i.arrow, i.arrows, i.interaction_type, i.upstream_interactor,
           i.mediator_chain, i.chain_context, i.chain_with_arrows, i.depth,
           i.function_context, i.data, i.discovered_in_query, i.created_at, i.updated_at
    FROM interactions i
    JOIN proteins pa ON pa.id = i.protein_a_id
    JOIN proteins pb ON pb.id = i.protein_b_id";

/// Current time as stored in timestamp columns
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339()
}

/// SQLite-based implementation of InteractionStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use propaths_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("propaths.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the base schema, then upgrade older databases
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;

        let added = self.migrate_columns()?;
        if !added.is_empty() {
            tracing::info!("Added interaction column(s): {}", added.join(", "));
        }

        // These index migrated columns, so they cannot live in schema.sql
        self.conn.execute_batch(
            "CREATE INDEX IF NOT EXISTS idx_interactions_depth ON interactions(depth);
             CREATE INDEX IF NOT EXISTS idx_interactions_type ON interactions(interaction_type);",
        )?;

        Ok(())
    }

    /// Migration: add any interaction column missing from an older database
    ///
    /// SQLite doesn't support ALTER TABLE ADD COLUMN IF NOT EXISTS,
    /// so we check if columns exist first using table_info pragma.
    fn migrate_columns(&self) -> Result<Vec<&'static str>, StoreError> {
        let mut added = Vec::new();
        for (column, definition) in MIGRATED_COLUMNS {
            if !self.has_column("interactions", column)? {
                self.conn.execute(
                    &format!("ALTER TABLE interactions ADD COLUMN {} {}", column, definition),
                    [],
                )?;
                added.push(*column);
            }
        }
        Ok(added)
    }

    fn has_column(&self, table: &str, column: &str) -> Result<bool, StoreError> {
        let exists = self.conn.query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info(?1) WHERE name = ?2",
            params![table, column],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Column names of a table, in declaration order
    pub fn columns(&self, table: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT name FROM pragma_table_info(?1)")?;
        let names = stmt
            .query_map(params![table], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(names)
    }

    /// Look up a protein by symbol, creating it when missing
    ///
    /// Returns the protein and whether it was created.
    pub fn get_or_create_protein(&mut self, symbol: &str) -> Result<(Protein, bool), StoreError> {
        get_or_create_protein_in(&self.conn, symbol, &timestamp())
    }

    /// Find the row stored with exactly these slot assignments
    pub fn find_interaction(&self, protein_a_id: i64, protein_b_id: i64) -> Result<Option<InteractionRow>, StoreError> {
        find_interaction_in(&self.conn, protein_a_id, protein_b_id)
    }

    /// Insert a row as given (slot order is not changed); returns its identifier
    pub fn insert_interaction(&mut self, row: &InteractionRow) -> Result<i64, StoreError> {
        insert_interaction_in(&self.conn, row)
    }

    /// Rewrite every column of an existing row
    pub fn update_interaction(&mut self, row: &InteractionRow) -> Result<(), StoreError> {
        update_interaction_in(&self.conn, row)
    }

    /// Number of interaction rows
    pub fn interaction_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM interactions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of protein rows
    pub fn protein_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM proteins", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub(crate) fn connection_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}

pub(crate) fn get_or_create_protein_in(
    conn: &Connection,
    symbol: &str,
    now: &str,
) -> Result<(Protein, bool), StoreError> {
    if let Some(protein) = find_protein_in(conn, symbol)? {
        return Ok((protein, false));
    }

    conn.execute(
        "INSERT INTO proteins (symbol, created_at, updated_at) VALUES (?1, ?2, ?2)",
        params![symbol, now],
    )?;
    let protein = Protein {
        id: conn.last_insert_rowid(),
        symbol: symbol.to_string(),
    };
    Ok((protein, true))
}

fn find_protein_in(conn: &Connection, symbol: &str) -> Result<Option<Protein>, StoreError> {
    let protein = conn
        .query_row(
            "SELECT id, symbol FROM proteins WHERE symbol = ?1",
            params![symbol],
            |row| {
                Ok(Protein {
                    id: row.get(0)?,
                    symbol: row.get(1)?,
                })
            },
        )
        .optional()?;
    Ok(protein)
}

pub(crate) fn find_interaction_in(
    conn: &Connection,
    protein_a_id: i64,
    protein_b_id: i64,
) -> Result<Option<InteractionRow>, StoreError> {
    let sql = format!("{} WHERE i.protein_a_id = ?1 AND i.protein_b_id = ?2", SELECT_INTERACTIONS);
    let row = conn
        .query_row(&sql, params![protein_a_id, protein_b_id], row_to_interaction)
        .optional()?;
    Ok(row)
}

pub(crate) fn insert_interaction_in(conn: &Connection, row: &InteractionRow) -> Result<i64, StoreError> {
    let now = timestamp();
    conn.execute(
        "INSERT INTO interactions (protein_a_id, protein_b_id, direction, arrow, arrows,
             interaction_type, upstream_interactor, mediator_chain, chain_context,
             chain_with_arrows, depth, function_context, data, discovered_in_query,
             created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            row.protein_a_id,
            row.protein_b_id,
            row.direction,
            row.arrow,
            json_text(&row.arrows)?,
            row.interaction_type,
            row.upstream_interactor,
            json_text(&row.mediator_chain)?,
            json_text(&row.chain_context)?,
            json_text(&row.chain_with_arrows)?,
            row.depth.unwrap_or(1),
            row.function_context,
            serde_json::to_string(&row.data)?,
            row.discovered_in_query,
            row.created_at.clone().unwrap_or_else(|| now.clone()),
            row.updated_at.clone().unwrap_or(now),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub(crate) fn update_interaction_in(conn: &Connection, row: &InteractionRow) -> Result<(), StoreError> {
    let changed = conn.execute(
        "UPDATE interactions SET protein_a_id = ?2, protein_b_id = ?3, direction = ?4, arrow = ?5,
             arrows = ?6, interaction_type = ?7, upstream_interactor = ?8, mediator_chain = ?9,
             chain_context = ?10, chain_with_arrows = ?11, depth = ?12, function_context = ?13,
             data = ?14, discovered_in_query = ?15, updated_at = ?16
         WHERE id = ?1",
        params![
            row.id,
            row.protein_a_id,
            row.protein_b_id,
            row.direction,
            row.arrow,
            json_text(&row.arrows)?,
            row.interaction_type,
            row.upstream_interactor,
            json_text(&row.mediator_chain)?,
            json_text(&row.chain_context)?,
            json_text(&row.chain_with_arrows)?,
            row.depth,
            row.function_context,
            serde_json::to_string(&row.data)?,
            row.discovered_in_query,
            row.updated_at.clone().unwrap_or_else(timestamp),
        ],
    )?;

    if changed == 0 {
        return Err(StoreError::NotFound(row.id));
    }
    Ok(())
}

fn json_text<T: Serialize>(value: &Option<T>) -> Result<Option<String>, serde_json::Error> {
    value.as_ref().map(serde_json::to_string).transpose()
}

fn json_column<T: DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>> {
    let text: Option<String> = row.get(idx)?;
    match text.as_deref().map(str::trim) {
        None | Some("") | Some("null") => Ok(None),
        Some(raw) => serde_json::from_str(raw).map(Some).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        }),
    }
}

fn row_to_interaction(row: &Row<'_>) -> rusqlite::Result<InteractionRow> {
    Ok(InteractionRow {
        id: row.get(0)?,
        protein_a_id: row.get(1)?,
        protein_b_id: row.get(2)?,
        protein_a_symbol: row.get(3)?,
        protein_b_symbol: row.get(4)?,
        direction: row.get(5)?,
        arrow: row.get(6)?,
        arrows: json_column(row, 7)?,
        interaction_type: row.get(8)?,
        upstream_interactor: row.get(9)?,
        mediator_chain: json_column(row, 10)?,
        chain_context: json_column(row, 11)?,
        chain_with_arrows: json_column(row, 12)?,
        depth: row.get(13)?,
        function_context: row.get(14)?,
        data: json_column::<Map<String, Value>>(row, 15)?.unwrap_or_default(),
        discovered_in_query: row.get(16)?,
        created_at: row.get(17)?,
        updated_at: row.get(18)?,
    })
}

impl InteractionStore for SqliteStore {
    type Error = StoreError;

    fn list_interactions(&self) -> Result<Vec<InteractionRow>, Self::Error> {
        let sql = format!("{} ORDER BY i.id", SELECT_INTERACTIONS);
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], row_to_interaction)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn get_interaction(&self, id: i64) -> Result<Option<InteractionRow>, Self::Error> {
        let sql = format!("{} WHERE i.id = ?1", SELECT_INTERACTIONS);
        let row = self
            .conn
            .query_row(&sql, params![id], row_to_interaction)
            .optional()?;
        Ok(row)
    }

    fn find_protein(&self, symbol: &str) -> Result<Option<Protein>, Self::Error> {
        find_protein_in(&self.conn, symbol)
    }

    /// Deletes run before updates so a keeper moved into the canonical slot
    /// never collides with the row it replaces.
    fn apply_batch(&mut self, changes: &[RowChange]) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;

        for change in changes {
            if let RowChange::Delete(id) = change {
                let removed = tx.execute("DELETE FROM interactions WHERE id = ?1", params![id])?;
                if removed == 0 {
                    return Err(StoreError::NotFound(*id));
                }
            }
        }
        for change in changes {
            if let RowChange::Update(row) = change {
                update_interaction_in(&tx, row)?;
            }
        }

        tx.commit()?;
        tracing::debug!("Committed batch of {} change(s)", changes.len());
        Ok(())
    }
}
