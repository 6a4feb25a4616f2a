//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

use crate::pair::{InteractionRow, Protein, RowChange};
use crate::payload::PayloadDocument;

/// Trait for reading and rewriting persisted interaction rows
///
/// Implemented by the infrastructure layer (propaths-store)
pub trait InteractionStore {
    /// Error type for store operations
    type Error;

    /// Every interaction row, ordered by row identifier
    fn list_interactions(&self) -> Result<Vec<InteractionRow>, Self::Error>;

    /// Get an interaction row by ID
    fn get_interaction(&self, id: i64) -> Result<Option<InteractionRow>, Self::Error>;

    /// Look up a protein by symbol
    fn find_protein(&self, symbol: &str) -> Result<Option<Protein>, Self::Error>;

    /// Apply a batch of changes in a single transaction
    ///
    /// Either every change is committed or none is.
    fn apply_batch(&mut self, changes: &[RowChange]) -> Result<(), Self::Error>;
}

/// Trait for reading cached query results
///
/// Implemented by the infrastructure layer (propaths-store)
pub trait PayloadCache {
    /// Error type for cache operations
    type Error;

    /// Load the cached document for a query protein, if one exists
    fn load(&self, symbol: &str) -> Result<Option<PayloadDocument>, Self::Error>;

    /// Name of the cache entry for a query protein (for audit stamps)
    fn entry_name(&self, symbol: &str) -> String {
        format!("{}.json", symbol)
    }
}
