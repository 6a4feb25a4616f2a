//! Merge error types

use thiserror::Error;

/// Errors that can occur around merge operations
///
/// Merging itself is total; these cover fragment intake.
#[derive(Error, Debug)]
pub enum MergeError {
    /// A fragment could not be parsed
    #[error("Invalid fragment: {0}")]
    Parse(#[from] serde_json::Error),

    /// The coordinator stopped before a fragment was delivered
    #[error("Coordinator closed")]
    Closed,

    /// A worker task failed
    #[error("Worker error: {0}")]
    Worker(String),
}
