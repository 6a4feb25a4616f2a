//! Validator error types

use thiserror::Error;

/// Errors that can occur around validation
///
/// The rules themselves never fail; this covers reading documents.
#[derive(Error, Debug)]
pub enum ValidatorError {
    /// The input was not a payload document
    #[error("Invalid payload document: {0}")]
    Parse(#[from] serde_json::Error),
}
