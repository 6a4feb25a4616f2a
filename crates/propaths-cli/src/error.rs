//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error
    #[error("Store error: {0}")]
    Store(#[from] propaths_store::StoreError),

    /// Maintenance job error
    #[error("Janitor error: {0}")]
    Janitor(#[from] propaths_janitor::JanitorError),

    /// Fragment intake error
    #[error("Merge error: {0}")]
    Merge(#[from] propaths_merge::MergeError),

    /// Document could not be validated
    #[error("Validation error: {0}")]
    Validator(#[from] propaths_validator::ValidatorError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
