//! ProPaths CLI library.
//!
//! This library provides the core functionality for the `propaths` command-line
//! interface: configuration, maintenance and document commands, and output
//! formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
