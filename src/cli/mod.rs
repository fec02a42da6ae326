//! CLI support for woql-query
//!
//! Provides programmatic access to the `woql` subcommands so they can be
//! embedded in other tools.

mod check;
mod docs;
mod path;

pub use check::{CheckOptions, CheckResult, execute_check};
pub use docs::{describe_operation, get_operations_overview};
pub use path::{PathOptions, PathOutput, execute_path};

use std::io;
use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Path compilation or query construction failed
    #[error("{0}")]
    Woql(#[from] crate::WoqlError),
    /// JSON parsing error
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    /// No input provided
    #[error("No input provided. Use --input or pipe a query AST to stdin.")]
    NoInput,
    /// Unknown operation name
    #[error("Unknown operation: '{0}'\nRun 'woql ops' to see available operations.")]
    UnknownOperation(String),
}
