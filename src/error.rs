//! Error types for the modularizer.
//!
//! One enum covers the whole pipeline so callers can decide per variant
//! whether to retry (data source), skip a module (assembly) or abort.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, ModularizerError>;

#[derive(Debug, Error)]
pub enum ModularizerError {
    /// A dependency row carried an unknown relation kind or lacked a column.
    #[error("Malformed dependency row: {0}")]
    MalformedRow(String),

    /// A persisted module references a file the graph does not know.
    #[error("Node not found for file: {0}")]
    NodeNotFound(String),

    #[error("Module {0} contains no files")]
    EmptyModule(String),

    #[error("Invalid module name: {0:?}")]
    InvalidModuleName(String),

    /// A path in the merge order had no matching content row.
    #[error("Content of file {0} not found in data source")]
    FileContentNotFound(String),

    /// The external data source is unreachable, unreadable or unauthorized.
    #[error("Data source unavailable ({source_path}): {reason}")]
    Connection { source_path: PathBuf, reason: String },

    #[error("Module {0} does not exist")]
    ModuleNotFound(usize),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ModularizerError {
    /// Whether the error comes from the data-source boundary, where the
    /// caller may retry with different parameters.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Connection { .. } | Self::MalformedRow(_))
    }
}
