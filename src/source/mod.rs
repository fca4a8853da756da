//! Data-source boundary.
//!
//! The analysis database that owns file records and typed dependency edges
//! is an external collaborator; this module defines what the pipeline needs
//! from it and ships a JSON snapshot implementation.

mod snapshot;

pub use snapshot::{Snapshot, SnapshotSource};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::DependencyRow;

/// One file record. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Opaque id assigned by the data source.
    pub id: i64,
    /// Absolute path.
    pub path: String,
    /// Base name with extension.
    pub filename: String,
    pub content: String,
}

/// Everything the pipeline fetches from the analysis database.
pub trait DataSource {
    /// Project identity used to namespace output (the database name).
    fn project(&self) -> &str;

    /// All dependency rows of the project.
    fn fetch_dependency_rows(&self) -> Result<Vec<DependencyRow>>;

    /// One record per requested path, in request order. A missing path is
    /// a [`FileContentNotFound`](crate::ModularizerError::FileContentNotFound)
    /// error.
    fn fetch_file_contents(&self, paths: &[String]) -> Result<Vec<SourceFile>>;
}
