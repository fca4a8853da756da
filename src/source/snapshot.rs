//! JSON snapshot of the analysis database.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use super::{DataSource, SourceFile};
use crate::error::{ModularizerError, Result};
use crate::graph::DependencyRow;

/// On-disk layout of an exported snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub project: String,
    #[serde(default)]
    pub edges: Vec<DependencyRow>,
    #[serde(default)]
    pub files: Vec<SourceFile>,
}

/// Snapshot with edge rows left untyped until each is checked.
#[derive(Deserialize)]
struct RawSnapshot {
    project: String,
    #[serde(default)]
    edges: Vec<serde_json::Value>,
    #[serde(default)]
    files: Vec<SourceFile>,
}

/// Data source backed by an in-memory [`Snapshot`].
#[derive(Debug, Clone)]
pub struct SnapshotSource {
    snapshot: Snapshot,
    /// Index: absolute path -> position in `snapshot.files`.
    by_path: HashMap<String, usize>,
}

impl SnapshotSource {
    pub fn new(snapshot: Snapshot) -> Self {
        let mut by_path = HashMap::with_capacity(snapshot.files.len());
        for (i, file) in snapshot.files.iter().enumerate() {
            by_path.entry(file.path.clone()).or_insert(i);
        }
        Self { snapshot, by_path }
    }

    /// Open a snapshot file. A file that cannot be read or is not a JSON
    /// snapshot is a connection error, like an unreachable database. An edge
    /// row with a missing or mistyped column is [`ModularizerError::MalformedRow`].
    pub fn open(path: &Path) -> Result<Self> {
        let unavailable = |reason: String| ModularizerError::Connection {
            source_path: PathBuf::from(path),
            reason,
        };
        let text = fs::read_to_string(path).map_err(|e| unavailable(e.to_string()))?;
        let raw: RawSnapshot =
            serde_json::from_str(&text).map_err(|e| unavailable(e.to_string()))?;

        let edges = raw
            .edges
            .into_iter()
            .enumerate()
            .map(|(i, row)| {
                serde_json::from_value::<DependencyRow>(row)
                    .map_err(|e| ModularizerError::MalformedRow(format!("edge {}: {}", i, e)))
            })
            .collect::<Result<Vec<_>>>()?;
        let snapshot = Snapshot {
            project: raw.project,
            edges,
            files: raw.files,
        };

        info!(
            project = %snapshot.project,
            edges = snapshot.edges.len(),
            files = snapshot.files.len(),
            "snapshot loaded"
        );
        Ok(Self::new(snapshot))
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }
}

impl DataSource for SnapshotSource {
    fn project(&self) -> &str {
        &self.snapshot.project
    }

    fn fetch_dependency_rows(&self) -> Result<Vec<DependencyRow>> {
        Ok(self.snapshot.edges.clone())
    }

    fn fetch_file_contents(&self, paths: &[String]) -> Result<Vec<SourceFile>> {
        paths
            .iter()
            .map(|path| {
                self.by_path
                    .get(path)
                    .map(|&i| self.snapshot.files[i].clone())
                    .ok_or_else(|| ModularizerError::FileContentNotFound(path.clone()))
            })
            .collect()
    }
}
