//
//  types.rs
//  Modularizer
//

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{ModularizerError, Result};

/// Project-relative file identity (root prefix stripped, no leading or
/// trailing separators).
pub type NodeId = String;

/// Typed label on a dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationKind {
    Provides,
    Implements,
    Uses,
    DependsOn,
}

impl RelationKind {
    /// Map the integer code stored by the analysis database.
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            0 => Ok(Self::Provides),
            1 => Ok(Self::Implements),
            2 => Ok(Self::Uses),
            3 => Ok(Self::DependsOn),
            other => Err(ModularizerError::MalformedRow(format!(
                "unexpected relation kind {other}"
            ))),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Provides => 0,
            Self::Implements => 1,
            Self::Uses => 2,
            Self::DependsOn => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Provides => "provides",
            Self::Implements => "implements",
            Self::Uses => "uses",
            Self::DependsOn => "depends on",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One raw edge row as delivered by the data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyRow {
    pub from_path: String,
    pub to_path: String,
    /// Relation kind code, validated when the graph is built.
    pub kind: i64,
}

impl DependencyRow {
    pub fn new(from_path: impl Into<String>, to_path: impl Into<String>, kind: RelationKind) -> Self {
        Self {
            from_path: from_path.into(),
            to_path: to_path.into(),
            kind: kind.code(),
        }
    }
}

/// Data stored on each graph node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNode {
    pub id: NodeId,
    /// Absolute path as supplied by the data source.
    pub path: String,
}

/// Header heuristic: the extension starts with `h` (`.h`, `.hpp`, `.hxx`).
pub fn is_header(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| ext.chars().next())
        .is_some_and(|c| c.eq_ignore_ascii_case(&'h'))
}

/// Data stored on each graph edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeData {
    pub kind: RelationKind,
}

impl EdgeData {
    pub fn new(kind: RelationKind) -> Self {
        Self { kind }
    }
}

/// A resolved edge, reported by id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EdgeInfo {
    pub from: NodeId,
    pub to: NodeId,
    pub kind: RelationKind,
}

impl fmt::Display for EdgeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} --{}--> {}", self.from, self.kind, self.to)
    }
}

/// Graph statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStats {
    pub file_count: usize,
    pub edge_count: usize,
    pub self_loops: usize,
    pub header_count: usize,
}
