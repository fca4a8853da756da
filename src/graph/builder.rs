//
//  builder.rs
//  Modularizer
//

use tracing::{debug, info};

use super::engine::DependencyGraph;
use super::types::{DependencyRow, NodeId, RelationKind};
use crate::error::Result;

/// Build-directory names probed under the project root, in order.
const BUILD_DIR_NAMES: &[&str] = &["build", "Build"];

/// Build the dependency graph from raw rows.
///
/// A row is kept only when both endpoints lie under `project_root` and
/// neither contains any of `excluded_dirs`. Every row's relation kind is
/// validated, kept or not.
pub fn build_graph(
    rows: &[DependencyRow],
    project_root: &str,
    excluded_dirs: &[String],
) -> Result<DependencyGraph> {
    let mut graph = DependencyGraph::new();
    let mut skipped = 0usize;

    for row in rows {
        let kind = RelationKind::from_code(row.kind)?;
        let inside = |path: &str| {
            under_root(path, project_root)
                && !excluded_dirs
                    .iter()
                    .any(|dir| !dir.is_empty() && path.contains(dir.as_str()))
        };
        if !inside(&row.from_path) || !inside(&row.to_path) {
            skipped += 1;
            continue;
        }

        let from = graph.add_file(node_id(&row.from_path, project_root), row.from_path.as_str());
        let to = graph.add_file(node_id(&row.to_path, project_root), row.to_path.as_str());
        graph.add_edge(from, to, kind);
    }

    debug!(skipped, "rows outside project root or in excluded directories");
    info!(
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "dependency graph built"
    );
    Ok(graph)
}

/// Whether `path` is `root` itself or lies below it. `/a/proj2/x.cpp` is not
/// under `/a/proj`.
fn under_root(path: &str, root: &str) -> bool {
    let root = root.trim_end_matches('/');
    path.strip_prefix(root)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Project-relative identity of an absolute path.
pub fn node_id(path: &str, project_root: &str) -> NodeId {
    path.strip_prefix(project_root)
        .unwrap_or(path)
        .trim_matches('/')
        .to_string()
}

/// Guess the project root from the first row mentioning `project_name`.
///
/// The root is the matching path cut at the first `/` after the name.
pub fn find_project_root(project_name: &str, rows: &[DependencyRow]) -> Option<String> {
    if project_name.is_empty() {
        return None;
    }
    let path = rows.iter().find_map(|row| {
        if row.from_path.contains(project_name) {
            Some(&row.from_path)
        } else if row.to_path.contains(project_name) {
            Some(&row.to_path)
        } else {
            None
        }
    })?;

    let start = path.find(project_name)?;
    let end = path[start..]
        .find('/')
        .map(|offset| start + offset)
        .unwrap_or(path.len());
    Some(path[..end].to_string())
}

/// Find a build directory directly under `project_root` that rows refer to.
pub fn find_build_dir(rows: &[DependencyRow], project_root: &str) -> Option<String> {
    BUILD_DIR_NAMES.iter().find_map(|name| {
        let candidate = format!("{}/{}", project_root.trim_end_matches('/'), name);
        rows.iter()
            .any(|row| row.from_path.contains(&candidate) || row.to_path.contains(&candidate))
            .then_some(candidate)
    })
}
