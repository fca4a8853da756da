//
//  engine.rs
//  Modularizer
//

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet};

use super::types::*;

/// Typed directed multigraph of project files.
///
/// Node order is insertion order, which every downstream consumer
/// (partitioning, sequencing) relies on for deterministic output.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph {
    pub(crate) graph: DiGraph<FileNode, EdgeData>,
    /// Index: node id -> node index.
    pub(crate) id_index: HashMap<NodeId, NodeIndex>,
    /// Index: absolute path -> node index.
    pub(crate) path_index: HashMap<String, NodeIndex>,
}

impl DependencyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ─── Node Operations ────────────────────────────────────────

    /// Add a file node. Returns the existing index if the id is known.
    pub fn add_file(&mut self, id: impl Into<NodeId>, path: impl Into<String>) -> NodeIndex {
        let id = id.into();
        if let Some(&idx) = self.id_index.get(&id) {
            return idx;
        }
        let path = path.into();
        let idx = self.graph.add_node(FileNode {
            id: id.clone(),
            path: path.clone(),
        });
        self.id_index.insert(id, idx);
        self.path_index.entry(path).or_insert(idx);
        idx
    }

    // ─── Edge Operations ────────────────────────────────────────

    /// Add an edge. Parallel edges and self-loops are kept.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex, kind: RelationKind) {
        self.graph.add_edge(from, to, EdgeData::new(kind));
    }

    // ─── Lookups ────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_index.contains_key(id)
    }

    /// Node ids in insertion order.
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.graph
            .node_indices()
            .map(|idx| self.graph[idx].id.clone())
            .collect()
    }

    /// Absolute path of a node.
    pub fn path_of(&self, id: &str) -> Option<&str> {
        self.id_index
            .get(id)
            .map(|&idx| self.graph[idx].path.as_str())
    }

    /// Resolve an absolute path back to its node id.
    pub fn node_by_path(&self, path: &str) -> Option<&NodeId> {
        self.path_index.get(path).map(|&idx| &self.graph[idx].id)
    }

    pub(crate) fn index_of(&self, id: &str) -> Option<NodeIndex> {
        self.id_index.get(id).copied()
    }

    /// All edges in insertion order.
    pub fn edges(&self) -> Vec<EdgeInfo> {
        self.graph
            .edge_references()
            .map(|e| EdgeInfo {
                from: self.graph[e.source()].id.clone(),
                to: self.graph[e.target()].id.clone(),
                kind: e.weight().kind,
            })
            .collect()
    }

    /// Induced subgraph over `ids`. Nodes and edges keep their relative
    /// insertion order; unknown ids are ignored.
    pub fn subgraph<'a, I>(&self, ids: I) -> DependencyGraph
    where
        I: IntoIterator<Item = &'a NodeId>,
    {
        let wanted: HashSet<NodeIndex> = ids
            .into_iter()
            .filter_map(|id| self.index_of(id))
            .collect();

        let mut sub = DependencyGraph::new();
        let mut remap: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        for idx in self.graph.node_indices().filter(|i| wanted.contains(i)) {
            let node = &self.graph[idx];
            remap.insert(idx, sub.add_file(node.id.clone(), node.path.clone()));
        }
        for edge in self.graph.edge_references() {
            if let (Some(&from), Some(&to)) = (remap.get(&edge.source()), remap.get(&edge.target())) {
                sub.add_edge(from, to, edge.weight().kind);
            }
        }
        sub
    }

    pub fn stats(&self) -> GraphStats {
        GraphStats {
            file_count: self.graph.node_count(),
            edge_count: self.graph.edge_count(),
            self_loops: self
                .graph
                .edge_references()
                .filter(|e| e.source() == e.target())
                .count(),
            header_count: self
                .graph
                .node_weights()
                .filter(|n| is_header(&n.id))
                .count(),
        }
    }
}
