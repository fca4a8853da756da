//
//  partition.rs
//  Modularizer
//

use petgraph::unionfind::UnionFind;
use petgraph::visit::EdgeRef;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::info;

use super::engine::DependencyGraph;
use super::types::NodeId;
use crate::error::{ModularizerError, Result};

/// Groups graph nodes into disjoint clusters.
///
/// Implementations must be deterministic for a fixed graph and fixed
/// configuration.
pub trait Partitioner {
    fn partition(&self, graph: &DependencyGraph) -> Vec<BTreeSet<NodeId>>;
}

/// Clusters by weakly connected component, ordered by each component's
/// first node in insertion order.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentPartitioner;

impl Partitioner for ComponentPartitioner {
    fn partition(&self, graph: &DependencyGraph) -> Vec<BTreeSet<NodeId>> {
        let mut sets = UnionFind::new(graph.node_count());
        for edge in graph.graph.edge_references() {
            sets.union(edge.source().index(), edge.target().index());
        }

        let mut order: Vec<usize> = Vec::new();
        let mut groups: HashMap<usize, BTreeSet<NodeId>> = HashMap::new();
        for idx in graph.graph.node_indices() {
            let root = sets.find(idx.index());
            groups
                .entry(root)
                .or_insert_with(|| {
                    order.push(root);
                    BTreeSet::new()
                })
                .insert(graph.graph[idx].id.clone());
        }

        order
            .into_iter()
            .filter_map(|root| groups.remove(&root))
            .collect()
    }
}

/// One numbered cluster of files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Module {
    pub id: usize,
    /// Node ids in graph insertion order.
    pub nodes: Vec<NodeId>,
    /// Absolute paths, parallel to `nodes`.
    pub paths: Vec<String>,
}

impl Module {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }
}

/// The current assignment of files to modules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Modularization {
    modules: Vec<Module>,
}

impl Modularization {
    /// Number the partition's sets in order. Sets must be disjoint.
    pub fn from_partition(graph: &DependencyGraph, sets: Vec<BTreeSet<NodeId>>) -> Result<Self> {
        let node_order: HashMap<NodeId, usize> = graph
            .node_ids()
            .into_iter()
            .enumerate()
            .map(|(i, id)| (id, i))
            .collect();
        let mut owner: HashMap<NodeId, usize> = HashMap::new();
        let mut modules = Vec::with_capacity(sets.len());

        for (id, set) in sets.into_iter().enumerate() {
            let mut nodes = Vec::with_capacity(set.len());
            for node in set {
                if !graph.contains(&node) {
                    return Err(ModularizerError::NodeNotFound(node));
                }
                if let Some(previous) = owner.insert(node.clone(), id) {
                    return Err(ModularizerError::Config(format!(
                        "file {node} assigned to modules {previous} and {id}"
                    )));
                }
                nodes.push(node);
            }
            nodes.sort_by_key(|n| node_order.get(n).copied().unwrap_or(usize::MAX));
            let paths = nodes
                .iter()
                .filter_map(|n| graph.path_of(n).map(str::to_string))
                .collect();
            modules.push(Module { id, nodes, paths });
        }

        info!(modules = modules.len(), "modularization ready");
        Ok(Self { modules })
    }

    /// Partition `graph` with `partitioner` and number the result.
    pub fn compute(graph: &DependencyGraph, partitioner: &dyn Partitioner) -> Result<Self> {
        Self::from_partition(graph, partitioner.partition(graph))
    }

    /// Restore a persisted module map (module id -> absolute paths).
    ///
    /// Modules are renumbered by ascending numeric id.
    pub fn load(json: &str, graph: &DependencyGraph) -> Result<Self> {
        let raw: BTreeMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut numbered: Vec<(usize, Vec<String>)> = raw
            .into_iter()
            .map(|(key, paths)| {
                key.trim()
                    .parse::<usize>()
                    .map(|id| (id, paths))
                    .map_err(|_| ModularizerError::Config(format!("invalid module id {key:?}")))
            })
            .collect::<Result<_>>()?;
        numbered.sort_by_key(|(id, _)| *id);

        let mut sets = Vec::with_capacity(numbered.len());
        for (_, paths) in numbered {
            let set = paths
                .iter()
                .map(|path| {
                    graph
                        .node_by_path(path)
                        .cloned()
                        .ok_or_else(|| ModularizerError::NodeNotFound(path.clone()))
                })
                .collect::<Result<BTreeSet<_>>>()?;
            sets.push(set);
        }
        Self::from_partition(graph, sets)
    }

    /// Persisted form: module id -> absolute paths.
    pub fn to_path_map(&self) -> BTreeMap<String, Vec<String>> {
        self.modules
            .iter()
            .map(|m| (m.id.to_string(), m.paths.clone()))
            .collect()
    }

    /// Pretty-printed JSON of [`Self::to_path_map`]. Keys sort as strings;
    /// [`Self::load`] restores numeric order.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_path_map())?)
    }

    pub fn modules(&self) -> &[Module] {
        &self.modules
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    pub fn get(&self, id: usize) -> Result<&Module> {
        self.modules
            .get(id)
            .ok_or(ModularizerError::ModuleNotFound(id))
    }

    /// First module holding a file whose absolute path contains `fragment`.
    pub fn find_by_file(&self, fragment: &str) -> Option<usize> {
        self.modules
            .iter()
            .find(|m| m.paths.iter().any(|p| p.contains(fragment)))
            .map(|m| m.id)
    }

    /// Induced subgraph of one module.
    pub fn subgraph(&self, graph: &DependencyGraph, id: usize) -> Result<DependencyGraph> {
        Ok(graph.subgraph(&self.get(id)?.nodes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::types::RelationKind;

    fn graph() -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        let a = graph.add_file("ws/ws.cpp", "/p/ws/ws.cpp");
        let b = graph.add_file("ws/ws.h", "/p/ws/ws.h");
        let c = graph.add_file("util/util.h", "/p/util/util.h");
        let d = graph.add_file("util/util.cpp", "/p/util/util.cpp");
        let e = graph.add_file("main.cpp", "/p/main.cpp");
        graph.add_edge(a, b, RelationKind::Uses);
        graph.add_edge(d, c, RelationKind::Implements);
        graph.add_edge(e, e, RelationKind::DependsOn);
        graph
    }

    #[test]
    fn test_components_in_insertion_order() {
        let parts = ComponentPartitioner.partition(&graph());
        assert_eq!(parts.len(), 3);
        assert!(parts[0].contains("ws/ws.h"));
        assert!(parts[1].contains("util/util.cpp"));
        assert_eq!(parts[2].len(), 1);
    }

    #[test]
    fn test_modules_keep_graph_order() {
        let graph = graph();
        let mods = Modularization::compute(&graph, &ComponentPartitioner).unwrap();
        let first = mods.get(0).unwrap();
        assert_eq!(first.nodes, vec!["ws/ws.cpp", "ws/ws.h"]);
        assert_eq!(first.paths, vec!["/p/ws/ws.cpp", "/p/ws/ws.h"]);
        assert!(matches!(mods.get(9), Err(ModularizerError::ModuleNotFound(9))));
    }

    #[test]
    fn test_overlapping_sets_rejected() {
        let graph = graph();
        let sets = vec![
            BTreeSet::from(["ws/ws.h".to_string()]),
            BTreeSet::from(["ws/ws.h".to_string(), "main.cpp".to_string()]),
        ];
        let err = Modularization::from_partition(&graph, sets).unwrap_err();
        assert!(matches!(err, ModularizerError::Config(_)));
    }

    #[test]
    fn test_json_round_trip() {
        let graph = graph();
        let mods = Modularization::compute(&graph, &ComponentPartitioner).unwrap();
        let json = mods.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["1"][0], "/p/util/util.h");

        let loaded = Modularization::load(&json, &graph).unwrap();
        assert_eq!(loaded, mods);
    }

    #[test]
    fn test_load_numeric_key_order() {
        let graph = graph();
        let json = r#"{"10": ["/p/main.cpp"], "2": ["/p/ws/ws.h", "/p/ws/ws.cpp"]}"#;
        let mods = Modularization::load(json, &graph).unwrap();
        assert_eq!(mods.len(), 2);
        assert_eq!(mods.get(0).unwrap().len(), 2);
        assert_eq!(mods.get(1).unwrap().nodes, vec!["main.cpp"]);
    }

    #[test]
    fn test_load_unknown_path() {
        let json = r#"{"0": ["/p/ws/ws.h", "/p/missing.h"]}"#;
        let err = Modularization::load(json, &graph()).unwrap_err();
        assert!(matches!(err, ModularizerError::NodeNotFound(p) if p == "/p/missing.h"));
    }

    #[test]
    fn test_find_by_file() {
        let graph = graph();
        let mods = Modularization::compute(&graph, &ComponentPartitioner).unwrap();
        assert_eq!(mods.find_by_file("util/util.h"), Some(1));
        assert_eq!(mods.find_by_file("nope.h"), None);
    }

    #[test]
    fn test_module_subgraph() {
        let graph = graph();
        let mods = Modularization::compute(&graph, &ComponentPartitioner).unwrap();
        let sub = mods.subgraph(&graph, 2).unwrap();
        assert_eq!(sub.node_count(), 1);
        assert_eq!(sub.edge_count(), 1);
    }
}
