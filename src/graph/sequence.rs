//
//  sequence.rs
//  Modularizer
//

//! Cycle breaking and merge ordering.
//!
//! Edge direction is `dependent -> dependency`, so the merge order is the
//! reverse of a topological order: every file comes after the files it
//! depends on.
//!
//! Cycle selection rule: depth-first search from the lowest-index
//! unvisited node, following outgoing edges in insertion order. The first
//! back edge found closes the reported cycle, which starts at the node the
//! back edge points to. The first edge of that cycle is removed.

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};
use tracing::debug;

use super::engine::DependencyGraph;
use super::types::{EdgeInfo, NodeId, RelationKind};

type WorkGraph = StableDiGraph<NodeId, RelationKind>;

/// Result of sequencing one module.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    /// Files in merge order: dependencies first.
    pub order: Vec<NodeId>,
    /// Edges deleted to break cycles, in deletion order.
    pub removed: Vec<EdgeInfo>,
}

/// Merge order for `graph`. See [`plan`].
pub fn order(graph: &DependencyGraph) -> Vec<NodeId> {
    plan(graph).order
}

/// Break every cycle, then return the reversed topological order.
pub fn plan(graph: &DependencyGraph) -> MergePlan {
    let (dag, removed) = acyclic_copy(graph);
    let mut order: Vec<NodeId> = topological_order(&dag)
        .into_iter()
        .map(|idx| dag[idx].clone())
        .collect();
    order.reverse();

    if !removed.is_empty() {
        debug!(removed = removed.len(), "edges removed to break cycles");
    }
    MergePlan { order, removed }
}

/// Copy `graph` and delete one edge per detected cycle until none is left.
pub(crate) fn acyclic_copy(graph: &DependencyGraph) -> (WorkGraph, Vec<EdgeInfo>) {
    let mut dag: WorkGraph =
        StableDiGraph::from(graph.graph.map(|_, node| node.id.clone(), |_, edge| edge.kind));
    let mut removed = Vec::new();

    while let Some(cycle) = find_cycle(&dag) {
        let first = cycle[0];
        if let Some((from, to)) = dag.edge_endpoints(first) {
            let info = EdgeInfo {
                from: dag[from].clone(),
                to: dag[to].clone(),
                kind: dag[first],
            };
            debug!(edge = %info, cycle_len = cycle.len(), "breaking cycle");
            removed.push(info);
        }
        dag.remove_edge(first);
    }

    (dag, removed)
}

/// Outgoing edges of `node` in insertion order.
fn outgoing(dag: &WorkGraph, node: NodeIndex) -> Vec<EdgeIndex> {
    let mut edges: Vec<EdgeIndex> = dag.edges(node).map(|e| e.id()).collect();
    edges.sort();
    edges
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    OnStack,
    Done,
}

/// First cycle reached by DFS, as a list of edges. Self-loops are one-edge
/// cycles.
fn find_cycle(dag: &WorkGraph) -> Option<Vec<EdgeIndex>> {
    let mut state: HashMap<NodeIndex, Visit> = HashMap::new();

    for start in dag.node_indices() {
        if state.contains_key(&start) {
            continue;
        }
        state.insert(start, Visit::OnStack);
        // (node, outgoing edges, next edge position)
        let mut stack: Vec<(NodeIndex, Vec<EdgeIndex>, usize)> =
            vec![(start, outgoing(dag, start), 0)];
        // path[i] leads from stack[i] to stack[i + 1]
        let mut path: Vec<EdgeIndex> = Vec::new();

        while let Some(frame) = stack.last_mut() {
            let next = frame.1.get(frame.2).copied();
            frame.2 += 1;

            let Some(edge) = next else {
                if let Some((node, _, _)) = stack.pop() {
                    state.insert(node, Visit::Done);
                }
                path.pop();
                continue;
            };

            let Some((_, target)) = dag.edge_endpoints(edge) else {
                continue;
            };
            match state.get(&target) {
                Some(Visit::OnStack) => {
                    if let Some(pos) = stack.iter().position(|(n, _, _)| *n == target) {
                        let mut cycle = path[pos..].to_vec();
                        cycle.push(edge);
                        return Some(cycle);
                    }
                }
                Some(Visit::Done) => {}
                None => {
                    state.insert(target, Visit::OnStack);
                    path.push(edge);
                    stack.push((target, outgoing(dag, target), 0));
                }
            }
        }
    }

    None
}

/// Kahn's algorithm, always taking the lowest-index ready node.
fn topological_order(dag: &WorkGraph) -> Vec<NodeIndex> {
    let mut in_degree: HashMap<NodeIndex, usize> =
        dag.node_indices().map(|idx| (idx, 0)).collect();
    for edge in dag.edge_references() {
        if let Some(degree) = in_degree.get_mut(&edge.target()) {
            *degree += 1;
        }
    }

    let mut ready: BinaryHeap<Reverse<NodeIndex>> = in_degree
        .iter()
        .filter(|&(_, &degree)| degree == 0)
        .map(|(&idx, _)| Reverse(idx))
        .collect();
    let mut sorted = Vec::with_capacity(dag.node_count());

    while let Some(Reverse(idx)) = ready.pop() {
        sorted.push(idx);
        for edge in outgoing(dag, idx) {
            let Some((_, target)) = dag.edge_endpoints(edge) else {
                continue;
            };
            if let Some(degree) = in_degree.get_mut(&target) {
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(target));
                }
            }
        }
    }

    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use petgraph::algo::is_cyclic_directed;

    fn graph_of(nodes: &[&str], edges: &[(usize, usize)]) -> DependencyGraph {
        let mut graph = DependencyGraph::new();
        let idx: Vec<_> = nodes
            .iter()
            .map(|n| graph.add_file(*n, format!("/p/{n}")))
            .collect();
        for &(from, to) in edges {
            graph.add_edge(idx[from], idx[to], RelationKind::Uses);
        }
        graph
    }

    fn position(order: &[NodeId], id: &str) -> usize {
        order.iter().position(|n| n == id).unwrap()
    }

    #[test]
    fn test_header_before_its_source() {
        let graph = graph_of(
            &[
                "service/workspace/src/workspaceservice.cpp",
                "service/workspace/include/workspaceservice/workspaceservice.h",
            ],
            &[(0, 1)],
        );
        assert_eq!(
            order(&graph),
            vec![
                "service/workspace/include/workspaceservice/workspaceservice.h",
                "service/workspace/src/workspaceservice.cpp",
            ]
        );
    }

    #[test]
    fn test_same_order_regardless_of_insertion() {
        let graph = graph_of(&["workspaceservice.h", "workspaceservice.cpp"], &[(1, 0)]);
        assert_eq!(order(&graph), vec!["workspaceservice.h", "workspaceservice.cpp"]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(order(&DependencyGraph::new()).is_empty());
        assert_eq!(order(&graph_of(&["only.h"], &[])), vec!["only.h"]);
    }

    #[test]
    fn test_self_loop_removed() {
        let plan = plan(&graph_of(&["a.h"], &[(0, 0)]));
        assert_eq!(plan.order, vec!["a.h"]);
        assert_eq!(plan.removed.len(), 1);
        assert_eq!(plan.removed[0].from, "a.h");
    }

    #[test]
    fn test_two_cycle_drops_first_edge() {
        let plan = plan(&graph_of(&["a.h", "b.h"], &[(0, 1), (1, 0)]));
        assert_eq!(plan.removed.len(), 1);
        assert_eq!((plan.removed[0].from.as_str(), plan.removed[0].to.as_str()), ("a.h", "b.h"));
        // b -> a survives, so a comes first
        assert_eq!(plan.order, vec!["a.h", "b.h"]);
    }

    #[test]
    fn test_acyclic_and_respects_retained_edges() {
        let graph = graph_of(
            &["a.cpp", "a.h", "b.h", "c.h", "d.h", "e.cpp"],
            &[(0, 1), (1, 2), (2, 3), (3, 1), (3, 4), (4, 2), (5, 4), (5, 5), (0, 3)],
        );
        let (dag, removed) = acyclic_copy(&graph);
        assert!(!is_cyclic_directed(&dag));
        assert_eq!(dag.edge_count() + removed.len(), graph.edge_count());

        let plan = plan(&graph);
        let mut sorted = plan.order.clone();
        sorted.sort();
        let mut expected = graph.node_ids();
        expected.sort();
        assert_eq!(sorted, expected, "order must be a permutation of the nodes");

        for edge in dag.edge_references() {
            let from = &dag[edge.source()];
            let to = &dag[edge.target()];
            assert!(position(&plan.order, to) < position(&plan.order, from));
        }
    }

    #[test]
    fn test_disconnected_nodes_kept() {
        let graph = graph_of(&["a.h", "b.h", "c.h"], &[(0, 1), (1, 0)]);
        let order = order(&graph);
        assert_eq!(order.len(), 3);
        assert!(order.contains(&"c.h".to_string()));
    }

    #[test]
    fn test_deterministic() {
        let graph = graph_of(
            &["a", "b", "c", "d"],
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 1)],
        );
        assert_eq!(plan(&graph), plan(&graph));
    }
}
