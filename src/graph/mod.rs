//! File dependency graph: the structural backbone of the modularizer.
//!
//! Provides the graph data model, construction from dependency rows,
//! partitioning into modules and cycle-breaking merge order.

pub mod builder;
pub mod engine;
pub mod partition;
pub mod sequence;
pub mod types;

pub use builder::{build_graph, find_build_dir, find_project_root, node_id};
pub use engine::DependencyGraph;
pub use partition::{ComponentPartitioner, Modularization, Module, Partitioner};
pub use sequence::MergePlan;
pub use types::{
    is_header, DependencyRow, EdgeData, EdgeInfo, FileNode, GraphStats, NodeId, RelationKind,
};
