//! # Modularizer
//!
//! Merges clusters of C/C++ headers and sources into single C++20 module
//! units.
//!
//! The pipeline reads typed file dependencies from an analysis database,
//! groups files into modules, orders each module so dependencies come
//! first, and rewrites the files into one `module; ... export module X;`
//! unit.
//!
//! ## Key Features
//!
//! - **Graph-driven**: file dependencies become a directed graph, cycles are
//!   broken deterministically before ordering
//! - **Preprocessor-aware**: include guards, duplicate and module-internal
//!   includes are commented out instead of deleted
//! - **Deterministic**: same rows and contents always yield the same module text
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use modularizer::{GraphOptions, Modularizer, SnapshotSource};
//! use std::path::Path;
//!
//! let source = SnapshotSource::open(Path::new("snapshot.json")).unwrap();
//! let modularizer = Modularizer::open(source, GraphOptions::default()).unwrap();
//!
//! // Merge the first module into `export module core;`
//! let module = modularizer.generate_module(0, "core").unwrap();
//! println!("{}", module.text());
//! ```

pub mod assemble;
pub mod cli;
pub mod config;
pub mod error;
pub mod graph;
pub mod normalize;
pub mod source;
pub mod storage;

// Re-exports for convenience
pub use assemble::{assemble, SynthesizedModule};
pub use config::ModularizerConfig;
pub use error::{ModularizerError, Result};
pub use graph::{
    ComponentPartitioner, DependencyGraph, DependencyRow, MergePlan, Modularization, RelationKind,
};
pub use source::{DataSource, SnapshotSource, SourceFile};

use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// How the dependency graph is cut out of the data source's rows.
#[derive(Debug, Clone, Default)]
pub struct GraphOptions {
    /// Name searched in paths to discover the project root. Falls back to
    /// the data source's project name.
    pub project_name: Option<String>,
    /// Explicit project root; skips discovery.
    pub project_root: Option<String>,
    /// Directories whose files are left out of the graph.
    pub exclude: Vec<String>,
}

/// Outcome of [`Modularizer::generate_all`].
#[derive(Debug, Default)]
pub struct GenerationReport {
    /// Run directory name under `<results_dir>/<project>/`.
    pub timestamp: String,
    pub written: Vec<PathBuf>,
    /// Module ids without files.
    pub skipped: Vec<usize>,
    pub failed: Vec<(usize, ModularizerError)>,
}

/// The main modularizer instance.
///
/// Owns the data source, the current dependency graph and the current
/// modularization.
pub struct Modularizer<S: DataSource> {
    source: S,
    options: GraphOptions,
    project_root: String,
    graph: DependencyGraph,
    modules: Modularization,
}

impl<S: DataSource> Modularizer<S> {
    /// Fetch rows, build the graph and compute the default modularization.
    pub fn open(source: S, options: GraphOptions) -> Result<Self> {
        let (project_root, graph, modules) = Self::build(&source, &options)?;
        Ok(Self {
            source,
            options,
            project_root,
            graph,
            modules,
        })
    }

    fn build(
        source: &S,
        options: &GraphOptions,
    ) -> Result<(String, DependencyGraph, Modularization)> {
        let rows = source.fetch_dependency_rows()?;

        let project_root = match &options.project_root {
            Some(root) => root.trim_end_matches('/').to_string(),
            None => {
                let name = options.project_name.as_deref().unwrap_or(source.project());
                graph::find_project_root(name, &rows).ok_or_else(|| {
                    ModularizerError::Config(format!(
                        "cannot find project root for {name:?}, set it explicitly"
                    ))
                })?
            }
        };

        let mut exclude = options.exclude.clone();
        if let Some(build_dir) = graph::find_build_dir(&rows, &project_root) {
            info!(dir = %build_dir, "excluding build directory");
            exclude.push(build_dir);
        }

        let graph = graph::build_graph(&rows, &project_root, &exclude)?;
        let modules = Modularization::compute(&graph, &ComponentPartitioner)?;
        Ok((project_root, graph, modules))
    }

    /// Rebuild the graph and the default modularization from scratch.
    pub fn reset(&mut self) -> Result<()> {
        let (project_root, graph, modules) = Self::build(&self.source, &self.options)?;
        self.project_root = project_root;
        self.graph = graph;
        self.modules = modules;
        Ok(())
    }

    pub fn project(&self) -> &str {
        self.source.project()
    }

    pub fn project_root(&self) -> &str {
        &self.project_root
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    pub fn modularization(&self) -> &Modularization {
        &self.modules
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Replace the current modularization with a saved one.
    pub fn load_modularization(&mut self, path: &Path) -> Result<()> {
        let json = storage::read_modularization(path)?;
        self.modules = Modularization::load(&json, &self.graph)?;
        info!(path = %path.display(), modules = self.modules.len(), "modularization loaded");
        Ok(())
    }

    pub fn save_modularization(&self, results_dir: &Path) -> Result<PathBuf> {
        storage::save_modularization(results_dir, self.project(), &self.modules)
    }

    /// Merge order of one module, with the edges cut to break cycles.
    pub fn merge_plan(&self, module_id: usize) -> Result<MergePlan> {
        let sub = self.modules.subgraph(&self.graph, module_id)?;
        Ok(graph::sequence::plan(&sub))
    }

    /// File records of one module, in merge order.
    pub fn collect_module_files(&self, module_id: usize) -> Result<Vec<SourceFile>> {
        let plan = self.merge_plan(module_id)?;
        let paths = plan
            .order
            .iter()
            .map(|id| {
                self.graph
                    .path_of(id)
                    .map(str::to_string)
                    .ok_or_else(|| ModularizerError::NodeNotFound(id.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        self.source.fetch_file_contents(&paths)
    }

    pub fn generate_module(&self, module_id: usize, name: &str) -> Result<SynthesizedModule> {
        let files = self.collect_module_files(module_id)?;
        if files.is_empty() {
            return Err(ModularizerError::EmptyModule(name.to_string()));
        }
        assemble(&files, name)
    }

    /// Generate one module and write it under
    /// `<results_dir>/<project>/<timestamp>/<name>.<extension>`.
    pub fn generate_module_file(
        &self,
        module_id: usize,
        name: &str,
        results_dir: &Path,
        timestamp: &str,
        extension: &str,
    ) -> Result<PathBuf> {
        let module = self.generate_module(module_id, name)?;
        storage::write_module(
            results_dir,
            self.project(),
            timestamp,
            name,
            extension,
            module.text(),
        )
    }

    /// Generate every non-empty module as `<prefix><id>`. A failing module
    /// is recorded and the run continues.
    pub fn generate_all(&self, prefix: &str, results_dir: &Path, extension: &str) -> GenerationReport {
        let mut report = GenerationReport {
            timestamp: storage::timestamp(),
            ..Default::default()
        };

        for module in self.modules.modules() {
            if module.is_empty() {
                report.skipped.push(module.id);
                continue;
            }
            let name = format!("{}{}", prefix, module.id);
            match self.generate_module_file(module.id, &name, results_dir, &report.timestamp, extension) {
                Ok(path) => report.written.push(path),
                Err(e) => {
                    warn!(module = module.id, error = %e, "module generation failed");
                    report.failed.push((module.id, e));
                }
            }
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            failed = report.failed.len(),
            "generation finished"
        );
        report
    }
}
