//! CLI module for the modularizer.
//!
//! Commands:
//! - Read: stats, graph, modules, find, order
//! - Write: save, load, generate, generate-all

pub mod read;
pub mod write;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::ModularizerConfig;
use crate::GraphOptions;

#[derive(Parser)]
#[command(name = "modularizer")]
#[command(about = "Merge C/C++ file clusters into C++20 module units", long_about = None)]
pub struct Cli {
    /// Config file (default: ./modularizer.toml)
    #[arg(short, long, global = true, default_value = "modularizer.toml")]
    pub config: PathBuf,

    /// Data-source snapshot (overrides [source].snapshot)
    #[arg(short, long, global = true)]
    pub snapshot: Option<PathBuf>,

    /// Project root (overrides discovery and [project].root)
    #[arg(short, long, global = true)]
    pub root: Option<String>,

    /// Directory to leave out of the graph (repeatable)
    #[arg(short, long, global = true)]
    pub exclude: Vec<String>,

    /// Saved modularization to use instead of the default partition
    #[arg(short, long, global = true)]
    pub modules: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    // ─── Read ─────────────────────────────────────────────────────
    /// Show graph statistics
    Stats,

    /// Print every dependency edge
    Graph,

    /// Print the current modularization as JSON
    Modules,

    /// Find the module holding a file
    Find {
        /// Path or path fragment
        file: String,
    },

    /// Print a module's merge order and the edges cut to break cycles
    Order {
        /// Module id
        module_id: usize,
    },

    // ─── Write ────────────────────────────────────────────────────
    /// Save the current modularization to the results directory
    Save,

    /// Validate a saved modularization against the graph and print it
    Load {
        /// Path to the saved JSON file
        file: PathBuf,
    },

    /// Generate one module file
    Generate {
        /// Module id
        module_id: usize,

        /// Module name (`export module <name>;`)
        name: String,
    },

    /// Generate a file for every non-empty module
    GenerateAll {
        /// Module name prefix; names are `<prefix><id>`
        #[arg(short, long, default_value = "module_")]
        prefix: String,
    },
}

/// Effective settings after layering CLI flags over the config file.
#[derive(Debug, Clone)]
pub struct Settings {
    pub snapshot: PathBuf,
    pub results_dir: PathBuf,
    pub extension: String,
    pub options: GraphOptions,
}

impl Cli {
    pub fn settings(&self, config: &ModularizerConfig) -> Settings {
        let config_path: &Path = &self.config;

        let mut exclude = config.project.exclude.clone();
        exclude.extend(self.exclude.iter().cloned());

        let project_name = Some(config.project.name.clone()).filter(|name| !name.is_empty());

        Settings {
            snapshot: self
                .snapshot
                .clone()
                .unwrap_or_else(|| config.resolve_snapshot(config_path)),
            results_dir: config.resolve_results_dir(config_path),
            extension: config.output.extension.clone(),
            options: GraphOptions {
                project_name,
                project_root: self.root.clone().or_else(|| config.project.root.clone()),
                exclude,
            },
        }
    }
}
