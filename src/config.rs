//
//  config.rs
//  Modularizer
//

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Top-level modularizer configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModularizerConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Project-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name used to discover the root from dependency paths.
    /// Empty means "use the data source's project name".
    #[serde(default)]
    pub name: String,
    /// Explicit project root; skips discovery when set.
    #[serde(default)]
    pub root: Option<String>,
    /// Directories whose files are kept out of the graph.
    #[serde(default)]
    pub exclude: Vec<String>,
}

/// Data-source settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// JSON snapshot exported from the analysis database.
    #[serde(default = "default_snapshot")]
    pub snapshot: String,
}

/// Artifact settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: String,
    /// Extension of generated module files.
    #[serde(default = "default_extension")]
    pub extension: String,
}

fn default_snapshot() -> String {
    "snapshot.json".to_string()
}

fn default_results_dir() -> String {
    "results".to_string()
}

fn default_extension() -> String {
    "cpp".to_string()
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            snapshot: default_snapshot(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            extension: default_extension(),
        }
    }
}

impl ModularizerConfig {
    /// Load config from a TOML file, falling back to defaults.
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Resolve the snapshot path relative to the config file's directory.
    pub fn resolve_snapshot(&self, config_path: &Path) -> PathBuf {
        resolve(config_path, &self.source.snapshot)
    }

    /// Resolve the results directory relative to the config file's directory.
    pub fn resolve_results_dir(&self, config_path: &Path) -> PathBuf {
        resolve(config_path, &self.output.results_dir)
    }
}

fn resolve(config_path: &Path, value: &str) -> PathBuf {
    let parent = config_path.parent().unwrap_or(config_path);
    parent.join(value)
}
