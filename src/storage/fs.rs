//! File system operations for result storage.
//!
//! ```text
//! <results_dir>/
//! ├── <project>_<timestamp>.json     # saved modularizations
//! └── <project>/
//!     └── <timestamp>/
//!         └── <module>.<ext>         # generated module units
//! ```

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::graph::Modularization;

/// Timestamp format shared by saved modularizations and generation runs.
const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Current local time as `YYYYmmdd_HHMMSS`.
pub fn timestamp() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Persist `modules` as `<results_dir>/<project>_<timestamp>.json`.
pub fn save_modularization(
    results_dir: &Path,
    project: &str,
    modules: &Modularization,
) -> Result<PathBuf> {
    fs::create_dir_all(results_dir)?;
    let path = results_dir.join(format!("{}_{}.json", project, timestamp()));
    write_atomic(&path, &modules.to_json()?)?;

    info!(path = %path.display(), modules = modules.len(), "modularization saved");
    Ok(path)
}

/// Read a persisted modularization. Validation against a graph happens in
/// [`Modularization::load`].
pub fn read_modularization(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Write one generated module to
/// `<results_dir>/<project>/<timestamp>/<name>.<ext>`.
pub fn write_module(
    results_dir: &Path,
    project: &str,
    timestamp: &str,
    name: &str,
    ext: &str,
    text: &str,
) -> Result<PathBuf> {
    let dir = results_dir.join(project).join(timestamp);
    fs::create_dir_all(&dir)?;

    let path = dir.join(format!("{}.{}", name, ext.trim_start_matches('.')));
    write_atomic(&path, text)?;

    info!(path = %path.display(), bytes = text.len(), "module written");
    Ok(path)
}

/// Write to a temp sibling, then rename over the target.
fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let mut temp = path.as_os_str().to_owned();
    temp.push(".tmp");
    let temp = PathBuf::from(temp);

    let mut file = File::create(&temp)?;
    file.write_all(content.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp, path)?;
    Ok(())
}
