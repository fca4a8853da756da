//! Write operations: save, load, generate, generate-all

use anyhow::{bail, Result};
use std::path::Path;

use crate::graph::Modularization;
use crate::source::DataSource;
use crate::storage;
use crate::Modularizer;

/// Save the current modularization
pub fn save<S: DataSource>(m: &Modularizer<S>, results_dir: &Path) -> Result<()> {
    let path = m.save_modularization(results_dir)?;
    println!("Modularization saved: {}", path.display());
    Ok(())
}

/// Validate a saved modularization against the graph, then print it
pub fn load<S: DataSource>(m: &Modularizer<S>, file: &Path) -> Result<()> {
    let json = storage::read_modularization(file)?;
    let modules = Modularization::load(&json, m.graph())?;
    println!("{}", modules.to_json()?);
    let files: usize = modules.modules().iter().map(|module| module.len()).sum();
    println!("modules:{} files:{}", modules.len(), files);
    Ok(())
}

/// Generate one module file
pub fn generate<S: DataSource>(
    m: &Modularizer<S>,
    module_id: usize,
    name: &str,
    results_dir: &Path,
    extension: &str,
) -> Result<()> {
    if m.modularization().get(module_id)?.is_empty() {
        println!("No file in module {}", module_id);
        return Ok(());
    }
    let path = m.generate_module_file(module_id, name, results_dir, &storage::timestamp(), extension)?;
    println!("Module file generated: {}", path.display());
    Ok(())
}

/// Generate every non-empty module
pub fn generate_all<S: DataSource>(
    m: &Modularizer<S>,
    prefix: &str,
    results_dir: &Path,
    extension: &str,
) -> Result<()> {
    let report = m.generate_all(prefix, results_dir, extension);

    for path in &report.written {
        println!("Module file generated: {}", path.display());
    }
    for (id, e) in &report.failed {
        println!("Module {} failed: {}", id, e);
    }
    println!(
        "written:{} skipped:{} failed:{}",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );

    if report.written.is_empty() && !report.failed.is_empty() {
        bail!("no module could be generated");
    }
    Ok(())
}
