//! Read operations: stats, graph, modules, find, order
//!
//! Nothing here touches the results directory.

use anyhow::Result;

use crate::source::DataSource;
use crate::Modularizer;

/// Print graph statistics
pub fn stats<S: DataSource>(m: &Modularizer<S>) -> Result<()> {
    let s = m.graph().stats();
    println!("project:{} root:{}", m.project(), m.project_root());
    println!(
        "files:{} headers:{} edges:{} self_loops:{} modules:{}",
        s.file_count,
        s.header_count,
        s.edge_count,
        s.self_loops,
        m.modularization().len()
    );
    Ok(())
}

/// Print every edge as `from --kind--> to`
pub fn graph<S: DataSource>(m: &Modularizer<S>) -> Result<()> {
    let edges = m.graph().edges();
    if edges.is_empty() {
        println!("Dependency graph is empty");
        return Ok(());
    }
    for edge in &edges {
        println!("{}", edge);
    }
    Ok(())
}

/// Print the modularization in its persisted JSON form
pub fn modules<S: DataSource>(m: &Modularizer<S>) -> Result<()> {
    println!("{}", m.modularization().to_json()?);
    Ok(())
}

/// Find the module holding a file
pub fn find<S: DataSource>(m: &Modularizer<S>, file: &str) -> Result<()> {
    match m.modularization().find_by_file(file) {
        Some(id) => {
            let module = m.modularization().get(id)?;
            println!("module {} ({} files)", id, module.len());
            for path in module.paths.iter().filter(|p| p.contains(file)) {
                println!("  {}", path);
            }
        }
        None => println!("No module contains '{}'", file),
    }
    Ok(())
}

/// Print a module's merge order
pub fn order<S: DataSource>(m: &Modularizer<S>, module_id: usize) -> Result<()> {
    let plan = m.merge_plan(module_id)?;
    if plan.order.is_empty() {
        println!("No file in module {}", module_id);
        return Ok(());
    }

    for (i, id) in plan.order.iter().enumerate() {
        println!("{:>3} {}", i, id);
    }
    // Cycle-breaking cuts
    if !plan.removed.is_empty() {
        println!("removed:");
        for edge in &plan.removed {
            println!("  {}", edge);
        }
    }
    Ok(())
}
