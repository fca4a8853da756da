//! Modularizer CLI - merge C/C++ file clusters into C++20 modules.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use modularizer::cli::{read, write, Cli, Commands};
use modularizer::{Modularizer, ModularizerConfig, SnapshotSource};

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("modularizer={}", level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = ModularizerConfig::load(&cli.config);
    let settings = cli.settings(&config);

    let source = SnapshotSource::open(&settings.snapshot)?;
    let mut m = Modularizer::open(source, settings.options)?;
    if let Some(path) = &cli.modules {
        m.load_modularization(path)?;
    }

    let results_dir = settings.results_dir.as_path();
    let extension = settings.extension.as_str();

    match cli.command {
        // ─── Read ─────────────────────────────────────────────────
        Commands::Stats => read::stats(&m)?,
        Commands::Graph => read::graph(&m)?,
        Commands::Modules => read::modules(&m)?,
        Commands::Find { file } => read::find(&m, &file)?,
        Commands::Order { module_id } => read::order(&m, module_id)?,

        // ─── Write ────────────────────────────────────────────────
        Commands::Save => write::save(&m, results_dir)?,
        Commands::Load { file } => write::load(&m, &file)?,
        Commands::Generate { module_id, name } => {
            write::generate(&m, module_id, &name, results_dir, extension)?
        }
        Commands::GenerateAll { prefix } => {
            write::generate_all(&m, &prefix, results_dir, extension)?
        }
    }

    Ok(())
}
