//! Command-line front end for inspecting and exporting SMPS problems.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use ::log::info;
use clap::{Parser, Subcommand};
use problemo::Problem;
use problemo::common::IntoCommonProblem;

use smps::export::ScenarioLattice;
use smps::{Smps, TwoStageStochasticProgram};

/// Read two-stage stochastic programs in SMPS format.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Log level (error, warn, info, debug, trace); SMPS_LOG_LEVEL takes precedence
    #[arg(long, global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dimensions and scenario count of a problem.
    Info {
        /// Path stem of the `.cor`, `.tim` and `.sto` files.
        stem: PathBuf,
    },
    /// Write the scenario lattice of a problem as JSON.
    Export {
        /// Path stem of the `.cor`, `.tim` and `.sto` files.
        stem: PathBuf,
        /// Output file, stdout if omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn load(stem: &Path) -> Result<TwoStageStochasticProgram, Problem> {
    let smps = Smps::from_stem(stem)
        .map_err(|e| format!("Unable to read {}: {}", stem.display(), e).gloss())?;
    smps.assemble()
        .map_err(|e| format!("Unable to assemble {}: {}", stem.display(), e).gloss())
}

fn handle_info_command(stem: &Path) -> Result<(), Problem> {
    let program = load(stem)?;
    let (m1, n1, m2, n2) = program.get_dims();
    let (n_slack1, n_slack2) = program.get_n_slacks();

    println!(
        "First stage:  {m1} rows, {n1} columns ({n_slack1} slacks), {} nonzeros",
        program.get_A().compute_nnz()
    );
    println!(
        "Second stage: {m2} rows, {n2} columns ({n_slack2} slacks), {} nonzeros in W, {} in T",
        program.get_W().compute_nnz(),
        program.get_T().compute_nnz()
    );
    println!(
        "Scenarios:    {} with total probability {}",
        program.get_n_scenarios(),
        program.get_total_probability()
    );
    Ok(())
}

fn handle_export_command(stem: &Path, output: Option<&Path>) -> Result<(), Problem> {
    let lattice = ScenarioLattice::from(&load(stem)?);

    match output {
        Some(path) => {
            let file = File::create(path)
                .map_err(|e| format!("Unable to create {}: {}", path.display(), e).gloss())?;
            let mut writer = BufWriter::new(file);
            lattice
                .write_json(&mut writer)
                .map_err(|e| format!("Unable to write JSON: {}", e).gloss())?;
            writer
                .flush()
                .map_err(|e| format!("Unable to write {}: {}", path.display(), e).gloss())?;
            info!("Wrote scenario lattice to {}", path.display());
        }
        None => {
            let json = lattice
                .to_json()
                .map_err(|e| format!("Unable to write JSON: {}", e).gloss())?;
            println!("{json}");
        }
    }
    Ok(())
}

fn main() -> Result<(), Problem> {
    let cli = Cli::parse();
    smps::log::init(cli.log_level.as_deref())?;

    match cli.command {
        Commands::Info { stem } => handle_info_command(&stem),
        Commands::Export { stem, output } => handle_export_command(&stem, output.as_deref()),
    }
}
