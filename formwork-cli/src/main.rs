use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "formwork", version, about = "Formwork UI document inspector")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interpret a .ui document and print the materialized object graph.
    Inspect {
        /// Path to the .ui document
        input: PathBuf,
    },
    /// Interpret a .ui document, reporting only success or failure.
    Check {
        /// Path to the .ui document
        input: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect { input } => {
            let report = formwork_cli::inspect(&input)?;
            print!("{report}");
        }
        Commands::Check { input } => {
            formwork_cli::check(&input)?;
            println!("OK: {}", input.display());
        }
    }
    Ok(())
}
