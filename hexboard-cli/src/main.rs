//! HEXBOARD CLI - Command-line interface
//!
//! Commands:
//! - layout: Dump every cell as JSON
//! - cell: Dump one cell as JSON
//! - labels: Dump rank and file labels as JSON
//! - perimeter: Print the board outline path
//! - hit: Name the cell under a render-space point

mod inspect;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use hexboard_core::BoardConfig;
use inspect::{CellArgs, HitArgs, LayoutArgs};

#[derive(Parser)]
#[command(name = "hexboard")]
#[command(about = "Hexagonal chess board geometry inspector")]
struct Cli {
    /// Board config JSON file
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Show the board from black's side
    #[arg(long, global = true)]
    flipped: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump every cell as JSON
    Layout(LayoutArgs),
    /// Dump one cell as JSON
    Cell(CellArgs),
    /// Dump labels as JSON
    Labels,
    /// Print the perimeter path descriptor
    Perimeter,
    /// Name the cell under a render-space point
    Hit(HitArgs),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BoardConfig::load(path)?,
        None => BoardConfig::default(),
    };
    let flipped = cli.flipped || config.flipped;
    tracing::debug!("Board config: {:?}", config);

    match cli.command {
        Commands::Layout(args) => inspect::run_layout(args, flipped),
        Commands::Cell(args) => inspect::run_cell(args, flipped),
        Commands::Labels => inspect::run_labels(flipped),
        Commands::Perimeter => inspect::run_perimeter(flipped),
        Commands::Hit(args) => inspect::run_hit(args, flipped),
    }
}
