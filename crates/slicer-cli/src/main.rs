//! Slicer CLI - offline driver for the live-loop slicer engine.

mod commands;
mod signal;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "slicer")]
#[command(author, version, about = "Live-loop slicer and polyphonic re-player", long_about = None)]
struct Cli {
    /// Log engine events at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a synthesized take and play it back through the engine
    Render(commands::render::RenderArgs),

    /// Detect the slices of a synthesized signal
    Slices(commands::slices::SlicesArgs),

    /// List, show and save presets
    Presets(commands::presets::PresetsArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Slices(args) => commands::slices::run(args),
        Commands::Presets(args) => commands::presets::run(args),
    }
}
