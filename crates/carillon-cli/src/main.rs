//! Carillon CLI - chime detection from live or recorded audio.

mod commands;
mod profile;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "carillon")]
#[command(author, version, about = "Multi-tone chime detector", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Listen on an input device and report detected chimes
    Listen(commands::listen::ListenArgs),

    /// Scan a WAV file for chimes
    Scan(commands::scan::ScanArgs),

    /// List available audio input devices
    Devices(commands::devices::DevicesArgs),
}

fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Listen(args) => commands::listen::run(args),
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Devices(args) => commands::devices::run(args),
    }
}
