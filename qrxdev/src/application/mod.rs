pub mod frames;
pub mod handlers;
pub mod save;

use crate::presentation::cli::{Cli, Commands};
use clap::Parser;
use qrx_core::error::Result;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.command {
        Commands::Split {
            input,
            out_dir,
            capacity,
            level,
        } => handlers::handle_split(input, out_dir, capacity, level),
        Commands::Join {
            frames_dir,
            out_dir,
            strict_total,
        } => handlers::handle_join(frames_dir, out_dir, strict_total),
        Commands::Scan {
            images_dir,
            out_dir,
            detection,
            interval_ms,
            strict_total,
            stats_json,
        } => handlers::handle_scan(
            images_dir,
            out_dir,
            detection,
            interval_ms,
            strict_total,
            stats_json,
        ),
        Commands::Inspect { frame } => handlers::handle_inspect(frame),
    }
}
