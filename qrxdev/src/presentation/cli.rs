use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "qrxdev: optical file transfer tooling", long_about = None)]
pub struct Cli {
    /// Debug-level logging (RUST_LOG takes precedence)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Marker-border detection overrides
#[derive(Args, Clone, Debug)]
pub struct DetectionArgs {
    /// Depth in pixels of each sampled border strip
    #[arg(long, default_value_t = 20)]
    pub border_threshold: usize,
    /// Minimum green channel value of a marker pixel
    #[arg(long, default_value_t = 100)]
    pub green_threshold: u8,
    /// Fraction of marker pixels every strip must exceed
    #[arg(long, default_value_t = 0.30)]
    pub min_border_ratio: f64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Package a file into raw wire frames (one .bin per chunk)
    Split {
        input: PathBuf,
        out_dir: PathBuf,
        /// Max frame size in bytes, header and checksum included
        #[arg(long, default_value_t = 1260)]
        capacity: usize,
        /// Deflate level 0-9
        #[arg(long, default_value_t = 9)]
        level: u32,
    },

    /// Reassemble a file from raw frame files, in any order
    Join {
        frames_dir: PathBuf,
        out_dir: PathBuf,
        /// Reject chunks whose declared total disagrees with the first one
        #[arg(long)]
        strict_total: bool,
    },

    /// Replay captured images through the scanner and reassemble the file
    Scan {
        images_dir: PathBuf,
        out_dir: PathBuf,
        #[command(flatten)]
        detection: DetectionArgs,
        /// Minimum milliseconds between two scans
        #[arg(long, default_value_t = 100)]
        interval_ms: u64,
        #[arg(long)]
        strict_total: bool,
        /// Print session statistics as JSON when done
        #[arg(long)]
        stats_json: bool,
    },

    /// Print the header of one raw frame and check its checksum
    Inspect { frame: PathBuf },
}
