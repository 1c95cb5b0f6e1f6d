//! Command-line interface for Frostbound
//!
//! The binary is a headless balance harness: point it at a JSON match
//! config and it prints the result.

use clap::Parser;
use std::path::PathBuf;

/// Deterministic skill-combat balance harness
#[derive(Parser, Debug)]
#[command(name = "frostbound")]
#[command(about = "Deterministic skill-combat balance harness")]
#[command(version)]
pub struct Args {
    /// JSON match config file
    #[arg(value_name = "CONFIG_FILE")]
    pub config: PathBuf,

    /// Output path for the exported match log
    #[arg(long, value_name = "OUTPUT_PATH")]
    pub output: Option<PathBuf>,

    /// Override the maximum match duration in seconds
    #[arg(long, value_name = "SECONDS")]
    pub max_duration: Option<f32>,

    /// Override the random seed for a reproducible run
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,
}

pub fn parse_args() -> Args {
    Args::parse()
}
