//! CLI interface for mt5-grid
//!
//! Provides subcommands for:
//! - `run`: start the polling loop (or one cycle with `--once`)
//! - `config`: show the effective configuration

mod run;

pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mt5-grid")]
#[command(about = "Hedging + martingale grid bot for MetaTrader 5 brokers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the polling loop
    Run(RunArgs),
    /// Show the effective configuration
    Config,
}
