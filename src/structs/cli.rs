use std::path::PathBuf;
use clap::Parser;
use crate::enums::commands::Commands;

#[derive(Parser)]
#[clap(name = "securescan")]
#[clap(about = "AI security copilot: relays security issues to a language model for analysis", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[clap(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Commands,
}
