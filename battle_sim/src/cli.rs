//! Command-line interface
//!
//! Interactive viewer by default; `--headless` runs seeded battles and prints the results.

use clap::Parser;
use std::path::PathBuf;

/// Real-time auto-battler simulator
#[derive(Parser, Debug)]
#[command(name = "battle_sim")]
#[command(about = "Real-time auto-battler simulator")]
#[command(version)]
pub struct Args {
    /// Run battles without the terminal UI
    #[arg(long)]
    pub headless: bool,

    /// Number of battles to run (headless mode only)
    #[arg(long, default_value = "1")]
    pub battles: u32,

    /// RNG seed; consecutive battles use consecutive seeds
    #[arg(long)]
    pub seed: Option<u64>,

    /// Player hero id (random when omitted)
    #[arg(long, value_name = "HERO_ID")]
    pub hero: Option<String>,

    /// Gold available in the in-battle shop
    #[arg(long, default_value = "15")]
    pub money: u32,

    /// Hero catalog TOML (built-in catalog when omitted)
    #[arg(long, value_name = "FILE")]
    pub heroes: Option<PathBuf>,

    /// Shop catalog TOML (built-in shop when omitted)
    #[arg(long, value_name = "FILE")]
    pub shop: Option<PathBuf>,

    /// Combat constants TOML (defaults when omitted)
    #[arg(long, value_name = "FILE")]
    pub constants: Option<PathBuf>,

    /// Print each battle log (headless mode only)
    #[arg(long)]
    pub verbose: bool,

    /// Print the summary as JSON (headless mode only)
    #[arg(long)]
    pub json: bool,

    /// Directory for the interactive mode's log file
    #[arg(long, value_name = "DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

pub fn parse_args() -> Args {
    Args::parse()
}
