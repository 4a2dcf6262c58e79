use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lumber", about = "Headless tree capitator simulator")]
pub struct Cli {
    /// Capitator config (TOML); built-in defaults when omitted
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Also write a debug-level log to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub scenario: Scenario,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Scenario {
    /// Work a tree to the last phase and fell it while sneaking
    Fell {
        #[arg(long, default_value = "oak")]
        species: String,
        #[arg(long, default_value_t = 6)]
        trunk: i32,
        #[arg(long, default_value_t = 2)]
        canopy: i32,
        /// Plant a huge fungus (stem trunk) instead of a tree
        #[arg(long)]
        fungus: bool,
    },
    /// Advance a tree to a phase, then walk away and watch it regress
    Abandon {
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(0..=4))]
        phase: u8,
        #[arg(long, default_value = "oak")]
        species: String,
    },
    /// Alternate between two trees
    Switch,
}
