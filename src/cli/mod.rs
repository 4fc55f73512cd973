// ABOUTME: CLI argument parsing and command routing for devmux
//
// Provides command-line interface for:
// - Detecting and running project services (run)
// - Listing what was detected (list)

pub mod list;
pub mod run;

use clap::{Parser, Subcommand, ValueEnum};

/// Directory-aware service runner with a tabbed terminal multiplexer
#[derive(Parser)]
#[command(name = "devmux")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

/// Output format for commands
#[derive(Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Detect services in the current directory and run the selected ones
    Run,

    /// List the services detected in the current directory
    List,
}
