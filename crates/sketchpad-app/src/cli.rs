//! Command-line interface.

use clap::Parser;
use std::path::PathBuf;

/// Replay an intent script through a Sketchpad editor session and print the
/// resulting drawing.
#[derive(Debug, Parser)]
#[command(name = "sketchpad", version, about)]
pub struct Cli {
    /// Editor configuration file (JSON).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print the keyboard shortcut table.
    #[arg(long)]
    pub shortcuts: bool,

    /// Intent script to replay (JSON).
    #[arg(value_name = "SCRIPT", required_unless_present = "shortcuts")]
    pub script: Option<PathBuf>,
}
