//! Command-line surface

use std::path::PathBuf;

use clap::{ArgAction, Parser};

pub mod commands;
pub mod output;

pub use commands::Commands;
pub use output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "prune",
    version,
    about = "Slim content databases by removing old posts, revisions and auto-drafts",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Emit machine-readable JSON
    #[arg(long, global = true)]
    pub robot: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Config file (replaces the global config)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Content database to prune
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    /// Prefix of the content tables
    #[arg(long, global = true, value_name = "PREFIX")]
    pub table_prefix: Option<String>,
}

impl Cli {
    #[must_use]
    pub const fn output_format(&self) -> OutputFormat {
        if self.robot {
            OutputFormat::Robot
        } else {
            OutputFormat::Human
        }
    }
}
