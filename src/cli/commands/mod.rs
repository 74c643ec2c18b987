//! CLI command implementations
//!
//! Each subcommand has its own module with:
//! - Args struct for command-line arguments
//! - run() function to execute the command

use clap::Subcommand;

pub mod posts;
pub mod revisions;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Remove a sample of old posts and their metadata
    Posts(posts::PostsArgs),

    /// Remove every revision and auto-draft and their metadata
    Revisions(revisions::RevisionsArgs),
}

/// Dispatch a command to its handler
pub fn run(ctx: &AppContext, command: &Commands) -> Result<()> {
    match command {
        Commands::Posts(args) => posts::run(ctx, args),
        Commands::Revisions(args) => revisions::run(ctx, args),
    }
}
