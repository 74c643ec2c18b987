//! prune posts - Remove a sample of old posts

use clap::Args;
use serde::Serialize;
use tracing::debug;

use crate::app::AppContext;
use crate::error::Result;
use crate::pruning::{DeletionResult, FilterArgs, FilterSpec, Preview};

#[derive(Args, Debug)]
pub struct PostsArgs {
    /// Cutoff date to prune posts before. Defaults to "6 months ago"
    #[arg(long, value_name = "DATE", allow_hyphen_values = true)]
    pub before: Option<String>,

    /// Fraction of eligible posts to remove, 0 to 1. Defaults to 0.8
    #[arg(
        long = "sample_rate",
        visible_alias = "sample-rate",
        value_name = "RATE",
        allow_hyphen_values = true
    )]
    pub sample_rate: Option<String>,

    /// Comma-separated post types to prune. Defaults to all
    #[arg(long = "post_type", visible_alias = "post-type", value_name = "TYPES")]
    pub post_type: Option<String>,

    /// Count eligible posts without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

impl PostsArgs {
    #[must_use]
    pub fn filter_args(&self) -> FilterArgs {
        FilterArgs {
            before: self.before.clone(),
            sample_rate: self.sample_rate.clone(),
            post_type: self.post_type.clone(),
        }
    }
}

#[derive(Serialize)]
struct PostsOutput<'a, T> {
    filter: &'a FilterSpec,
    dry_run: bool,
    #[serde(flatten)]
    outcome: T,
}

pub fn run(ctx: &AppContext, args: &PostsArgs) -> Result<()> {
    // Arguments are validated before the database is opened.
    let spec = args.filter_args().normalize(&ctx.config.prune)?;
    debug!(target: "prune", ?spec, dry_run = args.dry_run, "normalized post filter");

    let mut pruner = ctx.open_pruner()?;

    if args.dry_run {
        let preview: Preview = pruner.preview_posts(&spec)?;
        let message = format!(
            "Dry run: {} posts dated before {} are eligible; about {:.0} would be deleted.",
            preview.eligible,
            spec.cutoff_string(),
            preview.expected
        );
        return ctx.reporter.success(
            &message,
            PostsOutput {
                filter: &spec,
                dry_run: true,
                outcome: preview,
            },
        );
    }

    let result: DeletionResult = pruner.prune_posts(&spec)?;
    ctx.reporter.success(
        &result.summary(),
        PostsOutput {
            filter: &spec,
            dry_run: false,
            outcome: result,
        },
    )
}
