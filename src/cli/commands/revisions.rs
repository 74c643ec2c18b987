//! prune revisions - Remove revisions and auto-drafts

use clap::Args;
use serde::Serialize;

use crate::app::AppContext;
use crate::error::Result;

#[derive(Args, Debug)]
pub struct RevisionsArgs {
    /// Count revisions and auto-drafts without deleting anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Serialize)]
struct RevisionsOutput<T> {
    dry_run: bool,
    #[serde(flatten)]
    outcome: T,
}

pub fn run(ctx: &AppContext, args: &RevisionsArgs) -> Result<()> {
    let mut pruner = ctx.open_pruner()?;

    if args.dry_run {
        let preview = pruner.preview_revisions()?;
        return ctx.reporter.success(
            &format!(
                "Dry run: {} revisions and auto-drafts would be deleted.",
                preview.eligible
            ),
            RevisionsOutput {
                dry_run: true,
                outcome: preview,
            },
        );
    }

    let result = pruner.prune_revisions()?;
    ctx.reporter.success(
        &result.summary(),
        RevisionsOutput {
            dry_run: false,
            outcome: result,
        },
    )
}
