//! Pruning core
//!
//! Normalizes operator input into a [`FilterSpec`], turns it into a structured
//! [`Predicate`], and hands the rendered predicate to an injected
//! [`DeleteExecutor`]. The executor owns the join discipline: metadata rows
//! go with their parent post and never on their own.

pub mod filter;
pub mod predicate;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{PruneError, Result};
use crate::storage::TargetTables;

pub use filter::{FilterArgs, FilterSpec};
pub use predicate::{Condition, Param, Predicate, RenderedPredicate};

/// Outcome of one delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DeletionResult {
    /// Primary content rows removed.
    pub rows_deleted: usize,
    /// Metadata rows removed alongside them.
    pub meta_rows_deleted: usize,
}

impl DeletionResult {
    #[must_use]
    pub const fn total(&self) -> usize {
        self.rows_deleted + self.meta_rows_deleted
    }

    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "Deleted {} rows ({} posts, {} postmeta).",
            self.total(),
            self.rows_deleted,
            self.meta_rows_deleted
        )
    }
}

/// Dry-run estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Preview {
    /// Rows matching every non-random condition.
    pub eligible: usize,
    /// `eligible` scaled by the sample rate.
    pub expected: f64,
}

/// Runs deletes against the content store.
pub trait DeleteExecutor {
    /// Delete every primary row matching `predicate` plus the metadata rows
    /// that reference them, atomically.
    fn delete_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<DeletionResult>;

    /// Count primary rows matching `predicate` without deleting anything.
    fn count_matching(&mut self, tables: &TargetTables, predicate: &RenderedPredicate)
    -> Result<usize>;
}

impl<E: DeleteExecutor + ?Sized> DeleteExecutor for &mut E {
    fn delete_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<DeletionResult> {
        (**self).delete_matching(tables, predicate)
    }

    fn count_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<usize> {
        (**self).count_matching(tables, predicate)
    }
}

/// Refuse to issue a delete with no WHERE clause.
pub fn ensure_bounded(predicate: &RenderedPredicate) -> Result<()> {
    if predicate.is_empty() {
        return Err(PruneError::invalid(
            "refusing to delete with an empty predicate",
        ));
    }
    Ok(())
}

pub struct Pruner<E> {
    executor: E,
    tables: TargetTables,
}

impl<E: DeleteExecutor> Pruner<E> {
    pub const fn new(executor: E, tables: TargetTables) -> Self {
        Self { executor, tables }
    }

    pub const fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Delete a sample of old posts and their metadata.
    pub fn prune_posts(&mut self, spec: &FilterSpec) -> Result<DeletionResult> {
        let predicate = Predicate::for_filter(spec).render();
        debug!(
            target: "prune",
            cutoff = %spec.cutoff_string(),
            sample_rate = spec.sample_rate,
            types = ?spec.type_filter,
            "pruning posts"
        );
        self.run(&predicate)
    }

    /// Delete every revision and auto-draft and their metadata.
    pub fn prune_revisions(&mut self) -> Result<DeletionResult> {
        debug!(target: "prune", "pruning revisions and auto-drafts");
        self.run(&Predicate::revisions().render())
    }

    pub fn preview_posts(&mut self, spec: &FilterSpec) -> Result<Preview> {
        let eligible = self
            .executor
            .count_matching(&self.tables, &Predicate::eligible(spec).render())?;
        Ok(Preview {
            eligible,
            expected: scale(eligible, spec.sample_rate),
        })
    }

    pub fn preview_revisions(&mut self) -> Result<Preview> {
        let eligible = self
            .executor
            .count_matching(&self.tables, &Predicate::revisions().render())?;
        Ok(Preview {
            eligible,
            expected: scale(eligible, 1.0),
        })
    }

    fn run(&mut self, predicate: &RenderedPredicate) -> Result<DeletionResult> {
        ensure_bounded(predicate)?;
        let result = self.executor.delete_matching(&self.tables, predicate)?;
        info!(
            target: "prune",
            posts = result.rows_deleted,
            postmeta = result.meta_rows_deleted,
            table = self.tables.primary(),
            "delete complete"
        );
        Ok(result)
    }
}

#[allow(clippy::cast_precision_loss)]
fn scale(count: usize, rate: f64) -> f64 {
    count as f64 * rate
}
