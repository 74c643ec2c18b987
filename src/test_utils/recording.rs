//! In-memory [`DeleteExecutor`] that records what it was asked to run.

use crate::error::{PruneError, Result};
use crate::pruning::{DeleteExecutor, DeletionResult, RenderedPredicate};
use crate::storage::TargetTables;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub primary: String,
    pub meta: String,
    pub predicate: RenderedPredicate,
}

impl RecordedCall {
    fn new(tables: &TargetTables, predicate: &RenderedPredicate) -> Self {
        Self {
            primary: tables.primary().to_string(),
            meta: tables.meta().to_string(),
            predicate: predicate.clone(),
        }
    }
}

/// Fake executor. Every call is recorded before `fail_with` is checked.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    pub deletes: Vec<RecordedCall>,
    pub counts: Vec<RecordedCall>,
    /// Returned from every delete.
    pub result: DeletionResult,
    /// Returned from every count.
    pub count: usize,
    /// Driver message to fail with, as a busy database would.
    pub fail_with: Option<String>,
}

impl RecordingExecutor {
    #[must_use]
    pub fn returning(rows_deleted: usize, meta_rows_deleted: usize) -> Self {
        Self {
            result: DeletionResult {
                rows_deleted,
                meta_rows_deleted,
            },
            ..Self::default()
        }
    }

    fn check_failure(&self) -> Result<()> {
        match &self.fail_with {
            Some(message) => Err(PruneError::ExecutionFailure(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
                Some(message.clone()),
            ))),
            None => Ok(()),
        }
    }
}

impl DeleteExecutor for RecordingExecutor {
    fn delete_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<DeletionResult> {
        self.deletes.push(RecordedCall::new(tables, predicate));
        self.check_failure()?;
        Ok(self.result)
    }

    fn count_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<usize> {
        self.counts.push(RecordedCall::new(tables, predicate));
        self.check_failure()?;
        Ok(self.count)
    }
}
