//! SQLite content store

use std::path::Path;

use rusqlite::{Connection, OpenFlags, params_from_iter};
use tracing::{debug, trace};

use crate::error::{PruneError, Result};
use crate::pruning::{DeleteExecutor, DeletionResult, RenderedPredicate, ensure_bounded};
use crate::pruning::predicate::PRIMARY_ALIAS;
use crate::storage::tables::{TargetTables, quote};

/// Scratch table holding the IDs picked for deletion.
const CANDIDATES: &str = "prune_candidates";

/// Connection to an existing content database.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open an existing database read-write. A missing file is an error,
    /// not an empty new database.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(target: "prune", path = %path.display(), "opening content database");
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        Self::configure_pragmas(&conn)?;
        Ok(Self { conn })
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }
}

fn candidate_select(tables: &TargetTables, predicate: &RenderedPredicate) -> String {
    format!(
        "SELECT {alias}.{pk} FROM {primary} AS {alias} WHERE {sql}",
        alias = PRIMARY_ALIAS,
        pk = quote(tables.primary_key()),
        primary = quote(tables.primary()),
        sql = predicate.sql,
    )
}

impl DeleteExecutor for Database {
    /// Three statements in one transaction:
    /// 1. evaluate the predicate once per post into a temp table,
    /// 2. delete metadata whose parent is in that set,
    /// 3. delete the posts themselves.
    ///
    /// Posts without metadata are still deleted; metadata of posts outside the
    /// set, including orphans, is left alone.
    fn delete_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<DeletionResult> {
        ensure_bounded(predicate)?;
        let tx = self.conn.transaction()?;

        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS temp.{CANDIDATES};
             CREATE TEMP TABLE {CANDIDATES} (id INTEGER PRIMARY KEY);"
        ))?;

        let select = candidate_select(tables, predicate);
        let collect = format!("INSERT INTO temp.{CANDIDATES} (id) {select}");
        debug!(target: "prune", sql = %collect, params = ?predicate.params, "collecting candidates");
        let candidates = tx.execute(&collect, params_from_iter(predicate.params.iter()))?;
        trace!(target: "prune", candidates, "candidates collected");

        let meta_rows_deleted = tx.execute(
            &format!(
                "DELETE FROM {meta} WHERE {fk} IN (SELECT id FROM temp.{CANDIDATES})",
                meta = quote(tables.meta()),
                fk = quote(tables.foreign_key()),
            ),
            [],
        )?;
        let rows_deleted = tx.execute(
            &format!(
                "DELETE FROM {primary} WHERE {pk} IN (SELECT id FROM temp.{CANDIDATES})",
                primary = quote(tables.primary()),
                pk = quote(tables.primary_key()),
            ),
            [],
        )?;

        tx.execute_batch(&format!("DROP TABLE temp.{CANDIDATES};"))?;
        tx.commit()?;

        Ok(DeletionResult {
            rows_deleted,
            meta_rows_deleted,
        })
    }

    fn count_matching(
        &mut self,
        tables: &TargetTables,
        predicate: &RenderedPredicate,
    ) -> Result<usize> {
        ensure_bounded(predicate)?;
        let sql = format!(
            "SELECT COUNT(*) FROM {primary} AS {PRIMARY_ALIAS} WHERE {where_sql}",
            primary = quote(tables.primary()),
            where_sql = predicate.sql,
        );
        debug!(target: "prune", sql = %sql, params = ?predicate.params, "counting candidates");
        let count: i64 = self
            .conn
            .query_row(&sql, params_from_iter(predicate.params.iter()), |row| row.get(0))?;
        usize::try_from(count)
            .map_err(|_| PruneError::from(rusqlite::Error::IntegralValueOutOfRange(0, count)))
    }
}
