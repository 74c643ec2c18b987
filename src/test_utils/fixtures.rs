use std::path::PathBuf;

use rusqlite::{Connection, params};
use tempfile::TempDir;

use crate::pruning::Pruner;
use crate::storage::{Database, TargetTables};

/// Content schema as shipped by the CMS, reduced to the columns prune reads.
const SCHEMA: &str = "
    CREATE TABLE {prefix}posts (
        ID INTEGER PRIMARY KEY AUTOINCREMENT,
        post_date TEXT NOT NULL DEFAULT '0000-00-00 00:00:00',
        post_title TEXT NOT NULL DEFAULT '',
        post_status TEXT NOT NULL DEFAULT 'publish',
        post_type TEXT NOT NULL DEFAULT 'post'
    );
    CREATE TABLE {prefix}postmeta (
        meta_id INTEGER PRIMARY KEY AUTOINCREMENT,
        post_id INTEGER NOT NULL DEFAULT 0,
        meta_key TEXT,
        meta_value TEXT
    );
    CREATE INDEX {prefix}postmeta_post_id ON {prefix}postmeta (post_id);
";

/// Throwaway content database on disk.
pub struct ContentDbFixture {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub prefix: String,
    conn: Connection,
}

impl Default for ContentDbFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentDbFixture {
    #[must_use]
    pub fn new() -> Self {
        Self::with_prefix("wp_")
    }

    #[must_use]
    pub fn with_prefix(prefix: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("content.db");
        let conn = Connection::open(&db_path).expect("Failed to create content db");
        conn.execute_batch(&SCHEMA.replace("{prefix}", prefix))
            .expect("Failed to create content schema");

        println!("[FIXTURE] Created content db: {db_path:?}");

        Self {
            temp_dir,
            db_path,
            prefix: prefix.to_string(),
            conn,
        }
    }

    /// Fresh connection through the production open path.
    #[must_use]
    pub fn database(&self) -> Database {
        Database::open(&self.db_path).expect("Failed to open content db")
    }

    #[must_use]
    pub fn tables(&self) -> TargetTables {
        TargetTables::with_prefix(&self.prefix).expect("Invalid fixture prefix")
    }

    #[must_use]
    pub fn pruner(&self) -> Pruner<Database> {
        Pruner::new(self.database(), self.tables())
    }

    pub fn execute(&self, sql: &str) {
        self.conn.execute_batch(sql).expect("Failed to run fixture sql");
    }

    /// Insert a post and return its ID.
    pub fn insert_post(&self, post_type: &str, post_status: &str, post_date: &str) -> i64 {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {}posts (post_date, post_title, post_status, post_type)
                     VALUES (?1, ?2, ?3, ?4)",
                    self.prefix
                ),
                params![post_date, format!("{post_type} {post_date}"), post_status, post_type],
            )
            .expect("Failed to insert post");
        self.conn.last_insert_rowid()
    }

    pub fn insert_meta(&self, post_id: i64, key: &str) {
        self.conn
            .execute(
                &format!(
                    "INSERT INTO {}postmeta (post_id, meta_key, meta_value) VALUES (?1, ?2, '1')",
                    self.prefix
                ),
                params![post_id, key],
            )
            .expect("Failed to insert postmeta");
    }

    #[must_use]
    pub fn post_count(&self) -> usize {
        self.count(&format!("SELECT COUNT(*) FROM {}posts", self.prefix), [])
    }

    #[must_use]
    pub fn post_count_by_type(&self, post_type: &str) -> usize {
        self.count(
            &format!("SELECT COUNT(*) FROM {}posts WHERE post_type = ?1", self.prefix),
            [post_type],
        )
    }

    #[must_use]
    pub fn post_count_by_status(&self, post_status: &str) -> usize {
        self.count(
            &format!("SELECT COUNT(*) FROM {}posts WHERE post_status = ?1", self.prefix),
            [post_status],
        )
    }

    #[must_use]
    pub fn meta_count(&self) -> usize {
        self.count(&format!("SELECT COUNT(*) FROM {}postmeta", self.prefix), [])
    }

    #[must_use]
    pub fn meta_count_for(&self, post_id: i64) -> usize {
        self.count(
            &format!("SELECT COUNT(*) FROM {}postmeta WHERE post_id = ?1", self.prefix),
            [post_id],
        )
    }

    /// Metadata rows whose parent post no longer exists.
    #[must_use]
    pub fn orphaned_meta_count(&self) -> usize {
        self.count(
            &format!(
                "SELECT COUNT(*) FROM {p}postmeta m LEFT JOIN {p}posts p ON p.ID = m.post_id
                 WHERE p.ID IS NULL",
                p = self.prefix
            ),
            [],
        )
    }

    fn count<P: rusqlite::Params>(&self, sql: &str, params: P) -> usize {
        let count: i64 = self
            .conn
            .query_row(sql, params, |row| row.get(0))
            .expect("Failed to count rows");
        usize::try_from(count).expect("Row count is negative")
    }
}

impl Drop for ContentDbFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up content db: {:?}", self.db_path);
    }
}
