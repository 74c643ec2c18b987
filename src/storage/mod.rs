//! Storage layer for prune
//!
//! SQLite-backed [`DeleteExecutor`](crate::pruning::DeleteExecutor) plus
//! resolution of the configured content table names.

pub mod sqlite;
pub mod tables;

pub use sqlite::Database;
pub use tables::TargetTables;
