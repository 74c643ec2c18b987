//! prune - slim content-management databases
//!
//! Deletes old posts (sampled), revisions and auto-drafts together with
//! their metadata rows.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod pruning;
pub mod storage;
pub mod test_utils;

pub use error::{PruneError, Result};
