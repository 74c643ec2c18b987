//! Table-name resolution.
//!
//! Content tables are named by the site's configured prefix, so they cannot
//! be bound as parameters. Names are validated here and quoted on use.

use serde::Serialize;

use crate::error::{PruneError, Result};

pub const DEFAULT_TABLE_PREFIX: &str = "wp_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TargetTables {
    primary: String,
    meta: String,
    primary_key: String,
    foreign_key: String,
}

impl TargetTables {
    /// `{prefix}posts` keyed by `ID`, `{prefix}postmeta` referencing it via `post_id`.
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        Self::new(
            format!("{prefix}posts"),
            format!("{prefix}postmeta"),
            "ID",
            "post_id",
        )
    }

    pub fn new(
        primary: impl Into<String>,
        meta: impl Into<String>,
        primary_key: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Result<Self> {
        let tables = Self {
            primary: primary.into(),
            meta: meta.into(),
            primary_key: primary_key.into(),
            foreign_key: foreign_key.into(),
        };
        for name in [
            &tables.primary,
            &tables.meta,
            &tables.primary_key,
            &tables.foreign_key,
        ] {
            validate_identifier(name)?;
        }
        Ok(tables)
    }

    #[must_use]
    pub fn primary(&self) -> &str {
        &self.primary
    }

    #[must_use]
    pub fn meta(&self) -> &str {
        &self.meta
    }

    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    #[must_use]
    pub fn foreign_key(&self) -> &str {
        &self.foreign_key
    }
}

fn validate_identifier(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name.len() <= 64
        && name
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    if valid {
        Ok(())
    } else {
        Err(PruneError::invalid(format!(
            "{name:?} is not a valid table or column name"
        )))
    }
}

/// Double-quote an identifier that already passed validation.
#[must_use]
pub fn quote(name: &str) -> String {
    format!("\"{name}\"")
}
