//! Structured deletion predicates.
//!
//! A [`Predicate`] is an AND-chain of tagged [`Condition`]s. Nothing is turned
//! into SQL text until [`Predicate::render`], which emits `?` placeholders and
//! collects every operator-supplied value as a bound [`Param`].

use chrono::NaiveDateTime;
use rusqlite::ToSql;
use rusqlite::types::ToSqlOutput;

use super::filter::{DATE_FORMAT, FilterSpec};

/// Alias of the primary content table inside rendered statements.
pub const PRIMARY_ALIAS: &str = "p";

/// Resolution of the per-row sampling draw.
pub const SAMPLE_RESOLUTION: u32 = 1_000_000;

pub const REVISION_TYPE: &str = "revision";
pub const AUTO_DRAFT_STATUS: &str = "auto-draft";

/// A value bound to a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum Param {
    Text(String),
    Real(f64),
}

impl ToSql for Param {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        match self {
            Self::Text(value) => value.to_sql(),
            Self::Real(value) => value.to_sql(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `post_type` is one of the listed types. Omitted when the list is empty.
    TypeIn(Vec<String>),
    TypeEq(String),
    StatusEq(String),
    /// `post_date` strictly before the cutoff.
    DateBefore(NaiveDateTime),
    /// Per-row random draw in `[0, 1)` below the rate.
    Sample(f64),
    /// OR-group. An empty group matches nothing.
    AnyOf(Vec<Condition>),
}

impl Condition {
    fn render(&self, params: &mut Vec<Param>) -> Option<String> {
        let fragment = match self {
            Self::TypeIn(types) if types.is_empty() => return None,
            Self::TypeIn(types) => {
                params.extend(types.iter().cloned().map(Param::Text));
                let placeholders = vec!["?"; types.len()].join(", ");
                format!("{PRIMARY_ALIAS}.post_type IN ({placeholders})")
            }
            Self::TypeEq(post_type) => {
                params.push(Param::Text(post_type.clone()));
                format!("{PRIMARY_ALIAS}.post_type = ?")
            }
            Self::StatusEq(status) => {
                params.push(Param::Text(status.clone()));
                format!("{PRIMARY_ALIAS}.post_status = ?")
            }
            Self::DateBefore(cutoff) => {
                params.push(Param::Text(cutoff.format(DATE_FORMAT).to_string()));
                format!("{PRIMARY_ALIAS}.post_date < ?")
            }
            Self::Sample(rate) => {
                params.push(Param::Real(*rate));
                // Mask the sign bit: ABS() overflows on i64::MIN.
                format!(
                    "((RANDOM() & 9223372036854775807) % {SAMPLE_RESOLUTION}) / {SAMPLE_RESOLUTION}.0 < ?"
                )
            }
            Self::AnyOf(conditions) => {
                let parts: Vec<String> = conditions
                    .iter()
                    .filter_map(|condition| condition.render(params))
                    .collect();
                if parts.is_empty() {
                    "0".to_string()
                } else {
                    format!("({})", parts.join(" OR "))
                }
            }
        };
        Some(fragment)
    }
}

/// AND-chain of conditions over the primary table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    conditions: Vec<Condition>,
}

impl Predicate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn and(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Sampled deletion of old posts: type (when filtered), date and sample.
    #[must_use]
    pub fn for_filter(spec: &FilterSpec) -> Self {
        Self::eligible(spec).and(Condition::Sample(spec.sample_rate))
    }

    /// Everything the filter makes eligible, before sampling.
    #[must_use]
    pub fn eligible(spec: &FilterSpec) -> Self {
        Self::new()
            .and(Condition::TypeIn(spec.type_filter.iter().cloned().collect()))
            .and(Condition::DateBefore(spec.cutoff))
    }

    /// Every revision and every auto-draft.
    #[must_use]
    pub fn revisions() -> Self {
        Self::new().and(Condition::AnyOf(vec![
            Condition::TypeEq(REVISION_TYPE.to_string()),
            Condition::StatusEq(AUTO_DRAFT_STATUS.to_string()),
        ]))
    }

    #[must_use]
    pub fn render(&self) -> RenderedPredicate {
        let mut params = Vec::new();
        let parts: Vec<String> = self
            .conditions
            .iter()
            .filter_map(|condition| condition.render(&mut params))
            .collect();
        RenderedPredicate {
            sql: parts.join(" AND "),
            params,
        }
    }
}

/// SQL text for a WHERE clause plus its bound values, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPredicate {
    pub sql: String,
    pub params: Vec<Param>,
}

impl RenderedPredicate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.sql.matches('?').count()
    }
}
