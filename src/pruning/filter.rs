//! Argument normalization for `prune posts`.
//!
//! Raw operator input arrives as optional strings. This module turns it into a
//! [`FilterSpec`], the fully-resolved set of deletion criteria, or fails with
//! [`PruneError::InvalidArgument`] before anything touches the database.

use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use serde::Serialize;

use crate::config::PruneConfig;
use crate::error::{PruneError, Result};

/// Fraction of eligible posts removed when no rate is given.
pub const DEFAULT_SAMPLE_RATE: f64 = 0.8;

/// Age of the default cutoff, in calendar months.
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 6;

/// Storage format of `post_date` columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Normalized deletion criteria. Built fresh per invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSpec {
    /// Posts dated strictly before this are eligible.
    #[serde(serialize_with = "serialize_cutoff")]
    pub cutoff: NaiveDateTime,
    /// Probability in `[0, 1]` that an eligible post is deleted.
    pub sample_rate: f64,
    /// Post types to restrict to; empty means every type.
    pub type_filter: BTreeSet<String>,
}

impl FilterSpec {
    pub fn new(
        cutoff: NaiveDateTime,
        sample_rate: f64,
        type_filter: impl IntoIterator<Item = String>,
    ) -> Result<Self> {
        Ok(Self {
            cutoff,
            sample_rate: validate_sample_rate(sample_rate)?,
            type_filter: type_filter.into_iter().collect(),
        })
    }

    /// Cutoff rendered the way it is compared against `post_date`.
    #[must_use]
    pub fn cutoff_string(&self) -> String {
        self.cutoff.format(DATE_FORMAT).to_string()
    }
}

fn serialize_cutoff<S: serde::Serializer>(
    cutoff: &NaiveDateTime,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&cutoff.format(DATE_FORMAT))
}

/// Raw `prune posts` options as typed by the operator.
#[derive(Debug, Clone, Default)]
pub struct FilterArgs {
    pub before: Option<String>,
    pub sample_rate: Option<String>,
    pub post_type: Option<String>,
}

impl FilterArgs {
    /// Normalize against the current local time.
    pub fn normalize(&self, defaults: &PruneConfig) -> Result<FilterSpec> {
        self.normalize_at(defaults, Local::now().naive_local())
    }

    /// Normalize with an explicit "now"; relative dates resolve against it.
    pub fn normalize_at(&self, defaults: &PruneConfig, now: NaiveDateTime) -> Result<FilterSpec> {
        let cutoff = match non_blank(self.before.as_deref()) {
            Some(raw) => parse_before(raw, now)?,
            None => default_cutoff(defaults, now)?,
        };

        let sample_rate = match non_blank(self.sample_rate.as_deref()) {
            Some(raw) => parse_sample_rate(raw)?,
            None => validate_sample_rate(defaults.default_sample_rate).map_err(|_| {
                PruneError::Config(format!(
                    "[prune] default_sample_rate {} is outside [0, 1]",
                    defaults.default_sample_rate
                ))
            })?,
        };

        let type_filter = parse_post_types(self.post_type.as_deref().unwrap_or_default());

        Ok(FilterSpec {
            cutoff,
            sample_rate,
            type_filter,
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

fn default_cutoff(defaults: &PruneConfig, now: NaiveDateTime) -> Result<NaiveDateTime> {
    if let Some(raw) = non_blank(defaults.default_before.as_deref()) {
        return parse_before(raw, now).map_err(|_| {
            PruneError::Config(format!("[prune] default_before {raw:?} is not a valid date"))
        });
    }
    now.checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
        .ok_or_else(|| PruneError::invalid("default cutoff is out of range"))
}

/// Parse a cutoff date.
///
/// Absolute forms: RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS`,
/// `YYYY-MM-DD HH:MM` and `YYYY-MM-DD`. Relative forms: `now`, `today`,
/// `yesterday`, `6 months ago`, `-2 weeks`, `+1 day`.
pub fn parse_before(input: &str, now: NaiveDateTime) -> Result<NaiveDateTime> {
    let input = input.trim();
    let cutoff = parse_absolute(input)
        .or_else(|| parse_relative(input, now))
        .ok_or_else(|| PruneError::invalid(format!("unrecognized date {input:?} for --before")))?;
    // Stored dates are four-digit text; anything wider never compares below them.
    if !(0..=9999).contains(&cutoff.year()) {
        return Err(PruneError::invalid(format!(
            "date {input:?} is outside the years 0000 to 9999"
        )));
    }
    Ok(cutoff)
}

fn parse_absolute(input: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(input) {
        return Some(parsed.naive_local());
    }
    for format in [DATE_FORMAT, "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(input, format) {
            return Some(parsed);
        }
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

fn parse_relative(input: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    let lowered = input.to_ascii_lowercase();
    let midnight = now.date().and_time(NaiveTime::MIN);
    match lowered.as_str() {
        "now" => return Some(now),
        "today" => return Some(midnight),
        "yesterday" => return midnight.checked_sub_signed(TimeDelta::try_days(1)?),
        _ => {}
    }

    let mut tokens: Vec<&str> = lowered.split_whitespace().collect();
    let ago = tokens.last() == Some(&"ago");
    if ago {
        tokens.pop();
    }
    let [amount, unit] = tokens[..] else {
        return None;
    };
    let amount: i64 = amount.parse().ok()?;
    let amount = if ago { amount.checked_neg()? } else { amount };
    shift(now, amount, unit.strip_suffix('s').unwrap_or(unit))
}

fn shift(base: NaiveDateTime, amount: i64, unit: &str) -> Option<NaiveDateTime> {
    let delta = match unit {
        "sec" | "second" => TimeDelta::try_seconds(amount)?,
        "min" | "minute" => TimeDelta::try_minutes(amount)?,
        "hour" => TimeDelta::try_hours(amount)?,
        "day" => TimeDelta::try_days(amount)?,
        "week" => TimeDelta::try_weeks(amount)?,
        "month" => return shift_months(base, amount),
        "year" => return shift_months(base, amount.checked_mul(12)?),
        _ => return None,
    };
    base.checked_add_signed(delta)
}

fn shift_months(base: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months < 0 {
        base.checked_sub_months(magnitude)
    } else {
        base.checked_add_months(magnitude)
    }
}

/// Parse and range-check a sample rate. Out-of-range values are rejected,
/// never clamped.
pub fn parse_sample_rate(input: &str) -> Result<f64> {
    let input = input.trim();
    let rate: f64 = input
        .parse()
        .map_err(|_| PruneError::invalid(format!("sample rate {input:?} is not a number")))?;
    validate_sample_rate(rate)
}

fn validate_sample_rate(rate: f64) -> Result<f64> {
    if rate.is_finite() && (0.0..=1.0).contains(&rate) {
        Ok(rate)
    } else {
        Err(PruneError::invalid(format!(
            "sample rate {rate} must be between 0 and 1"
        )))
    }
}

/// Split a comma-separated post type list: trimmed, non-empty, deduplicated.
#[must_use]
pub fn parse_post_types(input: &str) -> BTreeSet<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(ToString::to_string)
        .collect()
}
