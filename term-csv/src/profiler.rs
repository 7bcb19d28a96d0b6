//! Per-column value format profiling.
//!
//! Every non-blank field is classified into exactly one [`ValueFormat`] by trying
//! the formats in a fixed priority order and taking the first that matches:
//!
//! 1. numeric: integer or decimal literal, optional exponent
//! 2. URI: absolute URI with a scheme
//! 3. date-time: ISO 8601 combined date and time
//! 4. date: ISO 8601 calendar date
//! 5. time: ISO 8601 time of day
//! 6. string: everything else
//!
//! The order matters for ambiguous values: `20130101` is numeric, never a date.
//!
//! [`ColumnProfiler`] keeps one histogram per column. Whether a column is
//! consistent can only be decided once every row has been seen.
//!
//! ```rust
//! use term_csv::profiler::{classify, ColumnProfiler, ValueFormat};
//!
//! assert_eq!(classify("3.1476"), ValueFormat::Numeric);
//! assert_eq!(classify("http://www.example.com"), ValueFormat::Uri);
//! assert_eq!(classify("2013-01-01T13:00:00Z"), ValueFormat::DateTime);
//!
//! let mut profiler = ColumnProfiler::new();
//! profiler.observe(&["foo", "1"]);
//! profiler.observe(&["bar", "x"]);
//! assert_eq!(profiler.inconsistent_columns(1.0), vec![1]);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tokenizer::Row;

/// The format a field value was recognised as.
///
/// Declaration order is classification priority.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ValueFormat {
    /// Integer or decimal literal
    Numeric,
    /// Absolute URI
    Uri,
    /// ISO 8601 date and time
    DateTime,
    /// ISO 8601 date
    Date,
    /// ISO 8601 time of day
    Time,
    /// Anything else
    String,
}

impl ValueFormat {
    /// All formats in priority order.
    pub const PRIORITY: [ValueFormat; 6] = [
        ValueFormat::Numeric,
        ValueFormat::Uri,
        ValueFormat::DateTime,
        ValueFormat::Date,
        ValueFormat::Time,
        ValueFormat::String,
    ];

    /// Returns the snake_case name of the format.
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueFormat::Numeric => "numeric",
            ValueFormat::Uri => "uri",
            ValueFormat::DateTime => "date_time",
            ValueFormat::Date => "date",
            ValueFormat::Time => "time",
            ValueFormat::String => "string",
        }
    }

    /// Returns true if `value` has this format, ignoring higher-priority formats.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            ValueFormat::Numeric => is_numeric(value),
            ValueFormat::Uri => is_uri(value),
            ValueFormat::DateTime => is_date_time(value),
            ValueFormat::Date => is_date(value),
            ValueFormat::Time => is_time(value),
            ValueFormat::String => true,
        }
    }
}

impl fmt::Display for ValueFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The patterns below are compile-time constants known to be valid.
#[allow(clippy::expect_used)]
static NUMERIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?([0-9]+\.?[0-9]*|\.[0-9]+)([eE][+-]?[0-9]+)?$").expect("valid numeric pattern")
});

#[allow(clippy::expect_used)]
static URI_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:[a-z][a-z0-9+.\-]*://|mailto:|urn:|tel:)\S+$").expect("valid URI pattern")
});

#[allow(clippy::expect_used)]
static DATE_TIME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}[T ][0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?(Z|[+-][0-9]{2}:?[0-9]{2})?$")
        .expect("valid date-time pattern")
});

#[allow(clippy::expect_used)]
static DATE_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

#[allow(clippy::expect_used)]
static TIME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}:[0-9]{2}(:[0-9]{2}(\.[0-9]+)?)?$").expect("valid time pattern")
});

fn is_numeric(value: &str) -> bool {
    NUMERIC.is_match(value)
}

fn is_uri(value: &str) -> bool {
    URI_SHAPE.is_match(value) && url::Url::parse(value).is_ok()
}

fn is_date_time(value: &str) -> bool {
    if !DATE_TIME_SHAPE.is_match(value) {
        return false;
    }
    let normalized = value.replacen(' ', "T", 1);
    DateTime::parse_from_rfc3339(&normalized).is_ok()
        || ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M%z", "%Y-%m-%dT%H:%M:%S%.f%z"]
            .iter()
            .any(|format| {
                NaiveDateTime::parse_from_str(&normalized, format).is_ok()
                    || DateTime::parse_from_str(&normalized, format).is_ok()
            })
}

fn is_date(value: &str) -> bool {
    DATE_SHAPE.is_match(value) && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

fn is_time(value: &str) -> bool {
    TIME_SHAPE.is_match(value)
        && (NaiveTime::parse_from_str(value, "%H:%M:%S%.f").is_ok()
            || NaiveTime::parse_from_str(value, "%H:%M").is_ok())
}

/// Classifies a trimmed, non-blank value.
pub fn classify(value: &str) -> ValueFormat {
    ValueFormat::PRIORITY
        .into_iter()
        .find(|format| format.matches(value))
        .unwrap_or(ValueFormat::String)
}

/// Histogram of value formats for one column.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnProfile {
    counts: BTreeMap<ValueFormat, usize>,
}

impl ColumnProfile {
    /// Occurrences of `format`.
    pub fn count(&self, format: ValueFormat) -> usize {
        self.counts.get(&format).copied().unwrap_or(0)
    }

    /// The non-zero counts, in priority order.
    pub fn counts(&self) -> &BTreeMap<ValueFormat, usize> {
        &self.counts
    }

    /// Total non-blank values seen.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// The most frequent format and its count; ties go to the higher priority.
    pub fn dominant(&self) -> Option<(ValueFormat, usize)> {
        self.counts
            .iter()
            .rev()
            .max_by_key(|(_, count)| **count)
            .map(|(format, count)| (*format, *count))
    }

    /// Returns true if the dominant format's share of values reaches `threshold`.
    ///
    /// A threshold of `1.0` means every value must share one format. Columns
    /// without values are consistent.
    pub fn is_consistent(&self, threshold: f64) -> bool {
        match self.dominant() {
            None => true,
            Some((_, dominant)) => dominant as f64 / self.total() as f64 >= threshold,
        }
    }

    /// Renders the histogram as `format=count` pairs.
    pub fn summary(&self) -> String {
        self.counts
            .iter()
            .map(|(format, count)| format!("{format}={count}"))
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn record(&mut self, format: ValueFormat) {
        *self.counts.entry(format).or_insert(0) += 1;
    }
}

/// Accumulates a [`ColumnProfile`] per column index.
///
/// The number of profiles only grows, tracking the widest row seen.
#[derive(Debug, Clone, Default)]
pub struct ColumnProfiler {
    columns: Vec<ColumnProfile>,
    rows_observed: usize,
}

impl ColumnProfiler {
    /// Creates an empty profiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grows the profile table to at least `width` columns.
    pub fn ensure_width(&mut self, width: usize) {
        if width > self.columns.len() {
            self.columns.resize_with(width, ColumnProfile::default);
        }
    }

    /// Classifies and counts every non-blank value of a data row.
    pub fn observe<S: AsRef<str>>(&mut self, values: &[S]) {
        self.ensure_width(values.len());
        for (column, value) in values.iter().enumerate() {
            self.record(column, value.as_ref());
        }
        self.rows_observed += 1;
    }

    /// Same as [`observe`](Self::observe) for a tokenized row.
    pub fn observe_row(&mut self, row: &Row) {
        self.ensure_width(row.width());
        for field in row.fields() {
            self.record(field.column, field.value);
        }
        self.rows_observed += 1;
    }

    /// Per-column profiles, indexed by 0-based column.
    pub fn columns(&self) -> &[ColumnProfile] {
        &self.columns
    }

    /// Number of data rows observed.
    pub fn rows_observed(&self) -> usize {
        self.rows_observed
    }

    /// 0-based indices of columns whose dominant format falls below `threshold`.
    pub fn inconsistent_columns(&self, threshold: f64) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, profile)| !profile.is_consistent(threshold))
            .map(|(i, _)| i)
            .collect()
    }

    fn record(&mut self, column: usize, value: &str) {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return;
        }
        self.columns[column].record(classify(trimmed));
    }
}
