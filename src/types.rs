use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};

// ============================================================================
// DayKey - calendar-day key
// ============================================================================

/// Calendar day stored as a day number counted from 0001-01-01 (day 1).
///
/// Two keys are equal exactly when year, month and day match. Neighbouring
/// days are plain integer steps, so there is no timestamp or DST arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct DayKey(i32);

impl DayKey {
    #[inline]
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.num_days_from_ce())
    }

    /// Parse a strict `YYYY-MM-DD` string.
    pub fn parse(s: &str) -> Option<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .ok()
            .map(Self::from_date)
    }

    /// Back to a calendar date. `None` only outside chrono's supported range.
    #[inline]
    pub fn to_date(self) -> Option<NaiveDate> {
        NaiveDate::from_num_days_from_ce_opt(self.0)
    }

    #[inline]
    pub fn day_number(self) -> i32 {
        self.0
    }

    /// The day before.
    #[inline]
    pub fn pred(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    /// The day after.
    #[inline]
    pub fn succ(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    #[inline]
    pub fn minus_days(self, days: u32) -> Self {
        Self(self.0.saturating_sub(days.min(i32::MAX as u32) as i32))
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => write!(f, "day#{}", self.0),
        }
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// Raw input
// ============================================================================

fn one() -> f64 {
    1.0
}

/// One upstream row before ingestion.
///
/// Vote rows carry their weight as `count`; comment and pageview rows carry
/// only a date and stand for a single action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub date: String,
    #[serde(default = "one", alias = "count")]
    pub total: f64,
}

/// Raw record lists keyed by engagement type.
pub type RawInput = BTreeMap<String, Vec<RawRecord>>;

// ============================================================================
// Ingested records
// ============================================================================

/// An ingested record tagged with its type and calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(rename = "type")]
    pub kind: Arc<str>,
    pub date: NaiveDate,
    pub total: f64,
}

impl Record {
    #[inline]
    pub fn day(&self) -> DayKey {
        DayKey::from_date(self.date)
    }

    #[inline]
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

// ============================================================================
// Derived outputs
// ============================================================================

/// One plotted point of a per-type running total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub day: DayKey,
    pub total: f64,
    #[serde(rename = "type")]
    pub kind: Arc<str>,
}

/// All points for one type, as one line of a composite chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    #[serde(rename = "type")]
    pub kind: Arc<str>,
    pub points: Vec<TimeSeriesPoint>,
}

/// Aggregate value for one requested category key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub key: String,
    pub value: f64,
}

/// How a category aggregate is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateMode {
    /// Sum of a per-record value (the `total` field unless overridden).
    #[default]
    Sum,
    /// Number of records.
    Count,
}
