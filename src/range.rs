//! Date-range boundaries chosen by the integrating application.
//!
//! The derivers never look at dates outside the dataset they are handed.
//! This module validates user-supplied boundaries, fills in defaults, and
//! yields the inclusive [`DateWindow`] used to trim a dataset or lay out a
//! chart's x-axis.

use std::fmt;

use serde::Serialize;

use crate::dataset::Dataset;
use crate::error::{EngagementError, Result};
use crate::types::DayKey;

/// Days before today used when no explicit start is given.
pub const DEFAULT_DAYS_BEFORE: u32 = 7;

/// Where an absent start boundary falls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultStart {
    /// `today - n` days.
    DaysBeforeToday(u32),
    /// The day before the earliest record.
    EarliestDataPoint,
}

impl Default for DefaultStart {
    fn default() -> Self {
        DefaultStart::DaysBeforeToday(DEFAULT_DAYS_BEFORE)
    }
}

/// Inclusive `[start, end]` span of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: DayKey,
    pub end: DayKey,
}

impl DateWindow {
    pub fn new(start: DayKey, end: DayKey) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn contains(&self, day: DayKey) -> bool {
        self.start <= day && day <= self.end
    }
}

impl fmt::Display for DateWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Optional user-supplied boundaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<DayKey>,
    pub end: Option<DayKey>,
}

impl DateRange {
    /// Parse `YYYY-MM-DD` boundaries. Empty strings count as absent.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self> {
        Ok(Self {
            start: parse_boundary("start", start)?,
            end: parse_boundary("end", end)?,
        })
    }

    /// Reject boundaries that point past `today` or run backwards.
    pub fn validate(&self, today: DayKey) -> Result<()> {
        if let Some(end) = self.end
            && end > today
        {
            return Err(EngagementError::EndInFuture);
        }

        if let Some(start) = self.start {
            match self.end {
                Some(end) if start > end => return Err(EngagementError::StartAfterEnd),
                None if start > today => return Err(EngagementError::StartInFuture),
                _ => {}
            }
        }

        Ok(())
    }

    /// Validate, then fill absent boundaries.
    ///
    /// The end defaults to `today`. The start follows `policy`; with
    /// [`DefaultStart::EarliestDataPoint`] and an empty dataset it falls back
    /// to [`DEFAULT_DAYS_BEFORE`] days before today.
    pub fn resolve(
        &self,
        today: DayKey,
        dataset: &Dataset,
        policy: DefaultStart,
    ) -> Result<DateWindow> {
        self.validate(today)?;

        let end = self.end.unwrap_or(today);
        let start = match self.start {
            Some(start) => start,
            None => match policy {
                DefaultStart::DaysBeforeToday(days) => today.minus_days(days),
                DefaultStart::EarliestDataPoint => dataset
                    .earliest()
                    .map(DayKey::pred)
                    .unwrap_or_else(|| today.minus_days(DEFAULT_DAYS_BEFORE)),
            },
        };

        Ok(DateWindow::new(start, end))
    }
}

fn parse_boundary(field: &'static str, value: Option<&str>) -> Result<Option<DayKey>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => DayKey::parse(value)
            .map(Some)
            .ok_or_else(|| EngagementError::InvalidRangeDate {
                field,
                value: value.to_string(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build;
    use crate::types::{RawInput, RawRecord};

    fn day(s: &str) -> DayKey {
        DayKey::parse(s).unwrap()
    }

    fn dataset_from(dates: &[&str]) -> Dataset {
        let mut raw = RawInput::new();
        raw.insert(
            "views".to_string(),
            dates
                .iter()
                .map(|d| RawRecord {
                    date: d.to_string(),
                    total: 1.0,
                })
                .collect(),
        );
        build(&raw).expect("build")
    }

    #[test]
    fn parse_treats_empty_as_absent() {
        let range = DateRange::parse(Some(""), None).expect("parse");
        assert_eq!(range, DateRange::default());

        let range = DateRange::parse(Some("2024-01-02"), Some(" 2024-01-09 ")).expect("parse");
        assert_eq!(range.start, Some(day("2024-01-02")));
        assert_eq!(range.end, Some(day("2024-01-09")));
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = DateRange::parse(Some("yesterday"), None).unwrap_err();
        assert_eq!(
            err,
            EngagementError::InvalidRangeDate {
                field: "start",
                value: "yesterday".to_string()
            }
        );
    }

    #[test]
    fn validate_rules() {
        let today = day("2024-06-15");

        let future_end = DateRange {
            start: None,
            end: Some(day("2024-06-16")),
        };
        assert_eq!(future_end.validate(today), Err(EngagementError::EndInFuture));

        let backwards = DateRange {
            start: Some(day("2024-06-10")),
            end: Some(day("2024-06-01")),
        };
        assert_eq!(backwards.validate(today), Err(EngagementError::StartAfterEnd));

        let future_start = DateRange {
            start: Some(day("2024-06-20")),
            end: None,
        };
        assert_eq!(future_start.validate(today), Err(EngagementError::StartInFuture));

        let ok = DateRange {
            start: Some(day("2024-06-01")),
            end: Some(day("2024-06-15")),
        };
        assert_eq!(ok.validate(today), Ok(()));
    }

    #[test]
    fn resolve_defaults_to_week_before_today() {
        let today = day("2024-06-15");
        let window = DateRange::default()
            .resolve(today, &Dataset::default(), DefaultStart::default())
            .expect("resolve");
        assert_eq!(window, DateWindow::new(day("2024-06-08"), today));
    }

    #[test]
    fn resolve_earliest_data_point_pads_one_day() {
        let today = day("2024-06-15");
        let dataset = dataset_from(&["2024-05-03", "2024-04-20"]);
        let window = DateRange::default()
            .resolve(today, &dataset, DefaultStart::EarliestDataPoint)
            .expect("resolve");
        assert_eq!(window.start, day("2024-04-19"));
        assert_eq!(window.end, today);

        let empty = DateRange::default()
            .resolve(today, &Dataset::default(), DefaultStart::EarliestDataPoint)
            .expect("resolve");
        assert_eq!(empty.start, day("2024-06-08"));
    }

    #[test]
    fn explicit_boundaries_win() {
        let today = day("2024-06-15");
        let range = DateRange {
            start: Some(day("2024-06-01")),
            end: Some(day("2024-06-05")),
        };
        let window = range
            .resolve(today, &dataset_from(&["2023-01-01"]), DefaultStart::EarliestDataPoint)
            .expect("resolve");
        assert_eq!(window, DateWindow::new(day("2024-06-01"), day("2024-06-05")));
        assert!(window.contains(day("2024-06-05")));
        assert!(!window.contains(day("2024-06-06")));
        assert_eq!(window.to_string(), "2024-06-01..=2024-06-05");
    }
}
