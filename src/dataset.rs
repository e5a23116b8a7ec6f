//! Merges per-type raw record lists into one flat, immutable dataset.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::debug;

use crate::error::{EngagementError, Result};
use crate::range::DateWindow;
use crate::types::{DayKey, RawInput, Record};

/// Length of the `YYYY-MM-DD` prefix read from every raw date string.
const DATE_PREFIX_LEN: usize = 10;

/// Flat collection of ingested records. Order carries no meaning.
///
/// A dataset is never patched: new data means a new dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest record day, if any.
    pub fn earliest(&self) -> Option<DayKey> {
        self.records.iter().map(Record::day).min()
    }

    /// Latest record day, if any.
    pub fn latest(&self) -> Option<DayKey> {
        self.records.iter().map(Record::day).max()
    }

    /// Distinct types present, sorted.
    pub fn kinds(&self) -> Vec<Arc<str>> {
        let mut kinds: Vec<Arc<str>> = self.records.iter().map(|r| Arc::clone(&r.kind)).collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// A new dataset holding only the records whose day is inside `window`.
    pub fn within(&self, window: &DateWindow) -> Dataset {
        let records: Vec<Record> = self
            .records
            .iter()
            .filter(|r| window.contains(r.day()))
            .cloned()
            .collect();
        debug!(
            kept = records.len(),
            dropped = self.records.len() - records.len(),
            %window,
            "filtered dataset to window"
        );
        Dataset { records }
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// Parse the calendar day at the start of `value`.
///
/// Anything past the first ten characters (a time, an offset) is ignored.
/// Shorter strings and impossible dates are rejected.
pub fn parse_day(value: &str) -> Option<NaiveDate> {
    let prefix = value.get(..DATE_PREFIX_LEN)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

/// Tag every raw record with its type, parse its day, and flatten.
///
/// Fails on the first record whose date does not parse.
pub fn build(raw: &RawInput) -> Result<Dataset> {
    let capacity = raw.values().map(Vec::len).sum();
    let mut records = Vec::with_capacity(capacity);

    for (kind, rows) in raw {
        let kind: Arc<str> = Arc::from(kind.as_str());
        for (index, row) in rows.iter().enumerate() {
            let date = parse_day(&row.date).ok_or_else(|| EngagementError::MalformedDate {
                kind: kind.to_string(),
                index,
                value: row.date.clone(),
            })?;
            records.push(Record {
                kind: Arc::clone(&kind),
                date,
                total: row.total,
            });
        }
    }

    debug!(records = records.len(), types = raw.len(), "built dataset");
    Ok(Dataset { records })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawRecord;

    fn raw(entries: &[(&str, &[(&str, f64)])]) -> RawInput {
        entries
            .iter()
            .map(|(kind, rows)| {
                (
                    kind.to_string(),
                    rows.iter()
                        .map(|(date, total)| RawRecord {
                            date: date.to_string(),
                            total: *total,
                        })
                        .collect(),
                )
            })
            .collect()
    }

    #[test]
    fn build_tags_type_and_truncates_timestamp() {
        let input = raw(&[("click", &[("2024-03-05T00:00:00Z", 2.0)])]);
        let dataset = build(&input).expect("build");

        assert_eq!(dataset.len(), 1);
        let record = &dataset.records()[0];
        assert_eq!(record.kind(), "click");
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(record.total, 2.0);
    }

    #[test]
    fn build_rejects_malformed_date() {
        let input = raw(&[("click", &[("not-a-date", 1.0)])]);
        let err = build(&input).unwrap_err();
        assert_eq!(
            err,
            EngagementError::MalformedDate {
                kind: "click".to_string(),
                index: 0,
                value: "not-a-date".to_string(),
            }
        );
    }

    #[test]
    fn build_identifies_offending_record() {
        let input = raw(&[
            ("views", &[("2024-01-01", 1.0), ("2024-01-02", 1.0)]),
            ("votes", &[("2024-01-01", 3.0), ("2024-13-01", 1.0)]),
        ]);
        match build(&input) {
            Err(EngagementError::MalformedDate { kind, index, value }) => {
                assert_eq!(kind, "votes");
                assert_eq!(index, 1);
                assert_eq!(value, "2024-13-01");
            }
            other => panic!("expected malformed date, got {other:?}"),
        }
    }

    #[test]
    fn short_dates_are_rejected() {
        assert!(parse_day("2024-1-5").is_none());
        assert!(parse_day("").is_none());
        assert!(parse_day("2024-01-05").is_some());
        assert!(parse_day("2024-01-05 13:45:00+02:00").is_some());
    }

    #[test]
    fn build_concatenates_without_dedup() {
        let input = raw(&[
            ("comments", &[("2024-01-01", 1.0), ("2024-01-01", 1.0)]),
            ("views", &[("2024-01-01", 1.0)]),
        ]);
        let dataset = build(&input).expect("build");
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.kinds().len(), 2);
        assert_eq!(dataset.earliest(), dataset.latest());
    }

    #[test]
    fn empty_input_builds_empty_dataset() {
        let dataset = build(&RawInput::new()).expect("build");
        assert!(dataset.is_empty());
        assert!(dataset.earliest().is_none());
    }

    #[test]
    fn within_keeps_inclusive_bounds() {
        let input = raw(&[(
            "views",
            &[("2024-01-01", 1.0), ("2024-01-02", 1.0), ("2024-01-03", 1.0)],
        )]);
        let dataset = build(&input).expect("build");
        let window = DateWindow::new(
            DayKey::parse("2024-01-02").unwrap(),
            DayKey::parse("2024-01-03").unwrap(),
        );
        let filtered = dataset.within(&window);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.earliest(), DayKey::parse("2024-01-02"));
        // The source dataset is untouched.
        assert_eq!(dataset.len(), 3);
    }
}
