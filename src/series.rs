//! Per-type running totals by day, padded so every activity spike has a
//! visible rise and fall.
//!
//! For each day with a positive total the output also holds the day before
//! and the day after, at zero unless real activity lands there. Adjacent
//! active days share no padding, and a day requested by two spikes appears
//! once. Days that are neither active nor adjacent to activity are absent;
//! consumers read the gap as zero.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use crate::index::Index;
use crate::types::{DayKey, Record, Series, TimeSeriesPoint};

/// Derive the padded series for `kind`, ascending by day.
///
/// Returns an empty series when `kind` has no positive totals.
pub fn derive_series(index: &Index<'_, DayKey>, kind: &str) -> Vec<TimeSeriesPoint> {
    let matches = |r: &Record| r.kind() == kind;
    let base = index.group().reduce(
        move |acc: &mut f64, r: &Record| {
            if matches(r) {
                *acc += r.total;
            }
        },
        move |acc: &mut f64, r: &Record| {
            if matches(r) {
                *acc -= r.total;
            }
        },
        || 0.0,
    );

    let mut padded: BTreeMap<DayKey, f64> = BTreeMap::new();
    for (&day, &total) in base.all() {
        if total <= 0.0 {
            continue;
        }
        padded.entry(day.pred()).or_insert(0.0);
        *padded.entry(day).or_insert(0.0) += total;
        padded.entry(day.succ()).or_insert(0.0);
    }

    let kind: Arc<str> = Arc::from(kind);
    let points: Vec<TimeSeriesPoint> = padded
        .into_iter()
        .map(|(day, total)| TimeSeriesPoint {
            day,
            total,
            kind: Arc::clone(&kind),
        })
        .collect();

    debug!(kind = %kind, points = points.len(), "derived series");
    points
}

/// One padded series per requested type, in request order.
pub fn derive_composite<S: AsRef<str>>(index: &Index<'_, DayKey>, kinds: &[S]) -> Vec<Series> {
    kinds
        .iter()
        .map(|kind| {
            let kind = kind.as_ref();
            Series {
                kind: Arc::from(kind),
                points: derive_series(index, kind),
            }
        })
        .collect()
}
