//! Per-category totals over the type dimension, zero-filled for every
//! requested key.

use std::sync::Arc;

use tracing::debug;

use crate::index::Index;
use crate::types::{AggregateMode, CategoryTotal, Record};

/// Aggregate `keys` by summing `total` or counting records.
///
/// Output has one entry per requested key, in request order. Keys with no
/// records report `0`; duplicate keys are each reported.
pub fn aggregate<S: AsRef<str>>(
    index: &Index<'_, Arc<str>>,
    keys: &[S],
    mode: AggregateMode,
) -> Vec<CategoryTotal> {
    aggregate_by(index, keys, mode, |r| r.total)
}

/// Like [`aggregate`], summing `value_fn` instead of `total` in
/// [`AggregateMode::Sum`]. `value_fn` is ignored when counting.
pub fn aggregate_by<S: AsRef<str>>(
    index: &Index<'_, Arc<str>>,
    keys: &[S],
    mode: AggregateMode,
    value_fn: impl Fn(&Record) -> f64 + Clone,
) -> Vec<CategoryTotal> {
    let totals: Vec<CategoryTotal> = match mode {
        AggregateMode::Sum => {
            let group = index.group().reduce_sum(value_fn);
            complete(keys, |key| group.get(key).copied())
        }
        AggregateMode::Count => {
            let group = index.group().reduce_count();
            complete(keys, |key| group.get(key).map(|&count| count as f64))
        }
    };

    debug!(?mode, keys = keys.len(), "aggregated categories");
    totals
}

/// Sum of all values, for a single "total" readout.
pub fn grand_total(totals: &[CategoryTotal]) -> f64 {
    totals.iter().map(|t| t.value).sum()
}

fn complete<S: AsRef<str>>(
    keys: &[S],
    lookup: impl Fn(&str) -> Option<f64>,
) -> Vec<CategoryTotal> {
    keys.iter()
        .map(|key| {
            let key = key.as_ref();
            CategoryTotal {
                key: key.to_string(),
                value: lookup(key).unwrap_or(0.0),
            }
        })
        .collect()
}
