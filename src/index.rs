//! Grouping and aggregation over a dataset by a key projection.
//!
//! An [`Index`] pairs every record with the key produced by its projection
//! (day or type). [`Index::group`] opens a [`Grouping`], and reducing that
//! grouping yields a [`ReducedGroup`]: one accumulator per distinct key, kept
//! in ascending key order.
//!
//! Reducers come in add/remove pairs so an accumulator can follow records
//! coming and going. The result after any sequence of adds and removes must
//! match a fresh reduction over the surviving records.

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::dataset::Dataset;
use crate::types::{DayKey, Record};

type KeyFn<'a, K> = Box<dyn Fn(&Record) -> K + 'a>;
type ReduceFn<'r, V> = Box<dyn Fn(&mut V, &Record) + 'r>;
type InitFn<'r, V> = Box<dyn Fn() -> V + 'r>;

// ============================================================================
// Index
// ============================================================================

/// A dataset viewed through one key projection.
pub struct Index<'a, K> {
    dataset: &'a Dataset,
    key_fn: KeyFn<'a, K>,
}

impl<'a, K: Ord + Clone> Index<'a, K> {
    pub fn new(dataset: &'a Dataset, key_fn: impl Fn(&Record) -> K + 'a) -> Self {
        Self {
            dataset,
            key_fn: Box::new(key_fn),
        }
    }

    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// Key of a record under this index's projection.
    #[inline]
    pub fn key_of(&self, record: &Record) -> K {
        (self.key_fn)(record)
    }

    pub fn group(&self) -> Grouping<'_, 'a, K> {
        Grouping { index: self }
    }
}

impl<'a> Index<'a, DayKey> {
    /// Date dimension.
    pub fn by_day(dataset: &'a Dataset) -> Self {
        Self::new(dataset, Record::day)
    }
}

impl<'a> Index<'a, Arc<str>> {
    /// Type dimension.
    pub fn by_type(dataset: &'a Dataset) -> Self {
        Self::new(dataset, |r: &Record| Arc::clone(&r.kind))
    }
}

// ============================================================================
// Grouping
// ============================================================================

/// Grouping of an index by its key, awaiting a reducer.
pub struct Grouping<'i, 'a, K> {
    index: &'i Index<'a, K>,
}

impl<'i, 'a, K: Ord + Clone> Grouping<'i, 'a, K> {
    /// Reduce with custom add/remove/initial functions.
    ///
    /// Every record creates its key, even when `add` leaves the
    /// accumulator untouched.
    pub fn reduce<V>(
        self,
        add: impl Fn(&mut V, &Record) + 'i,
        remove: impl Fn(&mut V, &Record) + 'i,
        initial: impl Fn() -> V + 'i,
    ) -> ReducedGroup<'i, K, V> {
        let mut group = ReducedGroup {
            index_key: &*self.index.key_fn,
            groups: BTreeMap::new(),
            add: Box::new(add),
            remove: Box::new(remove),
            initial: Box::new(initial),
        };
        for record in self.index.dataset.records() {
            group.add(record);
        }
        group
    }

    /// Sum of `value_fn` per key.
    pub fn reduce_sum(
        self,
        value_fn: impl Fn(&Record) -> f64 + Clone + 'i,
    ) -> ReducedGroup<'i, K, f64> {
        let remove_fn = value_fn.clone();
        self.reduce(
            move |acc: &mut f64, r: &Record| *acc += value_fn(r),
            move |acc: &mut f64, r: &Record| *acc -= remove_fn(r),
            || 0.0,
        )
    }

    /// Record count per key.
    pub fn reduce_count(self) -> ReducedGroup<'i, K, u64> {
        self.reduce(
            |acc: &mut u64, _: &Record| *acc += 1,
            |acc: &mut u64, _: &Record| *acc = acc.saturating_sub(1),
            || 0,
        )
    }
}

// ============================================================================
// ReducedGroup
// ============================================================================

/// One accumulator per key, ascending by key.
pub struct ReducedGroup<'r, K, V> {
    index_key: &'r (dyn Fn(&Record) -> K + 'r),
    groups: BTreeMap<K, V>,
    add: ReduceFn<'r, V>,
    remove: ReduceFn<'r, V>,
    initial: InitFn<'r, V>,
}

impl<K: Ord + Clone, V> ReducedGroup<'_, K, V> {
    /// Fold a record in.
    pub fn add(&mut self, record: &Record) {
        let key = (self.index_key)(record);
        let acc = self.groups.entry(key).or_insert_with(&self.initial);
        (self.add)(acc, record);
    }

    /// Fold a previously added record back out.
    ///
    /// The key stays present even when its last record leaves.
    pub fn remove(&mut self, record: &Record) {
        let key = (self.index_key)(record);
        let acc = self.groups.entry(key).or_insert_with(&self.initial);
        (self.remove)(acc, record);
    }

    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.groups.get(key)
    }

    /// All `(key, accumulator)` pairs in ascending key order.
    pub fn all(&self) -> impl Iterator<Item = (&K, &V)> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::build;
    use crate::types::{RawInput, RawRecord};

    fn sample() -> Dataset {
        let mut raw = RawInput::new();
        raw.insert(
            "views".to_string(),
            vec![
                RawRecord { date: "2024-01-01".into(), total: 1.0 },
                RawRecord { date: "2024-01-01".into(), total: 1.0 },
                RawRecord { date: "2024-01-03".into(), total: 1.0 },
            ],
        );
        raw.insert(
            "votes".to_string(),
            vec![
                RawRecord { date: "2024-01-01T10:00:00".into(), total: 4.0 },
                RawRecord { date: "2024-01-02".into(), total: 2.0 },
            ],
        );
        build(&raw).expect("build")
    }

    #[test]
    fn group_by_day_sums_and_orders_keys() {
        let dataset = sample();
        let index = Index::by_day(&dataset);
        let group = index.group().reduce_sum(|r| r.total);

        let all: Vec<(String, f64)> = group.all().map(|(k, v)| (k.to_string(), *v)).collect();
        assert_eq!(
            all,
            vec![
                ("2024-01-01".to_string(), 6.0),
                ("2024-01-02".to_string(), 2.0),
                ("2024-01-03".to_string(), 1.0),
            ]
        );
    }

    #[test]
    fn group_by_type_counts() {
        let dataset = sample();
        let index = Index::by_type(&dataset);
        let group = index.group().reduce_count();

        assert_eq!(group.len(), 2);
        assert_eq!(group.get("views"), Some(&3));
        assert_eq!(group.get("votes"), Some(&2));
        assert_eq!(group.get("comments"), None);
    }

    #[test]
    fn custom_reducer_creates_keys_for_every_record() {
        let dataset = sample();
        let index = Index::by_day(&dataset);
        let group = index.group().reduce(
            |acc: &mut f64, r| {
                if r.kind() == "votes" {
                    *acc += r.total;
                }
            },
            |acc: &mut f64, r| {
                if r.kind() == "votes" {
                    *acc -= r.total;
                }
            },
            || 0.0,
        );

        // 2024-01-03 has only a view, so it exists with a zero accumulator.
        let jan3 = DayKey::parse("2024-01-03").unwrap();
        assert_eq!(group.get(&jan3), Some(&0.0));
        assert_eq!(group.len(), 3);
    }

    #[test]
    fn incremental_add_remove_matches_recompute() {
        let dataset = sample();
        let index = Index::by_type(&dataset);
        let mut group = index.group().reduce_sum(|r| r.total);

        let records = dataset.records();
        // Remove two records, re-add one, remove a third.
        group.remove(&records[0]);
        group.remove(&records[4]);
        group.add(&records[0]);
        group.remove(&records[3]);

        let survivors: Dataset = records
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != 3 && *i != 4)
            .map(|(_, r)| r.clone())
            .collect();
        let fresh_index = Index::by_type(&survivors);
        let fresh = fresh_index.group().reduce_sum(|r| r.total);

        for (key, value) in fresh.all() {
            assert_eq!(group.get(key), Some(value), "mismatch for {key}");
        }
        // Emptied keys remain with a zero accumulator.
        assert_eq!(group.get("votes"), Some(&0.0));
    }

    #[test]
    fn key_of_uses_projection() {
        let dataset = sample();
        let index = Index::by_day(&dataset);
        let first = &dataset.records()[0];
        assert_eq!(index.key_of(first), first.day());
        assert_eq!(index.dataset().len(), 5);
    }
}
