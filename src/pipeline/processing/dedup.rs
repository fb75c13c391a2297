//! Removal of placeholder pre-retrofit evaluations.
//!
//! Exports repeat the same evaluation under several rows, and a
//! post-retrofit audit is often preceded by a pre-retrofit row carrying the
//! same entry date. Only one evaluation per type and date is kept, and a
//! pre-retrofit evaluation dated like a post-retrofit one is dropped.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::EvaluationType;

/// What dedup needs to know about an evaluation row.
pub trait DatedEvaluation {
    fn evaluation_type(&self) -> EvaluationType;
    fn entry_date(&self) -> NaiveDate;
}

/// Insertion-ordered map from entry date to the last value seen for it.
///
/// Re-inserting a date replaces the value in place, so iteration order is
/// the order in which each date was *first* seen.
#[derive(Debug, Clone)]
pub struct DateBucket<T> {
    entries: Vec<(NaiveDate, T)>,
    index: HashMap<NaiveDate, usize>,
}

impl<T> Default for DateBucket<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<T> DateBucket<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, value: T) {
        match self.index.get(&date) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(date, self.entries.len());
                self.entries.push((date, value));
            }
        }
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.index.contains_key(date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (NaiveDate, T)> {
        self.entries.into_iter()
    }

    pub fn into_values(self) -> impl Iterator<Item = T> {
        self.entries.into_iter().map(|(_, value)| value)
    }
}

/// Collapse same-date duplicates per evaluation type and drop pre-retrofit
/// evaluations shadowed by a post-retrofit one. Output order is incentive,
/// post-retrofit, then the surviving pre-retrofit evaluations.
pub fn filter_dummy_evaluations<T: DatedEvaluation>(rows: Vec<T>) -> Vec<T> {
    let mut pre = DateBucket::new();
    let mut post = DateBucket::new();
    let mut incentive = DateBucket::new();

    for row in rows {
        let date = row.entry_date();
        match row.evaluation_type() {
            EvaluationType::PreRetrofit => pre.insert(date, row),
            EvaluationType::PostRetrofit => post.insert(date, row),
            EvaluationType::Incentive => incentive.insert(date, row),
        }
    }

    let surviving_pre: Vec<T> = pre
        .into_entries()
        .filter(|(date, _)| !post.contains(date))
        .map(|(_, row)| row)
        .collect();

    let mut kept = Vec::with_capacity(incentive.len() + post.len() + surviving_pre.len());
    kept.extend(incentive.into_values());
    kept.extend(post.into_values());
    kept.extend(surviving_pre);
    kept
}
