//! Reductions over grouped records that feed individual dashboard cards.
//!
//! Every reduction returns `None` or an empty collection when there is
//! nothing to reduce. Ties go to the first entry in iteration order, which for
//! the string-keyed groups is the order buckets were first seen.

use crate::models::FinishRecord;
use chrono::Duration;

pub fn max_by_count<'a, K, V, I>(groups: I) -> Option<(&'a K, usize)>
where
    I: IntoIterator<Item = (&'a K, &'a Vec<V>)>,
    K: 'a,
    V: 'a,
{
    let mut best: Option<(&K, usize)> = None;
    for (key, values) in groups {
        if best.is_none_or(|(_, count)| values.len() > count) {
            best = Some((key, values.len()));
        }
    }
    best
}

pub fn min_by_count<'a, K, V, I>(groups: I) -> Option<(&'a K, usize)>
where
    I: IntoIterator<Item = (&'a K, &'a Vec<V>)>,
    K: 'a,
    V: 'a,
{
    let mut best: Option<(&K, usize)> = None;
    for (key, values) in groups {
        if best.is_none_or(|(_, count)| values.len() < count) {
            best = Some((key, values.len()));
        }
    }
    best
}

pub fn max_by_metric<'a, K, V, I, F>(groups: I, metric: F) -> Option<(&'a K, f64)>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: 'a,
    V: 'a,
    F: Fn(&K, &V) -> f64,
{
    let mut best: Option<(&K, f64)> = None;
    for (key, value) in groups {
        let score = metric(key, value);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((key, score));
        }
    }
    best
}

pub fn min_by_metric<'a, K, V, I, F>(groups: I, metric: F) -> Option<(&'a K, f64)>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: 'a,
    V: 'a,
    F: Fn(&K, &V) -> f64,
{
    let mut best: Option<(&K, f64)> = None;
    for (key, value) in groups {
        let score = metric(key, value);
        if best.is_none_or(|(_, low)| score < low) {
            best = Some((key, score));
        }
    }
    best
}

/// Highest `n` entries by `metric`, descending. Equal scores keep iteration
/// order.
pub fn top_n<'a, K, V, I, F>(groups: I, n: usize, metric: F) -> Vec<(&'a K, f64)>
where
    I: IntoIterator<Item = (&'a K, &'a V)>,
    K: 'a,
    V: 'a,
    F: Fn(&K, &V) -> f64,
{
    let mut scored: Vec<(&K, f64)> = groups
        .into_iter()
        .map(|(key, value)| (key, metric(key, value)))
        .collect();
    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(n);
    scored
}

/// Finishes ordered by `created_on`, oldest first. Same-instant records keep
/// their input order.
pub fn chronological<'a, I>(records: I) -> Vec<&'a FinishRecord>
where
    I: IntoIterator<Item = &'a FinishRecord>,
{
    let mut ordered: Vec<&FinishRecord> = records.into_iter().collect();
    ordered.sort_by_key(|record| record.created_on);
    ordered
}

pub fn cumulative_series<'a, F>(ordered: &[&'a FinishRecord], value: F) -> Vec<(&'a FinishRecord, f64)>
where
    F: Fn(&FinishRecord) -> f64,
{
    let mut total = 0.0;
    ordered
        .iter()
        .map(|record| {
            total += value(*record);
            (*record, total)
        })
        .collect()
}

pub fn running_average<'a, F>(ordered: &[&'a FinishRecord], value: F) -> Vec<(&'a FinishRecord, f64)>
where
    F: Fn(&FinishRecord) -> f64,
{
    cumulative_series(ordered, value)
        .into_iter()
        .enumerate()
        .map(|(index, (record, total))| (record, total / (index + 1) as f64))
        .collect()
}

/// Time between two consecutive finishes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gap<'a> {
    pub previous: &'a FinishRecord,
    pub next: &'a FinishRecord,
}

impl Gap<'_> {
    pub fn duration(&self) -> Duration {
        self.next.created_on - self.previous.created_on
    }
}

fn gaps<'a, 'b>(ordered: &'b [&'a FinishRecord]) -> impl Iterator<Item = Gap<'a>> + 'b {
    ordered.windows(2).map(|pair| Gap {
        previous: pair[0],
        next: pair[1],
    })
}

pub fn longest_gap<'a>(ordered: &[&'a FinishRecord]) -> Option<Gap<'a>> {
    let mut best: Option<Gap<'a>> = None;
    for gap in gaps(ordered) {
        if best.is_none_or(|top| gap.duration() > top.duration()) {
            best = Some(gap);
        }
    }
    best
}

pub fn shortest_gap<'a>(ordered: &[&'a FinishRecord]) -> Option<Gap<'a>> {
    let mut best: Option<Gap<'a>> = None;
    for gap in gaps(ordered) {
        if best.is_none_or(|low| gap.duration() < low.duration()) {
            best = Some(gap);
        }
    }
    best
}

pub fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    part as f64 / whole as f64 * 100.0
}

pub fn total_points<'a, I>(records: I) -> u64
where
    I: IntoIterator<Item = &'a FinishRecord>,
{
    records
        .into_iter()
        .map(|record| u64::from(record.points))
        .sum()
}

pub fn total_time<'a, I>(records: I) -> f64
where
    I: IntoIterator<Item = &'a FinishRecord>,
{
    records.into_iter().map(|record| record.time).sum()
}
