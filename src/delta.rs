//! Period-over-period changes for row series.
//!
//! Two distinct operations are offered and never conflated:
//! - **point delta**: `value[i] - value[i-1]`, in index points
//! - **percentage growth**: `(value[i] - value[i-1]) / value[i-1] * 100`
//!
//! Rows are grouped by [`SeriesKey`] (entity + group key). Series keep the order
//! in which they first appear; rows inside a series are sorted by period.

use crate::models::{MetricRow, Period, SeriesKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which change a computation reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    PointDelta,
    PercentGrowth,
}

impl ChangeKind {
    /// Change from `prev` to `curr`. `None` when either side is missing or,
    /// for growth, when `prev` is zero.
    pub fn between(self, prev: Option<f64>, curr: Option<f64>) -> Option<f64> {
        let (p, c) = (prev?, curr?);
        match self {
            ChangeKind::PointDelta => Some(c - p),
            ChangeKind::PercentGrowth => {
                if p == 0.0 {
                    None
                } else {
                    Some((c - p) / p * 100.0)
                }
            }
        }
    }
}

/// A row plus its change versus the previous period of the same series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeltaRow {
    pub row: MetricRow,
    pub delta: Option<f64>,
    /// Change versus the series' baseline-period value, when a baseline was requested.
    pub baseline_delta: Option<f64>,
}

/// Split rows into series (first-appearance order), each sorted by period.
///
/// The sort is stable: rows sharing a period keep their input order.
pub fn split_series(rows: &[MetricRow]) -> Vec<(SeriesKey, Vec<MetricRow>)> {
    let mut position: HashMap<SeriesKey, usize> = HashMap::new();
    let mut out: Vec<(SeriesKey, Vec<MetricRow>)> = Vec::new();
    for r in rows {
        let key = r.series_key();
        match position.get(&key) {
            Some(&i) => out[i].1.push(r.clone()),
            None => {
                position.insert(key.clone(), out.len());
                out.push((key, vec![r.clone()]));
            }
        }
    }
    for (_, series) in out.iter_mut() {
        series.sort_by_key(|r| r.period);
    }
    out
}

/// General form: per-row change of `kind`, optionally against a baseline period.
pub fn series_deltas(rows: &[MetricRow], kind: ChangeKind, baseline: Option<Period>) -> Vec<DeltaRow> {
    let mut out = Vec::with_capacity(rows.len());
    for (_, series) in split_series(rows) {
        let base_value = baseline.and_then(|b| value_at(&series, b));
        let mut prev: Option<&MetricRow> = None;
        for r in &series {
            let delta = prev.and_then(|p| kind.between(p.value, r.value));
            let baseline_delta = match baseline {
                Some(_) => kind.between(base_value, r.value),
                None => None,
            };
            out.push(DeltaRow {
                row: r.clone(),
                delta,
                baseline_delta,
            });
            prev = Some(r);
        }
    }
    out
}

/// Point differences versus the preceding period.
pub fn point_deltas(rows: &[MetricRow]) -> Vec<DeltaRow> {
    series_deltas(rows, ChangeKind::PointDelta, None)
}

/// Percentage growth versus the preceding period.
pub fn percent_growth(rows: &[MetricRow]) -> Vec<DeltaRow> {
    series_deltas(rows, ChangeKind::PercentGrowth, None)
}

/// Compare the last period of one series with its `baseline` period.
///
/// `series` must hold a single series; it need not be sorted.
pub fn baseline_change(series: &[MetricRow], baseline: Period, kind: ChangeKind) -> Option<f64> {
    let last = series.iter().max_by_key(|r| r.period)?;
    kind.between(value_at(series, baseline), last.value)
}

/// Value observed at `period`, if any.
pub fn value_at(series: &[MetricRow], period: Period) -> Option<f64> {
    series.iter().find(|r| r.period == period).and_then(|r| r.value)
}
