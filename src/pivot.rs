//! Fold flat `(entity, period, value)` rows into one wide record per entity.

use crate::models::{MetricRow, Period};
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Two periods compared as `value[later] - value[earlier]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPair {
    pub later: Period,
    pub earlier: Period,
}

impl PeriodPair {
    pub fn new(later: Period, earlier: Period) -> Self {
        Self { later, earlier }
    }

    /// Each period against the one before it: `[p1 vs p0, p2 vs p1, ...]`.
    pub fn consecutive(periods: &[Period]) -> Vec<PeriodPair> {
        periods
            .windows(2)
            .map(|w| PeriodPair::new(w[1], w[0]))
            .collect()
    }

    pub fn latest_vs_earliest(periods: &[Period]) -> Option<PeriodPair> {
        let earliest = *periods.iter().min()?;
        let latest = *periods.iter().max()?;
        (latest != earliest).then(|| PeriodPair::new(latest, earliest))
    }

    pub fn latest_vs_previous(periods: &[Period]) -> Option<PeriodPair> {
        let sorted: BTreeSet<Period> = periods.iter().copied().collect();
        let mut it = sorted.iter().rev();
        let latest = *it.next()?;
        let previous = *it.next()?;
        Some(PeriodPair::new(latest, previous))
    }
}

/// One row of a pivot table. `cells` and `deltas` are aligned with the
/// owning table's `periods` and `pairs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotRecord {
    pub entity: String,
    pub label: Option<String>,
    /// `None` while the period is unobserved or its value is missing.
    pub cells: Vec<Option<f64>>,
    pub deltas: Vec<Option<f64>>,
}

impl PivotRecord {
    /// Sum of observed cells (0.0 when nothing is observed).
    pub fn total(&self) -> f64 {
        self.cells.iter().flatten().sum()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PivotTable {
    pub periods: Vec<Period>,
    pub pairs: Vec<PeriodPair>,
    pub records: Vec<PivotRecord>,
}

impl PivotTable {
    /// Fold `rows` by entity. With an empty `periods` slice the table declares
    /// the sorted distinct periods of the input. Rows for undeclared periods
    /// are ignored.
    pub fn build(rows: &[MetricRow], periods: &[Period]) -> Self {
        let periods: Vec<Period> = if periods.is_empty() {
            rows.iter()
                .map(|r| r.period)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect()
        } else {
            periods.to_vec()
        };

        let mut position: AHashMap<String, usize> = AHashMap::new();
        let mut records: Vec<PivotRecord> = Vec::new();
        for r in rows {
            let idx = *position.entry(r.entity.clone()).or_insert_with(|| {
                records.push(PivotRecord {
                    entity: r.entity.clone(),
                    label: r.label.clone(),
                    cells: vec![None; periods.len()],
                    deltas: Vec::new(),
                });
                records.len() - 1
            });
            if let Some(col) = periods.iter().position(|p| *p == r.period) {
                records[idx].cells[col] = r.value;
            }
        }

        PivotTable {
            periods,
            pairs: Vec::new(),
            records,
        }
    }

    /// Compute one delta column per pair; replaces previously computed deltas.
    pub fn with_pairs(mut self, pairs: Vec<PeriodPair>) -> Self {
        let periods = &self.periods;
        for rec in self.records.iter_mut() {
            let view: &PivotRecord = rec;
            let deltas: Vec<Option<f64>> = pairs
                .iter()
                .map(|pair| {
                    let later = cell(periods, view, pair.later)?;
                    let earlier = cell(periods, view, pair.earlier)?;
                    Some(later - earlier)
                })
                .collect();
            rec.deltas = deltas;
        }
        self.pairs = pairs;
        self
    }

    /// Shorthand for `with_pairs(PeriodPair::consecutive(periods))`.
    pub fn with_consecutive_deltas(self) -> Self {
        let pairs = PeriodPair::consecutive(&self.periods);
        self.with_pairs(pairs)
    }

    pub fn record(&self, entity: &str) -> Option<&PivotRecord> {
        self.records.iter().find(|r| r.entity == entity)
    }

    /// Read a cell back by entity and period.
    pub fn value(&self, entity: &str, period: Period) -> Option<f64> {
        cell(&self.periods, self.record(entity)?, period)
    }

    /// Delta for `pair`, if that pair was computed.
    pub fn delta(&self, entity: &str, pair: PeriodPair) -> Option<f64> {
        let col = self.pairs.iter().position(|p| *p == pair)?;
        *self.record(entity)?.deltas.get(col)?
    }

    /// Re-sort records ascending by their observed total (stable).
    pub fn sort_by_total(mut self) -> Self {
        self.records.sort_by(|a, b| a.total().total_cmp(&b.total()));
        self
    }
}

fn cell(periods: &[Period], rec: &PivotRecord, period: Period) -> Option<f64> {
    let col = periods.iter().position(|p| *p == period)?;
    *rec.cells.get(col)?
}
