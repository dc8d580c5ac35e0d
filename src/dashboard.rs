//! Dashboard views: the national and province compositions, built from a
//! loaded [`Dataset`] and plain filter inputs (period, Sila, province).
//!
//! Every view is recomputed from scratch on each call; nothing is cached.

use crate::config::DashboardConfig;
use crate::delta::{ChangeKind, DeltaRow, percent_growth, series_deltas};
use crate::grouping::{GroupedSequence, group_with_gaps};
use crate::models::{MetricRow, Period};
use crate::narrative::{national_insight, trend_description};
use crate::pivot::{PeriodPair, PivotTable};
use crate::source::Dataset;
use crate::stats::{ExtremumSummary, candidates, summarize_extremes};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static SILA_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*(?:sila\s*)?(\d+)\s*$").expect("static pattern"));

/// Normalize a Sila filter: `"1"`, `"sila 1"` and `"Sila 1"` all become `"Sila 1"`.
/// Anything else (e.g. `"IAP"`) is returned trimmed.
pub fn normalize_sila(input: &str) -> String {
    match SILA_CODE.captures(input) {
        Some(c) => format!("Sila {}", &c[1]),
        None => input.trim().to_string(),
    }
}

/// Province names compare case-insensitively.
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// Sorted distinct periods.
pub fn available_periods(rows: &[MetricRow]) -> Vec<Period> {
    rows.iter()
        .map(|r| r.period)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendView {
    pub rows: Vec<DeltaRow>,
    pub insight: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SnapshotView {
    pub period: Period,
    pub rows: Vec<MetricRow>,
    pub extremes: Option<ExtremumSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RadarView {
    pub province: String,
    pub period: Period,
    pub axes: Vec<(String, f64)>,
    /// Province total for the same period (`TAHUN_PROVINSI`).
    pub iap: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StackedBar {
    pub province: String,
    pub parts: Vec<(String, f64)>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogEntry {
    pub sila: String,
    /// `"<code> <name>"`, deduplicated, in order of first appearance.
    pub indicators: Vec<String>,
}

/// Views over one dataset with one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Dashboard<'a> {
    pub data: &'a Dataset,
    pub config: &'a DashboardConfig,
}

impl<'a> Dashboard<'a> {
    pub fn new(data: &'a Dataset, config: &'a DashboardConfig) -> Self {
        Self { data, config }
    }

    fn locale(&self) -> &str {
        &self.config.locale
    }

    fn is_aggregate(&self, group: &str) -> bool {
        self.config
            .aggregate_groups
            .iter()
            .any(|g| g.eq_ignore_ascii_case(group.trim()))
    }

    // ---------------------------------------------------------------- national

    pub fn national_periods(&self) -> Vec<Period> {
        available_periods(&self.data.national_rows())
    }

    /// Sorted distinct Sila codes of `PER_SILA`.
    pub fn available_sila(&self) -> Vec<String> {
        self.data
            .sila
            .iter()
            .map(|r| r.sila.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// National index per year with point deltas and the insight sentence.
    pub fn national_trend(&self) -> TrendView {
        let series = self.data.national_rows();
        let rows = series_deltas(&series, ChangeKind::PointDelta, self.config.baseline_period);
        let periods = available_periods(&series);
        let insight = periods.last().and_then(|&latest| {
            let previous = periods.iter().rev().nth(1).copied();
            national_insight(
                &series,
                latest,
                previous,
                self.config.baseline_period,
                self.locale(),
            )
        });
        TrendView { rows, insight }
    }

    /// Sila values for one period with their extremes.
    pub fn sila_for_period(&self, period: Period) -> SnapshotView {
        let rows: Vec<MetricRow> = self
            .data
            .sila_rows()
            .into_iter()
            .filter(|r| r.period == period)
            .collect();
        let extremes = summarize_extremes(&candidates(&rows, false));
        SnapshotView {
            period,
            rows,
            extremes,
        }
    }

    /// Indicator bars for one period, grouped by Sila with gaps between groups.
    pub fn indicator_chart_for_period(&self, period: Period) -> GroupedSequence<MetricRow> {
        let mut rows: Vec<MetricRow> = self
            .data
            .indicator_rows()
            .into_iter()
            .filter(|r| r.period == period)
            .collect();
        rows.sort_by(|a, b| a.group().cmp(b.group()));
        group_with_gaps(&rows, |r| r.group())
    }

    /// One Sila across periods with percentage growth.
    pub fn sila_trend(&self, sila: &str) -> Vec<DeltaRow> {
        let sila = normalize_sila(sila);
        let rows: Vec<MetricRow> = self
            .data
            .sila_rows()
            .into_iter()
            .filter(|r| r.entity == sila)
            .collect();
        percent_growth(&rows)
    }

    /// Indicators of one Sila across periods, one run per indicator.
    pub fn indicator_trend_for_sila(&self, sila: &str) -> GroupedSequence<DeltaRow> {
        let sila = normalize_sila(sila);
        let rows: Vec<MetricRow> = self
            .data
            .indicator_rows()
            .into_iter()
            .filter(|r| r.group() == sila)
            .collect();
        group_with_gaps(&percent_growth(&rows), |d| d.row.entity.as_str())
    }

    /// Sila × period table with latest-vs-earliest and latest-vs-previous deltas.
    pub fn sila_table(&self, periods: &[Period]) -> PivotTable {
        let table = PivotTable::build(&self.data.sila_rows(), periods);
        let pairs: Vec<PeriodPair> = [
            PeriodPair::latest_vs_earliest(&table.periods),
            PeriodPair::latest_vs_previous(&table.periods),
        ]
        .into_iter()
        .flatten()
        .collect();
        table.with_pairs(pairs)
    }

    // --------------------------------------------------------------- provinces

    fn province_period_list(&self) -> Vec<Period> {
        available_periods(&self.data.province_sila_rows())
    }

    /// Province × period table for one Sila (or the `IAP` total), with each
    /// period compared to the one before it.
    pub fn province_table(&self, sila: &str) -> PivotTable {
        let sila = normalize_sila(sila);
        let rows: Vec<MetricRow> = self
            .data
            .province_sila_rows()
            .into_iter()
            .filter(|r| r.group().eq_ignore_ascii_case(&sila))
            .collect();
        PivotTable::build(&rows, &self.province_period_list()).with_consecutive_deltas()
    }

    /// The expanded rows under one province of [`Self::province_table`].
    pub fn province_indicator_table(&self, province: &str, sila: &str) -> PivotTable {
        let rows = self.province_indicator_rows(province, sila);
        PivotTable::build(&rows, &self.province_period_list()).with_consecutive_deltas()
    }

    fn province_indicator_rows(&self, province: &str, sila: &str) -> Vec<MetricRow> {
        let sila = normalize_sila(sila);
        self.data
            .province_indicators
            .iter()
            .filter(|r| same_name(&r.provinsi, province) && r.sila.eq_ignore_ascii_case(&sila))
            .map(MetricRow::from)
            .collect()
    }

    /// Province index per year with point deltas and a description.
    pub fn province_trend(&self, province: &str) -> TrendView {
        let series: Vec<MetricRow> = self
            .data
            .provinces
            .iter()
            .filter(|r| same_name(&r.provinsi, province))
            .map(MetricRow::from)
            .collect();
        let rows = series_deltas(&series, ChangeKind::PointDelta, None);
        TrendView {
            rows,
            insight: trend_description(&series),
        }
    }

    /// Indicator bars of one province and Sila: one run per indicator, bars
    /// per period, percentage growth versus the previous period.
    pub fn province_indicator_chart(&self, province: &str, sila: &str) -> GroupedSequence<DeltaRow> {
        let mut rows = self.province_indicator_rows(province, sila);
        rows.sort_by(|a, b| a.entity.cmp(&b.entity).then(a.period.cmp(&b.period)));
        group_with_gaps(&percent_growth(&rows), |d| d.row.entity.as_str())
    }

    /// Sila values of one province for a period. With `period = None` the
    /// latest period with data is used.
    pub fn province_radar(&self, province: &str, period: Option<Period>) -> Option<RadarView> {
        let rows: Vec<_> = self
            .data
            .province_sila
            .iter()
            .filter(|r| same_name(&r.provinsi, province))
            .collect();
        let period = match period {
            Some(p) => p,
            None => rows.iter().map(|r| r.tahun).max()?,
        };
        let axes: Vec<(String, f64)> = rows
            .iter()
            .filter(|r| r.tahun == period && !self.is_aggregate(&r.sila))
            .filter_map(|r| r.nilai.map(|v| (r.sila.clone(), v)))
            .collect();
        if axes.is_empty() {
            return None;
        }
        let iap = self
            .data
            .provinces
            .iter()
            .find(|r| same_name(&r.provinsi, province) && r.tahun == period)
            .and_then(|r| r.nilai);
        let province = rows
            .first()
            .map(|r| r.provinsi.clone())
            .unwrap_or_else(|| province.to_string());
        Some(RadarView {
            province,
            period,
            axes,
            iap,
        })
    }

    /// Provinces for one Sila and period, ascending by value, with extremes.
    pub fn province_ranking(&self, sila: &str, period: Period) -> SnapshotView {
        let sila = normalize_sila(sila);
        let mut rows: Vec<MetricRow> = self
            .data
            .province_sila_rows()
            .into_iter()
            .filter(|r| r.period == period && r.group().eq_ignore_ascii_case(&sila))
            .collect();
        rows.sort_by(|a, b| {
            a.value
                .unwrap_or(f64::NEG_INFINITY)
                .total_cmp(&b.value.unwrap_or(f64::NEG_INFINITY))
        });
        let extremes = summarize_extremes(&candidates(&rows, false));
        SnapshotView {
            period,
            rows,
            extremes,
        }
    }

    /// Stacked Sila components per province for one period, ascending by total.
    pub fn province_stacked(&self, period: Period) -> Vec<StackedBar> {
        let mut bars: Vec<StackedBar> = Vec::new();
        for r in self
            .data
            .province_sila
            .iter()
            .filter(|r| r.tahun == period && !self.is_aggregate(&r.sila))
        {
            let Some(v) = r.nilai else { continue };
            match bars.iter_mut().find(|b| b.province == r.provinsi) {
                Some(b) => {
                    b.parts.push((r.sila.clone(), v));
                    b.total += v;
                }
                None => bars.push(StackedBar {
                    province: r.provinsi.clone(),
                    parts: vec![(r.sila.clone(), v)],
                    total: v,
                }),
            }
        }
        bars.sort_by(|a, b| a.total.total_cmp(&b.total));
        bars
    }

    /// Indicator codes and names per Sila.
    pub fn indicator_catalog(&self) -> Vec<CatalogEntry> {
        let mut out: Vec<CatalogEntry> = Vec::new();
        for r in &self.data.indicators {
            let item = format!("{} {}", r.indikator, r.indikator_nama).trim().to_string();
            let pos = match out.iter().position(|e| e.sila == r.sila) {
                Some(i) => i,
                None => {
                    out.push(CatalogEntry {
                        sila: r.sila.clone(),
                        indicators: Vec::new(),
                    });
                    out.len() - 1
                }
            };
            if !out[pos].indicators.contains(&item) {
                out[pos].indicators.push(item);
            }
        }
        out
    }
}
