//! Indonesian insight sentences for trend and ranking views.

use crate::delta::{ChangeKind, value_at};
use crate::format::format_value;
use crate::models::{MetricRow, Period};
use crate::stats::ExtremumSummary;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Increase,
    Decrease,
    Unchanged,
}

impl Direction {
    pub fn of(diff: f64) -> Self {
        if diff > 0.0 {
            Direction::Increase
        } else if diff < 0.0 {
            Direction::Decrease
        } else {
            Direction::Unchanged
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Direction::Increase => "meningkat",
            Direction::Decrease => "menurun",
            Direction::Unchanged => "tetap",
        }
    }
}

/// One period compared with another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    pub later: Period,
    pub later_value: f64,
    pub earlier: Period,
    pub earlier_value: f64,
    pub diff: f64,
    pub direction: Direction,
}

impl Comparison {
    /// "meningkat dibandingkan 2023 sebesar 1.20 poin (dari 70.00 menjadi 71.20)"
    pub fn phrase(&self, locale_tag: &str) -> String {
        let to = format_value(self.later_value, locale_tag);
        match self.direction {
            Direction::Unchanged => format!("tetap dibandingkan {} (tetap di {to})", self.earlier),
            d => format!(
                "{} dibandingkan {} sebesar {} poin (dari {} menjadi {to})",
                d.verb(),
                self.earlier,
                format_value(self.diff.abs(), locale_tag),
                format_value(self.earlier_value, locale_tag),
            ),
        }
    }
}

/// Compare two periods of one series; `None` if either value is missing.
pub fn compare_periods(series: &[MetricRow], later: Period, earlier: Period) -> Option<Comparison> {
    comparison(later, value_at(series, later)?, earlier, value_at(series, earlier)?)
}

fn comparison(later: Period, later_value: f64, earlier: Period, earlier_value: f64) -> Option<Comparison> {
    let diff = ChangeKind::PointDelta.between(Some(earlier_value), Some(later_value))?;
    Some(Comparison {
        later,
        later_value,
        earlier,
        earlier_value,
        diff,
        direction: Direction::of(diff),
    })
}

/// National insight: `latest` against `previous`, then against `baseline`.
///
/// `None` when `latest` has no value or neither comparison is possible.
pub fn national_insight(
    series: &[MetricRow],
    latest: Period,
    previous: Option<Period>,
    baseline: Option<Period>,
    locale_tag: &str,
) -> Option<String> {
    value_at(series, latest)?;
    let mut parts: Vec<String> = Vec::new();
    if let Some(c) = previous.and_then(|p| compare_periods(series, latest, p)) {
        parts.push(c.phrase(locale_tag));
    }
    if let Some(c) = baseline
        .filter(|b| Some(*b) != previous)
        .and_then(|b| compare_periods(series, latest, b))
    {
        parts.push(c.phrase(locale_tag));
    }
    if parts.is_empty() {
        return None;
    }
    Some(format!(
        "Capaian IAP pada tahun {latest} {}.",
        parts.join(", dan ")
    ))
}

/// Province trend description: latest period against the previous one and
/// against the first observed period.
pub fn trend_description(series: &[MetricRow]) -> Option<String> {
    let mut observed: Vec<&MetricRow> = series.iter().filter(|r| r.value.is_some()).collect();
    observed.sort_by_key(|r| r.period);
    // first observed value wins for a repeated period
    observed.dedup_by_key(|r| r.period);
    if observed.len() < 2 {
        return None;
    }
    let first = observed[0];
    let prev = observed[observed.len() - 2];
    let last = observed[observed.len() - 1];
    let vs_prev = comparison(last.period, last.value?, prev.period, prev.value?)?;

    let head = match vs_prev.direction {
        Direction::Increase => format!(
            "Capaian IAP pada tahun {} mengalami kenaikan dibandingkan tahun {}",
            last.period, prev.period
        ),
        Direction::Decrease => format!(
            "Capaian IAP pada tahun {} mengalami penurunan dibandingkan tahun {}",
            last.period, prev.period
        ),
        Direction::Unchanged => format!(
            "Capaian IAP pada tahun {} sama dengan tahun {}",
            last.period, prev.period
        ),
    };
    if first.period == prev.period {
        return Some(format!("{head}."));
    }
    let vs_first = comparison(last.period, last.value?, first.period, first.value?)?;
    let joiner = if vs_first.direction == vs_prev.direction {
        "dan"
    } else {
        "namun"
    };
    let tail = match vs_first.direction {
        Direction::Increase => format!("lebih tinggi dibanding tahun {}", first.period),
        Direction::Decrease => format!("lebih rendah dibanding tahun {}", first.period),
        Direction::Unchanged => format!("sama dengan tahun {}", first.period),
    };
    Some(format!("{head}, {joiner} {tail}."))
}

/// "Nilai tertinggi: X dan Y (80.00); terendah: Z (60.00)."
pub fn extremes_sentence(summary: &ExtremumSummary, subject: &str, locale_tag: &str) -> String {
    match summary {
        ExtremumSummary::AllEqual { value } => format!(
            "Seluruh {subject} memiliki nilai yang sama ({}).",
            format_value(*value, locale_tag)
        ),
        ExtremumSummary::Spread {
            top_value,
            bottom_value,
            ..
        } => format!(
            "{subject} dengan nilai tertinggi: {} ({}); terendah: {} ({}).",
            summary.top_label(),
            format_value(*top_value, locale_tag),
            summary.bottom_label(),
            format_value(*bottom_value, locale_tag),
        ),
    }
}
