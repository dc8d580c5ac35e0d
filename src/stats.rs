use crate::models::{MetricRow, SeriesKey};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Highest and lowest candidates of a set, ties included.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ExtremumSummary {
    Spread {
        top_entities: Vec<String>,
        top_value: f64,
        bottom_entities: Vec<String>,
        bottom_value: f64,
    },
    /// Every candidate shares one value.
    AllEqual { value: f64 },
}

impl ExtremumSummary {
    /// Top labels as a readable list ("X dan Y"); empty for `AllEqual`.
    pub fn top_label(&self) -> String {
        match self {
            ExtremumSummary::Spread { top_entities, .. } => join_natural(top_entities),
            ExtremumSummary::AllEqual { .. } => String::new(),
        }
    }

    pub fn bottom_label(&self) -> String {
        match self {
            ExtremumSummary::Spread {
                bottom_entities, ..
            } => join_natural(bottom_entities),
            ExtremumSummary::AllEqual { .. } => String::new(),
        }
    }
}

/// Find all labels at the maximum and at the minimum value.
///
/// Returns `None` when there is no finite candidate. Labels keep their input
/// order inside each tie set.
pub fn summarize_extremes<S: AsRef<str>>(candidates: &[(S, f64)]) -> Option<ExtremumSummary> {
    let finite: Vec<(&str, f64)> = candidates
        .iter()
        .filter(|(_, v)| v.is_finite())
        .map(|(l, v)| (l.as_ref(), *v))
        .collect();
    let max = finite.iter().map(|(_, v)| *v).reduce(f64::max)?;
    let min = finite.iter().map(|(_, v)| *v).reduce(f64::min)?;
    if max == min {
        return Some(ExtremumSummary::AllEqual { value: max });
    }
    let at = |target: f64| -> Vec<String> {
        finite
            .iter()
            .filter(|(_, v)| *v == target)
            .map(|(l, _)| l.to_string())
            .collect()
    };
    Some(ExtremumSummary::Spread {
        top_entities: at(max),
        top_value: max,
        bottom_entities: at(min),
        bottom_value: min,
    })
}

/// Candidates from rows: label (or entity) paired with the value; rows
/// without a value are skipped.
pub fn candidates(rows: &[MetricRow], use_label: bool) -> Vec<(String, f64)> {
    rows.iter()
        .filter_map(|r| {
            let name = match (&r.label, use_label) {
                (Some(l), true) if !l.is_empty() => l.clone(),
                _ => r.entity.clone(),
            };
            r.value.map(|v| (name, v))
        })
        .collect()
}

/// Join labels Indonesian-style: "X", "X dan Y", "X, Y, dan Z".
pub fn join_natural<S: AsRef<str>>(items: &[S]) -> String {
    join_natural_with(items, "dan")
}

pub fn join_natural_with<S: AsRef<str>>(items: &[S], conjunction: &str) -> String {
    match items {
        [] => String::new(),
        [one] => one.as_ref().to_string(),
        [a, b] => format!("{} {} {}", a.as_ref(), conjunction, b.as_ref()),
        [init @ .., last] => {
            let head: Vec<&str> = init.iter().map(|s| s.as_ref()).collect();
            format!("{}, {} {}", head.join(", "), conjunction, last.as_ref())
        }
    }
}

/// Summary statistics for a series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub key: SeriesKey,
    pub count: usize,
    pub missing: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub median: Option<f64>,
}

/// Compute statistics per (entity, group_key) series.
pub fn series_summary(rows: &[MetricRow]) -> Vec<Summary> {
    let mut groups: BTreeMap<SeriesKey, (Vec<f64>, usize)> = BTreeMap::new();
    for r in rows {
        let entry = groups.entry(r.series_key()).or_default();
        match r.value {
            Some(v) => entry.0.push(v),
            None => entry.1 += 1,
        }
    }

    let mut out = Vec::new();
    for (key, (mut vals, missing)) in groups {
        vals.sort_by(|a, b| a.total_cmp(b));
        let count = vals.len();
        let min = vals.first().cloned();
        let max = vals.last().cloned();
        let mean = if count > 0 {
            Some(vals.iter().copied().sum::<f64>() / count as f64)
        } else {
            None
        };
        let median = if count == 0 {
            None
        } else if count % 2 == 1 {
            Some(vals[count / 2])
        } else {
            Some((vals[count / 2 - 1] + vals[count / 2]) / 2.0)
        };
        out.push(Summary {
            key,
            count,
            missing,
            min,
            max,
            mean,
            median,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn natural_join_forms() {
        let none: [&str; 0] = [];
        assert_eq!(join_natural(&none), "");
        assert_eq!(join_natural(&["A"]), "A");
        assert_eq!(join_natural(&["A", "B"]), "A dan B");
        assert_eq!(join_natural(&["A", "B", "C"]), "A, B, dan C");
        assert_eq!(join_natural_with(&["A", "B"], "and"), "A and B");
    }
}
