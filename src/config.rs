//! Dashboard configuration. Defaults match the bundled workbook (sheet names,
//! 2021 baseline, Sila colors); a JSON file can override any field.

use crate::models::Period;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Sheet names inside the workbook (or file stems in a CSV directory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub national: String,
    pub sila: String,
    pub indicators: String,
    pub provinces: String,
    pub province_sila: String,
    pub province_indicators: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            national: "IAP_TAHUN".into(),
            sila: "PER_SILA".into(),
            indicators: "PER_INDIKATOR".into(),
            provinces: "TAHUN_PROVINSI".into(),
            province_sila: "SILA_PROVINSI".into(),
            province_indicators: "INDIKATOR_PROVINSI".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub sheets: SheetNames,
    /// Reference period for baseline comparisons.
    pub baseline_period: Option<Period>,
    /// Locale tag for number display (see `format::map_locale`).
    pub locale: String,
    /// Bar colors per group key, as `#RRGGBB`.
    pub group_colors: BTreeMap<String, String>,
    /// Group keys that hold a total rather than a component (the `IAP` row of
    /// `SILA_PROVINSI`); left out of radar and stacked views.
    pub aggregate_groups: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let group_colors = [
            ("Sila 1", "#D32F2F"),
            ("Sila 2", "#F57C00"),
            ("Sila 3", "#FBC02D"),
            ("Sila 4", "#388E3C"),
            ("Sila 5", "#1976D2"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        Self {
            sheets: SheetNames::default(),
            baseline_period: Some(2021),
            locale: "en".into(),
            group_colors,
            aggregate_groups: vec!["IAP".into()],
        }
    }
}

impl DashboardConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let cfg: DashboardConfig = serde_json::from_str(&text)
            .with_context(|| format!("invalid config JSON: {}", path.display()))?;
        Ok(cfg)
    }
}
