//! What a bar chart needs to know about a row.

use crate::delta::DeltaRow;
use crate::models::MetricRow;
use std::collections::BTreeMap;

/// Bar colors keyed by group (`"Sila 1" -> "#D32F2F"`).
pub type Palette = BTreeMap<String, String>;

/// One bar of a grouped bar chart.
pub trait BarDatum {
    /// Text under the bar.
    fn tick_label(&self) -> String;
    fn bar_value(&self) -> Option<f64>;
    /// Key looked up in the [`Palette`].
    fn color_key(&self) -> &str;
    /// Percentage change printed above the bar, if any.
    fn growth(&self) -> Option<f64> {
        None
    }
}

/// Snapshot bars: one bar per entity (indicator code, Sila, province).
impl BarDatum for MetricRow {
    fn tick_label(&self) -> String {
        self.entity.clone()
    }

    fn bar_value(&self) -> Option<f64> {
        self.value
    }

    fn color_key(&self) -> &str {
        self.group_key.as_deref().unwrap_or(&self.entity)
    }
}

/// Trend bars: one bar per period, labeled with the growth versus the previous one.
impl BarDatum for DeltaRow {
    fn tick_label(&self) -> String {
        self.row.period.to_string()
    }

    fn bar_value(&self) -> Option<f64> {
        self.row.value
    }

    fn color_key(&self) -> &str {
        self.row.color_key()
    }

    fn growth(&self) -> Option<f64> {
        self.delta
    }
}
