//! iap_dashboard
//!
//! Core computations of the Indeks Aktualisasi Pancasila (IAP) dashboard:
//! load the workbook once, then derive the chart and table data the dashboard
//! pages show. Pairs with the `iap` CLI.
//!
//! ### Features
//! - Load the IAP workbook (`.xlsx` and friends, a CSV directory, or JSON)
//! - Period-over-period point deltas and percentage growth per series
//! - Category grouping with gap slots and midpoint group labels for bar charts
//! - Pivot tables (entity × period) with delta columns, exported as CSV or JSON
//! - Tie-aware highest/lowest summaries ("X dan Y") and Indonesian insight text
//! - SVG bar, stacked bar and radar charts
//!
//! ### Example
//! ```no_run
//! use iap_dashboard::{Dashboard, DashboardConfig, Dataset};
//!
//! let cfg = DashboardConfig::default();
//! let data = Dataset::load("public/data/data_fixed.xlsx", &cfg.sheets)?;
//! let board = Dashboard::new(&data, &cfg);
//!
//! let trend = board.national_trend();
//! if let Some(text) = &trend.insight {
//!     println!("{text}");
//! }
//! let bars = board.indicator_chart_for_period(2024);
//! iap_dashboard::viz::plot_grouped_bars(&bars, "indikator_2024.svg", 1200, 600, "Indikator 2024", Some(&cfg.group_colors))?;
//! iap_dashboard::storage::save_pivot_csv(&board.province_table("IAP"), "provinsi.csv")?;
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod dashboard;
pub mod delta;
pub mod format;
pub mod grouping;
pub mod models;
pub mod narrative;
pub mod pivot;
pub mod source;
pub mod stats;
pub mod storage;
pub mod viz;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use models::{MetricRow, Period, SeriesKey};
pub use source::{Dataset, SourceError};
