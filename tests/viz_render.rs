mod common;

use iap_dashboard::grouping::{GroupedSequence, group_with_gaps};
use iap_dashboard::models::MetricRow;
use iap_dashboard::viz;
use iap_dashboard::{Dashboard, DashboardConfig, Dataset};
use std::fs;
use std::path::PathBuf;

fn dataset() -> Dataset {
    let dir = common::fixture_dir();
    Dataset::load(dir.path(), &DashboardConfig::default().sheets).unwrap()
}

fn render<F: Fn(&PathBuf)>(maker: F, name: &str) -> String {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(format!("{name}.svg"));
    maker(&path);
    let svg = fs::read_to_string(&path).expect("file created");
    assert!(svg.contains("<svg"), "svg has content");
    svg
}

#[test]
fn grouped_bars_carry_ticks_and_group_labels() {
    let data = dataset();
    let cfg = DashboardConfig::default();
    let board = Dashboard::new(&data, &cfg);
    let seq = board.indicator_chart_for_period(2024);

    let svg = render(
        |p| {
            viz::plot_grouped_bars(&seq, p, 900, 500, "Indikator 2024", Some(&cfg.group_colors))
                .unwrap()
        },
        "indikator",
    );
    for text in ["Indikator 2024", "X1.1", "X3.1", "Sila 1", "Sila 2", "Sila 3"] {
        assert!(svg.contains(text), "missing {text}");
    }
    // Sila 2 bars use the configured color
    assert!(svg.to_ascii_uppercase().contains("F57C00") || svg.contains("rgb(245,124,0)"));
}

#[test]
fn trend_bars_show_growth_labels() {
    let data = dataset();
    let cfg = DashboardConfig::default();
    let board = Dashboard::new(&data, &cfg);
    let seq = board.indicator_trend_for_sila("1");

    let svg = render(
        |p| viz::plot_grouped_bars(&seq, p, 900, 500, "Tren", None).unwrap(),
        "trend",
    );
    assert!(svg.contains("+10.0%"));
    assert!(svg.contains("+5.0%"));
    assert!(svg.contains("2023"));
}

#[test]
fn stacked_and_radar_render() {
    let data = dataset();
    let cfg = DashboardConfig::default();
    let board = Dashboard::new(&data, &cfg);

    let bars = board.province_stacked(2024);
    let svg = render(
        |p| viz::plot_stacked_bars(&bars, p, 900, 600, "Sila per Provinsi", Some(&cfg.group_colors)).unwrap(),
        "stacked",
    );
    for text in ["Aceh", "Bali", "Sila 1", "Sila 3"] {
        assert!(svg.contains(text), "missing {text}");
    }

    let radar = board.province_radar("Aceh", None).unwrap();
    let svg = render(
        |p| viz::plot_radar(&radar.axes, p, 500, 500, "Aceh 2024").unwrap(),
        "radar",
    );
    assert!(svg.contains("Sila 1 (70.00)"));
    assert!(svg.contains("100"));
}

#[test]
fn rejects_non_svg_and_empty_input() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![MetricRow::new("A", 2024, Some(1.0))];
    let seq = group_with_gaps(&rows, |_| "");

    let png = dir.path().join("chart.png");
    assert!(viz::plot_grouped_bars(&seq, &png, 400, 300, "", None).is_err());
    assert!(!png.exists());

    let empty: GroupedSequence<MetricRow> = group_with_gaps(&[], |_| "");
    let svg = dir.path().join("empty.svg");
    assert!(viz::plot_grouped_bars(&empty, &svg, 400, 300, "", None).is_err());

    let missing = vec![MetricRow::new("A", 2024, None)];
    let seq = group_with_gaps(&missing, |_| "");
    assert!(viz::plot_grouped_bars(&seq, &svg, 400, 300, "", None).is_err());

    let two = vec![("Sila 1".to_string(), 70.0), ("Sila 2".to_string(), 60.0)];
    assert!(viz::plot_radar(&two, &svg, 400, 400, "").is_err());
    assert!(viz::plot_stacked_bars(&[], &svg, 400, 400, "", None).is_err());
}

#[test]
fn blank_group_key_draws_no_group_label() {
    let rows = vec![
        MetricRow::new("Sila 1", 2024, Some(80.0)),
        MetricRow::new("Sila 2", 2024, Some(75.0)),
        MetricRow::new("Sila 3", 2024, Some(70.0)),
    ];
    let blank = group_with_gaps(&rows, |_| "");
    let named = group_with_gaps(&rows, |_| "Semua");

    let blank_svg = render(
        |p| viz::plot_grouped_bars(&blank, p, 600, 400, "Sila", None).unwrap(),
        "blank",
    );
    let named_svg = render(
        |p| viz::plot_grouped_bars(&named, p, 600, 400, "Sila", None).unwrap(),
        "named",
    );
    assert!(named_svg.contains("Semua"));
    assert_eq!(
        blank_svg.matches("</text>").count() + 1,
        named_svg.matches("</text>").count()
    );
}
