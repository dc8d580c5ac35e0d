use iap_dashboard::models::MetricRow;
use iap_dashboard::narrative::extremes_sentence;
use iap_dashboard::stats::{ExtremumSummary, candidates, series_summary, summarize_extremes};

#[test]
fn tied_top_is_joined_with_dan() {
    let s = summarize_extremes(&[("X", 80.0), ("Y", 80.0), ("Z", 60.0)]).unwrap();
    assert_eq!(
        s,
        ExtremumSummary::Spread {
            top_entities: vec!["X".into(), "Y".into()],
            top_value: 80.0,
            bottom_entities: vec!["Z".into()],
            bottom_value: 60.0,
        }
    );
    assert_eq!(s.top_label(), "X dan Y");
    assert_eq!(s.bottom_label(), "Z");
}

#[test]
fn all_equal_form() {
    let s = summarize_extremes(&[("X", 50.0), ("Y", 50.0)]).unwrap();
    assert_eq!(s, ExtremumSummary::AllEqual { value: 50.0 });
    assert_eq!(s.top_label(), "");
}

#[test]
fn empty_and_non_finite_input() {
    let none: [(&str, f64); 0] = [];
    assert_eq!(summarize_extremes(&none), None);
    assert_eq!(summarize_extremes(&[("X", f64::NAN)]), None);
    let s = summarize_extremes(&[("X", f64::NAN), ("Y", 1.0), ("Z", 2.0)]).unwrap();
    assert_eq!(s.top_label(), "Z");
    assert_eq!(s.bottom_label(), "Y");
}

#[test]
fn three_way_tie_uses_serial_comma() {
    let s = summarize_extremes(&[("A", 1.0), ("B", 9.0), ("C", 9.0), ("D", 9.0)]).unwrap();
    assert_eq!(s.top_label(), "B, C, dan D");
}

#[test]
fn summarizing_is_idempotent() {
    let c = [("X", 80.0), ("Y", 80.0), ("Z", 60.0)];
    assert_eq!(summarize_extremes(&c), summarize_extremes(&c));
}

#[test]
fn candidates_prefer_labels_and_skip_missing() {
    let rows = vec![
        MetricRow::new("X1.1", 2024, Some(77.0)).with_label("Toleransi"),
        MetricRow::new("X1.2", 2024, None).with_label("Ibadah"),
        MetricRow::new("X2.1", 2024, Some(66.0)),
    ];
    assert_eq!(
        candidates(&rows, true),
        vec![("Toleransi".to_string(), 77.0), ("X2.1".to_string(), 66.0)]
    );
    assert_eq!(candidates(&rows, false)[0].0, "X1.1");
}

#[test]
fn sentence_for_both_forms() {
    let s = summarize_extremes(&[("Sila 1", 80.0), ("Sila 2", 80.0), ("Sila 3", 60.0)]).unwrap();
    assert_eq!(
        extremes_sentence(&s, "Sila", "en"),
        "Sila dengan nilai tertinggi: Sila 1 dan Sila 2 (80.00); terendah: Sila 3 (60.00)."
    );
    let eq = ExtremumSummary::AllEqual { value: 50.0 };
    assert_eq!(
        extremes_sentence(&eq, "provinsi", "id"),
        "Seluruh provinsi memiliki nilai yang sama (50,00)."
    );
}

#[test]
fn summary_statistics_per_series() {
    let rows = vec![
        MetricRow::new("Sila 1", 2021, Some(75.0)),
        MetricRow::new("Sila 1", 2023, Some(76.0)),
        MetricRow::new("Sila 1", 2024, Some(80.0)),
        MetricRow::new("Sila 2", 2021, None),
        MetricRow::new("Sila 2", 2024, Some(70.0)),
    ];
    let out = series_summary(&rows);
    assert_eq!(out.len(), 2);
    let s1 = &out[0];
    assert_eq!(s1.key.entity, "Sila 1");
    assert_eq!((s1.count, s1.missing), (3, 0));
    assert_eq!(s1.min, Some(75.0));
    assert_eq!(s1.max, Some(80.0));
    assert_eq!(s1.median, Some(76.0));
    assert_eq!(s1.mean, Some(77.0));
    let s2 = &out[1];
    assert_eq!((s2.count, s2.missing), (1, 1));
    assert_eq!(s2.median, Some(70.0));
}
