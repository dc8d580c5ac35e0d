use iap_dashboard::models::MetricRow;
use iap_dashboard::pivot::PivotTable;
use iap_dashboard::storage;
use std::fs;

fn table() -> PivotTable {
    let rows = vec![
        MetricRow::new("Aceh", 2021, Some(68.0)),
        MetricRow::new("Aceh", 2023, Some(69.5)),
        MetricRow::new("Bali", 2021, Some(72.0)),
    ];
    PivotTable::build(&rows, &[]).with_consecutive_deltas()
}

#[test]
fn save_pivot_csv_and_json() {
    let dir = tempfile::tempdir().unwrap();
    let t = table();

    let csv_path = dir.path().join("provinsi.csv");
    storage::save_pivot_csv(&t, &csv_path).unwrap();
    let csv_txt = fs::read_to_string(&csv_path).unwrap();
    let lines: Vec<&str> = csv_txt.lines().collect();
    assert_eq!(lines[0], "entity,label,2021,2023,2023-2021");
    assert_eq!(lines[1], "Aceh,,68,69.5,1.5");
    assert_eq!(lines[2], "Bali,,72,,");
    assert_eq!(lines.len(), 1 + t.records.len());

    let json_path = dir.path().join("provinsi.json");
    storage::save_pivot_json(&t, &json_path).unwrap();
    let back: PivotTable = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(back, t);
}

// Spreadsheet apps execute cells starting with = + - @; text cells get a leading quote.
#[test]
fn csv_cells_are_prefixed_to_avoid_formulas() {
    let rows = vec![
        MetricRow::new("=HYPERLINK(\"http://evil\")", 2024, Some(-1.0)).with_label("+SUM(A1:A9)"),
        MetricRow::new("@foo", 2024, Some(2.0)).with_label("-cmd"),
    ];
    let t = PivotTable::build(&rows, &[]);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("inj.csv");
    storage::save_pivot_csv(&t, &path).unwrap();

    let mut rdr = csv::Reader::from_path(&path).unwrap();
    let recs: Vec<csv::StringRecord> = rdr.records().map(|r| r.unwrap()).collect();
    assert_eq!(&recs[0][0], "'=HYPERLINK(\"http://evil\")");
    assert_eq!(&recs[0][1], "'+SUM(A1:A9)");
    // numbers stay numbers
    assert_eq!(&recs[0][2], "-1");
    assert_eq!(&recs[1][0], "'@foo");
    assert_eq!(&recs[1][1], "'-cmd");
}

#[test]
fn unwritable_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("x.csv");
    let err = storage::save_pivot_csv(&table(), &path).unwrap_err();
    assert!(format!("{err:#}").contains("x.csv"));
}
