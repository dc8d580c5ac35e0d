mod common;

use iap_dashboard::config::SheetNames;
use iap_dashboard::source::{Dataset, RawWorkbook, SourceError};
use std::fs;

#[test]
fn csv_directory_loads_every_sheet() {
    let dir = common::fixture_dir();
    let data = Dataset::load(dir.path(), &SheetNames::default()).unwrap();

    assert_eq!(data.national.len(), 3);
    assert_eq!(data.national[0].tahun, 2021);
    assert_eq!(data.national[0].delta, None);
    assert_eq!(data.national[2].nilai, Some(72.5));
    assert_eq!(data.sila.len(), 9);
    assert_eq!(data.sila[0].nama_sila, "Ketuhanan");
    assert_eq!(data.indicators.len(), 7);
    assert_eq!(data.provinces.len(), 6);
    assert_eq!(data.province_sila.len(), 12);
    assert_eq!(data.province_indicators.len(), 5);
}

#[test]
fn semicolon_sheet_with_decimal_comma_and_blank_value() {
    let dir = common::fixture_dir();
    let data = Dataset::load(dir.path(), &SheetNames::default()).unwrap();
    let rows = &data.province_indicators;
    assert_eq!(rows[3].indikator, "X1.2");
    assert_eq!(rows[3].nilai, None);
    assert_eq!(rows[4].provinsi, "Bali");
    assert_eq!(rows[4].nilai, Some(70.5));
}

#[test]
fn missing_sheet_is_empty() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("IAP_TAHUN.csv"), common::IAP_TAHUN).unwrap();
    let data = Dataset::load(dir.path(), &SheetNames::default()).unwrap();
    assert_eq!(data.national.len(), 3);
    assert!(data.sila.is_empty());
    assert!(data.province_indicators.is_empty());
}

#[test]
fn renamed_sheets_follow_config() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("NASIONAL.csv"), common::IAP_TAHUN).unwrap();
    let sheets = SheetNames {
        national: "NASIONAL".into(),
        ..SheetNames::default()
    };
    let data = Dataset::load(dir.path(), &sheets).unwrap();
    assert_eq!(data.national.len(), 3);
}

#[test]
fn json_source_with_mixed_cell_types() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("iap.json");
    fs::write(
        &path,
        r#"{
            "IAP_TAHUN": [
                {"Tahun": 2021, "Nilai": 70.0},
                {"Tahun": "2023", "Nilai": "71,5", "Delta": 1.5},
                {}
            ],
            "PER_SILA": [
                {"Sila": "Sila 1", "NamaSila": "Ketuhanan", "Tahun": 2024.0, "Nilai": null}
            ]
        }"#,
    )
    .unwrap();
    let data = Dataset::load(&path, &SheetNames::default()).unwrap();
    assert_eq!(data.national.len(), 2);
    assert_eq!(data.national[1].nilai, Some(71.5));
    assert_eq!(data.sila[0].tahun, 2024);
    assert_eq!(data.sila[0].nilai, None);
}

#[test]
fn malformed_row_reports_sheet_and_row() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("IAP_TAHUN.csv"),
        "Tahun,Nilai\n2021,70\n2023,abc\n",
    )
    .unwrap();
    let err = Dataset::load(dir.path(), &SheetNames::default()).unwrap_err();
    match err {
        SourceError::Row { sheet, row, .. } => {
            assert_eq!(sheet, "IAP_TAHUN");
            assert_eq!(row, 3);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unreadable_sources() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.xlsx");
    assert!(RawWorkbook::read(&missing).is_err());

    let bad_json = dir.path().join("bad.json");
    fs::write(&bad_json, "[1, 2").unwrap();
    assert!(matches!(
        RawWorkbook::read(&bad_json),
        Err(SourceError::Json(_))
    ));
}
