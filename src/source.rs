//! Load the IAP workbook and convert each sheet once into typed rows.
//!
//! Supported sources:
//! - a spreadsheet (`.xlsx`, `.xlsm`, `.xlsb`, `.xls`, `.ods`) read with `calamine`
//! - a directory of `<SHEET>.csv` files (`,` or `;` delimited)
//! - a `.json` object mapping sheet names to arrays of records
//!
//! Every sheet is first turned into header → value records (the shape a
//! browser-side `sheet_to_json` produces), then deserialized into the row types
//! of [`crate::models`]. A missing sheet yields an empty collection.
//!
//! ```no_run
//! use iap_dashboard::config::SheetNames;
//! use iap_dashboard::source::Dataset;
//!
//! let data = Dataset::load("public/data/data_fixed.xlsx", &SheetNames::default())?;
//! println!("{} province rows", data.provinces.len());
//! # Ok::<(), iap_dashboard::source::SourceError>(())
//! ```

use crate::config::SheetNames;
use crate::models::{
    IndicatorRow, MetricRow, ProvinceIndicatorRow, ProvinceRow, ProvinceSilaRow, SilaRow, YearRow,
};
use calamine::{Data, Reader, open_workbook_auto};
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// One sheet row: column header → cell value. Empty cells are absent.
pub type Record = Map<String, Value>;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("workbook error: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported data source: {0} (expected a spreadsheet, a .json file, or a directory of .csv files)")]
    Unsupported(String),
    #[error("sheet {sheet}, row {row}: {message}")]
    Row {
        sheet: String,
        row: usize,
        message: String,
    },
}

/// Untyped sheets as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawWorkbook {
    pub sheets: BTreeMap<String, Vec<Record>>,
}

impl RawWorkbook {
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let path = path.as_ref();
        if path.is_dir() {
            return read_csv_dir(path);
        }
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();
        match ext.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_spreadsheet(path),
            "json" => read_json(path),
            _ => Err(SourceError::Unsupported(path.display().to_string())),
        }
    }

    /// Deserialize one sheet. Rows are numbered as in a spreadsheet (header = 1).
    pub fn typed<T: DeserializeOwned>(&self, sheet: &str) -> Result<Vec<T>, SourceError> {
        let Some(records) = self.sheets.get(sheet) else {
            warn!("sheet {sheet} not found; treating it as empty");
            return Ok(Vec::new());
        };
        let mut out = Vec::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            if rec.is_empty() {
                continue;
            }
            let row = serde_json::from_value::<T>(Value::Object(rec.clone())).map_err(|e| {
                SourceError::Row {
                    sheet: sheet.to_string(),
                    row: i + 2,
                    message: e.to_string(),
                }
            })?;
            out.push(row);
        }
        debug!("sheet {sheet}: {} rows", out.len());
        Ok(out)
    }
}

fn read_spreadsheet(path: &Path) -> Result<RawWorkbook, SourceError> {
    let mut workbook = open_workbook_auto(path)?;
    let mut sheets = BTreeMap::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let mut rows = range.rows();
        let Some(header_row) = rows.next() else {
            sheets.insert(name, Vec::new());
            continue;
        };
        let headers: Vec<String> = header_row.iter().map(|c| c.to_string().trim().to_string()).collect();
        let records: Vec<Record> = rows
            .map(|r| {
                headers
                    .iter()
                    .zip(r.iter())
                    .filter(|(h, _)| !h.is_empty())
                    .filter_map(|(h, c)| cell_to_json(c).map(|v| (h.clone(), v)))
                    .collect()
            })
            .collect();
        sheets.insert(name, records);
    }
    debug!("read {} sheets from {}", sheets.len(), path.display());
    Ok(RawWorkbook { sheets })
}

fn cell_to_json(c: &Data) -> Option<Value> {
    #[allow(unreachable_patterns)]
    match c {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) if s.trim().is_empty() => None,
        Data::String(s) => Some(Value::String(s.clone())),
        Data::Float(f) => serde_json::Number::from_f64(*f).map(Value::Number),
        Data::Int(i) => Some(Value::from(*i)),
        Data::Bool(b) => Some(Value::Bool(*b)),
        Data::DateTime(dt) => serde_json::Number::from_f64(dt.as_f64()).map(Value::Number),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Some(Value::String(s.clone())),
        _ => None,
    }
}

fn read_csv_dir(dir: &Path) -> Result<RawWorkbook, SourceError> {
    let entries = std::fs::read_dir(dir).map_err(|source| SourceError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let mut sheets = BTreeMap::new();
    for entry in entries {
        let entry = entry.map_err(|source| SourceError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        let path = entry.path();
        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
        if !is_csv {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let text = std::fs::read_to_string(&path).map_err(|source| SourceError::Io {
            path: path.display().to_string(),
            source,
        })?;
        sheets.insert(stem.to_string(), parse_csv(&text)?);
    }
    debug!("read {} CSV sheets from {}", sheets.len(), dir.display());
    Ok(RawWorkbook { sheets })
}

/// Parse CSV text with a header row. The delimiter is `;` when the header has
/// more semicolons than commas, `,` otherwise.
pub fn parse_csv(text: &str) -> Result<Vec<Record>, SourceError> {
    let header_line = text.lines().next().unwrap_or("");
    let delimiter = if header_line.matches(';').count() > header_line.matches(',').count() {
        b';'
    } else {
        b','
    };
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let headers = rdr.headers()?.clone();
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let row: Record = headers
            .iter()
            .zip(rec.iter())
            .filter(|(h, v)| !h.is_empty() && !v.is_empty())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        out.push(row);
    }
    Ok(out)
}

fn read_json(path: &Path) -> Result<RawWorkbook, SourceError> {
    let text = std::fs::read_to_string(path).map_err(|source| SourceError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let sheets: BTreeMap<String, Vec<Record>> = serde_json::from_str(&text)?;
    Ok(RawWorkbook { sheets })
}

/// All sheets of the dashboard, typed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub national: Vec<YearRow>,
    pub sila: Vec<SilaRow>,
    pub indicators: Vec<IndicatorRow>,
    pub provinces: Vec<ProvinceRow>,
    pub province_sila: Vec<ProvinceSilaRow>,
    pub province_indicators: Vec<ProvinceIndicatorRow>,
}

impl Dataset {
    pub fn load<P: AsRef<Path>>(path: P, sheets: &SheetNames) -> Result<Self, SourceError> {
        let raw = RawWorkbook::read(path)?;
        Self::from_raw(&raw, sheets)
    }

    pub fn from_raw(raw: &RawWorkbook, sheets: &SheetNames) -> Result<Self, SourceError> {
        Ok(Dataset {
            national: raw.typed(&sheets.national)?,
            sila: raw.typed(&sheets.sila)?,
            indicators: raw.typed(&sheets.indicators)?,
            provinces: raw.typed(&sheets.provinces)?,
            province_sila: raw.typed(&sheets.province_sila)?,
            province_indicators: raw.typed(&sheets.province_indicators)?,
        })
    }

    pub fn national_rows(&self) -> Vec<MetricRow> {
        self.national.iter().map(MetricRow::from).collect()
    }

    pub fn sila_rows(&self) -> Vec<MetricRow> {
        self.sila.iter().map(MetricRow::from).collect()
    }

    pub fn indicator_rows(&self) -> Vec<MetricRow> {
        self.indicators.iter().map(MetricRow::from).collect()
    }

    pub fn province_rows(&self) -> Vec<MetricRow> {
        self.provinces.iter().map(MetricRow::from).collect()
    }

    pub fn province_sila_rows(&self) -> Vec<MetricRow> {
        self.province_sila.iter().map(MetricRow::from).collect()
    }
}
