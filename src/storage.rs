use crate::pivot::PivotTable;
use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Text cells starting with one of these are read as formulas by spreadsheet apps.
const FORMULA_STARTERS: [char; 4] = ['=', '+', '-', '@'];

fn safe_text(s: &str) -> String {
    if s.starts_with(FORMULA_STARTERS) {
        format!("'{s}")
    } else {
        s.to_string()
    }
}

fn num_cell(v: Option<f64>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

/// Save a pivot table as CSV: `entity,label,<period>...,<later>-<earlier>...`.
/// Unobserved cells are left empty; values are written unrounded.
pub fn save_pivot_csv<P: AsRef<Path>>(table: &PivotTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new()
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    let mut header: Vec<String> = vec!["entity".into(), "label".into()];
    header.extend(table.periods.iter().map(|p| p.to_string()));
    header.extend(table.pairs.iter().map(|p| format!("{}-{}", p.later, p.earlier)));
    wtr.write_record(&header)?;

    for rec in &table.records {
        let mut row: Vec<String> = vec![
            safe_text(&rec.entity),
            safe_text(rec.label.as_deref().unwrap_or("")),
        ];
        row.extend(rec.cells.iter().map(|c| num_cell(*c)));
        row.extend(rec.deltas.iter().map(|d| num_cell(*d)));
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save a pivot table as pretty JSON (periods, pairs, records).
pub fn save_pivot_json<P: AsRef<Path>>(table: &PivotTable, path: P) -> Result<()> {
    let path = path.as_ref();
    let mut f =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let s = serde_json::to_string_pretty(table)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formula_starters_are_quoted() {
        assert_eq!(safe_text("=SUM(A1)"), "'=SUM(A1)");
        assert_eq!(safe_text("@foo"), "'@foo");
        assert_eq!(safe_text("-1"), "'-1");
        assert_eq!(safe_text("Aceh"), "Aceh");
        assert_eq!(num_cell(Some(-1.5)), "-1.5");
        assert_eq!(num_cell(None), "");
    }
}
