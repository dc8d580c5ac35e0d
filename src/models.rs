use serde::{Deserialize, Serialize};

/// An observed year (2021..=2024 in the bundled workbook).
pub type Period = i32;

/// Tidy structure used by this crate (one row = one observation).
///
/// `entity` is whatever the row measures: a province, a Sila code, or an
/// indicator code. `group_key` names the category the row belongs to when a
/// chart groups rows (e.g. the Sila of an indicator).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRow {
    pub entity: String,
    pub period: Period,
    pub value: Option<f64>,
    pub group_key: Option<String>,
    /// Display name, e.g. `NamaSila` or `IndikatorNama`.
    pub label: Option<String>,
}

impl MetricRow {
    pub fn new(entity: impl Into<String>, period: Period, value: Option<f64>) -> Self {
        Self {
            entity: entity.into(),
            period,
            value,
            group_key: None,
            label: None,
        }
    }

    pub fn with_group(mut self, group_key: impl Into<String>) -> Self {
        self.group_key = Some(group_key.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            entity: self.entity.clone(),
            group_key: self.group_key.clone(),
        }
    }

    /// Group key or the empty string, for key functions that need `&str`.
    pub fn group(&self) -> &str {
        self.group_key.as_deref().unwrap_or("")
    }
}

/// Series identity used by delta computation and summaries.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SeriesKey {
    pub entity: String,
    pub group_key: Option<String>,
}

// ---------------------------------------------------------------------------
// Sheet rows. Each one mirrors a sheet of the bundled workbook; column names
// are the workbook's own.
// ---------------------------------------------------------------------------

/// `IAP_TAHUN`: national index per year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct YearRow {
    #[serde(rename = "Tahun", deserialize_with = "de_period")]
    pub tahun: Period,
    #[serde(rename = "Nilai", default, deserialize_with = "de_opt_f64")]
    pub nilai: Option<f64>,
    #[serde(rename = "Delta", default, deserialize_with = "de_opt_f64")]
    pub delta: Option<f64>,
}

/// `PER_SILA`: national index per Sila and year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SilaRow {
    #[serde(rename = "Sila", deserialize_with = "de_text")]
    pub sila: String,
    #[serde(rename = "NamaSila", default, deserialize_with = "de_text")]
    pub nama_sila: String,
    #[serde(rename = "Tahun", deserialize_with = "de_period")]
    pub tahun: Period,
    #[serde(rename = "Nilai", default, deserialize_with = "de_opt_f64")]
    pub nilai: Option<f64>,
    #[serde(rename = "Delta", default, deserialize_with = "de_opt_f64")]
    pub delta: Option<f64>,
}

/// `PER_INDIKATOR`: national index per indicator and year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorRow {
    #[serde(rename = "Sila", deserialize_with = "de_text")]
    pub sila: String,
    #[serde(rename = "NamaSila", default, deserialize_with = "de_text")]
    pub nama_sila: String,
    #[serde(rename = "Indikator", deserialize_with = "de_text")]
    pub indikator: String,
    #[serde(rename = "IndikatorNama", default, deserialize_with = "de_text")]
    pub indikator_nama: String,
    #[serde(rename = "Tahun", deserialize_with = "de_period")]
    pub tahun: Period,
    #[serde(rename = "Nilai", default, deserialize_with = "de_opt_f64")]
    pub nilai: Option<f64>,
}

/// `TAHUN_PROVINSI`: province index per year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvinceRow {
    #[serde(rename = "Provinsi", deserialize_with = "de_text")]
    pub provinsi: String,
    #[serde(rename = "Tahun", deserialize_with = "de_period")]
    pub tahun: Period,
    #[serde(rename = "Nilai", default, deserialize_with = "de_opt_f64")]
    pub nilai: Option<f64>,
}

/// `SILA_PROVINSI`: province index per Sila and year. The sheet also carries
/// an `IAP` pseudo-Sila holding the province total.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvinceSilaRow {
    #[serde(rename = "Provinsi", deserialize_with = "de_text")]
    pub provinsi: String,
    #[serde(rename = "Tahun", deserialize_with = "de_period")]
    pub tahun: Period,
    #[serde(rename = "Sila", deserialize_with = "de_text")]
    pub sila: String,
    #[serde(rename = "Nilai", default, deserialize_with = "de_opt_f64")]
    pub nilai: Option<f64>,
}

/// `INDIKATOR_PROVINSI`: province index per indicator and year.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProvinceIndicatorRow {
    #[serde(rename = "Provinsi", deserialize_with = "de_text")]
    pub provinsi: String,
    #[serde(rename = "Tahun", deserialize_with = "de_period")]
    pub tahun: Period,
    #[serde(rename = "Sila", deserialize_with = "de_text")]
    pub sila: String,
    #[serde(rename = "Indikator", deserialize_with = "de_text")]
    pub indikator: String,
    #[serde(rename = "IndikatorNama", default, deserialize_with = "de_text")]
    pub indikator_nama: String,
    #[serde(rename = "Nilai", default, deserialize_with = "de_opt_f64")]
    pub nilai: Option<f64>,
}

/// The national series is a single entity.
pub const NATIONAL_ENTITY: &str = "IAP";

impl From<&YearRow> for MetricRow {
    fn from(r: &YearRow) -> Self {
        MetricRow::new(NATIONAL_ENTITY, r.tahun, r.nilai)
    }
}

impl From<&SilaRow> for MetricRow {
    fn from(r: &SilaRow) -> Self {
        MetricRow::new(r.sila.clone(), r.tahun, r.nilai).with_label(r.nama_sila.clone())
    }
}

impl From<&IndicatorRow> for MetricRow {
    fn from(r: &IndicatorRow) -> Self {
        MetricRow::new(r.indikator.clone(), r.tahun, r.nilai)
            .with_group(r.sila.clone())
            .with_label(r.indikator_nama.clone())
    }
}

impl From<&ProvinceRow> for MetricRow {
    fn from(r: &ProvinceRow) -> Self {
        MetricRow::new(r.provinsi.clone(), r.tahun, r.nilai)
    }
}

impl From<&ProvinceSilaRow> for MetricRow {
    fn from(r: &ProvinceSilaRow) -> Self {
        MetricRow::new(r.provinsi.clone(), r.tahun, r.nilai).with_group(r.sila.clone())
    }
}

/// Province is dropped: callers filter by province first.
impl From<&ProvinceIndicatorRow> for MetricRow {
    fn from(r: &ProvinceIndicatorRow) -> Self {
        MetricRow::new(r.indikator.clone(), r.tahun, r.nilai)
            .with_group(r.sila.clone())
            .with_label(r.indikator_nama.clone())
    }
}

// ---------------------------------------------------------------------------
// Lenient cell deserializers. Spreadsheet exports store the same column as a
// number in one file and as text in another; empty cells arrive as null or "".
// ---------------------------------------------------------------------------

/// Serde helper: `Option<f64>` from a number, numeric text, or nothing.
fn de_opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct F64Visitor;

    impl<'de> Visitor<'de> for F64Visitor {
        type Value = Option<f64>;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "a number, numeric text, or an empty cell")
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.is_finite().then_some(v))
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(v as f64))
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            parse_number(s).map_err(E::custom)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_some<D2>(self, d: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            d.deserialize_any(F64Visitor)
        }
    }

    deserializer.deserialize_any(F64Visitor)
}

/// Parse numeric text. Accepts a decimal comma when no dot is present
/// ("71,25" as exported by Indonesian-locale spreadsheets).
pub fn parse_number(s: &str) -> Result<Option<f64>, String> {
    let t = s.trim();
    if t.is_empty() || t == "-" {
        return Ok(None);
    }
    let normalized = if !t.contains('.') && t.matches(',').count() == 1 {
        t.replace(',', ".")
    } else {
        t.replace(',', "")
    };
    normalized
        .parse::<f64>()
        .map(|v| v.is_finite().then_some(v))
        .map_err(|_| format!("not a number: {t:?}"))
}

/// Serde helper: a year from a number (possibly `2021.0`) or text.
fn de_period<'de, D>(deserializer: D) -> Result<Period, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error;
    match de_opt_f64(deserializer)? {
        Some(v) if v.fract() == 0.0 && v > 0.0 && v <= i32::MAX as f64 => Ok(v as Period),
        Some(v) => Err(D::Error::custom(format!("invalid year: {v}"))),
        None => Err(D::Error::custom("missing year")),
    }
}

/// Serde helper: text from a string or a number (codes like `1` typed as numbers).
fn de_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
            write!(f, "text or a number")
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(s.trim().to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(String::new())
        }

        fn visit_some<D2>(self, d: D2) -> Result<Self::Value, D2::Error>
        where
            D2: serde::Deserializer<'de>,
        {
            d.deserialize_any(TextVisitor)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sila_row_accepts_numbers_as_text_and_empty_values() {
        let r: SilaRow = serde_json::from_str(
            r#"{"Sila":"Sila 1","NamaSila":"Ketuhanan","Tahun":"2023","Nilai":"71,25"}"#,
        )
        .unwrap();
        assert_eq!(r.tahun, 2023);
        assert_eq!(r.nilai, Some(71.25));
        assert_eq!(r.delta, None);

        let r: SilaRow =
            serde_json::from_str(r#"{"Sila":"Sila 2","Tahun":2021.0,"Nilai":"","Delta":null}"#)
                .unwrap();
        assert_eq!(r.tahun, 2021);
        assert_eq!(r.nilai, None);
        assert_eq!(r.nama_sila, "");
    }

    #[test]
    fn year_must_be_a_whole_positive_number() {
        assert!(serde_json::from_str::<YearRow>(r#"{"Tahun":"abc","Nilai":1}"#).is_err());
        assert!(serde_json::from_str::<YearRow>(r#"{"Tahun":2021.5,"Nilai":1}"#).is_err());
        assert!(serde_json::from_str::<YearRow>(r#"{"Nilai":1}"#).is_err());
    }

    #[test]
    fn parse_number_handles_separators() {
        assert_eq!(parse_number("1,234.5").unwrap(), Some(1234.5));
        assert_eq!(parse_number(" 70.1 ").unwrap(), Some(70.1));
        assert_eq!(parse_number("-").unwrap(), None);
        assert!(parse_number("n/a").is_err());
    }

    #[test]
    fn indicator_row_maps_to_grouped_metric_row() {
        let r = IndicatorRow {
            sila: "Sila 1".into(),
            nama_sila: "Ketuhanan".into(),
            indikator: "X1.1".into(),
            indikator_nama: "Toleransi".into(),
            tahun: 2024,
            nilai: Some(80.0),
        };
        let m = MetricRow::from(&r);
        assert_eq!(m.entity, "X1.1");
        assert_eq!(m.group(), "Sila 1");
        assert_eq!(m.label.as_deref(), Some("Toleransi"));
    }
}
