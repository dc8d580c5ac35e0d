#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const IAP_TAHUN: &str = "\
Tahun,Nilai,Delta
2021,70.00,
2023,71.00,1.00
2024,72.50,1.50
";

pub const PER_SILA: &str = "\
Sila,NamaSila,Tahun,Nilai
Sila 1,Ketuhanan,2021,75
Sila 1,Ketuhanan,2023,76
Sila 1,Ketuhanan,2024,80
Sila 2,Kemanusiaan,2021,70
Sila 2,Kemanusiaan,2023,72
Sila 2,Kemanusiaan,2024,80
Sila 3,Persatuan,2021,65
Sila 3,Persatuan,2023,66
Sila 3,Persatuan,2024,60
";

pub const PER_INDIKATOR: &str = "\
Sila,NamaSila,Indikator,IndikatorNama,Tahun,Nilai
Sila 1,Ketuhanan,X1.1,Toleransi,2023,70
Sila 1,Ketuhanan,X1.1,Toleransi,2024,77
Sila 1,Ketuhanan,X1.2,Ibadah,2023,80
Sila 1,Ketuhanan,X1.2,Ibadah,2024,84
Sila 2,Kemanusiaan,X2.1,Empati,2023,60
Sila 2,Kemanusiaan,X2.1,Empati,2024,66
Sila 3,Persatuan,X3.1,Gotong Royong,2024,61
";

pub const TAHUN_PROVINSI: &str = "\
Provinsi,Tahun,Nilai
Aceh,2021,68
Aceh,2023,69.5
Aceh,2024,69
Bali,2021,72
Bali,2023,73
Bali,2024,75
";

pub const SILA_PROVINSI: &str = "\
Provinsi,Tahun,Sila,Nilai
Aceh,2024,Sila 1,70
Aceh,2024,Sila 2,68
Aceh,2024,Sila 3,66
Aceh,2024,IAP,69
Bali,2024,Sila 1,74
Bali,2024,Sila 2,76
Bali,2024,Sila 3,75
Bali,2024,IAP,75
Aceh,2023,Sila 1,69
Aceh,2023,IAP,69.5
Bali,2023,Sila 1,73
Bali,2023,IAP,73
";

// semicolon-delimited with decimal commas, as exported by an Indonesian-locale spreadsheet
pub const INDIKATOR_PROVINSI: &str = "\
Provinsi;Tahun;Sila;Indikator;IndikatorNama;Nilai
Aceh;2023;Sila 1;X1.1;Toleransi;60
Aceh;2024;Sila 1;X1.1;Toleransi;66
Aceh;2023;Sila 1;X1.2;Ibadah;80
Aceh;2024;Sila 1;X1.2;Ibadah;
Bali;2024;Sila 1;X1.1;Toleransi;70,5
";

pub fn write_sheets(dir: &Path) {
    let sheets = [
        ("IAP_TAHUN", IAP_TAHUN),
        ("PER_SILA", PER_SILA),
        ("PER_INDIKATOR", PER_INDIKATOR),
        ("TAHUN_PROVINSI", TAHUN_PROVINSI),
        ("SILA_PROVINSI", SILA_PROVINSI),
        ("INDIKATOR_PROVINSI", INDIKATOR_PROVINSI),
    ];
    for (name, text) in sheets {
        fs::write(dir.join(format!("{name}.csv")), text).unwrap();
    }
}

/// A temp directory holding the six sheets as CSV files.
pub fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_sheets(dir.path());
    dir
}
