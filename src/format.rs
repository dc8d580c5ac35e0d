//! Display formatting for index values. Rounding to two decimals happens only
//! here, never inside the computations.

use num_format::{Locale, ToFormattedString};

/// Map a user-provided locale tag to a `num_format::Locale` and its decimal separator char.
///
/// Supported tags (case-insensitive): `id`, `id_ID`, `indonesian`, `de`, `fr`,
/// `es`, `it`, `pt`, `nl`, `en`. Defaults to English.
pub fn map_locale(tag: &str) -> (&'static Locale, char) {
    match tag.to_lowercase().as_str() {
        "id" | "id_id" | "indonesian" => (&Locale::id, ','),
        "de" | "de_de" | "german" => (&Locale::de, ','),
        "fr" | "fr_fr" => (&Locale::fr, ','),
        "es" | "es_es" => (&Locale::es, ','),
        "it" | "it_it" => (&Locale::it, ','),
        "pt" | "pt_pt" | "pt_br" => (&Locale::pt, ','),
        "nl" | "nl_nl" => (&Locale::nl, ','),
        _ => (&Locale::en, '.'),
    }
}

/// Two decimals with locale grouping: `71.25` / `71,25`, `1,234.50` / `1.234,50`.
pub fn format_value(v: f64, locale_tag: &str) -> String {
    if !v.is_finite() {
        return "-".to_string();
    }
    let (locale, dec_sep) = map_locale(locale_tag);
    let cents = (v.abs() * 100.0).round() as u64;
    let int_part = (cents / 100).to_formatted_string(locale);
    let sign = if v < 0.0 && cents != 0 { "-" } else { "" };
    format!("{sign}{int_part}{dec_sep}{:02}", cents % 100)
}

/// Like `format_value`, with `-` for a missing value.
pub fn format_opt(v: Option<f64>, locale_tag: &str) -> String {
    match v {
        Some(x) => format_value(x, locale_tag),
        None => "-".to_string(),
    }
}

/// Signed change with an arrow, e.g. `▲ 1.20` or `▼ 0.35`.
pub fn format_change(v: Option<f64>, locale_tag: &str) -> String {
    match v {
        Some(x) if x.is_finite() => {
            let arrow = if x >= 0.0 { '▲' } else { '▼' };
            format!("{arrow} {}", format_value(x.abs(), locale_tag))
        }
        _ => "-".to_string(),
    }
}

/// Signed percentage with one decimal, e.g. `+2.5%` (growth labels above bars).
pub fn format_percent(v: f64) -> String {
    let sign = if v >= 0.0 { "+" } else { "" };
    format!("{sign}{v:.1}%")
}
