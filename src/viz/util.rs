//! Utility functions for visualization: colors, output paths, label gutters.

use anyhow::{Result, bail};
use plotters::prelude::*;
use std::path::Path;

use super::text::estimate_text_width_px;
use super::types::Palette;

/// Microsoft Office (2013+) chart series palette, used for groups without a
/// configured color.
const OFFICE10: [RGBColor; 10] = [
    RGBColor(68, 114, 196),  // blue      (#4472C4)
    RGBColor(237, 125, 49),  // orange    (#ED7D31)
    RGBColor(165, 165, 165), // gray      (#A5A5A5)
    RGBColor(255, 192, 0),   // gold      (#FFC000)
    RGBColor(91, 155, 213),  // light blue(#5B9BD5)
    RGBColor(112, 173, 71),  // green     (#70AD47)
    RGBColor(38, 68, 120),   // dark blue (#264478)
    RGBColor(158, 72, 14),   // dark org. (#9E480E)
    RGBColor(99, 99, 99),    // dark gray (#636363)
    RGBColor(153, 115, 0),   // brownish  (#997300)
];

pub const GROWTH_UP: RGBColor = RGBColor(46, 125, 50);
pub const GROWTH_DOWN: RGBColor = RGBColor(198, 40, 40);

#[inline]
pub fn office_color(idx: usize) -> RGBColor {
    OFFICE10[idx % OFFICE10.len()]
}

/// `#RRGGBB` (or `RRGGBB`) to a color.
pub fn parse_hex_color(s: &str) -> Option<RGBColor> {
    let hex = s.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Resolves group keys to colors: the palette first, then Office colors in
/// order of first request.
#[derive(Debug, Default)]
pub struct ColorPicker<'a> {
    palette: Option<&'a Palette>,
    fallback: Vec<String>,
}

impl<'a> ColorPicker<'a> {
    pub fn new(palette: Option<&'a Palette>) -> Self {
        Self {
            palette,
            fallback: Vec::new(),
        }
    }

    pub fn color(&mut self, key: &str) -> RGBColor {
        if let Some(c) = self
            .palette
            .and_then(|p| p.get(key))
            .and_then(|hex| parse_hex_color(hex))
        {
            return c;
        }
        let idx = match self.fallback.iter().position(|k| k == key) {
            Some(i) => i,
            None => {
                self.fallback.push(key.to_string());
                self.fallback.len() - 1
            }
        };
        office_color(idx)
    }
}

/// Only SVG output is produced; anything else is an error before drawing.
pub fn svg_target(out_path: &Path) -> Result<String> {
    let is_svg = out_path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if !is_svg {
        bail!(
            "unsupported output format: {} (only .svg is written)",
            out_path.display()
        );
    }
    Ok(out_path.to_string_lossy().into_owned())
}

/// Y tick text: whole numbers from 100 up, one decimal from 10, two below.
pub fn y_tick(v: f64) -> String {
    let a = v.abs();
    let prec = if a >= 100.0 {
        0
    } else if a >= 10.0 {
        1
    } else {
        2
    };
    format!("{:.*}", prec, v)
}

/// Compute a tight left label area width for the Y axis (in pixels),
/// based on the formatted tick labels that will appear.
///
/// Returns a width clamped to a sensible range to avoid extremes.
pub fn compute_left_label_area_px(ymin: f64, ymax: f64, ticks: usize, font_px: u32) -> u32 {
    let mut max_px = 0u32;
    for i in 0..=ticks {
        let t = if ticks == 0 {
            0.0
        } else {
            i as f64 / ticks as f64
        };
        let v = ymin + (ymax - ymin) * t;
        max_px = max_px.max(estimate_text_width_px(&y_tick(v), font_px));
    }
    max_px.saturating_add(18).clamp(48, 140)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert_eq!(parse_hex_color("#D32F2F"), Some(RGBColor(0xD3, 0x2F, 0x2F)));
        assert_eq!(parse_hex_color("1976d2"), Some(RGBColor(0x19, 0x76, 0xD2)));
        assert_eq!(parse_hex_color("#12345"), None);
        assert_eq!(parse_hex_color("#GGGGGG"), None);
    }

    #[test]
    fn unknown_groups_get_stable_fallback_colors() {
        let mut palette = Palette::new();
        palette.insert("Sila 1".into(), "#D32F2F".into());
        let mut picker = ColorPicker::new(Some(&palette));
        assert_eq!(picker.color("Sila 1"), RGBColor(0xD3, 0x2F, 0x2F));
        let a = picker.color("X");
        let b = picker.color("Y");
        assert_eq!(picker.color("X"), a);
        assert_ne!(a, b);
    }

    #[test]
    fn only_svg_targets() {
        assert!(svg_target(Path::new("out/chart.svg")).is_ok());
        assert!(svg_target(Path::new("out/chart.SVG")).is_ok());
        assert!(svg_target(Path::new("out/chart.png")).is_err());
        assert!(svg_target(Path::new("chart")).is_err());
    }
}
