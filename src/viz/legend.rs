//! Legend band drawn below a chart: one colored marker and label per group,
//! flowing left to right and wrapping into further rows.

use anyhow::Result;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::text::estimate_text_width_px;

const FONT_PX: u32 = 13;
const LINE_H: i32 = FONT_PX as i32 + 6;
const MARKER: i32 = 5;
const MARKER_TO_TEXT: i32 = 8;
const TRAILING: i32 = 18;
const PAD: i32 = 8;

fn item_width(label: &str) -> i32 {
    MARKER * 2 + MARKER_TO_TEXT + estimate_text_width_px(label, FONT_PX) as i32 + TRAILING
}

/// Height the band needs for `labels` across `total_w` pixels, starting at `start_x`.
pub fn legend_height_px(labels: &[String], start_x: i32, total_w: i32) -> i32 {
    if labels.is_empty() {
        return 0;
    }
    let mut rows = 1;
    let mut x = start_x;
    for l in labels {
        let w = item_width(l);
        if x + w > total_w - PAD && x > start_x {
            rows += 1;
            x = start_x;
        }
        x += w;
    }
    PAD * 2 + rows * LINE_H
}

/// Draw `items` into `area`; the first marker aligns with `start_x` (the plot's Y axis).
pub fn draw_legend_band<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    items: &[(String, RGBColor)],
    start_x: i32,
) -> Result<()> {
    let (w, _) = area.dim_in_pixel();
    let total_w = w as i32;
    let style =
        TextStyle::from((FontFamily::SansSerif, FONT_PX)).pos(Pos::new(HPos::Left, VPos::Center));

    let mut x = start_x;
    let mut y = PAD + LINE_H / 2;
    for (label, color) in items {
        let iw = item_width(label);
        if x + iw > total_w - PAD && x > start_x {
            x = start_x;
            y += LINE_H;
        }
        area.draw(&Rectangle::new(
            [(x, y - MARKER), (x + MARKER * 2, y + MARKER)],
            color.filled(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        area.draw(&Text::new(
            label.clone(),
            (x + MARKER * 2 + MARKER_TO_TEXT, y),
            style.clone(),
        ))
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;
        x += iw;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_grows_with_wrapping() {
        let few = vec!["Sila 1".to_string(), "Sila 2".to_string()];
        let many: Vec<String> = (1..=30).map(|i| format!("Kelompok {i}")).collect();
        assert_eq!(legend_height_px(&[], 60, 800), 0);
        assert_eq!(legend_height_px(&few, 60, 800), PAD * 2 + LINE_H);
        assert!(legend_height_px(&many, 60, 800) > PAD * 2 + LINE_H);
    }
}
