//! Render dashboard charts to **SVG**.
//!
//! - Grouped bar charts from a [`GroupedSequence`]: one bar per data slot, empty
//!   gap slots between groups, per-bar tick labels, group labels centered under
//!   each run, optional growth labels above the bars
//! - Stacked horizontal bars (Sila components per province) with a legend band
//! - Radar chart on a fixed 0..100 scale
//!
//! Colors come from a [`Palette`] keyed by group (see `DashboardConfig::group_colors`);
//! groups without an entry fall back to the Microsoft Office palette.

pub mod legend;
pub mod text;
pub mod types;
pub mod util;

pub use types::{BarDatum, Palette};

use crate::dashboard::StackedBar;
use crate::format::format_percent;
use crate::grouping::{GroupedSequence, Slot};
use anyhow::{Result, anyhow, bail};

use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_svg::SVGBackend;

use std::collections::BTreeSet;
use std::f64::consts::PI;
use std::path::Path;

use legend::{draw_legend_band, legend_height_px};
use text::{estimate_text_width_px, truncate_to_width};
use util::{
    ColorPicker, GROWTH_DOWN, GROWTH_UP, compute_left_label_area_px, office_color, svg_target,
    y_tick,
};

const MARGIN: u32 = 16;
const TICK_FONT_PX: u32 = 11;

/// Bar chart over a grouped sequence (output of `grouping::group_with_gaps`).
pub fn plot_grouped_bars<T: BarDatum, P: AsRef<Path>>(
    seq: &GroupedSequence<T>,
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
    palette: Option<&Palette>,
) -> Result<()> {
    let path_string = svg_target(out_path.as_ref())?;
    if seq.data().all(|d| d.bar_value().is_none()) {
        bail!("no numeric values to plot");
    }
    let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
    draw_grouped_bars(root, seq, title, palette)
}

fn draw_grouped_bars<DB: DrawingBackend, T: BarDatum>(
    root: DrawingArea<DB, Shift>,
    seq: &GroupedSequence<T>,
    title: &str,
    palette: Option<&Palette>,
) -> Result<()> {
    let n = seq.len();
    let values: Vec<f64> = seq
        .data()
        .filter_map(|d| d.bar_value())
        .filter(|v| v.is_finite())
        .collect();
    if values.is_empty() {
        bail!("no numeric values to plot");
    }
    let min_val = values.iter().copied().fold(f64::INFINITY, f64::min).min(0.0);
    let max_val = values
        .iter()
        .copied()
        .fold(f64::NEG_INFINITY, f64::max)
        .max(0.0);
    // room above the tallest bar for its growth label
    let headroom = (max_val - min_val).max(1.0) * 0.12;
    let (y_lo, y_hi) = (min_val, max_val + headroom);

    let ticks: Vec<String> = seq
        .slots
        .iter()
        .map(|s| match &s.slot {
            Slot::Data(d) => truncate_to_width(&d.tick_label(), TICK_FONT_PX, 90),
            Slot::Gap => String::new(),
        })
        .collect();

    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;

    let left = compute_left_label_area_px(y_lo, y_hi, 10, 12);
    let mut chart = ChartBuilder::on(&root)
        .margin(MARGIN)
        .caption(title.trim(), (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left)
        .set_label_area_size(LabelAreaPosition::Bottom, 64)
        .build_cartesian_2d((0..n.saturating_sub(1).max(1)).into_segmented(), y_lo..y_hi)
        .map_err(|e| anyhow!("{:?}", e))?;

    let x_fmt = |x: &SegmentValue<usize>| match x {
        SegmentValue::CenterOf(i) => ticks.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let y_fmt = |v: &f64| y_tick(*v);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .y_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, TICK_FONT_PX))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let mut colors = ColorPicker::new(palette);
    let mut bars = Vec::with_capacity(n);
    let mut growth_labels: Vec<(usize, f64, f64)> = Vec::new();
    for s in &seq.slots {
        let Some(d) = s.slot.data() else { continue };
        let Some(v) = d.bar_value().filter(|v| v.is_finite()) else {
            continue;
        };
        let color = colors.color(d.color_key());
        let mut rect = Rectangle::new(
            [
                (SegmentValue::Exact(s.index), v.min(0.0)),
                (SegmentValue::Exact(s.index + 1), v.max(0.0)),
            ],
            color.filled(),
        );
        rect.set_margin(0, 0, 3, 3);
        bars.push(rect);
        if let Some(g) = d.growth().filter(|g| g.is_finite()) {
            growth_labels.push((s.index, v.max(0.0), g));
        }
    }
    chart.draw_series(bars).map_err(|e| anyhow!("{:?}", e))?;

    for (idx, top, g) in growth_labels {
        let color = if g >= 0.0 { &GROWTH_UP } else { &GROWTH_DOWN };
        let style = TextStyle::from((FontFamily::SansSerif, TICK_FONT_PX))
            .pos(Pos::new(HPos::Center, VPos::Bottom))
            .color(color);
        chart
            .draw_series(std::iter::once(Text::new(
                format_percent(g),
                (SegmentValue::CenterOf(idx), top),
                style,
            )))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    // second label row: one name per group, under the middle bar of its run
    let group_style =
        TextStyle::from((FontFamily::SansSerif, 13)).pos(Pos::new(HPos::Center, VPos::Top));
    for (&idx, label) in &seq.group_labels {
        if label.trim().is_empty() {
            continue;
        }
        let (px, py) = chart.backend_coord(&(SegmentValue::CenterOf(idx), y_lo));
        root.draw(&Text::new(label.clone(), (px, py + 30), group_style.clone()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    root.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Horizontal stacked bars, one per province, bottom to top in input order.
pub fn plot_stacked_bars<P: AsRef<Path>>(
    bars: &[StackedBar],
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
    palette: Option<&Palette>,
) -> Result<()> {
    let path_string = svg_target(out_path.as_ref())?;
    if bars.is_empty() {
        bail!("no data to plot");
    }
    let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
    draw_stacked_bars(root, bars, title, palette)
}

fn draw_stacked_bars<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    bars: &[StackedBar],
    title: &str,
    palette: Option<&Palette>,
) -> Result<()> {
    let keys: Vec<String> = bars
        .iter()
        .flat_map(|b| b.parts.iter().map(|(k, _)| k.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let mut colors = ColorPicker::new(palette);
    let items: Vec<(String, RGBColor)> = keys.iter().map(|k| (k.clone(), colors.color(k))).collect();

    let names: Vec<String> = bars
        .iter()
        .map(|b| truncate_to_width(&b.province, TICK_FONT_PX, 170))
        .collect();
    let left = names
        .iter()
        .map(|s| estimate_text_width_px(s, TICK_FONT_PX))
        .max()
        .unwrap_or(0)
        .saturating_add(18)
        .clamp(48, 200);
    let axis_x_start_px = MARGIN as i32 + left as i32;

    let (w, h) = root.dim_in_pixel();
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let legend_h = legend_height_px(&keys, axis_x_start_px, w as i32).max(40);
    let (plot_area, legend_area) = root.split_vertically((h as i32 - legend_h).max(40));

    let n = bars.len();
    let x_max = bars.iter().map(|b| b.total).fold(0.0, f64::max).max(1.0) * 1.05;
    let mut chart = ChartBuilder::on(&plot_area)
        .margin(MARGIN)
        .caption(title.trim(), (FontFamily::SansSerif, 24))
        .set_label_area_size(LabelAreaPosition::Left, left)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(0f64..x_max, (0..n.saturating_sub(1).max(1)).into_segmented())
        .map_err(|e| anyhow!("{:?}", e))?;

    let y_fmt = |y: &SegmentValue<usize>| match y {
        SegmentValue::CenterOf(i) => names.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };
    let x_fmt = |v: &f64| y_tick(*v);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .x_labels(10)
        .x_label_formatter(&x_fmt)
        .y_label_formatter(&y_fmt)
        .label_style((FontFamily::SansSerif, TICK_FONT_PX))
        .draw()
        .map_err(|e| anyhow!("{:?}", e))?;

    let mut rects = Vec::new();
    for (i, bar) in bars.iter().enumerate() {
        let mut x0 = 0.0;
        for (key, color) in &items {
            let Some(v) = bar
                .parts
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.max(0.0))
            else {
                continue;
            };
            let mut rect = Rectangle::new(
                [
                    (x0, SegmentValue::Exact(i)),
                    (x0 + v, SegmentValue::Exact(i + 1)),
                ],
                color.filled(),
            );
            rect.set_margin(2, 2, 0, 0);
            rects.push(rect);
            x0 += v;
        }
    }
    chart.draw_series(rects).map_err(|e| anyhow!("{:?}", e))?;

    legend_area.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    draw_legend_band(&legend_area, &items, axis_x_start_px)?;

    plot_area.present().map_err(|e| anyhow!("{:?}", e))?;
    legend_area.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}

/// Radar chart of `(axis, value)` pairs on a 0..100 scale; needs at least three axes.
pub fn plot_radar<P: AsRef<Path>>(
    axes: &[(String, f64)],
    out_path: P,
    width: u32,
    height: u32,
    title: &str,
) -> Result<()> {
    let path_string = svg_target(out_path.as_ref())?;
    if axes.len() < 3 {
        bail!("a radar chart needs at least three axes, got {}", axes.len());
    }
    let root = SVGBackend::new(path_string.as_str(), (width, height)).into_drawing_area();
    draw_radar(root, axes, title)
}

fn draw_radar<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    axes: &[(String, f64)],
    title: &str,
) -> Result<()> {
    root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
    let area = if title.trim().is_empty() {
        root
    } else {
        root.titled(title.trim(), (FontFamily::SansSerif, 24))
            .map_err(|e| anyhow!("{:?}", e))?
    };

    let (w, h) = area.dim_in_pixel();
    let (cx, cy) = (w as f64 / 2.0, h as f64 / 2.0);
    let radius = ((w.min(h) as f64) / 2.0 - 70.0).max(20.0);
    let n = axes.len();
    let point = |i: usize, r: f64| -> (i32, i32) {
        let angle = -PI / 2.0 + 2.0 * PI * i as f64 / n as f64;
        (
            (cx + r * angle.cos()).round() as i32,
            (cy + r * angle.sin()).round() as i32,
        )
    };
    let grid = RGBColor(200, 200, 200);

    for step in 1..=5 {
        let r = radius * step as f64 / 5.0;
        let mut ring: Vec<(i32, i32)> = (0..n).map(|i| point(i, r)).collect();
        ring.push(ring[0]);
        area.draw(&PathElement::new(ring, grid.stroke_width(1)))
            .map_err(|e| anyhow!("{:?}", e))?;
        let (lx, ly) = point(0, r);
        area.draw(&Text::new(
            (step * 20).to_string(),
            (lx + 4, ly),
            (FontFamily::SansSerif, 10),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }
    for i in 0..n {
        area.draw(&PathElement::new(
            vec![point(i, 0.0), point(i, radius)],
            grid.stroke_width(1),
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    let color = office_color(0);
    let shape: Vec<(i32, i32)> = axes
        .iter()
        .enumerate()
        .map(|(i, (_, v))| point(i, radius * v.clamp(0.0, 100.0) / 100.0))
        .collect();
    area.draw(&Polygon::new(shape.clone(), color.mix(0.25).filled()))
        .map_err(|e| anyhow!("{:?}", e))?;
    let mut outline = shape.clone();
    outline.push(shape[0]);
    area.draw(&PathElement::new(outline, color.stroke_width(2)))
        .map_err(|e| anyhow!("{:?}", e))?;
    for p in &shape {
        area.draw(&Circle::new(*p, 3, color.filled()))
            .map_err(|e| anyhow!("{:?}", e))?;
    }

    for (i, (name, v)) in axes.iter().enumerate() {
        let angle = -PI / 2.0 + 2.0 * PI * i as f64 / n as f64;
        let hpos = if angle.cos() > 0.2 {
            HPos::Left
        } else if angle.cos() < -0.2 {
            HPos::Right
        } else {
            HPos::Center
        };
        let style = TextStyle::from((FontFamily::SansSerif, 13)).pos(Pos::new(hpos, VPos::Center));
        area.draw(&Text::new(
            format!("{name} ({v:.2})"),
            point(i, radius + 18.0),
            style,
        ))
        .map_err(|e| anyhow!("{:?}", e))?;
    }

    area.present().map_err(|e| anyhow!("{:?}", e))?;
    Ok(())
}
