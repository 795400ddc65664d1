//! Chart geometry: bar, pie and line renderers.
//!
//! Each renderer draws into a caller-supplied region and assumes
//! `labels.len() == values.len()`; the slide templates are responsible for
//! only invoking these with balanced data. Non-positive values degrade to
//! zero-height bars or zero-angle wedges, never a panic.

use std::f64::consts::PI;

use deckgen_schema::{ChartData, Palette};

use crate::svg::{self, px, Rect};

/// Series fallback colors, cycled when the data carries fewer explicit
/// colors than points.
const SERIES_FALLBACK: [&str; 6] = [
    "#4e79a7", "#f28e2b", "#59a14f", "#e15759", "#b07aa1", "#76b7b2",
];

const MAX_BAR_WIDTH: f64 = 80.0;
const BAR_GAP: f64 = 16.0;
const POINT_RADIUS: f64 = 4.0;

/// Color for series `i`: explicit data colors first, fallback cycle after.
fn series_color(data: &ChartData, i: usize) -> String {
    if let Some(colors) = &data.colors {
        if let Some(c) = colors.get(i) {
            if !c.is_empty() {
                return c.clone();
            }
        }
    }
    SERIES_FALLBACK[i % SERIES_FALLBACK.len()].to_string()
}

/// `max(values)` floored at 1 so scale division is always defined.
fn max_value(values: &[f64]) -> f64 {
    values.iter().copied().fold(1.0_f64, f64::max)
}

/// Pie slice angles as `(start, span)` radians, starting at 12 o'clock
/// (−π/2) and proceeding clockwise. Spans always sum to 2π.
pub fn pie_angles(values: &[f64]) -> Vec<(f64, f64)> {
    let total = values.iter().copied().sum::<f64>().max(1.0);
    let mut start = -PI / 2.0;
    values
        .iter()
        .map(|v| {
            let span = 2.0 * PI * (v / total);
            let out = (start, span);
            start += span;
            out
        })
        .collect()
}

/// Vertical bar chart with four labeled gridlines.
pub fn bar_chart(buf: &mut String, data: &ChartData, palette: &Palette, area: Rect) {
    let n = data.labels.len();
    if n == 0 {
        return;
    }
    let max = max_value(&data.values);

    let plot = Rect::new(area.x + 56.0, area.y + 16.0, area.w - 72.0, area.h - 72.0);

    // Gridlines from the top of the plot down; i=0 is the max line.
    for i in 0..4 {
        let y = plot.y + plot.h * (i as f64 / 4.0);
        svg::line(buf, plot.x, y, plot.x + plot.w, y, &palette.border, 1.0);
        let label = (max * (1.0 - i as f64 / 4.0)).round();
        svg::text(
            buf,
            plot.x - 8.0,
            y + 5.0,
            &format!("{}", label as i64),
            14.0,
            &palette.text_muted,
            "sans-serif",
            "end",
            "normal",
        );
    }
    svg::line(buf, plot.x, plot.y + plot.h, plot.x + plot.w, plot.y + plot.h, &palette.text_muted, 1.5);

    let slot = plot.w / n as f64;
    let bar_w = (slot - BAR_GAP).min(MAX_BAR_WIDTH).max(1.0);

    for (i, value) in data.values.iter().enumerate() {
        let h = (value / max).max(0.0) * plot.h;
        let cx = plot.x + slot * (i as f64 + 0.5);
        let x = cx - bar_w / 2.0;
        let y = plot.y + plot.h - h;

        svg::rect_fill(buf, Rect::new(x, y, bar_w, h), &series_color(data, i), 3.0);
        svg::text(
            buf,
            cx,
            y - 8.0,
            &trim_number(*value),
            15.0,
            &palette.text,
            "sans-serif",
            "middle",
            "bold",
        );
        svg::text(
            buf,
            cx,
            plot.y + plot.h + 24.0,
            &data.labels[i],
            14.0,
            &palette.text_muted,
            "sans-serif",
            "middle",
            "normal",
        );
    }
}

/// Pie chart with a side legend of rounded percentages.
pub fn pie_chart(buf: &mut String, data: &ChartData, palette: &Palette, area: Rect) {
    let n = data.labels.len();
    if n == 0 {
        return;
    }
    let total = data.values.iter().copied().sum::<f64>().max(1.0);
    let radius = (area.h / 2.0 - 24.0).min(area.w / 3.0);
    let cx = area.x + area.w * 0.35;
    let cy = area.center_y();

    for (i, (start, span)) in pie_angles(&data.values).iter().enumerate() {
        let end = start + span;
        let x1 = cx + radius * start.cos();
        let y1 = cy + radius * start.sin();
        let x2 = cx + radius * end.cos();
        let y2 = cy + radius * end.sin();
        let large_arc = if *span > PI { 1 } else { 0 };

        buf.push_str(&format!(
            "<path d=\"M {} {} L {} {} A {} {} 0 {} 1 {} {} Z\" fill=\"{}\" \
             stroke=\"{}\" stroke-width=\"2\"/>",
            px(cx),
            px(cy),
            px(x1),
            px(y1),
            px(radius),
            px(radius),
            large_arc,
            px(x2),
            px(y2),
            series_color(data, i),
            palette.background,
        ));
    }

    // Legend beside the pie.
    let legend_x = area.x + area.w * 0.62;
    let mut y = cy - (n as f64 * 30.0) / 2.0 + 15.0;
    for (i, label) in data.labels.iter().enumerate() {
        let pct = (100.0 * data.values[i] / total).round();
        svg::rect_fill(buf, Rect::new(legend_x, y - 11.0, 14.0, 14.0), &series_color(data, i), 3.0);
        svg::text(
            buf,
            legend_x + 22.0,
            y,
            &format!("{} ({}%)", label, pct as i64),
            16.0,
            &palette.text,
            "sans-serif",
            "start",
            "normal",
        );
        y += 30.0;
    }
}

/// Line chart; the `rich` variant additionally fills below the curve.
pub fn line_chart(buf: &mut String, data: &ChartData, palette: &Palette, area: Rect, filled: bool) {
    let n = data.labels.len();
    if n == 0 {
        return;
    }
    let max = max_value(&data.values);
    let plot = Rect::new(area.x + 48.0, area.y + 24.0, area.w - 72.0, area.h - 80.0);
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };

    let points: Vec<(f64, f64)> = data
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = plot.x + (i as f64 / denom) * plot.w;
            let y = plot.y + plot.h - (v / max).max(0.0) * plot.h;
            (x, y)
        })
        .collect();

    svg::line(buf, plot.x, plot.y + plot.h, plot.x + plot.w, plot.y + plot.h, &palette.text_muted, 1.5);

    let path: Vec<String> = points.iter().map(|(x, y)| format!("{},{}", px(*x), px(*y))).collect();

    if filled {
        let mut fill_points = path.clone();
        if let (Some((last_x, _)), Some((first_x, _))) = (points.last(), points.first()) {
            fill_points.push(format!("{},{}", px(*last_x), px(plot.y + plot.h)));
            fill_points.push(format!("{},{}", px(*first_x), px(plot.y + plot.h)));
        }
        buf.push_str(&format!(
            "<polygon points=\"{}\" fill=\"{}\" opacity=\"0.15\"/>",
            fill_points.join(" "),
            palette.primary,
        ));
    }

    buf.push_str(&format!(
        "<polyline points=\"{}\" fill=\"none\" stroke=\"{}\" stroke-width=\"3\"/>",
        path.join(" "),
        palette.primary,
    ));

    for (i, (x, y)) in points.iter().enumerate() {
        svg::circle(buf, *x, *y, POINT_RADIUS, &palette.primary, 1.0);
        svg::text(
            buf,
            *x,
            y - 12.0,
            &trim_number(data.values[i]),
            14.0,
            &palette.text,
            "sans-serif",
            "middle",
            "bold",
        );
        svg::text(
            buf,
            *x,
            plot.y + plot.h + 24.0,
            &data.labels[i],
            14.0,
            &palette.text_muted,
            "sans-serif",
            "middle",
            "normal",
        );
    }
}

/// Integer-like values print without a fraction.
fn trim_number(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        format!("{:.1}", v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn data(labels: &[&str], values: &[f64]) -> ChartData {
        ChartData {
            labels: labels.iter().map(|s| s.to_string()).collect(),
            values: values.to_vec(),
            colors: None,
        }
    }

    fn palette() -> Palette {
        deckgen_schema::ThemeConfig::preset("modern", Default::default()).palette
    }

    const AREA: Rect = Rect {
        x: 100.0,
        y: 100.0,
        w: 800.0,
        h: 400.0,
    };

    #[test]
    fn test_pie_angles_sum_to_full_circle() {
        for values in [vec![1.0, 2.0, 3.0], vec![10.0], vec![5.0, 5.0, 5.0, 5.0]] {
            let spans: f64 = pie_angles(&values).iter().map(|(_, s)| s).sum();
            assert!((spans - 2.0 * PI).abs() < 1e-9, "spans {} for {:?}", spans, values);
        }
    }

    #[test]
    fn test_pie_wedge_split_75_25() {
        let angles = pie_angles(&[75.0, 25.0]);
        assert!((angles[0].1.to_degrees() - 270.0).abs() < 1e-9);
        assert!((angles[1].1.to_degrees() - 90.0).abs() < 1e-9);
        // First wedge starts at 12 o'clock.
        assert!((angles[0].0.to_degrees() - (-90.0)).abs() < 1e-9);
    }

    #[test]
    fn test_pie_legend_percentages() {
        let mut buf = String::new();
        pie_chart(&mut buf, &data(&["A", "B"], &[75.0, 25.0]), &palette(), AREA);
        assert!(buf.contains("A (75%)"));
        assert!(buf.contains("B (25%)"));
    }

    #[test]
    fn test_bar_one_mark_per_label() {
        let mut buf = String::new();
        let d = data(&["a", "b", "c"], &[1.0, 2.0, 3.0]);
        bar_chart(&mut buf, &d, &palette(), AREA);
        // One rect per bar (gridlines are <line> elements).
        assert_eq!(buf.matches("<rect").count(), 3);
        for label in &d.labels {
            assert!(buf.contains(label.as_str()));
        }
    }

    #[test]
    fn test_bar_all_zero_values() {
        let mut buf = String::new();
        bar_chart(&mut buf, &data(&["a", "b"], &[0.0, 0.0]), &palette(), AREA);
        assert!(buf.contains("height=\"0.00\""));
    }

    #[test]
    fn test_bar_negative_values_clamp() {
        let mut buf = String::new();
        bar_chart(&mut buf, &data(&["a"], &[-5.0]), &palette(), AREA);
        assert!(buf.contains("height=\"0.00\""));
    }

    #[test]
    fn test_line_one_point_per_label() {
        let mut buf = String::new();
        line_chart(&mut buf, &data(&["a", "b", "c", "d"], &[1.0, 3.0, 2.0, 4.0]), &palette(), AREA, false);
        assert_eq!(buf.matches("<circle").count(), 4);
        assert_eq!(buf.matches("<polyline").count(), 1);
        assert_eq!(buf.matches("<polygon").count(), 0);
    }

    #[test]
    fn test_line_single_point_does_not_divide_by_zero() {
        let mut buf = String::new();
        line_chart(&mut buf, &data(&["only"], &[7.0]), &palette(), AREA, true);
        assert!(buf.contains("<circle"));
        assert!(!buf.contains("NaN"));
        assert!(!buf.contains("inf"));
    }

    #[test]
    fn test_rich_line_adds_fill() {
        let mut buf = String::new();
        line_chart(&mut buf, &data(&["a", "b"], &[1.0, 2.0]), &palette(), AREA, true);
        assert_eq!(buf.matches("<polygon").count(), 1);
    }

    #[test]
    fn test_explicit_colors_take_priority() {
        let d = ChartData {
            labels: vec!["a".to_string(), "b".to_string()],
            values: vec![1.0, 2.0],
            colors: Some(vec!["#ff0000".to_string()]),
        };
        assert_eq!(series_color(&d, 0), "#ff0000");
        assert_eq!(series_color(&d, 1), SERIES_FALLBACK[1]);
    }
}
