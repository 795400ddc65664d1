//! Per-slide shape composition.
//!
//! Mirrors the SVG renderer's type dispatch and canvas layout, but emits
//! native DrawingML objects so every element stays editable after export.

use deckgen_render::charts::pie_angles;
use deckgen_schema::{
    ChartData, ChartKind, ColumnBlock, Complexity, SlideBody, SlideRecord, ThemeConfig,
};

use crate::shapes;

const CANVAS_W: f64 = 1280.0;
const CANVAS_H: f64 = 720.0;
const MARGIN: f64 = 80.0;
const TITLE_SHRINK_THRESHOLD: usize = 24;

/// Sequential shape id allocator; ids restart per slide.
struct Ids(u32);

impl Ids {
    fn next(&mut self) -> u32 {
        self.0 += 1;
        self.0
    }
}

/// Build the `<p:spTree>` shape children for one slide.
pub fn slide_shapes(
    slide: &SlideRecord,
    theme: &ThemeConfig,
    total: usize,
    image_rel: Option<&str>,
) -> String {
    let mut out = String::with_capacity(4096);
    let mut ids = Ids(1);

    backdrop(&mut out, &mut ids, theme);

    match &slide.body {
        SlideBody::Title { subtitle } => title_shapes(&mut out, &mut ids, slide, subtitle.as_deref(), theme),
        SlideBody::Agenda { bullets } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            numbered_rows(&mut out, &mut ids, bullets, theme);
        }
        SlideBody::Content { bullets } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            bullet_box(&mut out, &mut ids, bullets, MARGIN, 180.0, 1120.0, 440.0, theme);
        }
        SlideBody::TwoColumn { columns } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            column_shapes(&mut out, &mut ids, columns, theme, false);
        }
        SlideBody::Comparison { columns } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            column_shapes(&mut out, &mut ids, columns, theme, true);
        }
        SlideBody::Chart {
            chart_type,
            chart_data,
            bullets,
        } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            chart_shapes(&mut out, &mut ids, *chart_type, chart_data, bullets.as_deref(), theme);
        }
        SlideBody::ImageText {
            key_number,
            key_number_label,
            bullets,
            ..
        } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            image_text_shapes(
                &mut out,
                &mut ids,
                key_number.as_deref(),
                key_number_label.as_deref(),
                bullets.as_deref(),
                image_rel,
                theme,
            );
        }
        SlideBody::Summary { bullets } => summary_shapes(&mut out, &mut ids, slide, bullets, theme),
        SlideBody::Other { bullets } => {
            heading(&mut out, &mut ids, &slide.title, theme);
            bullet_box(&mut out, &mut ids, bullets, MARGIN, 180.0, 1120.0, 440.0, theme);
        }
    }

    page_number(&mut out, &mut ids, slide.index, total, theme);
    out
}

fn backdrop(out: &mut String, ids: &mut Ids, theme: &ThemeConfig) {
    let p = &theme.palette;
    out.push_str(&shapes::solid_rect(
        ids.next(),
        "Background",
        0.0,
        0.0,
        CANVAS_W,
        CANVAS_H,
        &p.background,
        0.0,
    ));
    match theme.complexity {
        Complexity::Simple => {}
        Complexity::Standard => {
            out.push_str(&shapes::solid_rect(ids.next(), "Accent Bar", 0.0, 0.0, CANVAS_W, 8.0, &p.accent, 0.0));
        }
        Complexity::Rich => {
            out.push_str(&shapes::solid_rect(ids.next(), "Accent Bar", 0.0, 0.0, CANVAS_W, 8.0, &p.accent, 0.0));
            out.push_str(&shapes::ellipse(ids.next(), "Decor 1", 1020.0, -80.0, 320.0, 320.0, &p.surface));
            out.push_str(&shapes::ellipse(ids.next(), "Decor 2", 0.0, 520.0, 240.0, 240.0, &p.surface));
        }
    }
}

fn page_number(out: &mut String, ids: &mut Ids, index: usize, total: usize, theme: &ThemeConfig) {
    let para = shapes::paragraph(
        &shapes::run(&format!("{} / {}", index + 1, total), 12.0, &theme.palette.text_muted, false),
        "r",
        None,
    );
    out.push_str(&shapes::text_box(ids.next(), "Page Number", 1080.0, 672.0, 160.0, 32.0, "ctr", &para));
}

fn heading(out: &mut String, ids: &mut Ids, title: &str, theme: &ThemeConfig) {
    let p = &theme.palette;
    let para = shapes::paragraph(&shapes::run(title, 27.0, &p.text, true), "l", None);
    out.push_str(&shapes::text_box(ids.next(), "Title", MARGIN, 64.0, 1120.0, 60.0, "ctr", &para));
    out.push_str(&shapes::solid_rect(ids.next(), "Title Rule", MARGIN, 126.0, 72.0, 4.0, &p.primary, 2.0));
}

fn title_shapes(out: &mut String, ids: &mut Ids, slide: &SlideRecord, subtitle: Option<&str>, theme: &ThemeConfig) {
    let p = &theme.palette;
    let size = if slide.title.chars().count() > TITLE_SHRINK_THRESHOLD {
        33.0
    } else {
        40.0
    };
    let para = shapes::paragraph(&shapes::run(&slide.title, size, &p.text, true), "ctr", None);
    out.push_str(&shapes::text_box(ids.next(), "Title", MARGIN, 280.0, 1120.0, 90.0, "ctr", &para));

    if theme.complexity != Complexity::Simple {
        out.push_str(&shapes::solid_rect(ids.next(), "Underline", 560.0, 380.0, 160.0, 4.0, &p.accent, 2.0));
    }
    if let Some(sub) = subtitle {
        let para = shapes::paragraph(&shapes::run(sub, 19.0, &p.text_muted, false), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Subtitle", MARGIN, 396.0, 1120.0, 48.0, "ctr", &para));
    }
}

fn numbered_rows(out: &mut String, ids: &mut Ids, bullets: &[String], theme: &ThemeConfig) {
    let p = &theme.palette;
    let mut y = 168.0;
    for (i, item) in bullets.iter().enumerate() {
        match theme.complexity {
            Complexity::Simple => {
                let para = shapes::paragraph(&shapes::run(item, 16.0, &p.text, false), "l", Some('-'));
                out.push_str(&shapes::text_box(ids.next(), "Agenda Item", MARGIN, y, 1120.0, 48.0, "ctr", &para));
            }
            _ => {
                if theme.complexity == Complexity::Rich {
                    out.push_str(&shapes::solid_rect(ids.next(), "Agenda Card", MARGIN, y, 1120.0, 56.0, &p.surface, 8.0));
                }
                out.push_str(&shapes::ellipse(ids.next(), "Agenda Badge", MARGIN + 16.0, y + 10.0, 36.0, 36.0, &p.primary));
                let num = shapes::paragraph(&shapes::run(&format!("{}", i + 1), 13.0, &p.background, true), "ctr", None);
                out.push_str(&shapes::text_box(ids.next(), "Badge Number", MARGIN + 16.0, y + 10.0, 36.0, 36.0, "ctr", &num));
                let para = shapes::paragraph(&shapes::run(item, 16.0, &p.text, false), "l", None);
                out.push_str(&shapes::text_box(ids.next(), "Agenda Item", MARGIN + 68.0, y, 1040.0, 56.0, "ctr", &para));
            }
        }
        y += 72.0;
    }
}

/// One text box holding the whole list, one paragraph per bullet.
fn bullet_box(out: &mut String, ids: &mut Ids, bullets: &[String], x: f64, y: f64, w: f64, h: f64, theme: &ThemeConfig) {
    let p = &theme.palette;
    let marker = if theme.complexity == Complexity::Simple {
        '-'
    } else {
        '\u{2022}'
    };
    let mut paragraphs = String::new();
    for item in bullets {
        paragraphs.push_str(&shapes::paragraph(
            &shapes::run(item, 16.0, &p.text, false),
            "l",
            Some(marker),
        ));
    }
    if bullets.is_empty() {
        paragraphs.push_str("<a:p/>");
    }
    out.push_str(&shapes::text_box(ids.next(), "Body", x, y, w, h, "t", &paragraphs));
}

fn column_shapes(out: &mut String, ids: &mut Ids, columns: &[ColumnBlock], theme: &ThemeConfig, versus: bool) {
    let p = &theme.palette;
    let lanes = [(MARGIN, p.primary.clone()), (680.0, p.secondary.clone())];

    for (i, column) in columns.iter().take(2).enumerate() {
        let (x, color) = &lanes[i];
        let head = shapes::paragraph(&shapes::run(&column.header, 20.0, color, true), "l", None);
        out.push_str(&shapes::text_box(ids.next(), "Column Header", *x, 168.0, 520.0, 48.0, "ctr", &head));

        let mut paragraphs = String::new();
        for item in &column.items {
            paragraphs.push_str(&shapes::paragraph(
                &shapes::run(item, 15.0, &p.text, false),
                "l",
                Some('\u{25AA}'),
            ));
        }
        if !paragraphs.is_empty() {
            out.push_str(&shapes::text_box(ids.next(), "Column Body", *x, 224.0, 520.0, 400.0, "t", &paragraphs));
        }
    }

    out.push_str(&shapes::line(ids.next(), "Divider", 640.0, 176.0, 640.0, 640.0, &p.border, 1.5));

    if versus && theme.complexity != Complexity::Simple {
        out.push_str(&shapes::ellipse(ids.next(), "VS Badge", 612.0, 168.0, 56.0, 56.0, &p.accent));
        let vs = shapes::paragraph(&shapes::run("VS", 15.0, &p.background, true), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "VS", 612.0, 168.0, 56.0, 56.0, "ctr", &vs));
    }
}

fn chart_shapes(
    out: &mut String,
    ids: &mut Ids,
    kind: ChartKind,
    data: &ChartData,
    bullets: Option<&[String]>,
    theme: &ThemeConfig,
) {
    let has_bullets = bullets.map(|b| !b.is_empty()).unwrap_or(false);
    let (x, w) = if has_bullets { (MARGIN, 640.0) } else { (160.0, 960.0) };
    let (y, h) = (180.0, 440.0);

    if data.is_balanced() && data.point_count() > 0 {
        match kind {
            ChartKind::Bar => bar_shapes(out, ids, data, theme, x, y, w, h),
            ChartKind::Pie => pie_shapes(out, ids, data, theme, x, y, w, h),
            ChartKind::Line => line_shapes(out, ids, data, theme, x, y, w, h),
        }
    } else {
        let para = shapes::paragraph(
            &shapes::run("No chart data", 16.0, &theme.palette.text_muted, false),
            "ctr",
            None,
        );
        out.push_str(&shapes::text_box(ids.next(), "Chart Placeholder", x, y, w, h, "ctr", &para));
    }

    if let Some(items) = bullets {
        if !items.is_empty() {
            bullet_box(out, ids, items, 780.0, 200.0, 420.0, 420.0, theme);
        }
    }
}

fn series_color(data: &ChartData, palette: &deckgen_schema::Palette, i: usize) -> String {
    if let Some(colors) = &data.colors {
        if let Some(c) = colors.get(i) {
            if !c.is_empty() {
                return c.clone();
            }
        }
    }
    match i % 3 {
        0 => palette.primary.clone(),
        1 => palette.secondary.clone(),
        _ => palette.accent.clone(),
    }
}

#[allow(clippy::too_many_arguments)]
fn bar_shapes(out: &mut String, ids: &mut Ids, data: &ChartData, theme: &ThemeConfig, x: f64, y: f64, w: f64, h: f64) {
    let p = &theme.palette;
    let n = data.values.len();
    let max = data.values.iter().copied().fold(1.0_f64, f64::max);
    let plot_h = h - 72.0;
    let baseline = y + plot_h;

    out.push_str(&shapes::line(ids.next(), "Axis", x, baseline, x + w, baseline, &p.text_muted, 1.0));

    let slot = w / n as f64;
    let bar_w = (slot - 16.0).min(80.0).max(1.0);

    for (i, value) in data.values.iter().enumerate() {
        let bh = (value / max).max(0.0) * plot_h;
        let cx = x + slot * (i as f64 + 0.5);
        if bh > 0.0 {
            out.push_str(&shapes::solid_rect(ids.next(), "Bar", cx - bar_w / 2.0, baseline - bh, bar_w, bh, &series_color(data, p, i), 2.0));
        }
        let value_para = shapes::paragraph(&shapes::run(&format!("{}", value), 11.0, &p.text, true), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Bar Value", cx - 60.0, baseline - bh - 34.0, 120.0, 28.0, "b", &value_para));
        let label_para = shapes::paragraph(&shapes::run(&data.labels[i], 11.0, &p.text_muted, false), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Bar Label", cx - 60.0, baseline + 6.0, 120.0, 28.0, "t", &label_para));
    }
}

#[allow(clippy::too_many_arguments)]
fn pie_shapes(out: &mut String, ids: &mut Ids, data: &ChartData, theme: &ThemeConfig, x: f64, y: f64, w: f64, h: f64) {
    let p = &theme.palette;
    let total = data.values.iter().copied().sum::<f64>().max(1.0);
    let diameter = (h - 48.0).min(w * 0.6);
    let px = x + w * 0.3 - diameter / 2.0;
    let py = y + (h - diameter) / 2.0;

    for (i, (start, span)) in pie_angles(&data.values).iter().enumerate() {
        if *span <= 0.0 {
            continue;
        }
        out.push_str(&shapes::pie_wedge(
            ids.next(),
            "Wedge",
            px,
            py,
            diameter,
            diameter,
            start.to_degrees(),
            (start + span).to_degrees(),
            &series_color(data, p, i),
            &p.background,
        ));
    }

    let legend_x = x + w * 0.62;
    let mut ly = y + (h - data.labels.len() as f64 * 34.0) / 2.0;
    for (i, label) in data.labels.iter().enumerate() {
        let pct = (100.0 * data.values[i] / total).round() as i64;
        out.push_str(&shapes::solid_rect(ids.next(), "Legend Swatch", legend_x, ly + 8.0, 14.0, 14.0, &series_color(data, p, i), 2.0));
        let para = shapes::paragraph(&shapes::run(&format!("{} ({}%)", label, pct), 13.0, &p.text, false), "l", None);
        out.push_str(&shapes::text_box(ids.next(), "Legend", legend_x + 22.0, ly, 300.0, 30.0, "ctr", &para));
        ly += 34.0;
    }
}

#[allow(clippy::too_many_arguments)]
fn line_shapes(out: &mut String, ids: &mut Ids, data: &ChartData, theme: &ThemeConfig, x: f64, y: f64, w: f64, h: f64) {
    let p = &theme.palette;
    let n = data.values.len();
    let max = data.values.iter().copied().fold(1.0_f64, f64::max);
    let plot_h = h - 80.0;
    let baseline = y + plot_h;
    let denom = if n > 1 { (n - 1) as f64 } else { 1.0 };

    out.push_str(&shapes::line(ids.next(), "Axis", x, baseline, x + w, baseline, &p.text_muted, 1.0));

    let points: Vec<(f64, f64)> = data
        .values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            (
                x + (i as f64 / denom) * w,
                y + plot_h - (v / max).max(0.0) * plot_h,
            )
        })
        .collect();

    for pair in points.windows(2) {
        out.push_str(&shapes::line(ids.next(), "Segment", pair[0].0, pair[0].1, pair[1].0, pair[1].1, &p.primary, 2.25));
    }

    for (i, (cx, cy)) in points.iter().enumerate() {
        out.push_str(&shapes::ellipse(ids.next(), "Point", cx - 5.0, cy - 5.0, 10.0, 10.0, &p.primary));
        let value_para = shapes::paragraph(&shapes::run(&format!("{}", data.values[i]), 10.0, &p.text, true), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Point Value", cx - 50.0, cy - 40.0, 100.0, 26.0, "b", &value_para));
        let label_para = shapes::paragraph(&shapes::run(&data.labels[i], 10.0, &p.text_muted, false), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Point Label", cx - 50.0, baseline + 6.0, 100.0, 26.0, "t", &label_para));
    }
}

fn image_text_shapes(
    out: &mut String,
    ids: &mut Ids,
    key_number: Option<&str>,
    key_number_label: Option<&str>,
    bullets: Option<&[String]>,
    image_rel: Option<&str>,
    theme: &ThemeConfig,
) {
    let p = &theme.palette;

    if let Some(rel) = image_rel {
        out.push_str(&shapes::picture(ids.next(), "Slide Image", rel, MARGIN, 180.0, 520.0, 440.0));
    } else {
        let number = key_number.unwrap_or("\u{2014}");
        let para = shapes::paragraph(&shapes::run(number, 72.0, &p.primary, true), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Key Number", MARGIN, 300.0, 520.0, 120.0, "ctr", &para));
        if let Some(label) = key_number_label {
            let para = shapes::paragraph(&shapes::run(label, 18.0, &p.text_muted, false), "ctr", None);
            out.push_str(&shapes::text_box(ids.next(), "Key Number Label", MARGIN, 424.0, 520.0, 44.0, "ctr", &para));
        }
    }

    if let Some(items) = bullets {
        bullet_box(out, ids, items, 680.0, 220.0, 520.0, 400.0, theme);
    }
}

fn summary_shapes(out: &mut String, ids: &mut Ids, slide: &SlideRecord, bullets: &[String], theme: &ThemeConfig) {
    let p = &theme.palette;
    let para = shapes::paragraph(&shapes::run(&slide.title, 30.0, &p.text, true), "ctr", None);
    out.push_str(&shapes::text_box(ids.next(), "Title", MARGIN, 88.0, 1120.0, 64.0, "ctr", &para));
    out.push_str(&shapes::solid_rect(ids.next(), "Title Rule", 604.0, 156.0, 72.0, 4.0, &p.primary, 2.0));

    let mut y = 216.0;
    for item in bullets {
        if theme.complexity == Complexity::Rich {
            out.push_str(&shapes::solid_rect(ids.next(), "Summary Card", 240.0, y, 800.0, 52.0, &p.surface, 8.0));
            out.push_str(&shapes::solid_rect(ids.next(), "Summary Rule", 240.0, y, 4.0, 52.0, &p.primary, 0.0));
        }
        let para = shapes::paragraph(&shapes::run(item, 16.0, &p.text, false), "ctr", None);
        out.push_str(&shapes::text_box(ids.next(), "Summary Item", 240.0, y, 800.0, 52.0, "ctr", &para));
        y += 68.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn theme() -> ThemeConfig {
        ThemeConfig::preset("modern", Complexity::Standard)
    }

    #[test]
    fn test_every_slide_gets_page_number() {
        let slide = SlideRecord::content(4, "T", vec![]);
        let xml = slide_shapes(&slide, &theme(), 10, None);
        assert!(xml.contains("5 / 10"));
    }

    #[test]
    fn test_pie_wedges_use_preset_geometry() {
        let slide = SlideRecord {
            index: 0,
            title: "Split".to_string(),
            notes: None,
            body: SlideBody::Chart {
                chart_type: ChartKind::Pie,
                chart_data: ChartData {
                    labels: vec!["A".to_string(), "B".to_string()],
                    values: vec![75.0, 25.0],
                    colors: None,
                },
                bullets: None,
            },
        };
        let xml = slide_shapes(&slide, &theme(), 1, None);
        assert_eq!(xml.matches("prst=\"pie\"").count(), 2);
        // First wedge: -90 degrees to 180 degrees in 60000ths.
        assert!(xml.contains("fmla=\"val 16200000\""));
        assert!(xml.contains("fmla=\"val 10800000\""));
        assert!(xml.contains("A (75%)"));
    }

    #[test]
    fn test_image_slide_prefers_picture_over_key_number() {
        let body = SlideBody::ImageText {
            key_number: Some("42".to_string()),
            key_number_label: None,
            bullets: None,
            image_data_url: Some("data:image/png;base64,AAAA".to_string()),
        };
        let slide = SlideRecord {
            index: 0,
            title: "T".to_string(),
            notes: None,
            body,
        };
        let with_image = slide_shapes(&slide, &theme(), 1, Some("rId9"));
        assert!(with_image.contains("<p:pic>"));
        assert!(!with_image.contains(">42<"));

        let without = slide_shapes(&slide, &theme(), 1, None);
        assert!(without.contains("Key Number"));
    }

    #[test]
    fn test_zero_value_bars_are_skipped_but_labeled() {
        let slide = SlideRecord {
            index: 0,
            title: "Z".to_string(),
            notes: None,
            body: SlideBody::Chart {
                chart_type: ChartKind::Bar,
                chart_data: ChartData {
                    labels: vec!["a".to_string(), "b".to_string()],
                    values: vec![0.0, 0.0],
                    colors: None,
                },
                bullets: None,
            },
        };
        let xml = slide_shapes(&slide, &theme(), 1, None);
        assert_eq!(xml.matches("name=\"Bar\"").count(), 0);
        assert_eq!(xml.matches("name=\"Bar Label\"").count(), 2);
    }
}
