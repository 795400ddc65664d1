//! Slide templates and the top-level `render` dispatch.
//!
//! `render` is pure: no I/O, no model calls, and identical input always
//! yields byte-identical SVG. The complexity tier changes decoration
//! density only, never content or ordering.

use deckgen_schema::{ChartData, ChartKind, ColumnBlock, Complexity, SlideBody, SlideRecord, ThemeConfig};

use crate::charts;
use crate::svg::{self, px, Rect};

pub const CANVAS_WIDTH: f64 = 1280.0;
pub const CANVAS_HEIGHT: f64 = 720.0;

/// Title font drops one step past this length so it never overflows.
const TITLE_SHRINK_THRESHOLD: usize = 24;

const MARGIN: f64 = 80.0;

/// Render one slide to an SVG document.
pub fn render(slide: &SlideRecord, theme: &ThemeConfig, total_slides: usize) -> String {
    let mut buf = String::with_capacity(4096);
    buf.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{}\" height=\"{}\" \
         viewBox=\"0 0 {} {}\">",
        px(CANVAS_WIDTH),
        px(CANVAS_HEIGHT),
        px(CANVAS_WIDTH),
        px(CANVAS_HEIGHT),
    ));

    backdrop(&mut buf, theme);

    match &slide.body {
        SlideBody::Title { subtitle } => title_slide(&mut buf, slide, subtitle.as_deref(), theme),
        SlideBody::Agenda { bullets } => agenda_slide(&mut buf, slide, bullets, theme),
        SlideBody::Content { bullets } => content_slide(&mut buf, slide, bullets, theme),
        SlideBody::TwoColumn { columns } => columns_slide(&mut buf, slide, columns, theme, false),
        SlideBody::Comparison { columns } => columns_slide(&mut buf, slide, columns, theme, true),
        SlideBody::Chart {
            chart_type,
            chart_data,
            bullets,
        } => chart_slide(&mut buf, slide, *chart_type, chart_data, bullets.as_deref(), theme),
        SlideBody::ImageText {
            key_number,
            key_number_label,
            bullets,
            image_data_url,
        } => image_text_slide(
            &mut buf,
            slide,
            key_number.as_deref(),
            key_number_label.as_deref(),
            bullets.as_deref(),
            image_data_url.as_deref(),
            theme,
        ),
        SlideBody::Summary { bullets } => summary_slide(&mut buf, slide, bullets, theme),
        // Unrecognized type tags degrade to the content layout.
        SlideBody::Other { bullets } => content_slide(&mut buf, slide, bullets, theme),
    }

    footer(&mut buf, slide.index, total_slides, theme);
    buf.push_str("</svg>");
    buf
}

/// Tier-selected background treatment behind every slide type.
fn backdrop(buf: &mut String, theme: &ThemeConfig) {
    let p = &theme.palette;
    match theme.complexity {
        Complexity::Simple => {
            svg::rect_fill(buf, Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), &p.background, 0.0);
        }
        Complexity::Standard => {
            svg::rect_fill(buf, Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), &p.background, 0.0);
            svg::rect_fill(buf, Rect::new(0.0, 0.0, CANVAS_WIDTH, 8.0), &p.accent, 0.0);
        }
        Complexity::Rich => {
            buf.push_str(&format!(
                "<defs><linearGradient id=\"bg\" x1=\"0\" y1=\"0\" x2=\"1\" y2=\"1\">\
                 <stop offset=\"0\" stop-color=\"{}\"/>\
                 <stop offset=\"1\" stop-color=\"{}\"/>\
                 </linearGradient></defs>\
                 <rect x=\"0\" y=\"0\" width=\"{}\" height=\"{}\" fill=\"url(#bg)\"/>",
                p.background,
                p.surface,
                px(CANVAS_WIDTH),
                px(CANVAS_HEIGHT),
            ));
            svg::circle(buf, 1180.0, 80.0, 160.0, &p.primary, 0.06);
            svg::circle(buf, 120.0, 640.0, 120.0, &p.secondary, 0.06);
            svg::circle(buf, 1100.0, 620.0, 90.0, &p.accent, 0.06);
        }
    }
}

fn footer(buf: &mut String, index: usize, total: usize, theme: &ThemeConfig) {
    svg::text(
        buf,
        CANVAS_WIDTH - 40.0,
        CANVAS_HEIGHT - 24.0,
        &format!("{} / {}", index + 1, total),
        16.0,
        &theme.palette.text_muted,
        &theme.fonts.body,
        "end",
        "normal",
    );
}

/// Shared top-left heading for the list-style templates.
fn heading(buf: &mut String, title: &str, theme: &ThemeConfig) {
    svg::text(
        buf,
        MARGIN,
        104.0,
        title,
        36.0,
        &theme.palette.text,
        &theme.fonts.heading,
        "start",
        "bold",
    );
    svg::rect_fill(buf, Rect::new(MARGIN, 122.0, 72.0, 4.0), &theme.palette.primary, 2.0);
}

fn title_slide(buf: &mut String, slide: &SlideRecord, subtitle: Option<&str>, theme: &ThemeConfig) {
    let p = &theme.palette;
    let size = if slide.title.chars().count() > TITLE_SHRINK_THRESHOLD {
        44.0
    } else {
        54.0
    };

    svg::text(
        buf,
        CANVAS_WIDTH / 2.0,
        340.0,
        &slide.title,
        size,
        &p.text,
        &theme.fonts.heading,
        "middle",
        "bold",
    );

    if let Some(sub) = subtitle {
        svg::text(
            buf,
            CANVAS_WIDTH / 2.0,
            404.0,
            sub,
            26.0,
            &p.text_muted,
            &theme.fonts.body,
            "middle",
            "normal",
        );
    }

    match theme.complexity {
        Complexity::Simple => {}
        Complexity::Standard => {
            svg::rect_fill(buf, Rect::new(560.0, 366.0, 160.0, 4.0), &p.accent, 2.0);
        }
        Complexity::Rich => {
            svg::rect_fill(buf, Rect::new(560.0, 366.0, 160.0, 4.0), &p.accent, 2.0);
            for (x1, y1, x2, y2, x3, y3) in [
                (64.0, 112.0, 64.0, 64.0, 112.0, 64.0),
                (1168.0, 64.0, 1216.0, 64.0, 1216.0, 112.0),
                (1216.0, 608.0, 1216.0, 656.0, 1168.0, 656.0),
                (112.0, 656.0, 64.0, 656.0, 64.0, 608.0),
            ] {
                buf.push_str(&format!(
                    "<path d=\"M {} {} L {} {} L {} {}\" fill=\"none\" stroke=\"{}\" \
                     stroke-width=\"3\"/>",
                    px(x1),
                    px(y1),
                    px(x2),
                    px(y2),
                    px(x3),
                    px(y3),
                    p.primary,
                ));
            }
        }
    }
}

fn agenda_slide(buf: &mut String, slide: &SlideRecord, bullets: &[String], theme: &ThemeConfig) {
    let p = &theme.palette;
    heading(buf, &slide.title, theme);

    let mut y = 196.0;
    for (i, item) in bullets.iter().enumerate() {
        match theme.complexity {
            Complexity::Rich => {
                svg::rect_card(buf, Rect::new(MARGIN, y - 34.0, 1120.0, 56.0), &p.surface, &p.border, 10.0);
                svg::circle(buf, MARGIN + 40.0, y - 6.0, 18.0, &p.primary, 1.0);
                svg::text(buf, MARGIN + 40.0, y, &format!("{}", i + 1), 18.0, &p.background, &theme.fonts.body, "middle", "bold");
                svg::text(buf, MARGIN + 80.0, y, item, 22.0, &p.text, &theme.fonts.body, "start", "normal");
            }
            Complexity::Standard => {
                buf.push_str(&format!(
                    "<circle cx=\"{}\" cy=\"{}\" r=\"16\" fill=\"none\" stroke=\"{}\" stroke-width=\"2\"/>",
                    px(MARGIN + 16.0),
                    px(y - 6.0),
                    p.primary,
                ));
                svg::text(buf, MARGIN + 16.0, y, &format!("{}", i + 1), 16.0, &p.primary, &theme.fonts.body, "middle", "bold");
                svg::text(buf, MARGIN + 52.0, y, item, 22.0, &p.text, &theme.fonts.body, "start", "normal");
            }
            Complexity::Simple => {
                svg::text(buf, MARGIN, y, &format!("- {}", item), 22.0, &p.text, &theme.fonts.body, "start", "normal");
            }
        }
        y += 72.0;
    }
}

fn content_slide(buf: &mut String, slide: &SlideRecord, bullets: &[String], theme: &ThemeConfig) {
    heading(buf, &slide.title, theme);
    bullet_list(buf, bullets, Rect::new(MARGIN, 196.0, 1120.0, 440.0), &theme.palette.primary, theme);
}

/// Bulleted list with tier-dependent markers, shared by several templates.
fn bullet_list(buf: &mut String, bullets: &[String], area: Rect, marker_color: &str, theme: &ThemeConfig) {
    let p = &theme.palette;
    let mut y = area.y;
    for item in bullets {
        match theme.complexity {
            Complexity::Rich => {
                svg::rect_card(buf, Rect::new(area.x, y - 30.0, area.w, 48.0), &p.surface, &p.border, 8.0);
                svg::rect_fill(buf, Rect::new(area.x, y - 30.0, 4.0, 48.0), marker_color, 2.0);
                svg::text(buf, area.x + 24.0, y, item, 21.0, &p.text, &theme.fonts.body, "start", "normal");
            }
            Complexity::Standard => {
                svg::circle(buf, area.x + 8.0, y - 7.0, 6.0, marker_color, 1.0);
                svg::text(buf, area.x + 28.0, y, item, 21.0, &p.text, &theme.fonts.body, "start", "normal");
            }
            Complexity::Simple => {
                svg::text(buf, area.x, y, &format!("- {}", item), 21.0, &p.text, &theme.fonts.body, "start", "normal");
            }
        }
        y += 64.0;
    }
}

fn columns_slide(
    buf: &mut String,
    slide: &SlideRecord,
    columns: &[ColumnBlock],
    theme: &ThemeConfig,
    versus: bool,
) {
    let p = &theme.palette;
    heading(buf, &slide.title, theme);

    // Column rows lay out independently; uneven item counts are fine.
    let lanes = [
        (MARGIN, p.primary.clone()),
        (680.0, p.secondary.clone()),
    ];
    for (i, column) in columns.iter().take(2).enumerate() {
        let (x, color) = &lanes[i];
        svg::text(buf, *x, 196.0, &column.header, 26.0, color, &theme.fonts.heading, "start", "bold");
        let mut y = 252.0;
        for item in &column.items {
            svg::rect_fill(buf, Rect::new(*x, y - 16.0, 10.0, 10.0), color, 2.0);
            svg::text(buf, *x + 24.0, y, item, 20.0, &p.text, &theme.fonts.body, "start", "normal");
            y += 56.0;
        }
    }

    svg::line(buf, 640.0, 176.0, 640.0, 640.0, &p.border, 2.0);

    if versus && theme.complexity != Complexity::Simple {
        svg::circle(buf, 640.0, 196.0, 28.0, &p.accent, 1.0);
        svg::text(buf, 640.0, 203.0, "VS", 20.0, &p.background, &theme.fonts.heading, "middle", "bold");
    }
}

fn chart_slide(
    buf: &mut String,
    slide: &SlideRecord,
    kind: ChartKind,
    data: &ChartData,
    bullets: Option<&[String]>,
    theme: &ThemeConfig,
) {
    let p = &theme.palette;
    heading(buf, &slide.title, theme);

    let has_bullets = bullets.map(|b| !b.is_empty()).unwrap_or(false);
    let chart_area = if has_bullets {
        Rect::new(MARGIN, 172.0, 640.0, 460.0)
    } else {
        Rect::new(160.0, 172.0, 960.0, 480.0)
    };

    if data.is_balanced() && data.point_count() > 0 {
        match kind {
            ChartKind::Bar => charts::bar_chart(buf, data, p, chart_area),
            ChartKind::Pie => charts::pie_chart(buf, data, p, chart_area),
            ChartKind::Line => {
                charts::line_chart(buf, data, p, chart_area, theme.complexity == Complexity::Rich)
            }
        }
    } else {
        log::warn!(
            "chart on slide {} has {} labels and {} values, skipping plot",
            slide.index,
            data.labels.len(),
            data.values.len(),
        );
        svg::text(
            buf,
            chart_area.center_x(),
            chart_area.center_y(),
            "No chart data",
            22.0,
            &p.text_muted,
            &theme.fonts.body,
            "middle",
            "normal",
        );
    }

    if let Some(items) = bullets {
        if !items.is_empty() {
            bullet_list(buf, items, Rect::new(780.0, 220.0, 420.0, 400.0), &p.primary, theme);
        }
    }
}

fn image_text_slide(
    buf: &mut String,
    slide: &SlideRecord,
    key_number: Option<&str>,
    key_number_label: Option<&str>,
    bullets: Option<&[String]>,
    image_data_url: Option<&str>,
    theme: &ThemeConfig,
) {
    let p = &theme.palette;
    heading(buf, &slide.title, theme);

    let left = Rect::new(MARGIN, 180.0, 520.0, 440.0);
    if let Some(url) = image_data_url {
        if theme.complexity == Complexity::Rich {
            buf.push_str(&format!(
                "<clipPath id=\"img\"><rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
                 rx=\"16\"/></clipPath>",
                px(left.x),
                px(left.y),
                px(left.w),
                px(left.h),
            ));
        }
        let clip = if theme.complexity == Complexity::Rich {
            " clip-path=\"url(#img)\""
        } else {
            ""
        };
        buf.push_str(&format!(
            "<image href=\"{}\" x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" \
             preserveAspectRatio=\"xMidYMid meet\"{}/>",
            svg::escape_xml(url),
            px(left.x),
            px(left.y),
            px(left.w),
            px(left.h),
            clip,
        ));
    } else {
        // Key-number fallback occupies the same region as the image would.
        svg::text(
            buf,
            left.center_x(),
            left.center_y(),
            key_number.unwrap_or("\u{2014}"),
            96.0,
            &p.primary,
            &theme.fonts.heading,
            "middle",
            "bold",
        );
        if let Some(label) = key_number_label {
            svg::text(
                buf,
                left.center_x(),
                left.center_y() + 56.0,
                label,
                24.0,
                &p.text_muted,
                &theme.fonts.body,
                "middle",
                "normal",
            );
        }
    }

    if let Some(items) = bullets {
        bullet_list(buf, items, Rect::new(680.0, 240.0, 520.0, 380.0), &p.primary, theme);
    }
}

fn summary_slide(buf: &mut String, slide: &SlideRecord, bullets: &[String], theme: &ThemeConfig) {
    let p = &theme.palette;
    svg::text(
        buf,
        CANVAS_WIDTH / 2.0,
        132.0,
        &slide.title,
        40.0,
        &p.text,
        &theme.fonts.heading,
        "middle",
        "bold",
    );
    svg::rect_fill(buf, Rect::new(604.0, 152.0, 72.0, 4.0), &p.primary, 2.0);

    let mut y = 244.0;
    for item in bullets {
        match theme.complexity {
            Complexity::Rich => {
                svg::rect_card(buf, Rect::new(240.0, y - 32.0, 800.0, 52.0), &p.surface, &p.border, 8.0);
                svg::rect_fill(buf, Rect::new(240.0, y - 32.0, 4.0, 52.0), &p.primary, 2.0);
                svg::text(buf, 272.0, y, item, 22.0, &p.text, &theme.fonts.body, "start", "normal");
            }
            _ => {
                svg::rect_fill(buf, Rect::new(400.0, y - 16.0, 10.0, 10.0), &p.primary, 2.0);
                svg::text(buf, 424.0, y, item, 22.0, &p.text, &theme.fonts.body, "start", "normal");
            }
        }
        y += 68.0;
    }
}
