//! Deck to Typst markup transpiler.
//!
//! Emits one 16:9 landscape page per slide. The PDF is a print rendition:
//! charts become labeled value listings and embedded images degrade to
//! their key-number fallback, while all text content carries over exactly.

use deckgen_schema::{ChartData, ChartKind, ColumnBlock, SlideBody, SlideRecord, ThemeConfig};

/// Transpiler for converting a deck to Typst markup.
pub struct Transpiler;

impl Transpiler {
    /// Transpile a whole deck.
    pub fn transpile(deck: &[SlideRecord], theme: &ThemeConfig, title: Option<&str>) -> String {
        let p = &theme.palette;
        let mut output = String::new();

        if let Some(t) = title {
            output.push_str(&format!("#set document(title: \"{}\")\n", escape_string(t)));
        }
        output.push_str(&format!(
            "#set page(width: 13.333in, height: 7.5in, margin: 0.7in, fill: rgb(\"{}\"), numbering: \"1 / 1\")\n",
            escape_string(&p.background),
        ));
        output.push_str(&format!(
            "#set text(size: 14pt, fill: rgb(\"{}\"))\n",
            escape_string(&p.text),
        ));
        output.push_str(&format!(
            "#show heading: set text(fill: rgb(\"{}\"))\n\n",
            escape_string(&p.text),
        ));

        for (i, slide) in deck.iter().enumerate() {
            if i > 0 {
                output.push_str("#pagebreak()\n");
            }
            output.push_str(&Self::transpile_slide(slide, theme));
            output.push('\n');
        }

        output
    }

    fn transpile_slide(slide: &SlideRecord, theme: &ThemeConfig) -> String {
        let p = &theme.palette;
        match &slide.body {
            SlideBody::Title { subtitle } => {
                let mut s = format!(
                    "#align(center + horizon)[\n#text(size: 34pt, weight: \"bold\")[{}]\n",
                    escape_markup(&slide.title)
                );
                if let Some(sub) = subtitle {
                    s.push_str(&format!(
                        "\n#text(size: 18pt, fill: rgb(\"{}\"))[{}]\n",
                        escape_string(&p.text_muted),
                        escape_markup(sub)
                    ));
                }
                s.push_str("]\n");
                s
            }
            SlideBody::Agenda { bullets } => {
                let mut s = heading(&slide.title);
                for item in bullets {
                    s.push_str(&format!("+ {}\n", escape_markup(item)));
                }
                s
            }
            SlideBody::Content { bullets } => {
                let mut s = heading(&slide.title);
                s.push_str(&bullet_list(bullets));
                s
            }
            SlideBody::TwoColumn { columns } => {
                let mut s = heading(&slide.title);
                s.push_str(&column_grid(columns, theme));
                s
            }
            SlideBody::Comparison { columns } => {
                let mut s = heading(&slide.title);
                s.push_str(&column_grid(columns, theme));
                s
            }
            SlideBody::Chart {
                chart_type,
                chart_data,
                bullets,
            } => {
                let mut s = heading(&slide.title);
                s.push_str(&chart_listing(*chart_type, chart_data));
                if let Some(items) = bullets {
                    s.push('\n');
                    s.push_str(&bullet_list(items));
                }
                s
            }
            SlideBody::ImageText {
                key_number,
                key_number_label,
                bullets,
                ..
            } => {
                let mut s = heading(&slide.title);
                if let Some(number) = key_number {
                    s.push_str(&format!(
                        "#align(center)[#text(size: 48pt, weight: \"bold\", fill: rgb(\"{}\"))[{}]]\n",
                        escape_string(&p.primary),
                        escape_markup(number)
                    ));
                    if let Some(label) = key_number_label {
                        s.push_str(&format!(
                            "#align(center)[#text(size: 14pt, fill: rgb(\"{}\"))[{}]]\n",
                            escape_string(&p.text_muted),
                            escape_markup(label)
                        ));
                    }
                }
                if let Some(items) = bullets {
                    s.push('\n');
                    s.push_str(&bullet_list(items));
                }
                s
            }
            SlideBody::Summary { bullets } => {
                let mut s = format!(
                    "#align(center)[#text(size: 26pt, weight: \"bold\")[{}]]\n\n",
                    escape_markup(&slide.title)
                );
                s.push_str(&bullet_list(bullets));
                s
            }
            SlideBody::Other { bullets } => {
                let mut s = heading(&slide.title);
                s.push_str(&bullet_list(bullets));
                s
            }
        }
    }
}

fn heading(title: &str) -> String {
    format!("== {}\n\n", escape_markup(title))
}

fn bullet_list(items: &[String]) -> String {
    let mut s = String::new();
    for item in items {
        s.push_str(&format!("- {}\n", escape_markup(item)));
    }
    s
}

fn column_grid(columns: &[ColumnBlock], theme: &ThemeConfig) -> String {
    let colors = [&theme.palette.primary, &theme.palette.secondary];
    let mut cells = Vec::new();
    for (i, column) in columns.iter().take(2).enumerate() {
        let mut cell = format!(
            "[#text(weight: \"bold\", fill: rgb(\"{}\"))[{}]\n\n",
            escape_string(colors[i % 2]),
            escape_markup(&column.header)
        );
        for item in &column.items {
            cell.push_str(&format!("- {}\n", escape_markup(item)));
        }
        cell.push(']');
        cells.push(cell);
    }
    format!(
        "#grid(columns: (1fr, 1fr), gutter: 24pt, {})\n",
        cells.join(", ")
    )
}

/// Chart data as a value table; print output needs numbers, not geometry.
fn chart_listing(kind: ChartKind, data: &ChartData) -> String {
    let kind_name = match kind {
        ChartKind::Bar => "Bar chart",
        ChartKind::Pie => "Pie chart",
        ChartKind::Line => "Line chart",
    };
    let mut s = format!("_{}_\n\n", kind_name);
    s.push_str("#table(columns: (1fr, auto),\n");
    for (label, value) in data.labels.iter().zip(data.values.iter()) {
        s.push_str(&format!(
            "  [{}], [{}],\n",
            escape_markup(label),
            value
        ));
    }
    s.push_str(")\n");
    s
}

/// Escape for Typst string literals.
fn escape_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Escape for Typst markup content.
fn escape_markup(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '\\' | '#' | '*' | '_' | '`' | '$' | '[' | ']' | '<' | '>' | '@' | '~' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}
