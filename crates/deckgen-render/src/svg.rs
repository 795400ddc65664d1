//! Small SVG building blocks shared by the slide templates and charts.

/// Escape text for use inside SVG element content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Fixed two-decimal coordinate formatting so identical input always
/// serializes to identical bytes.
pub fn px(v: f64) -> String {
    format!("{:.2}", v)
}

/// A rectangular drawing region in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }
}

/// Append a `<text>` element.
#[allow(clippy::too_many_arguments)]
pub fn text(
    buf: &mut String,
    x: f64,
    y: f64,
    content: &str,
    size: f64,
    fill: &str,
    family: &str,
    anchor: &str,
    weight: &str,
) {
    buf.push_str(&format!(
        "<text x=\"{}\" y=\"{}\" font-size=\"{}\" fill=\"{}\" font-family=\"{}\" \
         text-anchor=\"{}\" font-weight=\"{}\">{}</text>",
        px(x),
        px(y),
        px(size),
        fill,
        escape_xml(family),
        anchor,
        weight,
        escape_xml(content),
    ));
}

/// Append a filled `<rect>`, optionally rounded.
pub fn rect_fill(buf: &mut String, r: Rect, fill: &str, rx: f64) {
    buf.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\"/>",
        px(r.x),
        px(r.y),
        px(r.w),
        px(r.h),
        px(rx),
        fill,
    ));
}

/// Append a stroked, surface-filled card `<rect>`.
pub fn rect_card(buf: &mut String, r: Rect, fill: &str, stroke: &str, rx: f64) {
    buf.push_str(&format!(
        "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"{}\" \
         stroke=\"{}\" stroke-width=\"1\"/>",
        px(r.x),
        px(r.y),
        px(r.w),
        px(r.h),
        px(rx),
        fill,
        stroke,
    ));
}

/// Append a `<circle>`.
pub fn circle(buf: &mut String, cx: f64, cy: f64, r: f64, fill: &str, opacity: f64) {
    buf.push_str(&format!(
        "<circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\" opacity=\"{}\"/>",
        px(cx),
        px(cy),
        px(r),
        fill,
        px(opacity),
    ));
}

/// Append a `<line>`.
pub fn line(buf: &mut String, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
    buf.push_str(&format!(
        "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"/>",
        px(x1),
        px(y1),
        px(x2),
        px(y2),
        stroke,
        px(width),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b & \"c\""), "a &lt; b &amp; &quot;c&quot;");
        assert_eq!(escape_xml("plain"), "plain");
    }

    #[test]
    fn test_px_is_stable() {
        assert_eq!(px(1.0), "1.00");
        assert_eq!(px(33.333333), "33.33");
    }

    #[test]
    fn test_text_escapes_content() {
        let mut buf = String::new();
        text(&mut buf, 0.0, 0.0, "<hi>", 12.0, "#000", "Arial", "start", "normal");
        assert!(buf.contains("&lt;hi&gt;"));
    }
}
