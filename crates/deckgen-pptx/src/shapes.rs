//! Low-level DrawingML shape builders.
//!
//! Every builder takes canvas-pixel coordinates matching the SVG renderer's
//! 1280x720 layout and converts to EMU, so the two export surfaces share one
//! geometry vocabulary.

use crate::constants::EMU_PER_PX;

/// Convert a canvas pixel coordinate to EMU.
pub fn emu(px: f64) -> i64 {
    (px * EMU_PER_PX as f64).round() as i64
}

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// `#rrggbb` to the uppercase hex DrawingML wants. Malformed input
/// degrades to black rather than producing invalid XML.
pub fn srgb(hex: &str) -> String {
    let trimmed = hex.trim_start_matches('#');
    if trimmed.len() == 6 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
        trimmed.to_ascii_uppercase()
    } else {
        "000000".to_string()
    }
}

/// Angle in degrees to the 60000ths-of-a-degree units used by preset
/// geometry adjust values, normalized into [0, 21600000).
pub fn angle_60000ths(degrees: f64) -> i64 {
    let normalized = degrees.rem_euclid(360.0);
    (normalized * 60000.0).round() as i64
}

fn xfrm(x: f64, y: f64, w: f64, h: f64) -> String {
    format!(
        "<a:xfrm><a:off x=\"{}\" y=\"{}\"/><a:ext cx=\"{}\" cy=\"{}\"/></a:xfrm>",
        emu(x),
        emu(y),
        emu(w),
        emu(h),
    )
}

/// One text run.
pub fn run(text: &str, size_pt: f64, color: &str, bold: bool) -> String {
    let b = if bold { " b=\"1\"" } else { "" };
    format!(
        "<a:r><a:rPr lang=\"en-US\" sz=\"{}\"{} dirty=\"0\"><a:solidFill><a:srgbClr val=\"{}\"/></a:solidFill></a:rPr><a:t>{}</a:t></a:r>",
        (size_pt * 100.0).round() as i64,
        b,
        srgb(color),
        escape_xml(text),
    )
}

/// One paragraph wrapping pre-built runs. `align` is a DrawingML algn
/// value (`l`, `ctr`, `r`); `bullet` is an optional marker character.
pub fn paragraph(runs: &str, align: &str, bullet: Option<char>) -> String {
    let bu = match bullet {
        Some(c) => format!("<a:buChar char=\"{}\"/>", c),
        None => "<a:buNone/>".to_string(),
    };
    format!("<a:p><a:pPr algn=\"{}\">{}</a:pPr>{}</a:p>", align, bu, runs)
}

/// A positioned text box with no fill or outline.
pub fn text_box(id: u32, name: &str, x: f64, y: f64, w: f64, h: f64, anchor: &str, paragraphs: &str) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr txBox=\"1\"/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom><a:noFill/></p:spPr>\
         <p:txBody><a:bodyPr anchor=\"{anchor}\" wrap=\"square\"/><a:lstStyle/>{paragraphs}</p:txBody></p:sp>",
        id = id,
        name = escape_xml(name),
        xfrm = xfrm(x, y, w, h),
        anchor = anchor,
        paragraphs = paragraphs,
    )
}

/// A solid-filled rectangle; `radius_px > 0` rounds the corners.
pub fn solid_rect(id: u32, name: &str, x: f64, y: f64, w: f64, h: f64, fill: &str, radius_px: f64) -> String {
    let geom = if radius_px > 0.0 {
        "<a:prstGeom prst=\"roundRect\"><a:avLst><a:gd name=\"adj\" fmla=\"val 8000\"/></a:avLst></a:prstGeom>"
            .to_string()
    } else {
        "<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom>".to_string()
    };
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{xfrm}{geom}<a:solidFill><a:srgbClr val=\"{fill}\"/></a:solidFill></p:spPr>\
         <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>",
        id = id,
        name = escape_xml(name),
        xfrm = xfrm(x, y, w, h),
        geom = geom,
        fill = srgb(fill),
    )
}

/// A solid-filled ellipse given by its bounding box.
pub fn ellipse(id: u32, name: &str, x: f64, y: f64, w: f64, h: f64, fill: &str) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{xfrm}<a:prstGeom prst=\"ellipse\"><a:avLst/></a:prstGeom>\
         <a:solidFill><a:srgbClr val=\"{fill}\"/></a:solidFill></p:spPr>\
         <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>",
        id = id,
        name = escape_xml(name),
        xfrm = xfrm(x, y, w, h),
        fill = srgb(fill),
    )
}

/// A straight line between two canvas points.
pub fn line(id: u32, name: &str, x1: f64, y1: f64, x2: f64, y2: f64, color: &str, width_pt: f64) -> String {
    let (x, w, flip_h) = if x2 >= x1 {
        (x1, x2 - x1, false)
    } else {
        (x2, x1 - x2, true)
    };
    let (y, h, flip_v) = if y2 >= y1 {
        (y1, y2 - y1, false)
    } else {
        (y2, y1 - y2, true)
    };
    // The `line` preset runs top-left to bottom-right; flips reorient it.
    let flip = match (flip_h, flip_v) {
        (false, false) => "",
        (true, false) => " flipH=\"1\"",
        (false, true) => " flipV=\"1\"",
        (true, true) => " flipH=\"1\" flipV=\"1\"",
    };
    format!(
        "<p:cxnSp><p:nvCxnSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr>\
         <p:spPr><a:xfrm{flip}><a:off x=\"{ox}\" y=\"{oy}\"/><a:ext cx=\"{cx}\" cy=\"{cy}\"/></a:xfrm>\
         <a:prstGeom prst=\"line\"><a:avLst/></a:prstGeom>\
         <a:ln w=\"{lw}\"><a:solidFill><a:srgbClr val=\"{color}\"/></a:solidFill></a:ln></p:spPr></p:cxnSp>",
        id = id,
        name = escape_xml(name),
        flip = flip,
        ox = emu(x),
        oy = emu(y),
        cx = emu(w),
        cy = emu(h),
        lw = (width_pt * 12700.0).round() as i64,
        color = srgb(color),
    )
}

/// A pie wedge using the `pie` preset; angles are degrees with 0 at
/// 3 o'clock, increasing clockwise (the renderer's convention too).
#[allow(clippy::too_many_arguments)]
pub fn pie_wedge(
    id: u32,
    name: &str,
    x: f64,
    y: f64,
    w: f64,
    h: f64,
    start_deg: f64,
    end_deg: f64,
    fill: &str,
    outline: &str,
) -> String {
    format!(
        "<p:sp><p:nvSpPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr>\
         <p:spPr>{xfrm}<a:prstGeom prst=\"pie\"><a:avLst>\
         <a:gd name=\"adj1\" fmla=\"val {start}\"/><a:gd name=\"adj2\" fmla=\"val {end}\"/>\
         </a:avLst></a:prstGeom>\
         <a:solidFill><a:srgbClr val=\"{fill}\"/></a:solidFill>\
         <a:ln w=\"12700\"><a:solidFill><a:srgbClr val=\"{outline}\"/></a:solidFill></a:ln></p:spPr>\
         <p:txBody><a:bodyPr/><a:lstStyle/><a:p/></p:txBody></p:sp>",
        id = id,
        name = escape_xml(name),
        xfrm = xfrm(x, y, w, h),
        start = angle_60000ths(start_deg),
        end = angle_60000ths(end_deg),
        fill = srgb(fill),
        outline = srgb(outline),
    )
}

/// A picture referencing an already-registered media relationship.
pub fn picture(id: u32, name: &str, rel_id: &str, x: f64, y: f64, w: f64, h: f64) -> String {
    format!(
        "<p:pic><p:nvPicPr><p:cNvPr id=\"{id}\" name=\"{name}\"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>\
         <p:blipFill><a:blip r:embed=\"{rel}\"/><a:stretch><a:fillRect/></a:stretch></p:blipFill>\
         <p:spPr>{xfrm}<a:prstGeom prst=\"rect\"><a:avLst/></a:prstGeom></p:spPr></p:pic>",
        id = id,
        name = escape_xml(name),
        rel = rel_id,
        xfrm = xfrm(x, y, w, h),
    )
}
