//! SVG to PNG rasterization via resvg.

use crate::error::{RasterError, Result};

/// Rasterize one rendered slide at its native canvas resolution.
pub fn rasterize(svg: &str) -> Result<Vec<u8>> {
    rasterize_with_scale(svg, 1.0)
}

/// Rasterize with a uniform scale factor (e.g. 2.0 for a retina export).
pub fn rasterize_with_scale(svg: &str, scale: f32) -> Result<Vec<u8>> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(RasterError::InvalidScale(scale));
    }

    let tree = {
        let mut opts = usvg::Options::default();
        opts.fontdb_mut().load_system_fonts();
        usvg::Tree::from_str(svg, &opts).map_err(|e| RasterError::SvgParse(e.to_string()))?
    };

    let size = tree.size();
    let width = (size.width() * scale).ceil() as u32;
    let height = (size.height() * scale).ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| RasterError::Pixmap { width, height })?;

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| RasterError::PngEncode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_SVG: &str = "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"64\" \
        height=\"32\"><rect width=\"64\" height=\"32\" fill=\"#112233\"/></svg>";

    #[test]
    fn test_rasterize_produces_png() {
        let png = rasterize(MINIMAL_SVG).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_scale_changes_dimensions() {
        let one = rasterize_with_scale(MINIMAL_SVG, 1.0).unwrap();
        let two = rasterize_with_scale(MINIMAL_SVG, 2.0).unwrap();
        assert!(two.len() >= one.len() / 2);
        // Width field of the IHDR chunk: bytes 16..20 big-endian.
        let w = u32::from_be_bytes([two[16], two[17], two[18], two[19]]);
        assert_eq!(w, 128);
    }

    #[test]
    fn test_invalid_svg_is_an_error() {
        assert!(rasterize("not svg at all").is_err());
    }

    #[test]
    fn test_bad_scale_rejected() {
        assert!(matches!(
            rasterize_with_scale(MINIMAL_SVG, 0.0),
            Err(RasterError::InvalidScale(_))
        ));
    }
}
