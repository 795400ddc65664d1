//! Editable PowerPoint export.
//!
//! [`DeckWriter`] turns a slide deck plus a theme into a complete `.pptx`
//! package where every element a slide record describes is a native,
//! independently editable shape or text body, never a baked image.
//! Speaker notes become discrete notes parts; embedded data-URL images
//! become real media parts.

pub mod error;
pub mod media;
pub mod shapes;
pub mod slide;
pub mod writer;

pub use error::{PptxError, Result};
pub use writer::DeckWriter;

/// OOXML constants shared by the writer and shape builders.
pub mod constants {
    /// 16:9 slide width in EMU (13.333 inches)
    pub const SLIDE_WIDTH_EMU: i64 = 12_192_000;

    /// 16:9 slide height in EMU (7.5 inches)
    pub const SLIDE_HEIGHT_EMU: i64 = 6_858_000;

    /// EMU per inch
    pub const EMU_PER_INCH: i64 = 914_400;

    /// EMU per canvas pixel at 96 dpi; maps the renderer's 1280x720
    /// canvas exactly onto the 16:9 slide
    pub const EMU_PER_PX: i64 = 9_525;

    /// PresentationML namespace
    pub const NS_PRESENTATION: &str =
        "http://schemas.openxmlformats.org/presentationml/2006/main";

    /// DrawingML namespace
    pub const NS_DRAWING: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    /// Relationships namespace
    pub const NS_RELATIONSHIPS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    /// Slide relationship type
    pub const REL_TYPE_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

    /// Slide layout relationship type
    pub const REL_TYPE_SLIDE_LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    /// Slide master relationship type
    pub const REL_TYPE_SLIDE_MASTER: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";

    /// Notes slide relationship type
    pub const REL_TYPE_NOTES_SLIDE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/notesSlide";

    /// Theme relationship type
    pub const REL_TYPE_THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";

    /// Image relationship type
    pub const REL_TYPE_IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
}

#[cfg(test)]
mod tests {
    use super::constants;

    #[test]
    fn test_canvas_maps_exactly_to_slide() {
        assert_eq!(1280 * constants::EMU_PER_PX, constants::SLIDE_WIDTH_EMU);
        assert_eq!(720 * constants::EMU_PER_PX, constants::SLIDE_HEIGHT_EMU);
    }
}
