//! Rasterization errors. SVG generation itself is infallible.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RasterError>;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("SVG parsing failed: {0}")]
    SvgParse(String),

    #[error("failed to allocate {width}x{height} pixmap")]
    Pixmap { width: u32, height: u32 },

    #[error("PNG encoding failed: {0}")]
    PngEncode(String),

    #[error("invalid raster scale {0}")]
    InvalidScale(f32),
}
