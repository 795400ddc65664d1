//! Deterministic slide rendering for deckgen.
//!
//! [`render`] maps one slide record plus a theme to a standalone SVG
//! document. The function is pure; exports build on it by rasterizing the
//! result ([`raster`]) or by mapping the same schema to other formats in
//! their own crates.

pub mod charts;
pub mod error;
pub mod raster;
pub mod render;
pub mod svg;

pub use error::{RasterError, Result};
pub use raster::{rasterize, rasterize_with_scale};
pub use render::{render, CANVAS_HEIGHT, CANVAS_WIDTH};
