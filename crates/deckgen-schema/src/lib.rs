//! # deckgen-schema
//!
//! The typed intermediate representation shared by every deckgen stage:
//! ingested tables, slide records, themes, and generation settings.
//!
//! The slide schema is the single lossless source of truth between outline
//! synthesis and the rendering/export surfaces. Rendered vectors and
//! exported binaries are always regenerable from it.
//!
//! ## Example
//!
//! ```rust
//! use deckgen_schema::{SlideRecord, ThemeConfig, Complexity};
//!
//! let deck = vec![
//!     SlideRecord::title_slide(0, "Quarterly Review", None),
//!     SlideRecord::content(1, "Highlights", vec!["Revenue up 12%".to_string()]),
//! ];
//! let theme = ThemeConfig::preset("midnight", Complexity::Rich);
//! assert_eq!(deck.len(), 2);
//! assert_eq!(theme.name, "midnight");
//! ```

pub mod config;
pub mod deck;
pub mod slide;
pub mod table;
pub mod theme;

// Re-exports
pub use config::{GenerationConfig, SynthesisMode};
pub use deck::{is_numbered, renumber};
pub use slide::{ChartData, ChartKind, ColumnBlock, SlideBody, SlideRecord};
pub use table::{CellValue, ParsedSheet, ParsedTable, SUMMARY_ROW_CAP};
pub use theme::{Complexity, FontPair, Palette, ThemeConfig, ThemeError};
