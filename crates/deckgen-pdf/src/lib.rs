//! PDF export: deck -> Typst markup -> PDF bytes.
//!
//! Exports are regenerated from the slide schema on every call, so the
//! operation is idempotent and safe to retry.

pub mod compiler;
pub mod error;
pub mod transpiler;

pub use compiler::Compiler;
pub use error::{PdfError, Result};
pub use transpiler::Transpiler;

use deckgen_schema::{SlideRecord, ThemeConfig};

/// Render a whole deck to PDF bytes.
pub fn export_pdf(deck: &[SlideRecord], theme: &ThemeConfig, title: Option<&str>) -> Result<Vec<u8>> {
    let markup = Transpiler::transpile(deck, theme, title);
    Compiler::compile(&markup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_schema::Complexity;

    #[test]
    fn test_export_deck_to_pdf() {
        let deck = vec![
            SlideRecord::title_slide(0, "Quarterly Review", Some("FY26".to_string())),
            SlideRecord::content(1, "Highlights", vec!["Revenue up".to_string()]),
        ];
        let theme = ThemeConfig::preset("modern", Complexity::Standard);
        let pdf = export_pdf(&deck, &theme, Some("Quarterly Review")).unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_empty_deck_still_produces_document() {
        let theme = ThemeConfig::preset("modern", Complexity::Simple);
        assert!(export_pdf(&[], &theme, None).is_ok());
    }
}
