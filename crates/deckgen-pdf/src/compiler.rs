//! Typst markup to PDF compiler.

use typst_as_lib::TypstEngine;

use crate::error::{PdfError, Result};

/// Compiler for converting Typst markup to PDF bytes.
pub struct Compiler;

impl Compiler {
    /// Compile Typst markup to PDF bytes.
    pub fn compile(markup: &str) -> Result<Vec<u8>> {
        Self::compile_with_fonts(markup, &[])
    }

    /// Compile with additional font files.
    pub fn compile_with_fonts(markup: &str, font_paths: &[&str]) -> Result<Vec<u8>> {
        let mut builder = TypstEngine::builder().main_file(markup.to_string());

        for font_path in font_paths {
            let font_bytes = std::fs::read(font_path).map_err(|e| {
                PdfError::Font(format!("failed to read font {}: {}", font_path, e))
            })?;
            builder = builder.fonts([font_bytes]);
        }

        let engine = builder.build();

        let compiled = engine.compile();
        for warning in &compiled.warnings {
            log::debug!("typst warning: {:?}", warning);
        }
        let document = compiled
            .output
            .map_err(|e| PdfError::Compilation(format!("{:?}", e)))?;

        let options = typst_pdf::PdfOptions::default();
        let pdf_bytes = typst_pdf::pdf(&document, &options)
            .map_err(|e| PdfError::Compilation(format!("PDF generation failed: {:?}", e)))?;

        Ok(pdf_bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_simple_markup() {
        let pdf = Compiler::compile("= Hello\n\nA test page.").unwrap();
        assert!(pdf.starts_with(b"%PDF"));
    }

    #[test]
    fn test_compile_is_repeatable() {
        let markup = "#set page(width: 13.333in, height: 7.5in)\n= Slide";
        assert!(Compiler::compile(markup).is_ok());
        assert!(Compiler::compile(markup).is_ok());
    }

    #[test]
    fn test_invalid_markup_errors() {
        assert!(Compiler::compile("#nonexistent_function()").is_err());
    }
}
