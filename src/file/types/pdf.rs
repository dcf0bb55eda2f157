use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// PDF text, page by page
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for PdfExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let doc = Document::load(path).map_err(|e| Failure::read(label, e))?;

        let mut text_content = String::new();

        // BTreeMap keys: pages come out in page order
        for page_num in doc.get_pages().keys() {
            match doc.extract_text(&[*page_num]) {
                Ok(page_text) => text_content.push_str(&page_text),
                Err(e) => debug!("No text on page {} of {}: {}", page_num, path.display(), e),
            }
            text_content.push('\n');
        }

        if text_content.trim().is_empty() {
            // Fallback: pdf-extract copes with some font encodings lopdf doesn't
            return match pdf_extract::extract_text(path) {
                Ok(text) => Ok(text),
                Err(_) => Ok(text_content),
            };
        }

        Ok(text_content)
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Pdf
    }
}
