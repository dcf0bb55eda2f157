use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use std::path::Path;

/// Plain text and source code, returned verbatim.
/// Content must be valid UTF-8; there is no fallback encoding.
pub struct TextExtractor {
    format: SupportedFormat,
}

impl TextExtractor {
    pub fn new(format: SupportedFormat) -> Self {
        Self { format }
    }
}

impl SourceExtractor for TextExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        std::fs::read_to_string(path).map_err(|e| Failure::read(self.format.label(), e))
    }

    fn format(&self) -> SupportedFormat {
        self.format
    }
}
