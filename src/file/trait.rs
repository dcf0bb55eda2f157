use crate::file::{ExtractorRegistry, SupportedFormat};
use crate::models::ExtractionResult;
use crate::utils::normalize_extension;
use std::path::Path;

/// State threaded through one dispatch: the registry itself (for containers
/// that re-dispatch their members) and the current archive nesting depth.
#[derive(Clone, Copy)]
pub struct ExtractContext<'a> {
    pub registry: &'a ExtractorRegistry,
    pub depth: usize,
}

impl<'a> ExtractContext<'a> {
    pub fn new(registry: &'a ExtractorRegistry) -> Self {
        Self { registry, depth: 0 }
    }
}

/// Trait for converting one file into plain text.
///
/// Every fault inside an implementation comes back as a
/// [`Failure`](crate::error::Failure) value for that one file.
pub trait SourceExtractor: Send + Sync {
    /// Extract text content from a file
    fn extract(&self, path: &Path, cx: &ExtractContext<'_>) -> ExtractionResult;

    /// The tag this extractor is registered under
    fn format(&self) -> SupportedFormat;

    /// Check if this extractor supports the given file extension
    fn supports_extension(&self, ext: &str) -> bool {
        self.format()
            .extensions()
            .contains(&normalize_extension(ext).as_str())
    }
}
