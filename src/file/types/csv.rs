use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use std::path::Path;

/// CSV rows rendered as `field, field, ...` lines.
/// Quoting is not preserved.
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CsvExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for CsvExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|e| Failure::read(label, e))?;

        let mut lines = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| Failure::read(label, e))?;
            lines.push(record.iter().collect::<Vec<_>>().join(", "));
        }

        Ok(lines.join("\n"))
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Csv
    }
}
