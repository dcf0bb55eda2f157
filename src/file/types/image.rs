use crate::error::{Failure, RecognitionError};
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use crate::recognizer::TextRecognizer;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Images: decode, normalise to grayscale PNG, run OCR
pub struct ImageExtractor {
    ocr: Arc<dyn TextRecognizer>,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn TextRecognizer>) -> Self {
        Self { ocr }
    }
}

impl SourceExtractor for ImageExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        // content decides the decoder; the extension is only a fallback
        let img = image::ImageReader::open(path)
            .map_err(|e| Failure::read(label, e))?
            .with_guessed_format()
            .map_err(|e| Failure::read(label, e))?
            .decode()
            .map_err(|e| Failure::read(label, e))?;
        debug!("Decoded {} ({}x{})", path.display(), img.width(), img.height());

        let workspace = tempfile::Builder::new()
            .prefix("gaia-ocr-")
            .tempdir()
            .map_err(|e| Failure::read(label, e))?;
        let png = workspace.path().join("page.png");
        img.to_luma8().save(&png).map_err(|e| Failure::read(label, e))?;

        match self.ocr.recognize(&png) {
            Ok(text) => Ok(text),
            // nothing legible is an empty result, not a failure
            Err(RecognitionError::Unintelligible) => Ok(String::new()),
            Err(RecognitionError::Unavailable(reason)) => {
                Err(Failure::read(label, format!("OCR engine unavailable: {}", reason)))
            }
        }
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Image
    }
}
