use crate::config::Config;
use crate::error::Failure;
use crate::file::types::{
    ArchiveExtractor, AudioExtractor, CsvExtractor, DocxExtractor, ImageExtractor,
    JsonExtractor, JsonLinesExtractor, PdbExtractor, PdfExtractor, PptxExtractor,
    SpreadsheetExtractor, TextExtractor, XmlExtractor,
};
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use crate::recognizer::{SpeechRecognizer, TesseractOcr, TextRecognizer, WhisperClient};
use crate::utils::{self, get_extension};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

/// Maps every [`SupportedFormat`] to its extractor.
///
/// The table is filled once at construction from an exhaustive match, so a
/// recognised extension always has an extractor and the table never changes
/// afterwards.
pub struct ExtractorRegistry {
    extractors: HashMap<SupportedFormat, Arc<dyn SourceExtractor>>,
}

impl ExtractorRegistry {
    /// Create a registry with the default OCR and speech backends
    pub fn new(config: &Config) -> Self {
        let ocr = Arc::new(TesseractOcr::new(&config.ocr));
        let speech = Arc::new(WhisperClient::new(&config.speech, config.speech_api_key()));
        Self::with_recognizers(config, ocr, speech)
    }

    /// Create a registry with explicit recognition backends
    pub fn with_recognizers(
        config: &Config,
        ocr: Arc<dyn TextRecognizer>,
        speech: Arc<dyn SpeechRecognizer>,
    ) -> Self {
        let extractors = SupportedFormat::ALL
            .into_iter()
            .map(|format| {
                let extractor = Self::build(format, config, &ocr, &speech);
                (format, extractor)
            })
            .collect();

        Self { extractors }
    }

    fn build(
        format: SupportedFormat,
        config: &Config,
        ocr: &Arc<dyn TextRecognizer>,
        speech: &Arc<dyn SpeechRecognizer>,
    ) -> Arc<dyn SourceExtractor> {
        match format {
            SupportedFormat::Pdf => Arc::new(PdfExtractor::new()),
            SupportedFormat::Docx => Arc::new(DocxExtractor::new()),
            SupportedFormat::Xlsx | SupportedFormat::Xls => {
                Arc::new(SpreadsheetExtractor::new(format))
            }
            SupportedFormat::Csv => Arc::new(CsvExtractor::new()),
            SupportedFormat::Json | SupportedFormat::JsonLd => Arc::new(JsonExtractor::new(format)),
            SupportedFormat::JsonLines => Arc::new(JsonLinesExtractor::new()),
            SupportedFormat::Text | SupportedFormat::Python => Arc::new(TextExtractor::new(format)),
            SupportedFormat::Xml => Arc::new(XmlExtractor::new()),
            SupportedFormat::Image => Arc::new(ImageExtractor::new(ocr.clone())),
            SupportedFormat::Audio => Arc::new(AudioExtractor::new(&config.audio, speech.clone())),
            SupportedFormat::Pptx => Arc::new(PptxExtractor::new()),
            SupportedFormat::Zip => Arc::new(ArchiveExtractor::new(config.extract.max_archive_depth)),
            SupportedFormat::Pdb => Arc::new(PdbExtractor::new()),
        }
    }

    /// Find the extractor for an extension (case-insensitive, dot optional)
    pub fn resolve(&self, ext: &str) -> Option<Arc<dyn SourceExtractor>> {
        SupportedFormat::from_extension(ext).and_then(|format| self.extractors.get(&format).cloned())
    }

    /// Extract a local file, dispatching on its extension
    pub fn extract_path(&self, path: &Path) -> ExtractionResult {
        self.extract_at_depth(path, 0)
    }

    pub(crate) fn extract_at_depth(&self, path: &Path, depth: usize) -> ExtractionResult {
        let ext = get_extension(path);
        let Some(extractor) = self.resolve(&ext) else {
            debug!("No extractor for {} (extension {:?})", path.display(), ext);
            return Err(Failure::unsupported(&ext));
        };

        let format = extractor.format();
        debug!("Extracting {} as {}", path.display(), format);

        let cx = ExtractContext { registry: self, depth };
        // Third-party parsers occasionally panic on hostile input; that must
        // surface as this file's failure, not tear down the scan.
        let result = panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(path, &cx)))
            .unwrap_or_else(|payload| {
                let reason = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "extractor panicked".to_string());
                Err(Failure::read(format.label(), reason))
            });

        if let Err(failure) = &result {
            warn!("{}: {}", path.display(), failure);
        }
        result
    }

    /// Extract an in-memory file (e.g. a downloaded object). The buffer is
    /// written under its own base name into a temporary directory that is
    /// removed before this returns.
    pub fn extract_bytes(&self, name: &str, bytes: &[u8]) -> ExtractionResult {
        let file_name = utils::object_base_name(name);
        let ext = get_extension(Path::new(file_name));
        let Some(format) = SupportedFormat::from_extension(&ext) else {
            return Err(Failure::unsupported(&ext));
        };

        let staging = tempfile::Builder::new()
            .prefix("gaia-bytes-")
            .tempdir()
            .map_err(|e| Failure::processing(format.label(), format!("failed to stage bytes: {}", e)))?;
        let path = staging.path().join(file_name);
        std::fs::write(&path, bytes)
            .map_err(|e| Failure::processing(format.label(), format!("failed to stage bytes: {}", e)))?;

        self.extract_path(&path)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::RecognitionError;

    pub struct FixedOcr(pub Result<String, RecognitionError>);

    impl TextRecognizer for FixedOcr {
        fn recognize(&self, _png: &Path) -> Result<String, RecognitionError> {
            self.0.clone()
        }
    }

    pub struct FixedSpeech(pub Result<String, RecognitionError>);

    impl SpeechRecognizer for FixedSpeech {
        fn transcribe(&self, _wav: &Path) -> Result<String, RecognitionError> {
            self.0.clone()
        }
    }

    /// OCR backend that aborts by panicking, like a crashing native binding
    pub struct PanickingOcr;

    impl TextRecognizer for PanickingOcr {
        fn recognize(&self, _png: &Path) -> Result<String, RecognitionError> {
            panic!("tesseract binding crashed")
        }
    }

    pub fn panicking_ocr_registry(config: &Config) -> ExtractorRegistry {
        ExtractorRegistry::with_recognizers(
            config,
            Arc::new(PanickingOcr),
            Arc::new(FixedSpeech(Ok("spoken words".to_string()))),
        )
    }

    /// Registry with canned recognizers, for tests that never touch a network
    pub fn test_registry(config: &Config) -> ExtractorRegistry {
        ExtractorRegistry::with_recognizers(
            config,
            Arc::new(FixedOcr(Ok("recognized text".to_string()))),
            Arc::new(FixedSpeech(Ok("spoken words".to_string()))),
        )
    }

    #[test]
    fn test_registry_resolves_every_supported_extension() {
        let registry = test_registry(&Config::default());
        for ext in SupportedFormat::all_extensions() {
            let extractor = registry.resolve(ext);
            assert!(extractor.is_some(), "no extractor for {}", ext);
            assert!(extractor.unwrap().supports_extension(ext));
        }
    }

    #[test]
    fn test_registry_resolve_is_case_insensitive() {
        let registry = test_registry(&Config::default());
        let extractor = registry.resolve("DOCX").unwrap();
        assert_eq!(extractor.format(), SupportedFormat::Docx);
        assert!(registry.resolve(".Pdf").is_some());
    }

    #[test]
    fn test_registry_unknown_extension() {
        let registry = test_registry(&Config::default());
        assert!(registry.resolve("xyz").is_none());
        assert!(registry.resolve("").is_none());
    }

    #[test]
    fn test_extract_path_unsupported_reports_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.XYZ");
        std::fs::write(&path, "irrelevant").unwrap();

        let registry = test_registry(&Config::default());
        let result = registry.extract_path(&path);
        assert_eq!(result, Err(Failure::Unsupported(".xyz".to_string())));
        assert_eq!(result.unwrap_err().to_string(), "Unsupported file type: .xyz");
    }

    #[test]
    fn test_extract_path_dispatches_text() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.TXT");
        std::fs::write(&path, "plain notes").unwrap();

        let registry = test_registry(&Config::default());
        assert_eq!(registry.extract_path(&path), Ok("plain notes".to_string()));
    }

    #[test]
    fn test_extractor_panic_becomes_read_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.png");
        image::RgbImage::from_pixel(8, 8, image::Rgb([255, 255, 255]))
            .save(&path)
            .unwrap();

        let registry = panicking_ocr_registry(&Config::default());
        let result = registry.extract_path(&path);
        assert_eq!(
            result,
            Err(Failure::Read {
                format: "image",
                reason: "tesseract binding crashed".to_string(),
            })
        );
    }

    #[test]
    fn test_extract_bytes_uses_base_name() {
        let registry = test_registry(&Config::default());
        let result = registry.extract_bytes("2023/validation/task.json", br#"{"a":1}"#);
        assert_eq!(result, Ok("{\n    \"a\": 1\n}".to_string()));
    }

    #[test]
    fn test_extract_bytes_unsupported() {
        let registry = test_registry(&Config::default());
        let result = registry.extract_bytes("blob.bin", b"\x00\x01");
        assert_eq!(result, Err(Failure::Unsupported(".bin".to_string())));
    }

    #[test]
    fn test_extract_path_without_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Makefile");
        std::fs::write(&path, "all:").unwrap();

        let registry = test_registry(&Config::default());
        let failure = registry.extract_path(&path).unwrap_err();
        assert_eq!(failure.to_string(), "Unsupported file type: ");
    }
}
