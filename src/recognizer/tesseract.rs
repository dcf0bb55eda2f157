use crate::config::OcrConfig;
use crate::error::RecognitionError;
use crate::recognizer::TextRecognizer;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// OCR using the Tesseract command-line engine
/// Install: brew install tesseract (macOS) or apt-get install tesseract-ocr (Linux)
pub struct TesseractOcr {
    executable: String,
    language: String,
}

impl TesseractOcr {
    pub fn new(config: &OcrConfig) -> Self {
        Self {
            executable: config.executable.clone(),
            language: config.language.clone(),
        }
    }
}

impl TextRecognizer for TesseractOcr {
    fn recognize(&self, png: &Path) -> Result<String, RecognitionError> {
        debug!("Running {} on {}", self.executable, png.display());

        let output = Command::new(&self.executable)
            .arg(png)
            .arg("stdout") // write recognized text to stdout
            .arg("-l")
            .arg(&self.language)
            .output()
            .map_err(|e| {
                RecognitionError::Unavailable(format!(
                    "failed to execute {}: {}",
                    self.executable, e
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognitionError::Unavailable(format!(
                "{} failed: {}",
                self.executable,
                stderr.trim()
            )));
        }

        String::from_utf8(output.stdout).map_err(|_| {
            RecognitionError::Unavailable(format!("{} returned invalid UTF-8", self.executable))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_missing_engine_is_unavailable() {
        let ocr = TesseractOcr::new(&OcrConfig {
            executable: "gaia-extract-no-such-ocr".to_string(),
            language: "eng".to_string(),
        });
        let png = NamedTempFile::new().unwrap();

        match ocr.recognize(png.path()) {
            Err(RecognitionError::Unavailable(msg)) => {
                assert!(msg.contains("gaia-extract-no-such-ocr"));
            }
            other => panic!("Expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    #[ignore] // Requires tesseract installed
    fn test_tesseract_blank_image() {
        let dir = tempfile::tempdir().unwrap();
        let png = dir.path().join("blank.png");
        image::GrayImage::from_pixel(64, 64, image::Luma([255u8]))
            .save(&png)
            .unwrap();

        let ocr = TesseractOcr::new(&OcrConfig::default());
        let text = ocr.recognize(&png).unwrap();
        assert!(text.trim().is_empty());
    }
}
