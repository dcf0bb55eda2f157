use crate::error::RecognitionError;
use std::path::Path;

/// Optical character recognition over a decoded image
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in a grayscale PNG. An image with no text yields an
    /// empty string, not an error.
    fn recognize(&self, png: &Path) -> Result<String, RecognitionError>;
}

/// Speech-to-text over a canonical PCM WAV file
pub trait SpeechRecognizer: Send + Sync {
    /// Transcribe the whole file as one utterance
    fn transcribe(&self, wav: &Path) -> Result<String, RecognitionError>;
}
