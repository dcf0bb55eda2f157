pub mod tesseract;
pub mod r#trait;
pub mod whisper;

pub use r#trait::{SpeechRecognizer, TextRecognizer};
pub use tesseract::TesseractOcr;
pub use whisper::WhisperClient;
