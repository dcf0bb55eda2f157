use crate::config::AudioConfig;
use crate::error::{Failure, RecognitionError};
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use crate::recognizer::SpeechRecognizer;
use crate::utils::get_extension;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use tracing::debug;

/// Converts arbitrary audio into mono 16-bit PCM WAV with ffmpeg
pub struct Transcoder {
    ffmpeg: String,
    sample_rate: u32,
}

impl Transcoder {
    pub fn new(config: &AudioConfig) -> Self {
        Self {
            ffmpeg: config.ffmpeg.clone(),
            sample_rate: config.sample_rate,
        }
    }

    /// Write `input` as `<out_dir>/<stem>.wav`
    pub fn to_wav(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, String> {
        let stem = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());
        let output_path = out_dir.join(format!("{}.wav", stem));

        debug!("Transcoding {} -> {}", input.display(), output_path.display());
        let output = Command::new(&self.ffmpeg)
            .args(["-y", "-loglevel", "error", "-i"])
            .arg(input)
            .args(["-ac", "1", "-ar"])
            .arg(self.sample_rate.to_string())
            .args(["-acodec", "pcm_s16le"])
            .arg(&output_path)
            .output()
            .map_err(|e| format!("failed to execute {}: {}", self.ffmpeg, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(format!("{} failed: {}", self.ffmpeg, stderr.trim()));
        }

        Ok(output_path)
    }
}

/// Audio: transcode to WAV when needed, then speech-to-text over the whole clip
pub struct AudioExtractor {
    transcoder: Transcoder,
    speech: Arc<dyn SpeechRecognizer>,
}

impl AudioExtractor {
    pub fn new(config: &AudioConfig, speech: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            transcoder: Transcoder::new(config),
            speech,
        }
    }
}

impl SourceExtractor for AudioExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        if !path.is_file() {
            return Err(Failure::processing(label, format!("{} is not a file", path.display())));
        }

        // Holds the transcoded copy; removed when this returns
        let workspace = tempfile::Builder::new()
            .prefix("gaia-audio-")
            .tempdir()
            .map_err(|e| Failure::processing(label, e))?;

        let wav = if get_extension(path) == "wav" {
            path.to_path_buf()
        } else {
            self.transcoder
                .to_wav(path, workspace.path())
                .map_err(|e| Failure::processing(label, e))?
        };

        match self.speech.transcribe(&wav) {
            Ok(text) => Ok(text),
            Err(RecognitionError::Unintelligible) => Err(Failure::Unintelligible),
            Err(RecognitionError::Unavailable(reason)) => Err(Failure::ServiceUnavailable(reason)),
        }
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Audio
    }
}
