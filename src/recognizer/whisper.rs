use crate::config::SpeechConfig;
use crate::error::RecognitionError;
use crate::recognizer::SpeechRecognizer;
use reqwest::blocking::multipart::Form;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Speech recognition through an OpenAI-compatible transcription endpoint
/// (OpenAI, whisper.cpp server, faster-whisper-server, ...)
pub struct WhisperClient {
    url: String,
    model: String,
    api_key: Option<String>,
    timeout: Duration,
}

#[derive(Deserialize)]
struct TranscriptionResponse {
    #[serde(default)]
    text: String,
}

impl WhisperClient {
    pub fn new(config: &SpeechConfig, api_key: Option<String>) -> Self {
        Self {
            url: config.url.clone(),
            model: config.model.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

impl SpeechRecognizer for WhisperClient {
    fn transcribe(&self, wav: &Path) -> Result<String, RecognitionError> {
        debug!("Posting {} to {}", wav.display(), self.url);

        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .file("file", wav)
            .map_err(|e| RecognitionError::Unavailable(format!("failed to attach audio: {}", e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| RecognitionError::Unavailable(e.to_string()))?;

        let mut request = client.post(&self.url).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().map_err(|e| {
            RecognitionError::Unavailable(format!("failed to connect to {}: {}", self.url, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(RecognitionError::Unavailable(format!(
                "transcription API returned error {}: {}",
                status,
                error_text.trim()
            )));
        }

        let body: TranscriptionResponse = response.json().map_err(|e| {
            RecognitionError::Unavailable(format!("failed to parse transcription response: {}", e))
        })?;

        let transcript = body.text.trim();
        if transcript.is_empty() {
            return Err(RecognitionError::Unintelligible);
        }

        Ok(transcript.to_string())
    }
}
