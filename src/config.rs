use crate::constants::*;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration loaded from settings.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub extract: ExtractConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Literal file names the walker skips
    #[serde(default = "default_ignore")]
    pub ignore: Vec<String>,
    #[serde(default = "default_max_archive_depth")]
    pub max_archive_depth: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    #[serde(default = "default_ocr_executable")]
    pub executable: String,
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioConfig {
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_speech_url")]
    pub url: String,
    #[serde(default = "default_speech_model")]
    pub model: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_speech_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_bucket")]
    pub bucket: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

fn default_ignore() -> Vec<String> {
    DEFAULT_IGNORED_FILES.iter().map(|s| s.to_string()).collect()
}

fn default_max_archive_depth() -> usize {
    DEFAULT_MAX_ARCHIVE_DEPTH
}

fn default_ocr_executable() -> String {
    DEFAULT_OCR_EXECUTABLE.to_string()
}

fn default_ocr_language() -> String {
    DEFAULT_OCR_LANGUAGE.to_string()
}

fn default_ffmpeg() -> String {
    DEFAULT_FFMPEG_EXECUTABLE.to_string()
}

fn default_sample_rate() -> u32 {
    DEFAULT_SAMPLE_RATE
}

fn default_speech_url() -> String {
    DEFAULT_SPEECH_URL.to_string()
}

fn default_speech_model() -> String {
    DEFAULT_SPEECH_MODEL.to_string()
}

fn default_speech_timeout() -> u64 {
    DEFAULT_SPEECH_TIMEOUT_SECS
}

fn default_storage_endpoint() -> String {
    DEFAULT_STORAGE_ENDPOINT.to_string()
}

fn default_bucket() -> String {
    DEFAULT_BUCKET.to_string()
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            ignore: default_ignore(),
            max_archive_depth: default_max_archive_depth(),
        }
    }
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            executable: default_ocr_executable(),
            language: default_ocr_language(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            ffmpeg: default_ffmpeg(),
            sample_rate: default_sample_rate(),
        }
    }
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            url: default_speech_url(),
            model: default_speech_model(),
            api_key: None,
            timeout_secs: default_speech_timeout(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            endpoint: default_storage_endpoint(),
            bucket: default_bucket(),
            access_token: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from default location or return defaults
    pub fn load() -> Result<Self> {
        let default_paths = [
            PathBuf::from("config/settings.toml"),
            PathBuf::from("./config/settings.toml"),
            PathBuf::from(shellexpand::tilde("~/.config/gaia-extract/settings.toml").as_ref()),
        ];

        for path in &default_paths {
            if path.exists() {
                return Self::from_file(path);
            }
        }

        Ok(Self::default())
    }

    /// Get speech API key from config or environment variable
    pub fn speech_api_key(&self) -> Option<String> {
        self.speech
            .api_key
            .clone()
            .or_else(|| std::env::var(SPEECH_API_KEY_ENV).ok())
    }

    /// Get storage access token from config or environment variable
    pub fn storage_access_token(&self) -> Option<String> {
        self.storage
            .access_token
            .clone()
            .or_else(|| std::env::var(STORAGE_TOKEN_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.extract.max_archive_depth, 8);
        assert!(config.extract.ignore.contains(&"metadata.jsonl".to_string()));
        assert_eq!(config.ocr.executable, "tesseract");
        assert_eq!(config.audio.sample_rate, 16_000);
        assert_eq!(config.storage.bucket, "gaia_files");
    }

    #[test]
    fn test_config_from_file() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(
            temp_file.path(),
            r#"
[extract]
ignore = ["skip.me"]
max_archive_depth = 2

[speech]
url = "http://localhost:9000/v1/audio/transcriptions"
api_key = "secret"
"#,
        )
        .unwrap();

        let config = Config::from_file(temp_file.path()).unwrap();
        assert_eq!(config.extract.ignore, vec!["skip.me".to_string()]);
        assert_eq!(config.extract.max_archive_depth, 2);
        assert_eq!(config.speech.url, "http://localhost:9000/v1/audio/transcriptions");
        assert_eq!(config.speech_api_key(), Some("secret".to_string()));
        // untouched sections fall back to defaults
        assert_eq!(config.speech.model, "whisper-1");
        assert_eq!(config.ocr.language, "eng");
    }

    #[test]
    fn test_config_rejects_malformed_toml() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), "[extract\nignore = ").unwrap();
        assert!(Config::from_file(temp_file.path()).is_err());
    }
}
