/// Constants used throughout gaia-extract
/// Defaults that the configuration file can override live here

/// File names the batch walker skips unconditionally.
/// These are the GAIA metadata sidecars plus Finder litter.
pub const DEFAULT_IGNORED_FILES: &[&str] = &[
    "metadata.jsonl",
    "metadata.csv",
    ".DS_Store",
];

/// Maximum number of archive levels followed below the outermost archive
pub const DEFAULT_MAX_ARCHIVE_DEPTH: usize = 8;

/// OCR engine executable
pub const DEFAULT_OCR_EXECUTABLE: &str = "tesseract";

/// Tesseract language pack
pub const DEFAULT_OCR_LANGUAGE: &str = "eng";

/// Audio transcoder executable
pub const DEFAULT_FFMPEG_EXECUTABLE: &str = "ffmpeg";

/// Sample rate of the canonical waveform handed to speech recognition
pub const DEFAULT_SAMPLE_RATE: u32 = 16_000;

/// OpenAI-compatible transcription endpoint
pub const DEFAULT_SPEECH_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Transcription model name
pub const DEFAULT_SPEECH_MODEL: &str = "whisper-1";

/// Request timeout for the speech service, in seconds
pub const DEFAULT_SPEECH_TIMEOUT_SECS: u64 = 120;

/// Cloud Storage JSON API root
pub const DEFAULT_STORAGE_ENDPOINT: &str = "https://storage.googleapis.com";

/// Bucket holding the GAIA attachments
pub const DEFAULT_BUCKET: &str = "gaia_files";

/// Env var consulted when no speech API key is configured
pub const SPEECH_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Env var consulted when no storage access token is configured
pub const STORAGE_TOKEN_ENV: &str = "GCS_ACCESS_TOKEN";

/// Column headers of the extracted-text table
pub const CSV_FILE_NAME_COLUMN: &str = "File_name";
pub const CSV_TEXT_COLUMN: &str = "Extracted Text";
