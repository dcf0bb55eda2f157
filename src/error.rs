use std::path::PathBuf;
use thiserror::Error;

/// Why a single file produced no text.
///
/// A `Failure` is data, not an abort: the walker records it next to the file
/// name and moves on. Its `Display` form is the text stored in place of the
/// extracted content.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    /// Extension absent from the registry, kept with its leading dot
    /// (empty when the file has no extension)
    #[error("Unsupported file type: {0}")]
    Unsupported(String),

    /// Malformed or unreadable content for the given format
    #[error("Error reading {format} file: {reason}")]
    Read { format: &'static str, reason: String },

    /// A processing step (e.g. transcoding) failed before any text was read
    #[error("Error processing {format} file: {reason}")]
    Processing { format: &'static str, reason: String },

    /// The recognition service ran but produced no confident result
    #[error("Speech recognition could not understand the audio.")]
    Unintelligible,

    /// The recognition service could not be reached or returned an error
    #[error("Could not request results from the speech recognition service; {0}")]
    ServiceUnavailable(String),

    /// A remote object could not be downloaded
    #[error("Error downloading object: {0}")]
    Fetch(String),
}

impl Failure {
    /// Build a [`Failure::Unsupported`] from a bare extension (`"xyz"`)
    pub fn unsupported(ext: &str) -> Self {
        if ext.is_empty() {
            Failure::Unsupported(String::new())
        } else {
            Failure::Unsupported(format!(".{}", ext.trim_start_matches('.')))
        }
    }

    pub fn read(format: &'static str, reason: impl ToString) -> Self {
        Failure::Read {
            format,
            reason: reason.to_string(),
        }
    }

    pub fn processing(format: &'static str, reason: impl ToString) -> Self {
        Failure::Processing {
            format,
            reason: reason.to_string(),
        }
    }
}

/// Outcome of a call to an OCR or speech recognizer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecognitionError {
    #[error("no recognizable content")]
    Unintelligible,

    #[error("{0}")]
    Unavailable(String),
}

/// Object-storage errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("invalid storage URL: {0}")]
    Url(String),
}

/// Errors that abort a whole scan: there is nothing to iterate.
#[derive(Error, Debug)]
pub enum WalkError {
    #[error("Not a directory: {}", path.display())]
    NotADirectory { path: PathBuf },

    #[error("Failed to read directory {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to list objects: {0}")]
    Store(#[from] StoreError),
}
