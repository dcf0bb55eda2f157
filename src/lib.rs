pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod file;
pub mod models;
pub mod recognizer;
pub mod storage;
pub mod utils;
pub mod walker;

pub use config::Config;
pub use error::{Failure, WalkError};
pub use file::{ExtractorRegistry, SourceExtractor, SupportedFormat};
pub use models::{ExtractionBatch, ExtractionRecord, ExtractionResult};
pub use storage::{GcsBucket, ObjectStore};
pub use walker::BatchWalker;
