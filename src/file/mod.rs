pub mod format;
pub mod registry;
pub mod r#trait;
pub mod types;

pub use format::SupportedFormat;
pub use r#trait::{ExtractContext, SourceExtractor};
pub use registry::ExtractorRegistry;
