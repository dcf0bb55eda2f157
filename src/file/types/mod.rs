pub mod audio;
pub mod csv;
pub mod docx;
pub mod image;
pub mod json;
pub(crate) mod ooxml;
pub mod pdb;
pub mod pdf;
pub mod pptx;
pub mod spreadsheet;
pub mod text;
pub mod xml;
pub mod zip;

pub use audio::{AudioExtractor, Transcoder};
pub use csv::CsvExtractor;
pub use docx::DocxExtractor;
pub use image::ImageExtractor;
pub use json::{JsonExtractor, JsonLinesExtractor};
pub use pdb::PdbExtractor;
pub use pdf::PdfExtractor;
pub use pptx::PptxExtractor;
pub use spreadsheet::SpreadsheetExtractor;
pub use text::TextExtractor;
pub use xml::XmlExtractor;
pub use zip::ArchiveExtractor;
