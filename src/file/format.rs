use crate::utils::normalize_extension;
use std::fmt;

/// Closed set of recognised file types.
///
/// Every tag owns exactly one extractor in the registry; an extension that
/// maps to no tag never reaches an extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SupportedFormat {
    Pdf,
    Docx,
    Xlsx,
    Xls,
    Csv,
    Json,
    JsonLd,
    JsonLines,
    Text,
    Python,
    Xml,
    Image,
    Audio,
    Pptx,
    Zip,
    Pdb,
}

impl SupportedFormat {
    pub const ALL: [SupportedFormat; 16] = [
        SupportedFormat::Pdf,
        SupportedFormat::Docx,
        SupportedFormat::Xlsx,
        SupportedFormat::Xls,
        SupportedFormat::Csv,
        SupportedFormat::Json,
        SupportedFormat::JsonLd,
        SupportedFormat::JsonLines,
        SupportedFormat::Text,
        SupportedFormat::Python,
        SupportedFormat::Xml,
        SupportedFormat::Image,
        SupportedFormat::Audio,
        SupportedFormat::Pptx,
        SupportedFormat::Zip,
        SupportedFormat::Pdb,
    ];

    /// Extensions (lower case, no dot) mapped to this tag
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            SupportedFormat::Pdf => &["pdf"],
            SupportedFormat::Docx => &["docx"],
            SupportedFormat::Xlsx => &["xlsx"],
            SupportedFormat::Xls => &["xls"],
            SupportedFormat::Csv => &["csv"],
            SupportedFormat::Json => &["json"],
            SupportedFormat::JsonLd => &["jsonld"],
            SupportedFormat::JsonLines => &["jsonl"],
            SupportedFormat::Text => &["txt", "md"],
            SupportedFormat::Python => &["py"],
            SupportedFormat::Xml => &["xml"],
            SupportedFormat::Image => &["jpg", "jpeg", "png"],
            SupportedFormat::Audio => &["mp3", "wav", "flac", "m4a", "ogg"],
            SupportedFormat::Pptx => &["pptx"],
            SupportedFormat::Zip => &["zip"],
            SupportedFormat::Pdb => &["pdb"],
        }
    }

    /// Name used in failure descriptions ("Error reading <label> file")
    pub fn label(self) -> &'static str {
        match self {
            SupportedFormat::Pdf => "PDF",
            SupportedFormat::Docx => "DOCX",
            SupportedFormat::Xlsx => "Excel",
            SupportedFormat::Xls => "XLS",
            SupportedFormat::Csv => "CSV",
            SupportedFormat::Json => "JSON",
            SupportedFormat::JsonLd => "JSON-LD",
            SupportedFormat::JsonLines => "JSONL",
            SupportedFormat::Text => "TXT",
            SupportedFormat::Python => "Python",
            SupportedFormat::Xml => "XML",
            SupportedFormat::Image => "image",
            SupportedFormat::Audio => "audio",
            SupportedFormat::Pptx => "PPTX",
            SupportedFormat::Zip => "ZIP",
            SupportedFormat::Pdb => "PDB",
        }
    }

    /// Case-insensitive lookup; a leading dot is accepted
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = normalize_extension(ext);
        Self::ALL
            .into_iter()
            .find(|format| format.extensions().contains(&ext.as_str()))
    }

    /// Every extension the registry accepts
    pub fn all_extensions() -> impl Iterator<Item = &'static str> {
        Self::ALL.into_iter().flat_map(|format| format.extensions().iter().copied())
    }
}

impl fmt::Display for SupportedFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_extension_is_case_insensitive() {
        assert_eq!(SupportedFormat::from_extension("PDF"), Some(SupportedFormat::Pdf));
        assert_eq!(SupportedFormat::from_extension(".Jpeg"), Some(SupportedFormat::Image));
        assert_eq!(SupportedFormat::from_extension("JSONL"), Some(SupportedFormat::JsonLines));
    }

    #[test]
    fn test_unknown_extension() {
        assert_eq!(SupportedFormat::from_extension("xyz"), None);
        assert_eq!(SupportedFormat::from_extension(""), None);
    }

    #[test]
    fn test_extensions_are_unique_across_tags() {
        let mut seen = HashSet::new();
        for ext in SupportedFormat::all_extensions() {
            assert!(seen.insert(ext), "extension {} mapped twice", ext);
        }
    }

    #[test]
    fn test_every_extension_round_trips_to_its_tag() {
        for format in SupportedFormat::ALL {
            for ext in format.extensions() {
                assert_eq!(SupportedFormat::from_extension(ext), Some(format));
            }
        }
    }
}
