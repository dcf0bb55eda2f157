use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// XML documents: checked for well-formedness, returned verbatim
pub struct XmlExtractor;

impl XmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

fn check_well_formed(content: &str) -> Result<(), String> {
    let mut reader = Reader::from_str(content);
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) => {
                depth += 1;
                saw_root = true;
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Empty(_)) => saw_root = true,
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(format!("{} at position {}", e, reader.buffer_position()));
            }
        }
    }

    if !saw_root {
        return Err("no root element".to_string());
    }
    if depth != 0 {
        return Err("unexpected end of document: unclosed element".to_string());
    }
    Ok(())
}

impl SourceExtractor for XmlExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let content = std::fs::read_to_string(path).map_err(|e| Failure::read(label, e))?;
        check_well_formed(&content).map_err(|e| Failure::read(label, e))?;
        Ok(content)
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_document() {
        let doc = "<?xml version=\"1.0\"?>\n<root a=\"1\"><item>x &amp; y</item><empty/></root>\n";
        assert!(check_well_formed(doc).is_ok());
    }

    #[test]
    fn test_mismatched_end_tag() {
        assert!(check_well_formed("<a><b></a>").is_err());
    }

    #[test]
    fn test_unclosed_root() {
        assert!(check_well_formed("<a><b></b>").is_err());
    }

    #[test]
    fn test_no_root() {
        assert!(check_well_formed("just text").is_err());
    }

    #[test]
    fn test_extractor_returns_content_verbatim() {
        use crate::config::Config;
        use crate::file::registry::tests::test_registry;

        let temp_file = tempfile::NamedTempFile::new().unwrap();
        let doc = "<root>\n  <v>42</v>\n</root>";
        std::fs::write(temp_file.path(), doc).unwrap();

        let registry = test_registry(&Config::default());
        let cx = ExtractContext::new(&registry);
        assert_eq!(XmlExtractor::new().extract(temp_file.path(), &cx), Ok(doc.to_string()));
    }
}
