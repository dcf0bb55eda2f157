use crate::error::Failure;
use crate::file::types::ooxml::{open_package, read_part, ParagraphCollector};
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

const DOCUMENT_PART: &str = "word/document.xml";

/// Word documents: paragraph text in document order, one paragraph per line
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// True inside a paragraph that sits directly under `w:body`, outside any
/// text box it anchors. Table cells nest their paragraphs deeper.
fn in_body_paragraph(open: &[Vec<u8>]) -> bool {
    let Some(body) = open.iter().position(|name| name.as_slice() == b"body") else {
        return false;
    };
    open.get(body + 1).is_some_and(|name| name.as_slice() == b"p")
        && !open.iter().any(|name| name.as_slice() == b"txbxContent")
}

/// Top-level body paragraphs only; tables, text boxes, headers and notes are
/// not part of the text.
fn document_paragraphs(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut collector = ParagraphCollector::default();
    let mut open: Vec<Vec<u8>> = Vec::new();

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(e) => return Err(format!("{}: {}", DOCUMENT_PART, e)),
        };

        match &event {
            Event::Start(e) => {
                open.push(e.local_name().as_ref().to_vec());
                if in_body_paragraph(&open) {
                    collector.feed(&event)?;
                }
            }
            Event::Empty(e) => {
                open.push(e.local_name().as_ref().to_vec());
                if in_body_paragraph(&open) {
                    collector.feed(&event)?;
                }
                open.pop();
            }
            Event::End(_) => {
                if in_body_paragraph(&open) {
                    collector.feed(&event)?;
                }
                open.pop();
            }
            _ => {
                if in_body_paragraph(&open) {
                    collector.feed(&event)?;
                }
            }
        }
    }

    Ok(collector.into_paragraphs())
}

impl SourceExtractor for DocxExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let mut package = open_package(path).map_err(|e| Failure::read(label, e))?;
        let xml = read_part(&mut package, DOCUMENT_PART).map_err(|e| Failure::read(label, e))?;
        let paragraphs = document_paragraphs(&xml).map_err(|e| Failure::read(label, e))?;
        Ok(paragraphs.join("\n"))
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Docx
    }
}
