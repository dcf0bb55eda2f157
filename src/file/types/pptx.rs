use crate::error::Failure;
use crate::file::types::ooxml::{open_package, read_part, ParagraphCollector};
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use quick_xml::events::Event;
use quick_xml::Reader;
use std::path::Path;

/// Presentation decks: text of every text-bearing shape, slide by slide
pub struct PptxExtractor;

impl PptxExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PptxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Slide number of a `ppt/slides/slideN.xml` part name
fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?
        .strip_suffix(".xml")?
        .parse()
        .ok()
}

/// Texts of the `p:sp` shapes on one slide, in shape order. Shapes without a
/// text body or with empty text contribute nothing.
fn shape_texts(xml: &str) -> Result<Vec<String>, String> {
    let mut reader = Reader::from_str(xml);
    let mut texts = Vec::new();
    let mut shape: Option<(ParagraphCollector, bool)> = None;

    loop {
        let event = match reader.read_event() {
            Ok(Event::Eof) => break,
            Ok(event) => event,
            Err(e) => return Err(e.to_string()),
        };

        match &event {
            Event::Start(e) if e.local_name().as_ref() == b"sp" => {
                shape = Some((ParagraphCollector::default(), false));
                continue;
            }
            Event::End(e) if e.local_name().as_ref() == b"sp" => {
                if let Some((collector, has_body)) = shape.take() {
                    let text = collector.into_paragraphs().join("\n");
                    if has_body && !text.is_empty() {
                        texts.push(text);
                    }
                }
                continue;
            }
            _ => {}
        }

        if let Some((collector, has_body)) = shape.as_mut() {
            if let Event::Start(e) = &event {
                if e.local_name().as_ref() == b"txBody" {
                    *has_body = true;
                }
            }
            collector.feed(&event)?;
        }
    }

    Ok(texts)
}

impl SourceExtractor for PptxExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let mut package = open_package(path).map_err(|e| Failure::read(label, e))?;

        let mut slides: Vec<(u32, String)> = package
            .file_names()
            .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
            .collect();
        slides.sort_by_key(|(n, _)| *n);

        let mut texts = Vec::new();
        for (_, name) in &slides {
            let xml = read_part(&mut package, name).map_err(|e| Failure::read(label, e))?;
            let shapes = shape_texts(&xml).map_err(|e| Failure::read(label, format!("{}: {}", name, e)))?;
            texts.extend(shapes);
        }

        Ok(texts.join("\n"))
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::Pptx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::file::registry::tests::test_registry;
    use crate::file::types::ooxml::tests::write_package;

    fn slide(shapes: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
<p:cSld><p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            shapes
        )
    }

    fn text_shape(paragraphs: &[&str]) -> String {
        let body: String = paragraphs
            .iter()
            .map(|p| format!("<a:p><a:r><a:t>{}</a:t></a:r></a:p>", p))
            .collect();
        format!("<p:sp><p:nvSpPr/><p:txBody><a:bodyPr/>{}</p:txBody></p:sp>", body)
    }

    #[test]
    fn test_slide_number() {
        assert_eq!(slide_number("ppt/slides/slide12.xml"), Some(12));
        assert_eq!(slide_number("ppt/slides/_rels/slide1.xml.rels"), None);
        assert_eq!(slide_number("ppt/slideLayouts/slideLayout1.xml"), None);
    }

    #[test]
    fn test_shape_texts_skip_shapes_without_text() {
        let xml = slide(&format!(
            "{}<p:sp><p:nvSpPr/><p:spPr/></p:sp>{}",
            text_shape(&["Title", "Subtitle"]),
            text_shape(&["Body"])
        ));
        assert_eq!(shape_texts(&xml).unwrap(), vec!["Title\nSubtitle", "Body"]);
    }

    #[test]
    fn test_pptx_slides_in_numeric_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let slide1 = slide(&text_shape(&["one"]));
        let slide2 = slide(&text_shape(&["two"]));
        let slide10 = slide(&text_shape(&["ten"]));
        write_package(
            &path,
            &[
                ("ppt/slides/slide10.xml", slide10.as_str()),
                ("ppt/slides/slide2.xml", slide2.as_str()),
                ("ppt/slides/slide1.xml", slide1.as_str()),
            ],
        );

        let registry = test_registry(&Config::default());
        let cx = ExtractContext::new(&registry);
        let text = PptxExtractor::new().extract(&path, &cx).unwrap();
        assert_eq!(text, "one\ntwo\nten");
    }

    #[test]
    fn test_pptx_corrupt_package() {
        let temp_file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), [0u8; 32]).unwrap();

        let registry = test_registry(&Config::default());
        let cx = ExtractContext::new(&registry);
        let failure = PptxExtractor::new().extract(temp_file.path(), &cx).unwrap_err();
        assert!(failure.to_string().starts_with("Error reading PPTX file: "));
    }
}
