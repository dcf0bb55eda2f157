//! Shared plumbing for the zip-packaged Office formats (DOCX, PPTX).

use quick_xml::events::Event;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

pub(crate) fn open_package(path: &Path) -> Result<ZipArchive<File>, String> {
    let file = File::open(path).map_err(|e| e.to_string())?;
    ZipArchive::new(file).map_err(|e| e.to_string())
}

/// Read one XML part of the package as UTF-8
pub(crate) fn read_part(archive: &mut ZipArchive<File>, name: &str) -> Result<String, String> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| format!("{}: {}", name, e))?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .map_err(|e| format!("{}: {}", name, e))?;
    Ok(xml)
}

/// Collects paragraph text from WordprocessingML (`w:p`/`w:t`) or
/// DrawingML (`a:p`/`a:t`) event streams. Both use the same local names.
#[derive(Default)]
pub(crate) struct ParagraphCollector {
    open: Vec<String>,
    finished: Vec<String>,
    in_text: bool,
    in_tab_stops: bool,
}

impl ParagraphCollector {
    pub(crate) fn feed(&mut self, event: &Event<'_>) -> Result<(), String> {
        match event {
            Event::Start(e) => match e.local_name().as_ref() {
                b"p" => self.open.push(String::new()),
                b"t" => self.in_text = true,
                b"tabs" | b"tabLst" => self.in_tab_stops = true,
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" if !self.in_tab_stops => self.push_str("\t"),
                b"br" | b"cr" => self.push_str("\n"),
                b"p" => self.finished.push(String::new()),
                _ => {}
            },
            Event::End(e) => match e.local_name().as_ref() {
                b"p" => {
                    if let Some(paragraph) = self.open.pop() {
                        self.finished.push(paragraph);
                    }
                }
                b"t" => self.in_text = false,
                b"tabs" | b"tabLst" => self.in_tab_stops = false,
                _ => {}
            },
            Event::Text(t) if self.in_text => {
                let text = t.unescape().map_err(|e| e.to_string())?;
                self.push_str(&text);
            }
            _ => {}
        }
        Ok(())
    }

    fn push_str(&mut self, s: &str) {
        if let Some(paragraph) = self.open.last_mut() {
            paragraph.push_str(s);
        }
    }

    pub(crate) fn into_paragraphs(self) -> Vec<String> {
        self.finished
    }
}
