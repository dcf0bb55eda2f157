use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;

/// Excel workbooks (xlsx and legacy xls), each sheet as a fixed-width table
pub struct SpreadsheetExtractor {
    format: SupportedFormat,
}

impl SpreadsheetExtractor {
    pub fn new(format: SupportedFormat) -> Self {
        Self { format }
    }
}

/// Render a sheet with right-aligned columns separated by one space
pub(crate) fn render_range(range: &Range<Data>) -> String {
    let rows: Vec<Vec<String>> = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string()).collect())
        .collect();

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            widths
                .iter()
                .enumerate()
                .map(|(i, width)| {
                    let cell = row.get(i).map(String::as_str).unwrap_or("");
                    format!("{:>width$}", cell, width = width)
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl SourceExtractor for SpreadsheetExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format.label();
        let mut workbook = open_workbook_auto(path).map_err(|e| Failure::read(label, e))?;

        let sheet_names = workbook.sheet_names();
        let mut sheets = Vec::with_capacity(sheet_names.len());
        for name in &sheet_names {
            let range = workbook
                .worksheet_range(name)
                .map_err(|e| Failure::read(label, format!("sheet {}: {}", name, e)))?;
            sheets.push((name, render_range(&range)));
        }

        if let [(_, table)] = sheets.as_slice() {
            return Ok(table.clone());
        }

        let mut text = String::new();
        for (name, table) in sheets {
            text.push_str(&format!("Sheet: {}\n{}\n\n", name, table));
        }
        Ok(text)
    }

    fn format(&self) -> SupportedFormat {
        self.format
    }
}
