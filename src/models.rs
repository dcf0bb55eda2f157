use crate::error::Failure;
use serde::Serialize;

/// Text recovered from one file, or the reason there is none
pub type ExtractionResult = Result<String, Failure>;

/// Outcome for one input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRecord {
    /// File name, object base name, or in-archive path
    pub source: String,
    /// Extracted text or failure
    pub result: ExtractionResult,
}

impl ExtractionRecord {
    /// Create a new ExtractionRecord instance
    pub fn new(source: impl Into<String>, result: ExtractionResult) -> Self {
        Self {
            source: source.into(),
            result,
        }
    }

    /// The text stored for this file: the content, or the failure description
    pub fn text(&self) -> String {
        match &self.result {
            Ok(text) => text.clone(),
            Err(failure) => failure.to_string(),
        }
    }

    pub fn is_failure(&self) -> bool {
        self.result.is_err()
    }
}

/// Serialized shape of a record handed to the persistence layer
#[derive(Debug, Serialize)]
pub struct RecordRow<'a> {
    pub file_name: &'a str,
    pub extracted_text: String,
    pub failed: bool,
}

impl<'a> From<&'a ExtractionRecord> for RecordRow<'a> {
    fn from(record: &'a ExtractionRecord) -> Self {
        Self {
            file_name: &record.source,
            extracted_text: record.text(),
            failed: record.is_failure(),
        }
    }
}

/// Ordered records from one directory or listing scan, in discovery order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionBatch {
    records: Vec<ExtractionRecord>,
}

impl ExtractionBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ExtractionRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ExtractionRecord> {
        self.records.iter()
    }

    pub fn failures(&self) -> usize {
        self.records.iter().filter(|r| r.is_failure()).count()
    }

    /// Look up the first record for a source name
    pub fn get(&self, source: &str) -> Option<&ExtractionRecord> {
        self.records.iter().find(|r| r.source == source)
    }
}

impl FromIterator<ExtractionRecord> for ExtractionBatch {
    fn from_iter<I: IntoIterator<Item = ExtractionRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ExtractionBatch {
    type Item = ExtractionRecord;
    type IntoIter = std::vec::IntoIter<ExtractionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExtractionBatch {
    type Item = &'a ExtractionRecord;
    type IntoIter = std::slice::Iter<'a, ExtractionRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_text_for_success_and_failure() {
        let ok = ExtractionRecord::new("a.txt", Ok("hello".to_string()));
        assert_eq!(ok.text(), "hello");
        assert!(!ok.is_failure());

        let bad = ExtractionRecord::new("b.xyz", Err(Failure::unsupported("xyz")));
        assert_eq!(bad.text(), "Unsupported file type: .xyz");
        assert!(bad.is_failure());
    }

    #[test]
    fn test_batch_preserves_insertion_order_and_duplicates() {
        let mut batch = ExtractionBatch::new();
        batch.push(ExtractionRecord::new("z.txt", Ok("1".to_string())));
        batch.push(ExtractionRecord::new("a.txt", Ok("2".to_string())));
        batch.push(ExtractionRecord::new("z.txt", Ok("3".to_string())));

        let names: Vec<&str> = batch.iter().map(|r| r.source.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "a.txt", "z.txt"]);
        assert_eq!(batch.len(), 3);
        assert_eq!(batch.get("z.txt").map(|r| r.text()), Some("1".to_string()));
    }

    #[test]
    fn test_record_row_serialization() {
        let record = ExtractionRecord::new("a.json", Err(Failure::read("JSON", "EOF")));
        let row = RecordRow::from(&record);
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["file_name"], "a.json");
        assert_eq!(value["extracted_text"], "Error reading JSON file: EOF");
        assert_eq!(value["failed"], true);
    }
}
