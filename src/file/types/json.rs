use crate::error::Failure;
use crate::file::{ExtractContext, SourceExtractor, SupportedFormat};
use crate::models::ExtractionResult;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::Value;
use std::path::Path;

/// Pretty-print with 4-space indentation
pub(crate) fn to_pretty(value: &Value) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// JSON and JSON-LD documents, re-rendered from the parsed value
pub struct JsonExtractor {
    format: SupportedFormat,
}

impl JsonExtractor {
    pub fn new(format: SupportedFormat) -> Self {
        Self { format }
    }
}

impl SourceExtractor for JsonExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format.label();
        let content = std::fs::read_to_string(path).map_err(|e| Failure::read(label, e))?;
        let parsed: Value = serde_json::from_str(&content).map_err(|e| Failure::read(label, e))?;
        to_pretty(&parsed).map_err(|e| Failure::read(label, e))
    }

    fn format(&self) -> SupportedFormat {
        self.format
    }
}

/// JSON Lines: one pretty-printed block per line.
///
/// A bad line becomes an inline diagnostic and the rest of the file is still
/// processed.
pub struct JsonLinesExtractor;

impl JsonLinesExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonLinesExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceExtractor for JsonLinesExtractor {
    fn extract(&self, path: &Path, _cx: &ExtractContext<'_>) -> ExtractionResult {
        let label = self.format().label();
        let content = std::fs::read_to_string(path).map_err(|e| Failure::read(label, e))?;

        let mut text = String::new();
        // a blank line is reported like any other unparsable line; the final
        // newline does not start an extra line
        for line in content.lines() {
            match serde_json::from_str::<Value>(line) {
                Ok(value) => {
                    let pretty = to_pretty(&value).map_err(|e| Failure::read(label, e))?;
                    text.push_str(&pretty);
                    text.push('\n');
                }
                Err(e) => {
                    text.push_str(&format!("Invalid JSON in line: {}\nError: {}\n", line, e));
                }
            }
        }

        Ok(text)
    }

    fn format(&self) -> SupportedFormat {
        SupportedFormat::JsonLines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::file::registry::tests::test_registry;
    use tempfile::NamedTempFile;

    fn run(extractor: &dyn SourceExtractor, content: &[u8]) -> ExtractionResult {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), content).unwrap();
        let registry = test_registry(&Config::default());
        let cx = ExtractContext::new(&registry);
        extractor.extract(temp_file.path(), &cx)
    }

    #[test]
    fn test_json_file_extraction() {
        let text = run(&JsonExtractor::new(SupportedFormat::Json), br#"{"name":"test","value":42}"#)
            .unwrap();
        assert_eq!(text, "{\n    \"name\": \"test\",\n    \"value\": 42\n}");
    }

    #[test]
    fn test_json_pretty_print_reparses_to_same_value() {
        let original = r#"{"task_id":"c61d","levels":[1,2,{"x":null}],"ok":true,"score":0.5}"#;
        let text = run(&JsonExtractor::new(SupportedFormat::Json), original.as_bytes()).unwrap();

        let reparsed: Value = serde_json::from_str(&text).unwrap();
        let expected: Value = serde_json::from_str(original).unwrap();
        assert_eq!(reparsed, expected);
    }

    #[test]
    fn test_jsonld_uses_its_own_label() {
        let failure = run(&JsonExtractor::new(SupportedFormat::JsonLd), b"{\"@context\": ").unwrap_err();
        assert!(failure.to_string().starts_with("Error reading JSON-LD file: "));
    }

    #[test]
    fn test_json_invalid_utf8_is_a_failure() {
        let failure = run(&JsonExtractor::new(SupportedFormat::Json), b"{\"a\": \"\xff\"}").unwrap_err();
        assert!(failure.to_string().starts_with("Error reading JSON file: "));
    }

    #[test]
    fn test_jsonl_tolerates_one_bad_line() {
        let content = b"{\"a\":1}\n{not json}\n{\"b\":2}\n{\"c\":3}\n";
        let text = run(&JsonLinesExtractor::new(), content).unwrap();

        assert!(text.contains("{\n    \"a\": 1\n}\n"));
        assert!(text.contains("{\n    \"b\": 2\n}\n"));
        assert!(text.contains("{\n    \"c\": 3\n}\n"));
        assert!(text.contains("Invalid JSON in line: {not json}\nError: "));
        assert_eq!(text.matches("Invalid JSON in line").count(), 1);
        // the bad line does not stop later lines
        assert!(text.find("\"c\"").unwrap() > text.find("{not json}").unwrap());
    }

    #[test]
    fn test_jsonl_reports_interior_blank_lines() {
        let text = run(&JsonLinesExtractor::new(), b"{\"a\":1}\n\n   \n{\"b\":2}\n").unwrap();
        assert_eq!(text.matches("Invalid JSON in line: ").count(), 2);
        assert!(text.contains("Invalid JSON in line: \nError: EOF while parsing"));
        assert!(text.ends_with("{\n    \"b\": 2\n}\n"));
    }
}
