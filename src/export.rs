use crate::constants::{CSV_FILE_NAME_COLUMN, CSV_TEXT_COLUMN};
use crate::models::{ExtractionBatch, RecordRow};
use anyhow::{bail, Context, Result};
use serde_json::Value;
use std::io::{BufRead, Write};

/// Write a batch as a two-column CSV table (file name, extracted text)
pub fn write_csv<W: Write>(batch: &ExtractionBatch, writer: W) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record([CSV_FILE_NAME_COLUMN, CSV_TEXT_COLUMN])
        .context("Failed to write CSV header")?;

    for record in batch {
        csv.write_record([record.source.as_str(), record.text().as_str()])
            .with_context(|| format!("Failed to write CSV row for {}", record.source))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(())
}

/// Write a batch as a pretty-printed JSON array of records
pub fn write_json<W: Write>(batch: &ExtractionBatch, mut writer: W) -> Result<()> {
    let rows: Vec<RecordRow<'_>> = batch.iter().map(RecordRow::from).collect();
    serde_json::to_writer_pretty(&mut writer, &rows).context("Failed to serialize batch")?;
    writeln!(writer).context("Failed to write JSON output")?;
    Ok(())
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Convert a JSON Lines file of flat objects (GAIA `metadata.jsonl`) into
/// CSV. The columns are the keys of the first object, in order. Returns the
/// number of data rows written.
pub fn jsonl_to_csv<R: BufRead, W: Write>(reader: R, writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    let mut header: Option<Vec<String>> = None;
    let mut rows = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let line = line.with_context(|| format!("Failed to read line {}", line_number))?;
        if line.trim().is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(&line)
            .with_context(|| format!("Invalid JSON on line {}", line_number))?;
        let Value::Object(object) = value else {
            bail!("Line {} is not a JSON object", line_number);
        };

        if header.is_none() {
            let columns: Vec<String> = object.keys().cloned().collect();
            csv.write_record(&columns).context("Failed to write CSV header")?;
            header = Some(columns);
        }

        let columns = header.as_deref().unwrap_or_default();
        let record: Vec<String> = columns.iter().map(|key| cell(object.get(key))).collect();
        csv.write_record(&record)
            .with_context(|| format!("Failed to write CSV row for line {}", line_number))?;
        rows += 1;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Failure;
    use crate::models::ExtractionRecord;

    fn sample_batch() -> ExtractionBatch {
        vec![
            ExtractionRecord::new("a.txt", Ok("line one\nline, two".to_string())),
            ExtractionRecord::new("b.xyz", Err(Failure::unsupported("xyz"))),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_write_csv() {
        let mut out = Vec::new();
        write_csv(&sample_batch(), &mut out).unwrap();

        let mut reader = csv::Reader::from_reader(out.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec!["File_name", "Extracted Text"]);

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(&rows[0][0], "a.txt");
        assert_eq!(&rows[0][1], "line one\nline, two");
        assert_eq!(&rows[1][1], "Unsupported file type: .xyz");
    }

    #[test]
    fn test_write_csv_empty_batch_has_header_only() {
        let mut out = Vec::new();
        write_csv(&ExtractionBatch::new(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "File_name,Extracted Text\n");
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&sample_batch(), &mut out).unwrap();

        let parsed: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                {"file_name": "a.txt", "extracted_text": "line one\nline, two", "failed": false},
                {"file_name": "b.xyz", "extracted_text": "Unsupported file type: .xyz", "failed": true}
            ])
        );
    }

    #[test]
    fn test_jsonl_to_csv() {
        let input = r#"{"task_id": "t1", "Question": "What?", "Level": 1, "file_name": "", "Annotator Metadata": {"Steps": "2"}}

{"task_id": "t2", "Question": "Why, \"really\"?", "Level": 2, "file_name": "a.pdf", "Annotator Metadata": null}
"#;
        let mut out = Vec::new();
        let rows = jsonl_to_csv(input.as_bytes(), &mut out).unwrap();
        assert_eq!(rows, 2);

        let mut reader = csv::Reader::from_reader(out.as_slice());
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["task_id", "Question", "Level", "file_name", "Annotator Metadata"]
        );
        let records: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(
            records[0].iter().collect::<Vec<_>>(),
            vec!["t1", "What?", "1", "", r#"{"Steps":"2"}"#]
        );
        assert_eq!(
            records[1].iter().collect::<Vec<_>>(),
            vec!["t2", "Why, \"really\"?", "2", "a.pdf", ""]
        );
    }

    #[test]
    fn test_jsonl_to_csv_missing_keys_are_empty() {
        let input = "{\"a\": 1, \"b\": 2}\n{\"a\": 3}\n";
        let mut out = Vec::new();
        jsonl_to_csv(input.as_bytes(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "a,b\n1,2\n3,\n");
    }

    #[test]
    fn test_jsonl_to_csv_reports_bad_line() {
        let input = "{\"a\": 1}\n{\"a\": \n";
        let err = jsonl_to_csv(input.as_bytes(), Vec::new()).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_jsonl_to_csv_rejects_non_objects() {
        let err = jsonl_to_csv("[1, 2]\n".as_bytes(), Vec::new()).unwrap_err();
        assert_eq!(err.to_string(), "Line 1 is not a JSON object");
    }

    #[test]
    fn test_jsonl_to_csv_empty_input() {
        let mut out = Vec::new();
        assert_eq!(jsonl_to_csv("".as_bytes(), &mut out).unwrap(), 0);
        assert!(out.is_empty());
    }
}
