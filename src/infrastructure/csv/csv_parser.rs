// ============================================================
// CSV PARSER
// ============================================================
// Parse CSV files into tables with encoding and delimiter detection

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use csv::{ReaderBuilder, Trim};
use encoding_rs::{UTF_8, WINDOWS_1252};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

/// CSV parser producing rectangular [`Table`] values.
///
/// Headers and cells are whitespace-trimmed; exact column lookup
/// relies on that.
pub struct CsvParser {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvParser {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Parse CSV content from a string
    pub fn parse_content(&self, content: &str) -> Result<Table> {
        if content.trim().is_empty() {
            return Err(AppError::ParseError("CSV content is empty".to_string()));
        }

        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Allow rows with different lengths
            .from_reader(content.as_bytes());

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| AppError::ParseError(format!("Failed to read CSV headers: {}", e)))?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut table = Table::new(headers);
        for (index, result) in reader.records().enumerate() {
            let record = result.map_err(|e| {
                AppError::ParseError(format!("Failed to parse CSV row {}: {}", index + 1, e))
            })?;
            table.push_row(record.iter().map(|v| v.to_string()).collect());
        }

        Ok(table)
    }

    /// Parse CSV content with the given delimiter, or detect one from
    /// the content. Returns the table together with the delimiter that
    /// was used, so the output side can mirror it.
    pub fn parse_auto(content: &str, delimiter: Option<u8>) -> Result<(Table, u8)> {
        let delimiter = match delimiter {
            Some(delimiter) => delimiter,
            None => {
                let detected = Self::detect_delimiter(content);
                debug!(delimiter = %(detected as char), "Detected CSV delimiter");
                detected
            }
        };

        let table = Self::new().with_delimiter(delimiter).parse_content(content)?;
        Ok((table, delimiter))
    }

    /// Detect the delimiter (comma, semicolon, tab, pipe) by scoring
    /// each candidate on how consistently it splits the first lines
    pub fn detect_delimiter(content: &str) -> u8 {
        let candidates = [b',', b';', b'\t', b'|'];
        let sample_lines: Vec<&str> = content.lines().take(10).collect();

        let mut best_delimiter = b',';
        let mut best_score = 0.0f32;

        for &delimiter in &candidates {
            if sample_lines.is_empty() {
                continue;
            }

            let field_counts: Vec<usize> = sample_lines
                .iter()
                .map(|line| line.bytes().filter(|&b| b == delimiter).count())
                .collect();

            // Score by frequency, penalized by inconsistency across lines
            let avg = field_counts.iter().sum::<usize>() as f32 / field_counts.len() as f32;
            let variance = field_counts
                .iter()
                .map(|&x| (x as f32 - avg).powi(2))
                .sum::<f32>()
                / field_counts.len() as f32;

            let score = avg / (1.0 + variance.sqrt());
            if score > best_score {
                best_score = score;
                best_delimiter = delimiter;
            }
        }

        best_delimiter
    }
}

/// Read a file and decode it to text: strict UTF-8 first (BOM aware),
/// Windows-1252 as the fallback for legacy exports
pub fn read_to_text(path: &Path) -> Result<String> {
    let bytes = fs::read(path)
        .map_err(|e| AppError::IoError(format!("Failed to read '{}': {}", path.display(), e)))?;
    Ok(decode_bytes(&bytes))
}

fn decode_bytes(bytes: &[u8]) -> String {
    let (text, _, had_errors) = UTF_8.decode(bytes);
    if !had_errors {
        return text.into_owned();
    }

    warn!(
        bytes = bytes.len(),
        "Input is not valid UTF-8, decoding as Windows-1252"
    );
    let (text, _, _) = WINDOWS_1252.decode(bytes);
    text.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_simple_csv() {
        let content = "ID,Statement\n1,Invoice sent\n2,Annual leave";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(table.headers(), &["ID", "Statement"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[0].cells, vec!["1", "Invoice sent"]);
    }

    #[test]
    fn test_parse_trims_whitespace() {
        let content = "Name , Statement \nAlice ,  hello  ";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(table.headers(), &["Name", "Statement"]);
        assert_eq!(table.rows()[0].cells, vec!["Alice", "hello"]);
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let content = "a,b,c\n1,2\n1,2,3";
        let table = CsvParser::new().parse_content(content).unwrap();

        assert_eq!(table.rows()[0].cells, vec!["1", "2", ""]);
        assert_eq!(table.rows()[1].cells, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_parse_empty_content_fails() {
        let err = CsvParser::new().parse_content("  \n ").unwrap_err();
        assert!(matches!(err, AppError::ParseError(_)));
    }

    #[test]
    fn test_parse_with_semicolon_delimiter() {
        let content = "ID;Statement\n1;pay, later";
        let table = CsvParser::new()
            .with_delimiter(b';')
            .parse_content(content)
            .unwrap();

        assert_eq!(table.rows()[0].cells, vec!["1", "pay, later"]);
    }

    #[test]
    fn test_detect_delimiter() {
        assert_eq!(CsvParser::detect_delimiter("a,b,c\nd,e,f"), b',');
        assert_eq!(CsvParser::detect_delimiter("a;b;c\nd;e;f"), b';');
        assert_eq!(CsvParser::detect_delimiter("a\tb\tc\nd\te\tf"), b'\t');
        assert_eq!(CsvParser::detect_delimiter("a|b|c\nd|e|f"), b'|');
        // Single column: fall back to comma
        assert_eq!(CsvParser::detect_delimiter("name\nAlice"), b',');
    }

    #[test]
    fn test_parse_auto_detects_delimiter() {
        let (table, delimiter) =
            CsvParser::parse_auto("ID;Statement\n1;pay, later\n", None).unwrap();

        assert_eq!(delimiter, b';');
        assert_eq!(table.headers(), &["ID", "Statement"]);
        assert_eq!(table.rows()[0].cells, vec!["1", "pay, later"]);
    }

    #[test]
    fn test_parse_auto_honors_given_delimiter() {
        // Pipes everywhere, but the caller's delimiter wins
        let (table, delimiter) = CsvParser::parse_auto("a|b\n1|2\n", Some(b',')).unwrap();

        assert_eq!(delimiter, b',');
        assert_eq!(table.headers(), &["a|b"]);
    }

    #[test]
    fn test_read_utf8_with_bom() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\xef\xbb\xbfName,Statement\nA,caf\xc3\xa9")
            .unwrap();

        let content = read_to_text(file.path()).unwrap();
        assert!(content.starts_with("Name"));
        assert!(content.contains("café"));
    }

    #[test]
    fn test_read_windows_1252_fallback() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // "café" encoded as Windows-1252 (0xe9 is not valid UTF-8 here)
        file.write_all(b"Name\ncaf\xe9").unwrap();

        let content = read_to_text(file.path()).unwrap();
        assert!(content.contains("café"));
    }
}
