// ============================================================
// CSV WRITER
// ============================================================
// Serialize tables back to CSV, mirroring the input delimiter

use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use csv::WriterBuilder;
use std::path::Path;

/// CSV writer for augmented tables
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the same delimiter the input was parsed with
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Write a table to a file
    pub fn write_path(&self, table: &Table, path: &Path) -> Result<()> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(path)
            .map_err(|e| {
                AppError::IoError(format!("Failed to create '{}': {}", path.display(), e))
            })?;

        self.write_records(table, &mut writer)?;
        writer
            .flush()
            .map_err(|e| AppError::IoError(format!("Failed to write '{}': {}", path.display(), e)))
    }

    /// Render a table as a CSV string
    pub fn write_string(&self, table: &Table) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(Vec::new());

        self.write_records(table, &mut writer)?;

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to finish CSV output: {}", e)))?;
        String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV output is not valid UTF-8: {}", e)))
    }

    fn write_records<W: std::io::Write>(
        &self,
        table: &Table,
        writer: &mut csv::Writer<W>,
    ) -> Result<()> {
        writer
            .write_record(table.headers())
            .map_err(|e| AppError::IoError(format!("Failed to write CSV headers: {}", e)))?;

        for row in table.rows() {
            writer.write_record(&row.cells).map_err(|e| {
                AppError::IoError(format!("Failed to write CSV row {}: {}", row.index + 1, e))
            })?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::csv::CsvParser;

    fn create_test_table() -> Table {
        let mut table = Table::new(vec!["ID".to_string(), "Statement".to_string()]);
        table.push_row(vec!["1".to_string(), "hello, world".to_string()]);
        table.push_row(vec!["2".to_string(), "plain".to_string()]);
        table
    }

    #[test]
    fn test_write_string_quotes_embedded_delimiters() {
        let rendered = CsvWriter::new().write_string(&create_test_table()).unwrap();

        assert!(rendered.starts_with("ID,Statement\n"));
        assert!(rendered.contains("1,\"hello, world\"\n"));
        assert!(rendered.contains("2,plain\n"));
    }

    #[test]
    fn test_write_then_parse_round_trip() {
        let table = create_test_table();
        let rendered = CsvWriter::new().with_delimiter(b';').write_string(&table).unwrap();

        let reparsed = CsvParser::new()
            .with_delimiter(b';')
            .parse_content(&rendered)
            .unwrap();
        assert_eq!(reparsed, table);
    }

    #[test]
    fn test_write_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");

        CsvWriter::new().write_path(&create_test_table(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("ID,Statement\n"));
    }
}
