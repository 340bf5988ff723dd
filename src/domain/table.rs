// ============================================================
// TABLE DOMAIN TYPES
// ============================================================
// In-memory representation of the uploaded table. Rows are kept
// rectangular so the augmented table round-trips through CSV.

use super::error::{AppError, Result};

/// A single data row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRow {
    /// Row index (0-based, header row excluded)
    pub index: usize,

    /// Cell values, one per header
    pub cells: Vec<String>,
}

/// A parsed table: headers plus rectangular rows.
///
/// Rows shorter than the header are padded with empty cells, longer
/// rows are cut at the header width. Classification output columns are
/// appended on the right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<TableRow>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Append a data row, normalizing it to the header width
    pub fn push_row(&mut self, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        let index = self.rows.len();
        self.rows.push(TableRow { index, cells });
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Index of the first header with this exact name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, index: usize) -> Vec<String> {
        self.rows
            .iter()
            .map(|row| row.cells.get(index).cloned().unwrap_or_default())
            .collect()
    }

    /// Append a column on the right.
    ///
    /// Fails when a header of that name already exists
    /// (case-insensitive, to avoid confusing near-collisions) or when
    /// the value count does not match the row count.
    pub fn append_column(&mut self, header: &str, values: Vec<String>) -> Result<()> {
        let lowered = header.to_lowercase();
        if self.headers.iter().any(|h| h.to_lowercase() == lowered) {
            return Err(AppError::ValidationError(format!(
                "Output column '{}' already exists in the input table",
                header
            )));
        }

        if values.len() != self.rows.len() {
            return Err(AppError::Internal(format!(
                "Column '{}' has {} values for {} rows",
                header,
                values.len(),
                self.rows.len()
            )));
        }

        self.headers.push(header.to_string());
        for (row, value) in self.rows.iter_mut().zip(values) {
            row.cells.push(value);
        }
        Ok(())
    }
}
