//! Table Classification Pipeline
//!
//! Drives a whole run: parse the CSV, locate the statement column,
//! classify every row, append the output columns, and collect the
//! summary. The caller decides how to persist the outcome (CSV file,
//! JSON report, or preview).

use crate::application::use_cases::classifier::Classifier;
use crate::domain::classification::{ClassificationResult, ClassificationSummary};
use crate::domain::dictionary::Dictionary;
use crate::domain::error::{AppError, Result};
use crate::domain::table::Table;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::csv::{read_to_text, CsvParser};
use crate::infrastructure::json_report::ClassificationReport;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// Outcome of classifying a table
#[derive(Debug)]
pub struct ClassifiedTable {
    /// Input table with the output columns appended
    pub table: Table,

    /// One result per row, in row order
    pub results: Vec<ClassificationResult>,

    /// Aggregate counts, categories in dictionary order
    pub summary: ClassificationSummary,

    /// Delimiter the table was parsed with (mirrored on output)
    pub delimiter: u8,

    /// Wall-clock time for the classification pass
    pub processing_time_ms: u64,
}

/// Classification pipeline bound to one configuration and dictionary
#[derive(Debug)]
pub struct TableClassifier {
    config: AppConfig,
    dictionary: Dictionary,
    classifier: Classifier,
}

impl TableClassifier {
    /// Build the pipeline, validating the configuration against the
    /// dictionary (output separator must not occur in category names)
    pub fn new(config: AppConfig, dictionary: Dictionary) -> Result<Self> {
        config.validate()?;
        dictionary.validate_separator(&config.separator)?;
        let classifier = Classifier::new(&dictionary, config.match_mode)?;

        Ok(Self {
            config,
            dictionary,
            classifier,
        })
    }

    /// Classify a CSV file on disk
    pub fn classify_path(&self, path: &Path) -> Result<ClassifiedTable> {
        let content = read_to_text(path)?;
        self.classify_content(&content)
    }

    /// Classify CSV content, detecting the delimiter unless one is
    /// configured
    pub fn classify_content(&self, content: &str) -> Result<ClassifiedTable> {
        let (table, delimiter) = CsvParser::parse_auto(content, self.config.csv_delimiter())?;
        self.classify_table(table, delimiter)
    }

    /// Classify an already-parsed table
    pub fn classify_table(&self, mut table: Table, delimiter: u8) -> Result<ClassifiedTable> {
        let start = Instant::now();

        let column = table
            .column_index(&self.config.statement_column)
            .ok_or_else(|| {
                AppError::ValidationError(format!(
                    "Column '{}' not found. Available columns: {}",
                    self.config.statement_column,
                    table.headers().join(", ")
                ))
            })?;

        let statements = table.column_values(column);
        let results = self.classifier.classify_all(&statements);
        let summary = ClassificationSummary::from_results(&self.dictionary, &results);

        let joined: Vec<String> = results
            .iter()
            .map(|r| r.joined_categories(&self.config.separator))
            .collect();
        table.append_column(&self.config.categories_column, joined)?;

        if let Some(single_column) = &self.config.single_label_column {
            let singles: Vec<String> = results
                .iter()
                .map(|r| r.primary_category().unwrap_or("").to_string())
                .collect();
            table.append_column(single_column, singles)?;
        }

        let processing_time_ms = start.elapsed().as_millis() as u64;
        info!(
            rows = summary.total_statements,
            matched = summary.matched_statements,
            assignments = summary.total_assignments,
            elapsed_ms = processing_time_ms,
            "Classified table"
        );

        Ok(ClassifiedTable {
            table,
            results,
            summary,
            delimiter,
            processing_time_ms,
        })
    }

    /// JSON report view over a finished run
    pub fn report<'a>(&'a self, classified: &'a ClassifiedTable) -> ClassificationReport<'a> {
        ClassificationReport::new(
            &self.config.statement_column,
            self.config.match_mode,
            &classified.summary,
            &classified.table,
            &classified.results,
        )
    }
}
