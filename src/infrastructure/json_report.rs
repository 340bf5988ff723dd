// ============================================================
// JSON REPORT
// ============================================================
// Structured export of a classification run: envelope with timestamp
// and summary, then one record per row. Row fields keep their column
// order, so serialization is hand-rolled instead of derived.

use crate::domain::classification::{CategoryMatch, ClassificationResult, ClassificationSummary, MatchMode};
use crate::domain::error::{AppError, Result};
use crate::domain::table::{Table, TableRow};
use chrono::{DateTime, Utc};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fs;
use std::path::Path;

/// JSON view of a finished classification run
pub struct ClassificationReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub statement_column: &'a str,
    pub match_mode: MatchMode,
    pub summary: &'a ClassificationSummary,
    pub table: &'a Table,
    pub results: &'a [ClassificationResult],
}

impl<'a> ClassificationReport<'a> {
    pub fn new(
        statement_column: &'a str,
        match_mode: MatchMode,
        summary: &'a ClassificationSummary,
        table: &'a Table,
        results: &'a [ClassificationResult],
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            statement_column,
            match_mode,
            summary,
            table,
            results,
        }
    }
}

impl Serialize for ClassificationReport<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut report = serializer.serialize_struct("ClassificationReport", 5)?;
        report.serialize_field("generated_at", &self.generated_at)?;
        report.serialize_field("statement_column", self.statement_column)?;
        report.serialize_field("match_mode", &self.match_mode)?;
        report.serialize_field("summary", self.summary)?;
        report.serialize_field(
            "records",
            &RecordsView {
                table: self.table,
                results: self.results,
            },
        )?;
        report.end()
    }
}

struct RecordsView<'a> {
    table: &'a Table,
    results: &'a [ClassificationResult],
}

impl Serialize for RecordsView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.table.rows().iter().zip(self.results).map(
            |(row, result)| RecordView {
                headers: self.table.headers(),
                row,
                result,
            },
        ))
    }
}

struct RecordView<'a> {
    headers: &'a [String],
    row: &'a TableRow,
    result: &'a ClassificationResult,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut record = serializer.serialize_struct("Record", 3)?;
        record.serialize_field(
            "row",
            &RowView {
                headers: self.headers,
                row: self.row,
            },
        )?;
        record.serialize_field("categories", &self.result.category_names())?;
        record.serialize_field("matched_keywords", &KeywordMapView(&self.result.matches))?;
        record.end()
    }
}

/// Row fields as a map in column order
struct RowView<'a> {
    headers: &'a [String],
    row: &'a TableRow,
}

impl Serialize for RowView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.headers.len()))?;
        for (header, cell) in self.headers.iter().zip(&self.row.cells) {
            map.serialize_entry(header, cell)?;
        }
        map.end()
    }
}

/// Matched keywords as a map in category order
struct KeywordMapView<'a>(&'a [CategoryMatch]);

impl Serialize for KeywordMapView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in self.0 {
            map.serialize_entry(&entry.category, &entry.keywords)?;
        }
        map.end()
    }
}

/// Render a report as pretty-printed JSON
pub fn render_report(report: &ClassificationReport) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AppError::Internal(format!("Failed to serialize report: {}", e)))
}

/// Write a report to a JSON file
pub fn write_report(report: &ClassificationReport, path: &Path) -> Result<()> {
    let json = render_report(report)?;
    fs::write(path, json + "\n").map_err(|e| {
        AppError::IoError(format!(
            "Failed to write report '{}': {}",
            path.display(),
            e
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_report_json() -> String {
        let mut table = Table::new(vec!["ID".to_string(), "Statement".to_string()]);
        table.push_row(vec!["1".to_string(), "invoice sent".to_string()]);
        table.push_row(vec!["2".to_string(), "nothing".to_string()]);
        table
            .append_column(
                "Categories",
                vec!["Finance".to_string(), String::new()],
            )
            .unwrap();

        let results = vec![
            ClassificationResult {
                index: 0,
                statement: "invoice sent".to_string(),
                matches: vec![CategoryMatch {
                    category: "Finance".to_string(),
                    keywords: vec!["invoice".to_string()],
                }],
            },
            ClassificationResult {
                index: 1,
                statement: "nothing".to_string(),
                matches: Vec::new(),
            },
        ];

        let dictionary = crate::domain::dictionary::Dictionary::from_entries(vec![(
            "Finance".to_string(),
            vec!["invoice".to_string()],
        )])
        .unwrap();
        let summary = ClassificationSummary::from_results(&dictionary, &results);

        let report = ClassificationReport::new(
            "Statement",
            MatchMode::Substring,
            &summary,
            &table,
            &results,
        );
        render_report(&report).unwrap()
    }

    #[test]
    fn test_report_structure() {
        let json = create_test_report_json();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["statement_column"], "Statement");
        assert_eq!(value["match_mode"], "substring");
        assert_eq!(value["summary"]["total_statements"], 2);
        assert_eq!(value["records"][0]["row"]["Statement"], "invoice sent");
        assert_eq!(value["records"][0]["row"]["Categories"], "Finance");
        assert_eq!(value["records"][0]["categories"][0], "Finance");
        assert_eq!(
            value["records"][0]["matched_keywords"]["Finance"][0],
            "invoice"
        );
        assert_eq!(value["records"][1]["categories"], serde_json::json!([]));
        assert!(value["generated_at"].as_str().is_some());
    }

    #[test]
    fn test_report_keeps_row_field_order() {
        let json = create_test_report_json();

        // Within the first record, fields appear in column order
        let record = &json[json.find("\"row\"").unwrap()..];
        let id_pos = record.find("\"ID\"").unwrap();
        let statement_pos = record.find("\"Statement\"").unwrap();
        let categories_pos = record.find("\"Categories\"").unwrap();
        assert!(id_pos < statement_pos);
        assert!(statement_pos < categories_pos);
    }
}
