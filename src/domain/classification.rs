// ============================================================
// CLASSIFICATION DOMAIN TYPES
// ============================================================
// Results of classifying statements against a dictionary, plus
// the summary reported after a batch run

use serde::{Deserialize, Serialize};

use super::dictionary::Dictionary;

/// How keywords are matched against a statement
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Case-insensitive substring containment (the default contract)
    #[default]
    Substring,

    /// Keyword must appear between word boundaries, case-insensitive
    WholeWord,
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "substring" | "contains" => Ok(MatchMode::Substring),
            "whole-word" | "whole_word" | "word" => Ok(MatchMode::WholeWord),
            _ => Err(format!(
                "Unknown match mode: {}. Use substring or whole-word",
                s
            )),
        }
    }
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchMode::Substring => write!(f, "substring"),
            MatchMode::WholeWord => write!(f, "whole-word"),
        }
    }
}

/// One matched category with the keywords found in the statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryMatch {
    /// Category name as spelled in the dictionary
    pub category: String,

    /// Keywords of this category found in the statement, in keyword
    /// order (original spelling, not the statement's casing)
    pub keywords: Vec<String>,
}

/// A statement paired with its matched categories.
///
/// Matches are reported in dictionary iteration order; a statement may
/// match zero, one, or many categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Position of the statement in the input sequence (0-based)
    pub index: usize,

    /// The statement text as read from the input
    pub statement: String,

    /// Matched categories in dictionary order
    pub matches: Vec<CategoryMatch>,
}

impl ClassificationResult {
    /// Names of the matched categories, in dictionary order
    pub fn category_names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.category.as_str()).collect()
    }

    /// First matched category in dictionary order (the single-label
    /// output), if any
    pub fn primary_category(&self) -> Option<&str> {
        self.matches.first().map(|m| m.category.as_str())
    }

    pub fn is_matched(&self) -> bool {
        !self.matches.is_empty()
    }

    /// Matched category names joined for the output column
    pub fn joined_categories(&self, separator: &str) -> String {
        self.category_names().join(separator)
    }
}

/// Per-category assignment count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

/// Aggregate numbers for a batch run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationSummary {
    /// Number of statements classified
    pub total_statements: usize,

    /// Statements with at least one matched category
    pub matched_statements: usize,

    /// Total category assignments across all statements
    pub total_assignments: usize,

    /// Assignment count per category, in dictionary order.
    /// Categories with zero matches are included.
    pub category_counts: Vec<CategoryCount>,
}

impl ClassificationSummary {
    /// Build the summary for a batch of results.
    ///
    /// The dictionary supplies the category order so that the
    /// distribution is deterministic even for categories that never
    /// matched.
    pub fn from_results(dictionary: &Dictionary, results: &[ClassificationResult]) -> Self {
        let mut category_counts: Vec<CategoryCount> = dictionary
            .categories()
            .iter()
            .map(|c| CategoryCount {
                category: c.name().to_string(),
                count: 0,
            })
            .collect();

        let mut matched_statements = 0;
        let mut total_assignments = 0;

        for result in results {
            if result.is_matched() {
                matched_statements += 1;
            }
            for matched in &result.matches {
                total_assignments += 1;
                if let Some(entry) = category_counts
                    .iter_mut()
                    .find(|c| c.category == matched.category)
                {
                    entry.count += 1;
                }
            }
        }

        Self {
            total_statements: results.len(),
            matched_statements,
            total_assignments,
            category_counts,
        }
    }
}

impl std::fmt::Display for ClassificationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Statements:        {}", self.total_statements)?;
        writeln!(f, "With matches:      {}", self.matched_statements)?;
        writeln!(f, "Total assignments: {}", self.total_assignments)?;

        if !self.category_counts.is_empty() {
            writeln!(f, "Category distribution:")?;
            let width = self
                .category_counts
                .iter()
                .map(|c| c.category.len())
                .max()
                .unwrap_or(0);
            for entry in &self.category_counts {
                writeln!(f, "  {:<width$}  {}", entry.category, entry.count)?;
            }
        }
        Ok(())
    }
}
