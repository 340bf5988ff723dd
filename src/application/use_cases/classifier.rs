//! Statement Classifier
//!
//! Assigns dictionary categories to free-text statements using:
//! - Case-insensitive substring matching (default)
//! - Whole-word matching with word boundaries (opt-in)
//!
//! Keyword patterns are compiled once when the classifier is built, so
//! classifying a batch of statements does no per-row setup work.

use crate::domain::classification::{CategoryMatch, ClassificationResult, MatchMode};
use crate::domain::dictionary::Dictionary;
use crate::domain::error::{AppError, Result};
use regex::RegexBuilder;

/// A keyword prepared for repeated matching
#[derive(Debug, Clone)]
enum KeywordMatcher {
    /// Lowercased needle, matched against the lowercased statement
    Substring(String),
    /// Case-insensitive pattern wrapped in word boundaries
    WholeWord(regex::Regex),
}

impl KeywordMatcher {
    fn matches(&self, statement: &str, statement_lower: &str) -> bool {
        match self {
            KeywordMatcher::Substring(needle) => statement_lower.contains(needle),
            KeywordMatcher::WholeWord(pattern) => pattern.is_match(statement),
        }
    }
}

#[derive(Debug, Clone)]
struct CompiledKeyword {
    /// Original spelling, as entered in the dictionary
    original: String,
    matcher: KeywordMatcher,
}

#[derive(Debug, Clone)]
struct CompiledCategory {
    name: String,
    keywords: Vec<CompiledKeyword>,
}

/// Classifier for assigning dictionary categories to statements.
///
/// Categories are evaluated in dictionary order, so the same order
/// shows up in every result. A category is reported once per statement
/// no matter how many of its keywords hit.
#[derive(Debug)]
pub struct Classifier {
    categories: Vec<CompiledCategory>,
}

impl Classifier {
    /// Build a classifier from a dictionary, compiling every keyword
    pub fn new(dictionary: &Dictionary, mode: MatchMode) -> Result<Self> {
        let mut categories = Vec::with_capacity(dictionary.len());

        for category in dictionary.categories() {
            let mut keywords = Vec::with_capacity(category.keywords().len());
            for keyword in category.keywords() {
                keywords.push(CompiledKeyword {
                    original: keyword.clone(),
                    matcher: compile_keyword(keyword, mode)?,
                });
            }
            categories.push(CompiledCategory {
                name: category.name().to_string(),
                keywords,
            });
        }

        Ok(Self { categories })
    }

    /// Classify one statement, returning matched category names in
    /// dictionary order
    pub fn classify(&self, statement: &str) -> Vec<String> {
        let statement_lower = statement.to_lowercase();

        self.categories
            .iter()
            .filter(|category| {
                category
                    .keywords
                    .iter()
                    .any(|kw| kw.matcher.matches(statement, &statement_lower))
            })
            .map(|category| category.name.clone())
            .collect()
    }

    /// Classify one statement, keeping the keywords that fired per
    /// category (original spelling, dictionary order)
    pub fn classify_detailed(&self, statement: &str) -> Vec<CategoryMatch> {
        let statement_lower = statement.to_lowercase();
        let mut matches = Vec::new();

        for category in &self.categories {
            let hits: Vec<String> = category
                .keywords
                .iter()
                .filter(|kw| kw.matcher.matches(statement, &statement_lower))
                .map(|kw| kw.original.clone())
                .collect();

            if !hits.is_empty() {
                matches.push(CategoryMatch {
                    category: category.name.clone(),
                    keywords: hits,
                });
            }
        }

        matches
    }

    /// Classify a batch of statements.
    ///
    /// The output has exactly one result per input, in input order, so
    /// results can be zipped back onto table rows by position.
    pub fn classify_all(&self, statements: &[String]) -> Vec<ClassificationResult> {
        statements
            .iter()
            .enumerate()
            .map(|(index, statement)| ClassificationResult {
                index,
                statement: statement.clone(),
                matches: self.classify_detailed(statement),
            })
            .collect()
    }
}

fn compile_keyword(keyword: &str, mode: MatchMode) -> Result<KeywordMatcher> {
    match mode {
        MatchMode::Substring => Ok(KeywordMatcher::Substring(keyword.to_lowercase())),
        MatchMode::WholeWord => {
            let pattern = format!(r"\b{}\b", regex::escape(keyword));
            let regex = RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    AppError::Internal(format!(
                        "Failed to compile pattern for keyword '{}': {}",
                        keyword, e
                    ))
                })?;
            Ok(KeywordMatcher::WholeWord(regex))
        }
    }
}
