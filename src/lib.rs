//! Dictionary-based statement classification for CSV data.
//!
//! A dictionary maps category names to keyword lists. A statement is
//! assigned every category for which at least one keyword occurs in
//! the statement text; matching is case-insensitive and, by default,
//! plain substring containment (an opt-in whole-word mode is
//! available).
//!
//! Ordering contract: categories keep their dictionary insertion
//! order everywhere. Matched categories are reported in that order,
//! the multi-label output column joins them in that order, the
//! single-label column holds the first of them, and summary counts are
//! listed in that order. Classifying the same input with the same
//! dictionary always produces identical output.
//!
//! The classified table is the input table with the output columns
//! appended on the right; all other columns pass through untouched.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use application::use_cases::classifier::Classifier;
pub use application::use_cases::table_classifier::{ClassifiedTable, TableClassifier};
pub use domain::classification::{
    CategoryMatch, ClassificationResult, ClassificationSummary, MatchMode,
};
pub use domain::dictionary::{Category, Dictionary};
pub use domain::error::{AppError, Result};
pub use domain::table::Table;
pub use infrastructure::config::AppConfig;
