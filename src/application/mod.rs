pub mod use_cases;

pub use use_cases::classifier::Classifier;
pub use use_cases::table_classifier::{ClassifiedTable, TableClassifier};
