pub mod classifier;
pub mod table_classifier;
