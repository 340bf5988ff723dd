// ============================================================
// INFRASTRUCTURE LAYER
// ============================================================
// Configuration, file formats, and CSV plumbing

pub mod config;
pub mod csv;
pub mod dictionary_store;
pub mod json_report;
