// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// CSV parsing, encoding detection, and CSV output

mod csv_parser;
mod csv_writer;

pub use csv_parser::{read_to_text, CsvParser};
pub use csv_writer::CsvWriter;
