pub mod classification;
pub mod dictionary;
pub mod error;
pub mod table;
