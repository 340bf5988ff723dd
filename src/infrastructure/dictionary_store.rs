// ============================================================
// DICTIONARY STORE
// ============================================================
// Load and save dictionaries as JSON objects mapping category name to
// keyword list. The JSON document order is the dictionary order, so
// deserialization goes through a visitor instead of a HashMap.

use crate::domain::dictionary::Dictionary;
use crate::domain::error::{AppError, Result};
use serde::de::{MapAccess, Visitor};
use serde::Deserializer;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::info;

/// Raw (name, keywords) pairs in document order
struct DictionaryEntries(Vec<(String, Vec<String>)>);

impl<'de> serde::Deserialize<'de> for DictionaryEntries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = DictionaryEntries;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to keyword list")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::new();
                while let Some(name) = map.next_key::<String>()? {
                    // Name the offending category in shape errors
                    let keywords: Vec<String> = map.next_value().map_err(|e| {
                        serde::de::Error::custom(format!("category '{}': {}", name, e))
                    })?;
                    entries.push((name, keywords));
                }
                Ok(DictionaryEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Parse a dictionary from a JSON string, keeping document order
pub fn parse_dictionary(content: &str) -> Result<Dictionary> {
    let entries: DictionaryEntries = serde_json::from_str(content)
        .map_err(|e| AppError::ParseError(format!("Invalid dictionary JSON: {}", e)))?;
    Dictionary::from_entries(entries.0)
}

/// Load a dictionary from a JSON file
pub fn load_dictionary(path: &Path) -> Result<Dictionary> {
    let content = fs::read_to_string(path).map_err(|e| {
        AppError::IoError(format!(
            "Failed to read dictionary '{}': {}",
            path.display(),
            e
        ))
    })?;

    let dictionary = parse_dictionary(&content)?;
    info!(
        categories = dictionary.len(),
        keywords = dictionary.keyword_count(),
        "Loaded dictionary"
    );
    Ok(dictionary)
}

/// Render a dictionary as pretty-printed JSON, categories in order
pub fn to_json_string(dictionary: &Dictionary) -> Result<String> {
    serde_json::to_string_pretty(dictionary)
        .map_err(|e| AppError::Internal(format!("Failed to serialize dictionary: {}", e)))
}

/// Save a dictionary to a JSON file
pub fn save_dictionary(dictionary: &Dictionary, path: &Path) -> Result<()> {
    let json = to_json_string(dictionary)?;
    fs::write(path, json + "\n").map_err(|e| {
        AppError::IoError(format!(
            "Failed to write dictionary '{}': {}",
            path.display(),
            e
        ))
    })
}
