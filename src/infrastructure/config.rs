// ============================================================
// APPLICATION CONFIGURATION
// ============================================================
// Layered configuration: built-in defaults, then lexitag.toml, then
// LEXITAG_* environment variables. CLI flags override on top.

use crate::domain::classification::MatchMode;
use crate::domain::error::{AppError, Result};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "lexitag.toml";
pub const ENV_PREFIX: &str = "LEXITAG_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Header of the column holding the statements to classify
    pub statement_column: String,

    /// Header of the appended multi-label column
    pub categories_column: String,

    /// Optional appended column holding only the first matched
    /// category
    pub single_label_column: Option<String>,

    /// Separator between category names in the multi-label column
    pub separator: String,

    /// Keyword matching mode
    pub match_mode: MatchMode,

    /// Fixed CSV delimiter; unset means detect from the input
    pub delimiter: Option<char>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            statement_column: "Statement".to_string(),
            categories_column: "Categories".to_string(),
            single_label_column: None,
            separator: ";".to_string(),
            match_mode: MatchMode::default(),
            delimiter: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the default file location
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration, layering the given TOML file and the
    /// environment over the defaults
    pub fn load_from(config_file: &Path) -> Result<Self> {
        let config: AppConfig = Figment::from(Serialized::defaults(AppConfig::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()
            .map_err(|e| AppError::ValidationError(format!("Invalid configuration: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Check the configuration for internal contradictions
    pub fn validate(&self) -> Result<()> {
        if self.statement_column.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Statement column name must not be empty".to_string(),
            ));
        }
        if self.categories_column.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Categories column name must not be empty".to_string(),
            ));
        }
        if self.categories_column.to_lowercase() == self.statement_column.to_lowercase() {
            return Err(AppError::ValidationError(
                "Categories column must differ from the statement column".to_string(),
            ));
        }

        if let Some(single) = &self.single_label_column {
            if single.trim().is_empty() {
                return Err(AppError::ValidationError(
                    "Single-label column name must not be empty".to_string(),
                ));
            }
            let lowered = single.to_lowercase();
            if lowered == self.categories_column.to_lowercase()
                || lowered == self.statement_column.to_lowercase()
            {
                return Err(AppError::ValidationError(
                    "Single-label column must differ from the statement and categories columns"
                        .to_string(),
                ));
            }
        }

        if self.separator.is_empty() {
            return Err(AppError::ValidationError(
                "Category separator must not be empty".to_string(),
            ));
        }

        if let Some(delimiter) = self.delimiter {
            if !delimiter.is_ascii() {
                return Err(AppError::ValidationError(format!(
                    "CSV delimiter must be a single ASCII character, got '{}'",
                    delimiter
                )));
            }
        }

        Ok(())
    }

    /// Configured delimiter as a CSV reader byte, if fixed
    pub fn csv_delimiter(&self) -> Option<u8> {
        self.delimiter.map(|c| c as u8)
    }
}
