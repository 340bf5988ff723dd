// ============================================================
// DICTIONARY DOMAIN TYPES
// ============================================================
// Categories, their keyword sets, and the editing operations
// offered to the driving application. No I/O at this layer.

use once_cell::sync::Lazy;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use super::error::{AppError, Result};

/// A named category with its keyword set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// Display name; unique key within a dictionary (case-insensitive)
    name: String,

    /// Keywords, trimmed and deduplicated case-insensitively.
    /// The first spelling wins; insertion order is retained for
    /// display and matched-keyword reporting.
    keywords: Vec<String>,
}

impl Category {
    /// Create a category, validating the name and every keyword
    pub fn new(name: &str, keywords: Vec<String>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::ValidationError(
                "Category name must not be empty".to_string(),
            ));
        }

        let mut category = Self {
            name: name.to_string(),
            keywords: Vec::new(),
        };
        for keyword in keywords {
            category.add_keyword(&keyword)?;
        }
        Ok(category)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn keyword_count(&self) -> usize {
        self.keywords.len()
    }

    /// Add a keyword after trimming. Returns false when the keyword is
    /// already present (case-insensitive); an empty keyword is a
    /// validation error, not a silent skip.
    pub fn add_keyword(&mut self, keyword: &str) -> Result<bool> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(AppError::ValidationError(format!(
                "Category '{}' contains an empty keyword",
                self.name
            )));
        }

        if self.contains_keyword(keyword) {
            return Ok(false);
        }

        self.keywords.push(keyword.to_string());
        Ok(true)
    }

    /// Remove a keyword (case-insensitive match on the trimmed input)
    pub fn remove_keyword(&mut self, keyword: &str) -> Result<()> {
        let target = keyword.trim().to_lowercase();
        let position = self
            .keywords
            .iter()
            .position(|kw| kw.to_lowercase() == target);

        match position {
            Some(index) => {
                self.keywords.remove(index);
                Ok(())
            }
            None => Err(AppError::NotFound(format!(
                "Keyword '{}' not found in category '{}'",
                keyword.trim(),
                self.name
            ))),
        }
    }

    /// Check keyword membership, case-insensitively
    pub fn contains_keyword(&self, keyword: &str) -> bool {
        let target = keyword.trim().to_lowercase();
        self.keywords.iter().any(|kw| kw.to_lowercase() == target)
    }
}

/// The full mapping of categories to keyword sets used for
/// classification.
///
/// Categories keep their insertion order; that order is the documented
/// reporting order for matched categories and the priority order for
/// single-label output. Names are unique case-insensitively, with the
/// original spelling preserved for display.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dictionary {
    categories: Vec<Category>,
}

impl Dictionary {
    /// Create an empty dictionary (valid: everything classifies to the
    /// empty set)
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dictionary from (name, keywords) pairs in order
    pub fn from_entries(entries: Vec<(String, Vec<String>)>) -> Result<Self> {
        let mut dictionary = Self::new();
        for (name, keywords) in entries {
            dictionary.add_category(&name, keywords)?;
        }
        Ok(dictionary)
    }

    /// The built-in starter dictionary shipped with the tool
    pub fn starter() -> Self {
        STARTER.clone()
    }

    /// Add a category at the end of the iteration order
    pub fn add_category(&mut self, name: &str, keywords: Vec<String>) -> Result<()> {
        let category = Category::new(name, keywords)?;
        if self.get(category.name()).is_some() {
            return Err(AppError::ValidationError(format!(
                "Duplicate category name: '{}'",
                category.name()
            )));
        }

        self.categories.push(category);
        Ok(())
    }

    /// Remove a category by name, returning it
    pub fn remove_category(&mut self, name: &str) -> Result<Category> {
        let target = name.trim().to_lowercase();
        let position = self
            .categories
            .iter()
            .position(|c| c.name().to_lowercase() == target);

        match position {
            Some(index) => Ok(self.categories.remove(index)),
            None => Err(AppError::NotFound(format!(
                "Category '{}' not found in dictionary",
                name.trim()
            ))),
        }
    }

    /// Add a keyword to an existing category. Returns false when the
    /// keyword was already present.
    pub fn add_keyword(&mut self, category: &str, keyword: &str) -> Result<bool> {
        match self.get_mut(category) {
            Some(entry) => entry.add_keyword(keyword),
            None => Err(AppError::NotFound(format!(
                "Category '{}' not found in dictionary",
                category.trim()
            ))),
        }
    }

    /// Remove a keyword from an existing category
    pub fn remove_keyword(&mut self, category: &str, keyword: &str) -> Result<()> {
        match self.get_mut(category) {
            Some(entry) => entry.remove_keyword(keyword),
            None => Err(AppError::NotFound(format!(
                "Category '{}' not found in dictionary",
                category.trim()
            ))),
        }
    }

    /// Look up a category by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&Category> {
        let target = name.trim().to_lowercase();
        self.categories
            .iter()
            .find(|c| c.name().to_lowercase() == target)
    }

    fn get_mut(&mut self, name: &str) -> Option<&mut Category> {
        let target = name.trim().to_lowercase();
        self.categories
            .iter_mut()
            .find(|c| c.name().to_lowercase() == target)
    }

    /// All categories in iteration (insertion) order
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in iteration order
    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total keyword count across all categories
    pub fn keyword_count(&self) -> usize {
        self.categories.iter().map(|c| c.keyword_count()).sum()
    }

    /// Reject category names that would not round-trip through a
    /// separator-joined output column
    pub fn validate_separator(&self, separator: &str) -> Result<()> {
        for category in &self.categories {
            if category.name().contains(separator) {
                return Err(AppError::ValidationError(format!(
                    "Category name '{}' contains the output separator '{}'",
                    category.name(),
                    separator
                )));
            }
        }
        Ok(())
    }
}

// Serialized as the JSON object the dictionary editor exchanges:
// {"name": ["keyword", ...], ...} with categories in iteration order.
impl Serialize for Dictionary {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(category.name(), category.keywords())?;
        }
        map.end()
    }
}

static STARTER: Lazy<Dictionary> = Lazy::new(|| {
    fn keywords(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    let mut dictionary = Dictionary::new();
    dictionary
        .add_category(
            "scarcity",
            keywords(&[
                "last chance",
                "last week",
                "limited time",
                "only a few",
                "before they're gone",
                "while stocks last",
            ]),
        )
        .unwrap();
    dictionary
        .add_category(
            "urgency",
            keywords(&[
                "today only",
                "now",
                "hurry",
                "right away",
                "don't wait",
                "immediately",
            ]),
        )
        .unwrap();
    dictionary
        .add_category(
            "social_proof",
            keywords(&[
                "popular",
                "bestseller",
                "customers love",
                "everyone",
                "most people",
                "thousands of",
            ]),
        )
        .unwrap();
    dictionary
        .add_category(
            "discount",
            keywords(&[
                "discount",
                "sale",
                "off",
                "% off",
                "save",
                "special offer",
                "deal",
            ]),
        )
        .unwrap();
    dictionary
});
