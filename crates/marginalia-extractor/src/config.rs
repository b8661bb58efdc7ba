//! Configuration for the Extractor

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// US English export: `Monday, February 3, 2025 8:09:12 AM`
pub const US_DATE_FORMAT: &str = "%A, %B %d, %Y %I:%M:%S %p";

/// UK English export: `Monday, 3 February 2025 08:09:12`
pub const UK_DATE_FORMAT: &str = "%A, %d %B %Y %H:%M:%S";

/// Lookup table from shortcut codes to full category names
///
/// Lookups are case-sensitive exact matches. Codes missing from the table
/// are kept verbatim by the category extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortcutTable(BTreeMap<String, String>);

impl ShortcutTable {
    /// Create a table with no shortcuts
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Expand a code, returning it unchanged when it is not a shortcut
    pub fn expand<'a>(&'a self, code: &'a str) -> &'a str {
        self.0.get(code).map(String::as_str).unwrap_or(code)
    }

    /// Add or replace a shortcut
    pub fn insert(&mut self, code: impl Into<String>, name: impl Into<String>) {
        self.0.insert(code.into(), name.into());
    }

    /// Builder-style variant of [`insert`](Self::insert)
    pub fn with(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.insert(code, name);
        self
    }

    /// Merge another set of shortcuts over this one
    pub fn extend<I, K, V>(&mut self, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (code, name) in entries {
            self.insert(code, name);
        }
    }

    /// Number of shortcuts
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check whether the table has no shortcuts
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(code, name)` pairs in code order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl Default for ShortcutTable {
    /// Nutrition shortcuts in Ukrainian and English
    fn default() -> Self {
        Self::empty()
            .with("Б", "Білки")
            .with("Ж", "Жири")
            .with("В", "Вуглеводи")
            .with("К", "Клітчатка")
            .with("М", "Мікроелементи та вітаміни")
            .with("А", "водА")
            .with("P", "Protein")
            .with("F", "Fat")
            .with("C", "Carbohydrates")
            .with("N", "Notes and Thoughts")
            .with("FIB", "Fiber")
            .with("MIC", "Micronutrients and Vitamins")
            .with("W", "Water")
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// chrono format strings tried in order for `Added on` dates
    #[serde(default = "default_date_formats")]
    pub date_formats: Vec<String>,

    /// Minimum run of `=` characters that counts as a record separator
    #[serde(default = "default_min_separator_len")]
    pub min_separator_len: usize,

    /// Maximum accepted input size (bytes)
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: usize,

    /// Shortcut codes expanded inside category markers
    #[serde(default)]
    pub shortcuts: ShortcutTable,
}

impl ExtractorConfig {
    /// Parse a date string with the first matching configured format
    pub fn parse_date(&self, value: &str) -> Option<NaiveDateTime> {
        let value = value.trim();
        self.date_formats
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.date_formats.is_empty() {
            return Err("date_formats must not be empty".to_string());
        }
        if self.min_separator_len == 0 {
            return Err("min_separator_len must be greater than 0".to_string());
        }
        if self.max_input_bytes == 0 {
            return Err("max_input_bytes must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            date_formats: default_date_formats(),
            min_separator_len: default_min_separator_len(),
            max_input_bytes: default_max_input_bytes(),
            shortcuts: ShortcutTable::default(),
        }
    }
}

fn default_date_formats() -> Vec<String> {
    vec![US_DATE_FORMAT.to_string(), UK_DATE_FORMAT.to_string()]
}

fn default_min_separator_len() -> usize {
    10
}

fn default_max_input_bytes() -> usize {
    256 * 1024 * 1024
}
