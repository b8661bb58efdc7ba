//! Category markup extraction from note text

use crate::config::ShortcutTable;
use marginalia_domain::category::HIERARCHY_SEPARATOR;
use marginalia_domain::Category;

/// Separator between alternative categories inside one marker: `(P,F)`
pub const ALTERNATIVE_SEPARATOR: char = ',';

/// Note text split into its categories and the remaining prose
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorizedText {
    /// Categories in order of appearance
    pub categories: Vec<Category>,

    /// Text after the last leading marker, trimmed
    pub text: String,
}

/// Reads leading `(Name>Sub)` markers off note text
///
/// Only markers at the very start of the note count; a parenthesis later
/// in the prose is ordinary text.
pub struct CategoryExtractor<'a> {
    shortcuts: &'a ShortcutTable,
}

impl<'a> CategoryExtractor<'a> {
    /// Create an extractor expanding codes from `shortcuts`
    pub fn new(shortcuts: &'a ShortcutTable) -> Self {
        Self { shortcuts }
    }

    /// Split note text into categories and cleaned text
    pub fn extract(&self, note: &str) -> CategorizedText {
        let mut categories = Vec::new();
        let mut rest = note.trim_start();

        while let Some((parsed, remainder)) = self.take_marker(rest) {
            categories.extend(parsed);
            rest = remainder.trim_start();
        }

        CategorizedText {
            categories,
            text: rest.trim().to_string(),
        }
    }

    /// Parse one marker at the start of `input`
    fn take_marker<'t>(&self, input: &'t str) -> Option<(Vec<Category>, &'t str)> {
        let body = input.strip_prefix('(')?;
        let close = body.find(')')?;
        let token = &body[..close];

        if token.contains('(') {
            return None;
        }

        let categories: Vec<Category> = token
            .split(ALTERNATIVE_SEPARATOR)
            .filter_map(|alt| self.parse_path(alt))
            .collect();

        if categories.is_empty() {
            return None;
        }

        Some((categories, &body[close + 1..]))
    }

    fn parse_path(&self, token: &str) -> Option<Category> {
        let segments: Vec<&str> = token
            .split(HIERARCHY_SEPARATOR)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| self.shortcuts.expand(s))
            .collect();

        Category::new(segments).ok()
    }
}
