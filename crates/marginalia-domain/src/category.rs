//! Category module - hierarchical labels attached to notes

use std::fmt;

/// Separator between hierarchy levels in category markup
pub const HIERARCHY_SEPARATOR: char = '>';

/// A hierarchical category such as `Health > Diet`
///
/// The path always holds at least one non-empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Category {
    path: Vec<String>,
}

impl Category {
    /// Create a category from its path segments
    ///
    /// # Errors
    /// Returns error if the path is empty or a segment is blank
    pub fn new<I, S>(segments: I) -> Result<Self, String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let path: Vec<String> = segments.into_iter().map(Into::into).collect();

        if path.is_empty() {
            return Err("Category path cannot be empty".to_string());
        }
        if path.iter().any(|s| s.trim().is_empty()) {
            return Err("Category segments cannot be blank".to_string());
        }

        Ok(Self { path })
    }

    /// Path segments, root first
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Number of hierarchy levels
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Top-level segment
    pub fn root(&self) -> &str {
        &self.path[0]
    }

    /// Deepest segment
    pub fn leaf(&self) -> &str {
        &self.path[self.path.len() - 1]
    }

    /// Check if this category is an ancestor of another
    pub fn is_parent_of(&self, other: &Category) -> bool {
        other.path.len() > self.path.len() && other.path.starts_with(&self.path)
    }

    /// Render as note markup, e.g. `(Health>Diet)`
    pub fn to_marker(&self) -> String {
        format!("({})", self)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = HIERARCHY_SEPARATOR.to_string();
        f.write_str(&self.path.join(&sep))
    }
}
