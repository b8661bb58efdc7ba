//! Book module - the grouping key for clippings

use std::fmt;

/// Identity of a book: its title plus an optional author
///
/// Kindle writes the first line of every block as `Title (Author)`. The
/// author is the final parenthesised group; a line that does not end in
/// one has no author.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BookKey {
    /// Book title
    pub title: String,

    /// Author as written by the device, if present
    pub author: Option<String>,
}

impl BookKey {
    /// Create a new book key
    pub fn new(title: impl Into<String>, author: Option<impl Into<String>>) -> Self {
        Self {
            title: title.into(),
            author: author.map(Into::into),
        }
    }

    /// Parse the title line of a clippings block
    ///
    /// # Examples
    ///
    /// ```
    /// use marginalia_domain::BookKey;
    ///
    /// let key = BookKey::from_title_line("Thinking, Fast and Slow (Kahneman, Daniel)");
    /// assert_eq!(key.title, "Thinking, Fast and Slow");
    /// assert_eq!(key.author.as_deref(), Some("Kahneman, Daniel"));
    ///
    /// let key = BookKey::from_title_line("Untitled Notes");
    /// assert_eq!(key.author, None);
    /// ```
    pub fn from_title_line(line: &str) -> Self {
        let line = line.trim_start_matches('\u{feff}').trim();

        match split_author(line) {
            Some((title, author)) => Self {
                title: title.to_string(),
                author: Some(author.to_string()),
            },
            None => Self {
                title: line.to_string(),
                author: None,
            },
        }
    }

    /// Render the key the way the device writes it
    pub fn title_line(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BookKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.author {
            Some(author) => write!(f, "{} ({})", self.title, author),
            None => f.write_str(&self.title),
        }
    }
}

/// Split `Title (Author)` into its parts, honouring nested parentheses
fn split_author(line: &str) -> Option<(&str, &str)> {
    if !line.ends_with(')') {
        return None;
    }

    let mut depth = 0usize;
    for (idx, ch) in line.char_indices().rev() {
        match ch {
            ')' => depth += 1,
            '(' => {
                depth -= 1;
                if depth == 0 {
                    let title = line[..idx].trim_end();
                    let author = line[idx + 1..line.len() - 1].trim();
                    if title.is_empty() || author.is_empty() {
                        return None;
                    }
                    return Some((title, author));
                }
            }
            _ => {}
        }
    }

    // Unbalanced parentheses
    None
}
