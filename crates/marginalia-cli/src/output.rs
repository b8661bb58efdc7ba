//! Output formatting for the CLI.

use crate::error::Result;
use colored::*;
use marginalia_extractor::{BookSummary, Diagnostics, PipelineResult};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Longest excerpt shown for a skipped item
const EXCERPT_CHARS: usize = 60;

/// Output formatter.
pub struct Formatter {
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(color_enabled: bool) -> Self {
        Self { color_enabled }
    }

    /// Format the book list.
    pub fn format_books(&self, books: &[BookSummary], json: bool) -> Result<String> {
        if json {
            self.format_books_json(books)
        } else {
            Ok(self.format_books_table(books))
        }
    }

    fn format_books_json(&self, books: &[BookSummary]) -> Result<String> {
        let json_books: Vec<serde_json::Value> = books
            .iter()
            .map(|b| {
                serde_json::json!({
                    "title": b.book.title,
                    "author": b.book.author,
                    "highlights": b.highlights,
                    "notes": b.notes,
                    "bookmarks": b.bookmarks,
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&json_books)?)
    }

    fn format_books_table(&self, books: &[BookSummary]) -> String {
        if books.is_empty() {
            return self.colorize("No books found.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["#", "Title", "Author", "Highlights", "Notes", "Bookmarks"]);

        for (idx, book) in books.iter().enumerate() {
            builder.push_record([
                (idx + 1).to_string(),
                book.book.title.clone(),
                book.book.author.clone().unwrap_or_default(),
                book.highlights.to_string(),
                book.notes.to_string(),
                book.bookmarks.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Summary line for a finished export.
    pub fn export_summary(&self, result: &PipelineResult) -> String {
        let msg = format!(
            "Exported {} highlight(s) and {} note(s) from {} book(s)",
            result.highlight_count(),
            result.note_count(),
            result.books.len()
        );
        if result.diagnostics.is_clean() && result.diagnostics.duplicates_removed == 0 {
            self.success(&msg)
        } else {
            self.success(&format!("{} ({})", msg, result.diagnostics.summary()))
        }
    }

    /// One line per skipped or degraded item.
    pub fn diagnostics_report(&self, diagnostics: &Diagnostics) -> Vec<String> {
        let mut lines = Vec::new();
        for malformed in &diagnostics.malformed {
            lines.push(self.warning(&format!(
                "Skipped block #{}: {} [{}]",
                malformed.ordinal,
                malformed.reason,
                excerpt(&malformed.excerpt)
            )));
        }
        for date in &diagnostics.unparsable_dates {
            lines.push(self.warning(&format!(
                "Block #{}: unreadable date '{}'",
                date.ordinal, date.value
            )));
        }
        for note in &diagnostics.unmatched_notes {
            lines.push(self.warning(&format!(
                "Unmatched note in {} at {}: {} [{}]",
                note.record.book,
                note.record.location_text,
                note.reason,
                excerpt(&note.record.text)
            )));
        }
        lines
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

/// First line of `text`, shortened for display
fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim();
    if line.chars().count() > EXCERPT_CHARS {
        let cut: String = line.chars().take(EXCERPT_CHARS).collect();
        format!("{}…", cut)
    } else {
        line.to_string()
    }
}
