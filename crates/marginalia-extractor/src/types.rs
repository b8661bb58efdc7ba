//! Result and diagnostic types for a pipeline run

use marginalia_domain::{BookAnnotations, BookKey, ClippingRecord};
use std::fmt;

/// A block that could not be turned into a clipping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MalformedRecord {
    /// Zero-based position of the block among non-empty blocks
    pub ordinal: usize,

    /// Why the block was rejected
    pub reason: String,

    /// First non-blank line of the block, for reporting
    pub excerpt: String,
}

/// A clipping whose `Added on` value matched none of the date formats
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnparsableDate {
    /// Zero-based position of the block among non-empty blocks
    pub ordinal: usize,

    /// The date text as written
    pub value: String,
}

/// Why a note could not be attached to a highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedReason {
    /// The book has no highlights at all
    NoHighlights,

    /// Every highlight of the book starts after the note
    PrecedesAllHighlights,
}

impl fmt::Display for UnmatchedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedReason::NoHighlights => f.write_str("book has no highlights"),
            UnmatchedReason::PrecedesAllHighlights => {
                f.write_str("note precedes every highlight")
            }
        }
    }
}

/// A note excluded from the output because no highlight matched it
#[derive(Debug, Clone, PartialEq)]
pub struct UnmatchedNote {
    /// The note as parsed
    pub record: ClippingRecord,

    /// Why matching failed
    pub reason: UnmatchedReason,
}

/// Recoverable anomalies collected during a run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    /// Blocks skipped because they could not be classified
    pub malformed: Vec<MalformedRecord>,

    /// Records kept with an unknown `added_at`
    pub unparsable_dates: Vec<UnparsableDate>,

    /// Notes with no highlight to attach to
    pub unmatched_notes: Vec<UnmatchedNote>,

    /// Highlight versions discarded by deduplication
    pub duplicates_removed: usize,
}

impl Diagnostics {
    /// Number of input items that do not appear in the output
    pub fn skipped_count(&self) -> usize {
        self.malformed.len() + self.unmatched_notes.len()
    }

    /// Check whether nothing noteworthy happened
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
            && self.unparsable_dates.is_empty()
            && self.unmatched_notes.is_empty()
    }

    /// One-line human summary, e.g. `1 malformed record skipped, 2 unmatched notes`
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if !self.malformed.is_empty() {
            parts.push(plural(self.malformed.len(), "malformed record", "skipped"));
        }
        if !self.unmatched_notes.is_empty() {
            parts.push(plural(self.unmatched_notes.len(), "unmatched note", "excluded"));
        }
        if !self.unparsable_dates.is_empty() {
            parts.push(plural(self.unparsable_dates.len(), "unreadable date", "ignored"));
        }
        if self.duplicates_removed > 0 {
            parts.push(plural(self.duplicates_removed, "duplicate highlight", "removed"));
        }
        if parts.is_empty() {
            "no issues".to_string()
        } else {
            parts.join(", ")
        }
    }

    pub(crate) fn merge(&mut self, other: Diagnostics) {
        self.malformed.extend(other.malformed);
        self.unparsable_dates.extend(other.unparsable_dates);
        self.unmatched_notes.extend(other.unmatched_notes);
        self.duplicates_removed += other.duplicates_removed;
    }
}

fn plural(count: usize, noun: &str, verb: &str) -> String {
    if count == 1 {
        format!("{} {} {}", count, noun, verb)
    } else {
        format!("{} {}s {}", count, noun, verb)
    }
}

/// Metadata about a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineMetadata {
    /// Valid records parsed from the input, before filtering
    pub records_parsed: usize,

    /// Records belonging to the selected books
    pub records_selected: usize,

    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Output of a pipeline run
#[derive(Debug, Clone, Default)]
pub struct PipelineResult {
    /// Books in order of first appearance in the input
    pub books: Vec<BookAnnotations>,

    /// Recoverable anomalies
    pub diagnostics: Diagnostics,

    /// Run metadata
    pub metadata: PipelineMetadata,
}

impl PipelineResult {
    /// Check whether no book produced any output
    pub fn is_empty(&self) -> bool {
        self.books.iter().all(BookAnnotations::is_empty)
    }

    /// Total number of highlights kept across all books
    pub fn highlight_count(&self) -> usize {
        self.books.iter().map(|b| b.highlights.len()).sum()
    }

    /// Total number of notes matched across all books
    pub fn note_count(&self) -> usize {
        self.books.iter().map(BookAnnotations::note_count).sum()
    }

    /// Look up the output for one book
    pub fn book(&self, key: &BookKey) -> Option<&BookAnnotations> {
        self.books.iter().find(|b| &b.book == key)
    }
}

/// Which books a run should keep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum BookFilter {
    /// Every book in the input
    #[default]
    All,

    /// Books whose title matches exactly (any author)
    Title(String),

    /// A single book identified by title and author
    Book(BookKey),
}

impl BookFilter {
    /// Check whether a book passes the filter
    pub fn matches(&self, book: &BookKey) -> bool {
        match self {
            BookFilter::All => true,
            BookFilter::Title(title) => &book.title == title,
            BookFilter::Book(key) => book == key,
        }
    }
}

/// Clipping counts for one book, before deduplication
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookSummary {
    /// Book identity
    pub book: BookKey,

    /// Highlight records
    pub highlights: usize,

    /// Note records
    pub notes: usize,

    /// Bookmark records
    pub bookmarks: usize,
}

impl BookSummary {
    pub(crate) fn new(book: BookKey) -> Self {
        Self {
            book,
            highlights: 0,
            notes: 0,
            bookmarks: 0,
        }
    }

    /// Total clippings for the book
    pub fn total(&self) -> usize {
        self.highlights + self.notes + self.bookmarks
    }
}
