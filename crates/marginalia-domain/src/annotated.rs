//! Annotated output model consumed by formatters

use crate::book::BookKey;
use crate::category::Category;
use crate::record::ClippingRecord;

/// A note with its category markup extracted
#[derive(Debug, Clone, PartialEq)]
pub struct CategorizedNote {
    /// The note as parsed
    pub record: ClippingRecord,

    /// Categories from the leading markers, in order of appearance
    pub categories: Vec<Category>,

    /// Note text with the leading markers removed
    pub text: String,
}

impl CategorizedNote {
    /// Check whether the note carries any category
    pub fn is_categorized(&self) -> bool {
        !self.categories.is_empty()
    }
}

/// A deduplicated highlight together with the notes that annotate it
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotatedHighlight {
    /// Book shared by the highlight and all its notes
    pub book: BookKey,

    /// The surviving highlight version
    pub highlight: ClippingRecord,

    /// Matched notes in file order
    pub notes: Vec<CategorizedNote>,
}

impl AnnotatedHighlight {
    /// Create an annotated highlight with no notes yet
    pub fn new(highlight: ClippingRecord) -> Self {
        Self {
            book: highlight.book.clone(),
            highlight,
            notes: Vec::new(),
        }
    }

    /// Check whether any note was matched
    pub fn has_notes(&self) -> bool {
        !self.notes.is_empty()
    }

    /// Iterate over every category carried by the attached notes
    pub fn categories(&self) -> impl Iterator<Item = &Category> {
        self.notes.iter().flat_map(|n| n.categories.iter())
    }
}

/// Everything the pipeline kept for one book
#[derive(Debug, Clone, PartialEq)]
pub struct BookAnnotations {
    /// Book identity
    pub book: BookKey,

    /// Highlights ordered by location
    pub highlights: Vec<AnnotatedHighlight>,

    /// Bookmarks in file order
    pub bookmarks: Vec<ClippingRecord>,
}

impl BookAnnotations {
    /// Create an empty entry for a book
    pub fn new(book: BookKey) -> Self {
        Self {
            book,
            highlights: Vec::new(),
            bookmarks: Vec::new(),
        }
    }

    /// Total number of notes matched across all highlights
    pub fn note_count(&self) -> usize {
        self.highlights.iter().map(|h| h.notes.len()).sum()
    }

    /// Check whether nothing was kept for this book
    pub fn is_empty(&self) -> bool {
        self.highlights.is_empty() && self.bookmarks.is_empty()
    }
}
