//! Marginalia Extractor
//!
//! Turns a Kindle `My Clippings.txt` export into deduplicated highlights
//! with their notes attached and categorized.
//!
//! # Overview
//!
//! The export is a flat list of blocks separated by `==========` lines.
//! Re-highlighting a passage appends a new block instead of replacing the
//! old one, and notes are stored as separate blocks next to the highlight
//! they belong to. The extractor reverses both effects.
//!
//! # Architecture
//!
//! ```text
//! Text → Parser → Records → (per book) Deduplicator → Note Matcher → BookAnnotations
//!                                                       ↑
//!                                               Category Extractor
//! ```
//!
//! # Key Features
//!
//! - **Tolerant parsing**: irregular blank lines, BOMs, CRLF, page-only clippings
//! - **Version collapsing**: exact re-exports and extended re-highlights
//! - **Note matching**: containment first, then nearest preceding highlight
//! - **Categories**: leading `(Name>Sub)` markers with shortcut expansion
//! - **Diagnostics**: malformed blocks, unreadable dates and unmatched notes
//!   are reported, never fatal
//!
//! # Example Usage
//!
//! ```
//! use marginalia_extractor::{ExtractorConfig, Pipeline};
//!
//! let text = "\
//! Dune (Herbert, Frank)
//! - Your Highlight on Location 100-110 | Added on Monday, February 3, 2025 8:09:12 AM
//!
//! Fear is the mind-killer.
//! ==========
//! Dune (Herbert, Frank)
//! - Your Note on Location 110 | Added on Monday, February 3, 2025 8:10:00 AM
//!
//! (Mindset>Fear) repeat daily
//! ==========
//! ";
//!
//! let pipeline = Pipeline::new(ExtractorConfig::default()).unwrap();
//! let result = pipeline.run(text).unwrap();
//!
//! let book = &result.books[0];
//! assert_eq!(book.book.title, "Dune");
//! assert_eq!(book.highlights[0].notes[0].text, "repeat daily");
//! assert_eq!(book.highlights[0].notes[0].categories[0].path(), ["Mindset", "Fear"]);
//! assert!(result.diagnostics.is_clean());
//! ```

#![warn(missing_docs)]

mod categories;
mod config;
mod dedup;
mod error;
mod matcher;
mod parser;
mod pipeline;
mod types;

#[cfg(test)]
mod tests;

pub use categories::{CategorizedText, CategoryExtractor};
pub use config::{ExtractorConfig, ShortcutTable, UK_DATE_FORMAT, US_DATE_FORMAT};
pub use dedup::{Deduplicated, Deduplicator};
pub use error::ExtractorError;
pub use matcher::{MatchOutcome, NoteMatcher};
pub use parser::{ClippingParser, Records};
pub use pipeline::Pipeline;
pub use types::{
    BookFilter, BookSummary, Diagnostics, MalformedRecord, PipelineMetadata, PipelineResult,
    UnmatchedNote, UnmatchedReason, UnparsableDate,
};
