//! Core pipeline: parse, deduplicate, match

use crate::categories::CategoryExtractor;
use crate::config::ExtractorConfig;
use crate::dedup::Deduplicator;
use crate::error::ExtractorError;
use crate::matcher::NoteMatcher;
use crate::parser::ClippingParser;
use crate::types::{
    BookFilter, BookSummary, Diagnostics, PipelineMetadata, PipelineResult,
};
use marginalia_domain::{BookAnnotations, BookKey, ClippingKind, ClippingRecord};
use std::collections::{HashMap, HashSet};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Records of one book, split by kind
#[derive(Debug, Default)]
struct BookRecords {
    highlights: Vec<ClippingRecord>,
    notes: Vec<ClippingRecord>,
    bookmarks: Vec<ClippingRecord>,
}

/// Turns clippings text into annotated highlights grouped by book
pub struct Pipeline {
    config: ExtractorConfig,
}

impl Pipeline {
    /// Create a pipeline, validating the configuration
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        Ok(Self { config })
    }

    /// Get the active configuration
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Process every book in `text`
    pub fn run(&self, text: &str) -> Result<PipelineResult, ExtractorError> {
        self.run_filtered(text, &BookFilter::All)
    }

    /// Process the books of `text` selected by `filter`
    ///
    /// Diagnostics only cover blocks of the selected books.
    pub fn run_filtered(
        &self,
        text: &str,
        filter: &BookFilter,
    ) -> Result<PipelineResult, ExtractorError> {
        self.check_size(text)?;
        let started = Instant::now();

        info!("Processing clippings input of {} bytes", text.len());

        let mut diagnostics = Diagnostics::default();
        let mut metadata = PipelineMetadata::default();
        let mut order: Vec<BookKey> = Vec::new();
        let mut grouped: HashMap<BookKey, BookRecords> = HashMap::new();
        let mut selected: HashSet<usize> = HashSet::new();

        let parser = ClippingParser::new(&self.config);
        let mut records = parser.records(text);
        for parsed in records.by_ref() {
            let record = match parsed {
                Ok(record) => record,
                Err(malformed) => {
                    // Only blocks whose title line names a selected book
                    if filter.matches(&BookKey::from_title_line(&malformed.excerpt)) {
                        diagnostics.malformed.push(malformed);
                    }
                    continue;
                }
            };
            metadata.records_parsed += 1;

            if !filter.matches(&record.book) {
                continue;
            }
            metadata.records_selected += 1;
            selected.insert(record.ordinal);

            let entry = grouped.entry(record.book.clone()).or_insert_with(|| {
                order.push(record.book.clone());
                BookRecords::default()
            });
            match record.kind {
                ClippingKind::Highlight => entry.highlights.push(record),
                ClippingKind::Note => entry.notes.push(record),
                ClippingKind::Bookmark => entry.bookmarks.push(record),
            }
        }
        diagnostics.unparsable_dates = records
            .into_unparsable_dates()
            .into_iter()
            .filter(|d| selected.contains(&d.ordinal))
            .collect();

        if metadata.records_selected == 0 && *filter != BookFilter::All {
            warn!("No clippings matched the book filter {:?}", filter);
        }

        let mut books = Vec::with_capacity(order.len());
        for key in order {
            let Some(records) = grouped.remove(&key) else {
                continue;
            };
            let (annotations, book_diagnostics) = self.process_book(key, records);
            diagnostics.merge(book_diagnostics);
            books.push(annotations);
        }

        metadata.processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            "Processed {} book(s): {} highlight(s), {} note(s); {}",
            books.len(),
            books.iter().map(|b| b.highlights.len()).sum::<usize>(),
            books.iter().map(BookAnnotations::note_count).sum::<usize>(),
            diagnostics.summary()
        );

        Ok(PipelineResult {
            books,
            diagnostics,
            metadata,
        })
    }

    /// Count clippings per book, sorted by title then author
    pub fn list_books(&self, text: &str) -> Result<Vec<BookSummary>, ExtractorError> {
        self.check_size(text)?;

        let parser = ClippingParser::new(&self.config);
        let mut summaries: HashMap<BookKey, BookSummary> = HashMap::new();

        for record in parser.records(text).flatten() {
            let summary = summaries
                .entry(record.book.clone())
                .or_insert_with(|| BookSummary::new(record.book.clone()));
            match record.kind {
                ClippingKind::Highlight => summary.highlights += 1,
                ClippingKind::Note => summary.notes += 1,
                ClippingKind::Bookmark => summary.bookmarks += 1,
            }
        }

        let mut books: Vec<BookSummary> = summaries.into_values().collect();
        books.sort_by(|a, b| a.book.cmp(&b.book));
        Ok(books)
    }

    fn process_book(&self, book: BookKey, records: BookRecords) -> (BookAnnotations, Diagnostics) {
        let mut diagnostics = Diagnostics::default();

        let deduplicated = Deduplicator::new().deduplicate(records.highlights);
        diagnostics.duplicates_removed = deduplicated.removed.len();

        let matcher = NoteMatcher::new(CategoryExtractor::new(&self.config.shortcuts));
        let outcome = matcher.match_notes(deduplicated.kept, records.notes);

        if !outcome.unmatched.is_empty() {
            warn!(
                "{}: {} note(s) could not be matched to a highlight",
                book,
                outcome.unmatched.len()
            );
        }
        debug!(
            "{}: kept {} highlight(s), removed {} duplicate(s)",
            book,
            outcome.annotated.len(),
            diagnostics.duplicates_removed
        );
        diagnostics.unmatched_notes = outcome.unmatched;

        let mut annotations = BookAnnotations::new(book);
        annotations.highlights = outcome.annotated;
        annotations.bookmarks = records.bookmarks;

        (annotations, diagnostics)
    }

    fn check_size(&self, text: &str) -> Result<(), ExtractorError> {
        if text.len() > self.config.max_input_bytes {
            return Err(ExtractorError::InputTooLarge(
                text.len(),
                self.config.max_input_bytes,
            ));
        }
        Ok(())
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self {
            config: ExtractorConfig::default(),
        }
    }
}
