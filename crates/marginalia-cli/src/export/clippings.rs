//! Re-emit kept records in the device's own block format

use super::Exporter;
use marginalia_domain::ClippingRecord;
use marginalia_extractor::PipelineResult;

const SEPARATOR: &str = "==========";

/// Writes a cleaned `My Clippings.txt`: surviving highlights, their notes
/// and bookmarks, in file order within each book.
pub struct ClippingsExporter;

impl Exporter for ClippingsExporter {
    fn render(&self, result: &PipelineResult) -> String {
        let mut out = String::new();

        for book in &result.books {
            let mut records: Vec<&ClippingRecord> = book
                .highlights
                .iter()
                .flat_map(|h| {
                    std::iter::once(&h.highlight).chain(h.notes.iter().map(|n| &n.record))
                })
                .chain(book.bookmarks.iter())
                .collect();
            records.sort_by_key(|r| r.ordinal);

            for record in records {
                out.push_str(&record.raw);
                out.push('\n');
                out.push_str(SEPARATOR);
                out.push('\n');
            }
        }

        out
    }
}
