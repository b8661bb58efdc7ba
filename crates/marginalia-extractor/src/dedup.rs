//! Collapse re-exported and extended highlight versions

use marginalia_domain::{ClippingRecord, LocationRange};
use std::collections::HashMap;
use tracing::debug;

/// Outcome of deduplicating one book's highlights
#[derive(Debug, Clone, Default)]
pub struct Deduplicated {
    /// Surviving highlights ordered by location
    pub kept: Vec<ClippingRecord>,

    /// Discarded versions in file order
    pub removed: Vec<ClippingRecord>,
}

/// Keeps the most complete, most recent version of each highlight
///
/// - Identical ranges: the latest known `added_at` wins; a known date beats
///   an unknown one; otherwise the first version in the file wins.
/// - A range strictly inside another range is dropped in favour of the wider one.
/// - Ranges that overlap without containment are distinct highlights.
#[derive(Debug, Clone, Copy, Default)]
pub struct Deduplicator;

impl Deduplicator {
    /// Create a deduplicator
    pub fn new() -> Self {
        Self
    }

    /// Deduplicate the highlights of a single book
    ///
    /// Records that are not highlights, or lack a location, are passed
    /// through untouched.
    pub fn deduplicate(&self, highlights: Vec<ClippingRecord>) -> Deduplicated {
        let mut ordered = highlights;
        ordered.sort_by_key(|r| r.ordinal);

        let mut removed = Vec::new();
        let mut passthrough = Vec::new();
        let mut by_range: HashMap<LocationRange, ClippingRecord> = HashMap::new();
        let mut range_order: Vec<LocationRange> = Vec::new();

        for record in ordered {
            let range = match (record.is_highlight(), record.location) {
                (true, Some(range)) => range,
                _ => {
                    passthrough.push(record);
                    continue;
                }
            };

            match by_range.get_mut(&range) {
                Some(existing) => {
                    if record.added_at > existing.added_at {
                        debug!(
                            "Replacing highlight at {} (block {}) with newer block {}",
                            range, existing.ordinal, record.ordinal
                        );
                        removed.push(std::mem::replace(existing, record));
                    } else {
                        debug!(
                            "Dropping duplicate highlight at {} (block {})",
                            range, record.ordinal
                        );
                        removed.push(record);
                    }
                }
                None => {
                    range_order.push(range);
                    by_range.insert(range, record);
                }
            }
        }

        // Widest range first among equal starts, so a covering range is
        // always seen before anything it covers.
        range_order.sort_by(|a, b| a.start().cmp(&b.start()).then(b.end().cmp(&a.end())));

        let mut kept = Vec::with_capacity(range_order.len());
        let mut max_end: Option<u32> = None;

        for range in range_order {
            let Some(record) = by_range.remove(&range) else {
                continue;
            };

            if max_end.is_some_and(|end| end >= range.end()) {
                debug!(
                    "Dropping highlight at {} (block {}) covered by a wider version",
                    range, record.ordinal
                );
                removed.push(record);
                continue;
            }

            max_end = Some(range.end());
            kept.push(record);
        }

        kept.extend(passthrough);
        kept.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then(a.ordinal.cmp(&b.ordinal))
        });
        removed.sort_by_key(|r| r.ordinal);

        Deduplicated { kept, removed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use marginalia_domain::{AddedAt, BookKey, ClippingKind};

    fn highlight(start: u32, end: u32, ordinal: usize, text: &str) -> ClippingRecord {
        ClippingRecord {
            book: BookKey::new("Test Book", Some("Author A")),
            kind: ClippingKind::Highlight,
            location: Some(LocationRange::new(start, end)),
            location_text: LocationRange::new(start, end).to_string(),
            page: None,
            added_at: AddedAt::Unknown,
            text: text.to_string(),
            ordinal,
            raw: String::new(),
        }
    }

    fn dated(mut record: ClippingRecord, y: i32, m: u32, d: u32) -> ClippingRecord {
        let ts = NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        record.added_at = AddedAt::Known(ts);
        record
    }

    fn texts(records: &[ClippingRecord]) -> Vec<&str> {
        records.iter().map(|r| r.text.as_str()).collect()
    }

    #[test]
    fn test_no_duplicates() {
        let result = Deduplicator::new().deduplicate(vec![
            highlight(200, 210, 0, "b"),
            highlight(100, 110, 1, "a"),
        ]);
        assert_eq!(texts(&result.kept), ["a", "b"]);
        assert!(result.removed.is_empty());
    }

    #[test]
    fn test_exact_duplicate_prefers_known_date() {
        let result = Deduplicator::new().deduplicate(vec![
            dated(highlight(10, 20, 0, "known"), 2024, 1, 1),
            highlight(10, 20, 1, "unknown"),
        ]);
        assert_eq!(texts(&result.kept), ["known"]);
        assert_eq!(texts(&result.removed), ["unknown"]);

        let result = Deduplicator::new().deduplicate(vec![
            highlight(10, 20, 0, "unknown"),
            dated(highlight(10, 20, 1, "known"), 2024, 1, 1),
        ]);
        assert_eq!(texts(&result.kept), ["known"]);
    }

    #[test]
    fn test_exact_duplicate_prefers_most_recent() {
        let result = Deduplicator::new().deduplicate(vec![
            dated(highlight(10, 20, 0, "new"), 2024, 6, 1),
            dated(highlight(10, 20, 1, "old"), 2023, 6, 1),
            dated(highlight(10, 20, 2, "mid"), 2024, 1, 1),
        ]);
        assert_eq!(texts(&result.kept), ["new"]);
        assert_eq!(texts(&result.removed), ["old", "mid"]);
    }

    #[test]
    fn test_exact_duplicate_both_unknown_keeps_first_seen() {
        let result = Deduplicator::new().deduplicate(vec![
            highlight(10, 20, 0, "first"),
            highlight(10, 20, 1, "second"),
        ]);
        assert_eq!(texts(&result.kept), ["first"]);
    }

    #[test]
    fn test_superset_replaces_subset() {
        let result = Deduplicator::new().deduplicate(vec![
            dated(highlight(100, 110, 0, "short"), 2024, 6, 1),
            highlight(100, 120, 1, "extended"),
            highlight(105, 108, 2, "inner"),
        ]);
        assert_eq!(texts(&result.kept), ["extended"]);
        assert_eq!(texts(&result.removed), ["short", "inner"]);
    }

    #[test]
    fn test_partial_overlap_keeps_both() {
        let result = Deduplicator::new().deduplicate(vec![
            highlight(100, 110, 0, "a"),
            highlight(105, 115, 1, "b"),
        ]);
        assert_eq!(texts(&result.kept), ["a", "b"]);
    }

    #[test]
    fn test_adjacent_ranges_are_distinct() {
        let result = Deduplicator::new().deduplicate(vec![
            highlight(100, 110, 0, "a"),
            highlight(110, 115, 1, "b"),
            highlight(115, 120, 2, "c"),
        ]);
        assert_eq!(texts(&result.kept), ["a", "b", "c"]);
    }

    #[test]
    fn test_covering_range_with_later_start_order() {
        // [100,130] covers [110,120] even though [105,125] sits between them
        let result = Deduplicator::new().deduplicate(vec![
            highlight(110, 120, 0, "inner"),
            highlight(105, 125, 1, "middle"),
            highlight(100, 130, 2, "outer"),
        ]);
        assert_eq!(texts(&result.kept), ["outer"]);
    }

    #[test]
    fn test_non_highlights_pass_through() {
        let mut note = highlight(105, 105, 1, "note");
        note.kind = ClippingKind::Note;

        let result = Deduplicator::new().deduplicate(vec![highlight(100, 110, 0, "a"), note]);
        assert_eq!(texts(&result.kept), ["a", "note"]);
    }

    #[test]
    fn test_empty_input() {
        let result = Deduplicator::new().deduplicate(Vec::new());
        assert!(result.kept.is_empty());
        assert!(result.removed.is_empty());
    }
}
