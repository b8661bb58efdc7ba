//! End-to-end tests for the Pipeline

#[cfg(test)]
mod tests {
    use crate::{BookFilter, ExtractorConfig, ExtractorError, Pipeline, ShortcutTable, UnmatchedReason};
    use chrono::NaiveDate;
    use marginalia_domain::{AddedAt, BookKey, LocationRange};

    fn block(title: &str, kind: &str, location: &str, date: &str, body: &str) -> String {
        format!(
            "{}\n- Your {} on Location {} | Added on {}\n\n{}\n==========\n",
            title, kind, location, date, body
        )
    }

    const DATE: &str = "Monday, February 3, 2025 8:09:12 AM";

    fn pipeline() -> Pipeline {
        Pipeline::new(ExtractorConfig::default()).unwrap()
    }

    #[test]
    fn test_highlight_with_categorized_note() {
        let text = [
            block("Nutrition (Doe, Jane)", "Highlight", "100-110", DATE, "Highlight text"),
            block("Nutrition (Doe, Jane)", "Note", "110", DATE, "(P) protein intake"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();

        assert_eq!(result.books.len(), 1);
        let book = &result.books[0];
        assert_eq!(book.highlights.len(), 1);

        let annotated = &book.highlights[0];
        assert_eq!(annotated.highlight.text, "Highlight text");
        assert_eq!(annotated.notes.len(), 1);
        assert_eq!(annotated.notes[0].categories[0].path(), ["Protein"]);
        assert_eq!(annotated.notes[0].text, "protein intake");
        assert!(result.diagnostics.is_clean());
    }

    #[test]
    fn test_known_date_beats_unknown_for_identical_range() {
        let text = [
            block("Book", "Highlight", "10-20", "not a date", "unknown version"),
            block("Book", "Highlight", "10-20", "Monday, January 1, 2024 9:00:00 AM", "dated version"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();
        let highlights = &result.books[0].highlights;

        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].highlight.text, "dated version");
        let expected = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(highlights[0].highlight.added_at, AddedAt::Known(expected));
        assert_eq!(result.diagnostics.duplicates_removed, 1);
        assert_eq!(result.diagnostics.unparsable_dates.len(), 1);
    }

    #[test]
    fn test_note_preceding_all_highlights_is_unmatched() {
        let text = [
            block("Book", "Note", "50", DATE, "too early"),
            block("Book", "Highlight", "100-110", DATE, "passage"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();

        assert_eq!(result.note_count(), 0);
        assert_eq!(result.diagnostics.unmatched_notes.len(), 1);
        let unmatched = &result.diagnostics.unmatched_notes[0];
        assert_eq!(unmatched.record.text, "too early");
        assert_eq!(unmatched.reason, UnmatchedReason::PrecedesAllHighlights);
    }

    #[test]
    fn test_unknown_kind_skipped_without_failure() {
        let valid = [
            block("Book", "Highlight", "100-110", DATE, "one"),
            block("Book", "Highlight", "200-210", DATE, "two"),
        ];
        let baseline = pipeline().run(&valid.concat()).unwrap();

        let with_bad = [
            valid[0].clone(),
            block("Book", "Scribble", "150", DATE, "???"),
            valid[1].clone(),
        ]
        .concat();
        let result = pipeline().run(&with_bad).unwrap();

        assert_eq!(result.metadata.records_parsed, baseline.metadata.records_parsed);
        assert_eq!(result.highlight_count(), 2);
        assert_eq!(result.diagnostics.malformed.len(), 1);
        assert!(result.diagnostics.malformed[0].reason.contains("Scribble"));
    }

    #[test]
    fn test_note_conservation_across_books() {
        let text = [
            block("A", "Highlight", "10-20", DATE, "a1"),
            block("B", "Note", "5", DATE, "b orphan"),
            block("A", "Note", "15", DATE, "a note"),
            block("A", "Note", "1", DATE, "a early"),
            block("B", "Highlight", "30-40", DATE, "b1"),
            block("C", "Note", "7", DATE, "c orphan"),
            block("B", "Note", "45", DATE, "b after"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();

        let matched = result.note_count();
        let unmatched = result.diagnostics.unmatched_notes.len();
        assert_eq!(matched + unmatched, 5);
        assert_eq!(matched, 2);

        let reasons: Vec<UnmatchedReason> = result
            .diagnostics
            .unmatched_notes
            .iter()
            .map(|n| n.reason)
            .collect();
        assert!(reasons.contains(&UnmatchedReason::NoHighlights));
    }

    #[test]
    fn test_books_in_first_appearance_order() {
        let text = [
            block("Zeta", "Highlight", "1-2", DATE, "z"),
            block("Alpha", "Highlight", "1-2", DATE, "a"),
            block("Zeta", "Highlight", "5-6", DATE, "z2"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();
        let titles: Vec<&str> = result.books.iter().map(|b| b.book.title.as_str()).collect();
        assert_eq!(titles, ["Zeta", "Alpha"]);
    }

    #[test]
    fn test_same_title_different_author_are_separate_books() {
        let text = [
            block("Essays (Montaigne)", "Highlight", "1-2", DATE, "m"),
            block("Essays (Bacon)", "Highlight", "1-2", DATE, "b"),
            block("Essays", "Highlight", "1-2", DATE, "anonymous"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();
        assert_eq!(result.books.len(), 3);
        assert_eq!(result.diagnostics.duplicates_removed, 0);
    }

    #[test]
    fn test_extended_rehighlight_collapses() {
        let text = [
            block("Book", "Highlight", "100-105", DATE, "short"),
            block("Book", "Highlight", "100-112", DATE, "short and longer"),
            block("Book", "Note", "112", DATE, "on the long one"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();
        let highlights = &result.books[0].highlights;
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].highlight.location, Some(LocationRange::new(100, 112)));
        assert_eq!(highlights[0].notes[0].text, "on the long one");
    }

    #[test]
    fn test_bookmarks_are_kept_separately() {
        let text = [
            block("Book", "Highlight", "1-2", DATE, "h"),
            "Book\n- Your Bookmark on Location 40 | Added on Monday, February 3, 2025 8:09:12 AM\n\n\n\n==========\n".to_string(),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();
        assert_eq!(result.books[0].bookmarks.len(), 1);
        assert_eq!(result.highlight_count(), 1);
    }

    #[test]
    fn test_filter_by_title() {
        let text = [
            block("A", "Highlight", "1-2", DATE, "a"),
            block("B", "Highlight", "1-2", DATE, "b"),
        ]
        .concat();

        let result = pipeline()
            .run_filtered(&text, &BookFilter::Title("B".to_string()))
            .unwrap();
        assert_eq!(result.books.len(), 1);
        assert_eq!(result.books[0].book, BookKey::new("B", None::<String>));
        assert_eq!(result.metadata.records_parsed, 2);
        assert_eq!(result.metadata.records_selected, 1);
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let result = pipeline().run("").unwrap();
        assert!(result.books.is_empty());
        assert!(result.is_empty());
        assert!(result.diagnostics.is_clean());
    }

    #[test]
    fn test_input_size_limit() {
        let mut config = ExtractorConfig::default();
        config.max_input_bytes = 10;
        let pipeline = Pipeline::new(config).unwrap();

        let result = pipeline.run("this input is longer than ten bytes");
        assert!(matches!(result, Err(ExtractorError::InputTooLarge(_, 10))));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ExtractorConfig::default();
        config.date_formats.clear();
        assert!(matches!(Pipeline::new(config), Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_custom_shortcuts() {
        let mut config = ExtractorConfig::default();
        config.shortcuts = ShortcutTable::empty().with("S", "Sleep");
        let text = [
            block("Book", "Highlight", "1-9", DATE, "h"),
            block("Book", "Note", "9", DATE, "(S>P) nap"),
        ]
        .concat();

        let result = Pipeline::new(config).unwrap().run(&text).unwrap();
        let note = &result.books[0].highlights[0].notes[0];
        assert_eq!(note.categories[0].path(), ["Sleep", "P"]);
    }

    #[test]
    fn test_list_books() {
        let text = [
            block("Zeta (Z)", "Highlight", "1-2", DATE, "z"),
            block("Alpha", "Highlight", "1-2", DATE, "a"),
            block("Alpha", "Highlight", "1-2", DATE, "a again"),
            block("Alpha", "Note", "2", DATE, "n"),
            block("Broken", "Mystery", "1", DATE, "?"),
        ]
        .concat();

        let books = pipeline().list_books(&text).unwrap();
        assert_eq!(books.len(), 2);
        assert_eq!(books[0].book.title, "Alpha");
        assert_eq!(books[0].highlights, 2);
        assert_eq!(books[0].notes, 1);
        assert_eq!(books[0].total(), 3);
        assert_eq!(books[1].book.author.as_deref(), Some("Z"));
    }

    #[test]
    fn test_diagnostics_scoped_to_selected_books() {
        let text = [
            block("Dune", "Highlight", "1-2", DATE, "d"),
            block("Emma", "Scribble", "3", DATE, "?"),
            block("Emma", "Highlight", "5-9", "someday", "e"),
            block("Dune", "Highlight", "10-12", "not a date", "d2"),
        ]
        .concat();

        let dune = pipeline()
            .run_filtered(&text, &BookFilter::Title("Dune".to_string()))
            .unwrap();
        assert!(dune.diagnostics.malformed.is_empty());
        assert_eq!(dune.diagnostics.unparsable_dates.len(), 1);
        assert_eq!(dune.diagnostics.unparsable_dates[0].value, "not a date");

        let all = pipeline().run(&text).unwrap();
        assert_eq!(all.diagnostics.malformed.len(), 1);
        assert_eq!(all.diagnostics.unparsable_dates.len(), 2);
    }

    #[test]
    fn test_abbreviated_range_does_not_swallow_earlier_highlights() {
        let text = [
            block("Book", "Highlight", "1000-1010", DATE, "earlier passage"),
            block("Book", "Highlight", "1499-03", DATE, "later passage"),
        ]
        .concat();

        let result = pipeline().run(&text).unwrap();
        let highlights = &result.books[0].highlights;
        assert_eq!(highlights.len(), 2);
        assert_eq!(result.diagnostics.duplicates_removed, 0);
        assert_eq!(highlights[0].highlight.text, "earlier passage");
        assert_eq!(highlights[1].highlight.location, Some(LocationRange::new(1499, 1503)));
    }

    #[test]
    fn test_rerun_is_deterministic() {
        let text = [
            block("Book", "Highlight", "10-20", "x", "first"),
            block("Book", "Highlight", "10-20", "y", "second"),
            block("Book", "Note", "20", DATE, "n"),
        ]
        .concat();

        let a = pipeline().run(&text).unwrap();
        let b = pipeline().run(&text).unwrap();
        assert_eq!(a.books, b.books);
        assert_eq!(a.books[0].highlights[0].highlight.text, "first");
    }
}
