//! Plain bulleted export, one section per book

use super::{indent_continuation, Exporter};
use marginalia_domain::CategorizedNote;
use marginalia_extractor::PipelineResult;

/// `* highlight` lines under a banner per book, notes nested beneath.
pub struct BulletExporter;

const BANNER: &str = "===========";

impl Exporter for BulletExporter {
    fn render(&self, result: &PipelineResult) -> String {
        let mut sections = Vec::with_capacity(result.books.len());

        for book in &result.books {
            let mut section = format!("{} {} {}\n\n", BANNER, book.book, BANNER);
            for annotated in &book.highlights {
                section.push_str(&format!(
                    "* {}\n",
                    indent_continuation(&annotated.highlight.text, "  ")
                ));
                for note in &annotated.notes {
                    section.push_str(&format!(
                        "  - Note: {}\n",
                        indent_continuation(note_text(note), "    ")
                    ));
                }
            }
            sections.push(section);
        }

        sections.join("\n")
    }
}

/// Note prose without its category markers, or the raw note when the
/// markers were all it had
fn note_text(note: &CategorizedNote) -> &str {
    if note.text.is_empty() {
        &note.record.text
    } else {
        &note.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_books_and_notes() {
        let out = BulletExporter.render(&fixtures::sample_result());

        let expected_dune = "=========== Dune (Herbert, Frank) ===========\n\n\
            * Fear is the mind-killer.\n  - Note: repeat daily\n\
            * The spice must flow.\n\
            * I must not fear.\n  - Note: again\n\
            * Arrakis.\n  - Note: no marker here\n";
        assert!(out.starts_with(expected_dune), "got:\n{}", out);

        assert!(out.ends_with(
            "\n=========== Nutrition (Doe, Jane) ===========\n\n* Eat protein.\n  - Note: daily\n"
        ));
    }

    #[test]
    fn test_marker_only_note_keeps_raw_text() {
        let text = "Book\n- Your Highlight on Location 1-5 | Added on x\n\npassage\n==========\n\
                    Book\n- Your Note on Location 5 | Added on x\n\n(P)\n==========\n";
        let result = marginalia_extractor::Pipeline::default().run(text).unwrap();

        let out = BulletExporter.render(&result);
        assert!(out.contains("* passage\n  - Note: (P)\n"));
    }

    #[test]
    fn test_empty_result() {
        let result = marginalia_extractor::Pipeline::default().run("").unwrap();
        assert_eq!(BulletExporter.render(&result), "");
    }
}
