//! Markdown export grouped by note category

use super::{indent_continuation, Exporter};
use marginalia_domain::BookAnnotations;
use marginalia_extractor::PipelineResult;
use once_cell::sync::Lazy;
use regex::Regex;

const UNCATEGORIZED: &str = "Uncategorized";

/// Deepest heading level markdown supports
const MAX_HEADING_LEVEL: usize = 6;

static HYPHEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*-\s*").expect("valid hyphen regex"));

/// One book heading, then highlights without notes, then a heading tree
/// built from the categories of the attached notes.
pub struct MarkdownExporter;

#[derive(Clone, Copy)]
struct Entry<'a> {
    highlight: &'a str,
    note: Option<&'a str>,
}

#[derive(Default)]
struct Section<'a> {
    name: String,
    entries: Vec<Entry<'a>>,
    children: Vec<(String, Section<'a>)>,
}

impl<'a> Section<'a> {
    fn named(name: String) -> Self {
        Self {
            name,
            ..Self::default()
        }
    }

    /// Find or create the child for `segment`, merging spellings that
    /// differ only in case or hyphen spacing
    fn child(&mut self, segment: &str) -> &mut Section<'a> {
        let key = merge_key(segment);
        let idx = match self.children.iter().position(|(k, _)| *k == key) {
            Some(idx) => idx,
            None => {
                self.children
                    .push((key, Section::named(display_name(segment))));
                self.children.len() - 1
            }
        };
        &mut self.children[idx].1
    }

    fn render(&self, level: usize, out: &mut String) {
        out.push_str(&format!(
            "{} {}\n\n",
            "#".repeat(level.min(MAX_HEADING_LEVEL)),
            self.name
        ));
        for entry in &self.entries {
            write_entry(out, entry.highlight, entry.note);
        }
        for (_, child) in &self.children {
            child.render(level + 1, out);
        }
    }
}

impl Exporter for MarkdownExporter {
    fn render(&self, result: &PipelineResult) -> String {
        let mut out = String::new();
        for book in &result.books {
            render_book(book, &mut out);
        }
        out
    }
}

fn render_book(book: &BookAnnotations, out: &mut String) {
    out.push_str(&format!("# {}\n\n", book.book));

    let mut plain = 0;
    for annotated in book.highlights.iter().filter(|h| !h.has_notes()) {
        write_entry(out, &annotated.highlight.text, None);
        plain += 1;
    }
    if plain > 0 {
        out.push('\n');
    }

    let mut tree = Section::default();
    let mut uncategorized = Section::named(UNCATEGORIZED.to_string());

    for annotated in &book.highlights {
        for note in &annotated.notes {
            let entry = Entry {
                highlight: &annotated.highlight.text,
                note: Some(note.text.as_str()).filter(|t| !t.is_empty()),
            };
            if !note.is_categorized() {
                uncategorized.entries.push(entry);
                continue;
            }
            for category in &note.categories {
                let mut section = &mut tree;
                for segment in category.path() {
                    section = section.child(segment);
                }
                section.entries.push(entry);
            }
        }
    }

    for (_, section) in &tree.children {
        section.render(2, out);
    }
    if !uncategorized.entries.is_empty() {
        uncategorized.render(2, out);
    }
}

fn write_entry(out: &mut String, highlight: &str, note: Option<&str>) {
    out.push_str(&format!("* {}\n", indent_continuation(highlight, "  ")));
    if let Some(note) = note {
        out.push_str(&format!(
            "\n  **Note**: *{}*\n\n",
            indent_continuation(note, "  ")
        ));
    }
}

fn merge_key(name: &str) -> String {
    HYPHEN_RE
        .replace_all(name.trim(), "-")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

fn display_name(name: &str) -> String {
    HYPHEN_RE
        .replace_all(name.trim(), " - ")
        .split_whitespace()
        .map(title_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize a word unless it is an all-caps abbreviation
fn title_word(word: &str) -> String {
    let mut letters = word.chars().filter(|c| c.is_alphabetic()).peekable();
    let has_letters = letters.peek().is_some();
    if word.chars().count() > 1 && has_letters && letters.all(char::is_uppercase) {
        return word.to_string();
    }

    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
