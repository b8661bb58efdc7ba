//! Interactive book selection.

use crate::error::{CliError, Result};
use crate::output::Formatter;
use marginalia_extractor::{BookFilter, BookSummary};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, Write};

/// What the user picked from the book menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// One book, by zero-based menu index
    Book(usize),
    /// Every book
    All,
    /// Leave without exporting
    Quit,
}

impl Selection {
    /// Turn the selection into a pipeline filter; `None` for quit.
    pub fn into_filter(self, books: &[BookSummary]) -> Option<BookFilter> {
        match self {
            Selection::Book(idx) => books.get(idx).map(|b| BookFilter::Book(b.book.clone())),
            Selection::All => Some(BookFilter::All),
            Selection::Quit => None,
        }
    }
}

/// Parse one line of menu input against a menu of `count` books.
pub fn parse_selection(line: &str, count: usize) -> Result<Selection> {
    let line = line.trim();
    match line.to_lowercase().as_str() {
        "" => Err(CliError::InvalidInput("Empty selection".to_string())),
        "a" | "all" => Ok(Selection::All),
        "q" | "quit" | "exit" => Ok(Selection::Quit),
        _ => {
            let number: usize = line.parse().map_err(|_| {
                CliError::InvalidInput(format!("Not a book number: {}", line))
            })?;
            if number == 0 || number > count {
                return Err(CliError::InvalidInput(format!(
                    "Choose a number between 1 and {}",
                    count
                )));
            }
            Ok(Selection::Book(number - 1))
        }
    }
}

/// Write the numbered book table followed by a blank line.
pub fn write_menu<W: Write>(out: &mut W, books: &[BookSummary], formatter: &Formatter) -> Result<()> {
    writeln!(out, "{}", formatter.format_books(books, false)?)?;
    writeln!(out)?;
    Ok(())
}

/// Show the numbered book list and read a choice until one is valid.
pub fn prompt_for_book(books: &[BookSummary], formatter: &Formatter) -> Result<Selection> {
    if books.is_empty() {
        return Ok(Selection::All);
    }

    // Menu goes to stderr; stdout may be the export document
    write_menu(&mut io::stderr(), books, formatter)?;

    let mut editor = DefaultEditor::new().map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;
    let prompt = format!("Select a book [1-{}, a = all, q = quit]: ", books.len());

    loop {
        match editor.readline(&prompt) {
            Ok(line) => match parse_selection(&line, books.len()) {
                Ok(selection) => return Ok(selection),
                Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
            },
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(Selection::Quit);
            }
            Err(err) => {
                return Err(CliError::Io(std::io::Error::other(format!(
                    "Failed to read selection: {}",
                    err
                ))));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marginalia_domain::BookKey;

    fn books() -> Vec<BookSummary> {
        ["Alpha", "Beta"]
            .into_iter()
            .map(|title| BookSummary {
                book: BookKey::new(title, None::<String>),
                highlights: 1,
                notes: 0,
                bookmarks: 0,
            })
            .collect()
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_selection("2", 2).unwrap(), Selection::Book(1));
        assert_eq!(parse_selection(" 1 \n", 2).unwrap(), Selection::Book(0));
    }

    #[test]
    fn test_parse_keywords() {
        assert_eq!(parse_selection("a", 2).unwrap(), Selection::All);
        assert_eq!(parse_selection("ALL", 2).unwrap(), Selection::All);
        assert_eq!(parse_selection("q", 2).unwrap(), Selection::Quit);
    }

    #[test]
    fn test_parse_out_of_range() {
        assert!(parse_selection("0", 2).is_err());
        assert!(parse_selection("3", 2).is_err());
        assert!(parse_selection("", 2).is_err());
        assert!(parse_selection("dune", 2).is_err());
    }

    #[test]
    fn test_write_menu() {
        let mut out = Vec::new();
        write_menu(&mut out, &books(), &Formatter::new(false)).unwrap();

        let menu = String::from_utf8(out).unwrap();
        assert!(menu.contains("Alpha"));
        assert!(menu.contains("Beta"));
        assert!(menu.ends_with("\n\n"));
    }

    #[test]
    fn test_into_filter() {
        let books = books();
        assert_eq!(
            Selection::Book(1).into_filter(&books),
            Some(BookFilter::Book(BookKey::new("Beta", None::<String>)))
        );
        assert_eq!(Selection::All.into_filter(&books), Some(BookFilter::All));
        assert_eq!(Selection::Quit.into_filter(&books), None);
    }
}
