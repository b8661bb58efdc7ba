//! Parse a clippings export into records

use crate::config::ExtractorConfig;
use crate::types::{MalformedRecord, UnparsableDate};
use marginalia_domain::{AddedAt, BookKey, ClippingKind, ClippingRecord, LocationRange};
use once_cell::sync::Lazy;
use regex::Regex;
use std::str::Lines;
use tracing::{debug, warn};

static KIND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\byour\s+(\p{L}+)").expect("valid kind regex"));
static LOCATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:location|loc\.)\s*((\d+)(?:\s*-\s*(\d+))?)").expect("valid location regex")
});
static PAGE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bpage\s+(\d+)").expect("valid page regex"));
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\badded on\s+(.+?)\s*$").expect("valid date regex"));

/// Splits clippings text into blocks and classifies each one
pub struct ClippingParser<'c> {
    config: &'c ExtractorConfig,
}

impl<'c> ClippingParser<'c> {
    /// Create a parser using the given configuration
    pub fn new(config: &'c ExtractorConfig) -> Self {
        Self { config }
    }

    /// Lazily parse `text`
    ///
    /// Every call starts from the beginning of the input; the returned
    /// iterator owns its own cursor.
    pub fn records<'t>(&self, text: &'t str) -> Records<'t, 'c> {
        Records {
            lines: text.strip_prefix('\u{feff}').unwrap_or(text).lines(),
            config: self.config,
            ordinal: 0,
            unparsable_dates: Vec::new(),
        }
    }

    /// Check whether a line is a record separator
    pub fn is_separator(&self, line: &str) -> bool {
        is_separator(line, self.config.min_separator_len)
    }
}

/// Lazy iterator over the blocks of one input
///
/// Yields `Ok` for every classified block and `Err` for malformed ones.
/// Whitespace-only blocks are skipped without being reported.
pub struct Records<'t, 'c> {
    lines: Lines<'t>,
    config: &'c ExtractorConfig,
    ordinal: usize,
    unparsable_dates: Vec<UnparsableDate>,
}

impl<'t, 'c> Records<'t, 'c> {
    /// Dates seen so far that matched no configured format
    pub fn unparsable_dates(&self) -> &[UnparsableDate] {
        &self.unparsable_dates
    }

    /// Consume the iterator state, returning the unreadable dates collected
    pub fn into_unparsable_dates(self) -> Vec<UnparsableDate> {
        self.unparsable_dates
    }

    /// Collect the lines of the next block, or `None` at end of input
    fn next_block(&mut self) -> Option<Vec<&'t str>> {
        let mut block = Vec::new();
        let mut saw_any = false;

        for line in self.lines.by_ref() {
            saw_any = true;
            if is_separator(line, self.config.min_separator_len) {
                return Some(block);
            }
            block.push(line);
        }

        if saw_any {
            Some(block)
        } else {
            None
        }
    }

    fn parse_block(&mut self, lines: &[&str], ordinal: usize) -> Result<ClippingRecord, MalformedRecord> {
        let mut content = lines.iter().copied().skip_while(|l| l.trim().is_empty());

        let title_line = content.next().unwrap_or_default();
        let malformed = |reason: String| MalformedRecord {
            ordinal,
            reason,
            excerpt: title_line.trim().to_string(),
        };

        let metadata = content
            .by_ref()
            .find(|l| !l.trim().is_empty())
            .ok_or_else(|| malformed("missing metadata line".to_string()))?
            .trim();

        let kind_word = KIND_RE
            .captures(metadata)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| malformed(format!("unrecognized metadata line '{}'", metadata)))?;

        let kind = ClippingKind::parse(kind_word)
            .ok_or_else(|| malformed(format!("unknown clipping kind '{}'", kind_word)))?;

        let page = PAGE_RE
            .captures(metadata)
            .and_then(|c| c.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok());

        let (location, location_text) = match parse_location(metadata) {
            Some((range, text)) => (Some(range), text),
            None => (None, String::new()),
        };

        // Page-only clippings (PDF documents) use the page as position
        let location = location.or_else(|| {
            if kind.requires_location() {
                page.map(LocationRange::point)
            } else {
                None
            }
        });

        if kind.requires_location() && location.is_none() {
            return Err(malformed(format!("{} without location or page", kind)));
        }

        let added_at = match DATE_RE.captures(metadata).and_then(|c| c.get(1)) {
            Some(m) => match self.config.parse_date(m.as_str()) {
                Some(ts) => AddedAt::Known(ts),
                None => {
                    debug!("Block {}: unreadable date '{}'", ordinal, m.as_str());
                    self.unparsable_dates.push(UnparsableDate {
                        ordinal,
                        value: m.as_str().to_string(),
                    });
                    AddedAt::Unknown
                }
            },
            None => AddedAt::Unknown,
        };

        let body: Vec<&str> = content.skip_while(|l| l.trim().is_empty()).collect();
        let text = match kind {
            ClippingKind::Bookmark => String::new(),
            _ => body.join("\n").trim().to_string(),
        };

        let raw = lines.join("\n").trim().to_string();

        Ok(ClippingRecord {
            book: BookKey::from_title_line(title_line),
            kind,
            location,
            location_text,
            page,
            added_at,
            text,
            ordinal,
            raw,
        })
    }
}

impl<'t, 'c> Iterator for Records<'t, 'c> {
    type Item = Result<ClippingRecord, MalformedRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let block = self.next_block()?;
            if block.iter().all(|l| l.trim().is_empty()) {
                continue;
            }

            let ordinal = self.ordinal;
            self.ordinal += 1;

            let parsed = self.parse_block(&block, ordinal);
            if let Err(e) = &parsed {
                warn!("Skipping malformed block {} ('{}'): {}", e.ordinal, e.excerpt, e.reason);
            }
            return Some(parsed);
        }
    }
}

fn is_separator(line: &str, min_len: usize) -> bool {
    let line = line.trim();
    line.len() >= min_len && line.chars().all(|c| c == '=')
}

/// Extract the location range and its literal text from a metadata line
fn parse_location(metadata: &str) -> Option<(LocationRange, String)> {
    let caps = LOCATION_RE.captures(metadata)?;
    let text = caps.get(1)?.as_str().to_string();
    let start_digits = caps.get(2)?.as_str();
    let start: u32 = start_digits.parse().ok()?;

    let end = match caps.get(3) {
        Some(m) => expand_abbreviated_end(start_digits, m.as_str())?,
        None => start,
    };

    Some((LocationRange::new(start, end), text))
}

/// Older devices abbreviate range ends: `1406-07` means `1406-1407`
///
/// An expansion landing below the start carries into the next block:
/// `1499-03` means `1499-1503`. The result is never below `start`.
fn expand_abbreviated_end(start_digits: &str, end_digits: &str) -> Option<u32> {
    let start: u32 = start_digits.parse().ok()?;
    let end: u32 = end_digits.parse().ok()?;

    if end >= start {
        return Some(end);
    }
    if end_digits.len() >= start_digits.len() {
        // Not an abbreviation; a genuinely reversed range
        return Some(start);
    }

    let prefix = &start_digits[..start_digits.len() - end_digits.len()];
    let expanded: u32 = format!("{}{}", prefix, end_digits).parse().ok()?;
    if expanded >= start {
        return Some(expanded);
    }

    let carry = 10u32.checked_pow(end_digits.len() as u32)?;
    expanded.checked_add(carry).filter(|e| *e >= start)
}
