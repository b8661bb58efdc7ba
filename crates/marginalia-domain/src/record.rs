//! Record module - the parsed unit of a clippings export

use crate::book::BookKey;
use chrono::NaiveDateTime;
use std::fmt;

/// Kind of a clipping, as named on its metadata line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClippingKind {
    /// A highlighted passage (`Your Highlight`)
    Highlight,

    /// A free-text note (`Your Note`)
    Note,

    /// A position marker without text (`Your Bookmark`)
    Bookmark,
}

impl ClippingKind {
    /// Get the kind keyword as written in the export
    pub fn as_str(&self) -> &'static str {
        match self {
            ClippingKind::Highlight => "Highlight",
            ClippingKind::Note => "Note",
            ClippingKind::Bookmark => "Bookmark",
        }
    }

    /// Parse a kind keyword (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "highlight" => Some(ClippingKind::Highlight),
            "note" => Some(ClippingKind::Note),
            "bookmark" => Some(ClippingKind::Bookmark),
            _ => None,
        }
    }

    /// Whether records of this kind must carry a location range
    pub fn requires_location(&self) -> bool {
        !matches!(self, ClippingKind::Bookmark)
    }
}

impl fmt::Display for ClippingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive `[start, end]` location range inside a book
///
/// Always satisfies `start <= end`; constructors swap reversed bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocationRange {
    start: u32,
    end: u32,
}

impl LocationRange {
    /// Create a range, normalising reversed bounds
    pub fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self { start: end, end: start }
        }
    }

    /// Create a single-position range
    pub fn point(position: u32) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// First location covered
    pub fn start(&self) -> u32 {
        self.start
    }

    /// Last location covered
    pub fn end(&self) -> u32 {
        self.end
    }

    /// Number of locations covered, minus one
    pub fn span(&self) -> u32 {
        self.end - self.start
    }

    /// Check whether a position falls inside this range (inclusive)
    pub fn contains(&self, position: u32) -> bool {
        self.start <= position && position <= self.end
    }

    /// Check whether `other` lies entirely within this range
    pub fn covers(&self, other: &LocationRange) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Check whether `other` lies within this range and is not equal to it
    pub fn strictly_covers(&self, other: &LocationRange) -> bool {
        self.covers(other) && self != other
    }

    /// Check whether the two ranges share at least one location
    pub fn intersects(&self, other: &LocationRange) -> bool {
        self.start <= other.end && other.start <= self.end
    }
}

impl fmt::Display for LocationRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

/// When a clipping was added, if the export's date could be read
///
/// `Unknown` orders before every known timestamp, so the maximum of a set
/// of values is always the most recent known one when any exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AddedAt {
    /// Date missing or not parseable
    Unknown,

    /// Parsed local timestamp
    Known(NaiveDateTime),
}

impl AddedAt {
    /// Check whether a timestamp was parsed
    pub fn is_known(&self) -> bool {
        matches!(self, AddedAt::Known(_))
    }

    /// Get the parsed timestamp, if any
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            AddedAt::Known(ts) => Some(*ts),
            AddedAt::Unknown => None,
        }
    }
}

/// One clipping parsed from a delimited block of the export
#[derive(Debug, Clone, PartialEq)]
pub struct ClippingRecord {
    /// Book the clipping belongs to
    pub book: BookKey,

    /// Highlight, note or bookmark
    pub kind: ClippingKind,

    /// Location range; `None` only for bookmarks
    pub location: Option<LocationRange>,

    /// Location exactly as written on the metadata line (e.g. `"100-110"`)
    pub location_text: String,

    /// Page number, when the export names one
    pub page: Option<u32>,

    /// When the clipping was added
    pub added_at: AddedAt,

    /// Body text; empty for bookmarks
    pub text: String,

    /// Zero-based position of the block in the source file
    pub ordinal: usize,

    /// Original block text, trimmed, without the separator line
    pub raw: String,
}

impl ClippingRecord {
    /// Check whether this record is a highlight
    pub fn is_highlight(&self) -> bool {
        self.kind == ClippingKind::Highlight
    }

    /// Check whether this record is a note
    pub fn is_note(&self) -> bool {
        self.kind == ClippingKind::Note
    }

    /// Check whether this record is a bookmark
    pub fn is_bookmark(&self) -> bool {
        self.kind == ClippingKind::Bookmark
    }

    /// Start location, or 0 for a bookmark without a location
    pub fn start(&self) -> u32 {
        self.location.map(|l| l.start()).unwrap_or(0)
    }

    /// Validate the kind/text/location consistency invariant
    pub fn validate(&self) -> Result<(), String> {
        if self.kind.requires_location() && self.location.is_none() {
            return Err(format!("{} without a location range", self.kind));
        }
        if self.is_bookmark() && !self.text.is_empty() {
            return Err("bookmark carries text".to_string());
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::record;
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_range_normalises_reversed_bounds() {
        let range = LocationRange::new(110, 100);
        assert_eq!(range.start(), 100);
        assert_eq!(range.end(), 110);
    }

    #[test]
    fn test_range_display() {
        assert_eq!(LocationRange::new(100, 110).to_string(), "100-110");
        assert_eq!(LocationRange::point(42).to_string(), "42");
    }

    #[test]
    fn test_range_containment() {
        let outer = LocationRange::new(100, 120);
        let inner = LocationRange::new(105, 110);

        assert!(outer.contains(100));
        assert!(outer.contains(120));
        assert!(!outer.contains(121));
        assert!(outer.covers(&inner));
        assert!(outer.strictly_covers(&inner));
        assert!(!outer.strictly_covers(&outer));
        assert!(!inner.covers(&outer));
    }

    #[test]
    fn test_range_intersection() {
        let a = LocationRange::new(100, 110);
        assert!(a.intersects(&LocationRange::new(105, 115)));
        assert!(a.intersects(&LocationRange::new(110, 115)));
        assert!(!a.intersects(&LocationRange::new(111, 115)));
    }

    #[test]
    fn test_added_at_ordering() {
        let ts = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert!(AddedAt::Unknown < AddedAt::Known(ts));
        assert!(AddedAt::Known(ts).is_known());
        assert_eq!(AddedAt::Unknown.timestamp(), None);
    }

    #[test]
    fn test_kind_parsing() {
        assert_eq!(ClippingKind::parse("Highlight"), Some(ClippingKind::Highlight));
        assert_eq!(ClippingKind::parse("NOTE"), Some(ClippingKind::Note));
        assert_eq!(ClippingKind::parse("bookmark"), Some(ClippingKind::Bookmark));
        assert_eq!(ClippingKind::parse("Clip"), None);
    }

    #[test]
    fn test_validate_invariant() {
        let highlight = record(ClippingKind::Highlight, 1, 2, "text");
        assert!(highlight.validate().is_ok());

        let mut no_location = highlight.clone();
        no_location.location = None;
        assert!(no_location.validate().is_err());

        let mut bookmark = record(ClippingKind::Bookmark, 5, 5, "");
        bookmark.location = None;
        assert!(bookmark.validate().is_ok());

        bookmark.text = "stray".to_string();
        assert!(bookmark.validate().is_err());
    }
}
