//! Attach notes to the highlights they annotate

use crate::categories::CategoryExtractor;
use crate::types::{UnmatchedNote, UnmatchedReason};
use marginalia_domain::{AnnotatedHighlight, CategorizedNote, ClippingRecord};
use tracing::debug;

/// Outcome of matching one book's notes
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// One entry per highlight, in the order the highlights were given
    pub annotated: Vec<AnnotatedHighlight>,

    /// Notes that could not be attached
    pub unmatched: Vec<UnmatchedNote>,
}

/// Pairs notes with highlights by location
///
/// A note belongs to the highlight whose range contains the note's start
/// location. When several do, the one starting closest to the note wins,
/// then the narrowest. Without a containing range the nearest highlight
/// starting before the note is chosen.
pub struct NoteMatcher<'a> {
    categories: CategoryExtractor<'a>,
}

impl<'a> NoteMatcher<'a> {
    /// Create a matcher that categorizes notes with `categories`
    pub fn new(categories: CategoryExtractor<'a>) -> Self {
        Self { categories }
    }

    /// Match the notes of one book against its deduplicated highlights
    pub fn match_notes(
        &self,
        highlights: Vec<ClippingRecord>,
        notes: Vec<ClippingRecord>,
    ) -> MatchOutcome {
        let mut annotated: Vec<AnnotatedHighlight> =
            highlights.into_iter().map(AnnotatedHighlight::new).collect();

        // Candidate search runs over location order; output keeps input order
        let mut by_location: Vec<usize> = (0..annotated.len()).collect();
        by_location.sort_by(|&a, &b| {
            let ha = &annotated[a].highlight;
            let hb = &annotated[b].highlight;
            ha.location.cmp(&hb.location).then(a.cmp(&b))
        });

        let mut notes = notes;
        notes.sort_by_key(|n| n.ordinal);

        let mut unmatched = Vec::new();

        for note in notes {
            match self.find_highlight(&annotated, &by_location, note.start()) {
                Ok(idx) => {
                    debug!(
                        "Note block {} matched highlight block {}",
                        note.ordinal, annotated[idx].highlight.ordinal
                    );
                    let categorized = self.categorize(note);
                    annotated[idx].notes.push(categorized);
                }
                Err(reason) => {
                    debug!("Note block {} unmatched: {}", note.ordinal, reason);
                    unmatched.push(UnmatchedNote {
                        record: note,
                        reason,
                    });
                }
            }
        }

        MatchOutcome {
            annotated,
            unmatched,
        }
    }

    /// Split category markup off a note
    pub fn categorize(&self, note: ClippingRecord) -> CategorizedNote {
        let extracted = self.categories.extract(&note.text);
        CategorizedNote {
            record: note,
            categories: extracted.categories,
            text: extracted.text,
        }
    }

    fn find_highlight(
        &self,
        annotated: &[AnnotatedHighlight],
        by_location: &[usize],
        position: u32,
    ) -> Result<usize, UnmatchedReason> {
        if by_location.is_empty() {
            return Err(UnmatchedReason::NoHighlights);
        }

        // Highlights starting at or before the note
        let preceding = by_location
            .partition_point(|&i| annotated[i].highlight.start() <= position);
        if preceding == 0 {
            return Err(UnmatchedReason::PrecedesAllHighlights);
        }
        let candidates = &by_location[..preceding];

        let containing = candidates
            .iter()
            .copied()
            .filter(|&i| {
                annotated[i]
                    .highlight
                    .location
                    .is_some_and(|l| l.contains(position))
            })
            .max_by(|&a, &b| {
                let la = annotated[a].highlight.location;
                let lb = annotated[b].highlight.location;
                let (sa, sb) = (la.map(|l| l.start()), lb.map(|l| l.start()));
                let (wa, wb) = (la.map(|l| l.span()), lb.map(|l| l.span()));
                // Latest start, then narrowest range, then earliest given
                sa.cmp(&sb).then(wb.cmp(&wa)).then(b.cmp(&a))
            });

        match containing {
            Some(idx) => Ok(idx),
            None => Ok(candidates[candidates.len() - 1]),
        }
    }
}
