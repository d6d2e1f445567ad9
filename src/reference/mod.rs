//! Core data model for scripture references.
//!
//! A document can contain any number of header lines such as
//! `### Ephesians 1:1-4,5-7,2:3-4`. Each header parses into a [`Reference`]:
//! the book name plus an ordered list of [`ReferenceSegment`]s, one per
//! comma-delimited item. Segment order is textual order and is significant;
//! diagnostics and formatting must report segments exactly as written, even
//! when they are numerically out of order.
//!
//! Submodules:
//! - [`parser`]: the header grammar
//! - [`index`]: offset-to-segment lookup

use std::ops::Range;

pub mod index;
pub mod parser;

pub use index::SegmentIndex;
pub use parser::{parse_header, ParseError, ParseErrorKind, HEADER_MARKER};

/// A half-open byte range `[start, end)` into the document text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Range<usize> {
        span.start..span.end
    }
}

/// One comma-delimited unit of a reference: a chapter plus a verse range.
///
/// `verse_start == verse_end` for a single verse. A segment written without
/// an explicit chapter (`5-7` in `1:1-4,5-7`) has already had the chapter
/// filled in by the parser's carry-over rule; consumers never see a
/// chapterless segment.
///
/// Invariants (enforced by the parser): `chapter >= 1`, `verse_start >= 1`,
/// `verse_start <= verse_end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceSegment {
    pub chapter: usize,
    pub verse_start: usize,
    pub verse_end: usize,
    /// Location of this segment's text within the header line.
    pub span: Span,
}

impl ReferenceSegment {
    /// All verse numbers covered by this segment, ascending.
    pub fn verses(&self) -> std::ops::RangeInclusive<usize> {
        self.verse_start..=self.verse_end
    }

    pub fn is_single_verse(&self) -> bool {
        self.verse_start == self.verse_end
    }

    pub fn verse_count(&self) -> usize {
        self.verse_end - self.verse_start + 1
    }
}

/// One parsed header: a book name and its segments, in textual order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub book: String,
    pub segments: Vec<ReferenceSegment>,
    /// Span of the whole header, from the leading `###` through the last
    /// segment.
    pub span: Span,
}

impl Reference {
    /// The first segment as written, which diagnostics treat as "the first
    /// verse" regardless of numeric order.
    pub fn first_segment(&self) -> Option<&ReferenceSegment> {
        self.segments.first()
    }

    /// Total number of verses across all segments. Overlapping segments are
    /// counted once per occurrence; the model never merges what the author
    /// wrote.
    pub fn verse_count(&self) -> usize {
        self.segments.iter().map(ReferenceSegment::verse_count).sum()
    }
}
