//! Positional lookup over a parsed reference.
//!
//! The index is ephemeral: it is rebuilt unconditionally whenever the parser
//! produces a new [`Reference`] and is never mutated in place. Segment spans
//! come out of the parser already in ascending, non-overlapping textual
//! order, which is what makes the binary search valid.

use super::{Reference, Span};

/// Maps byte offsets in a header line to the segment that owns them.
///
/// Offsets that land on separators, the book name, or outside the header
/// resolve to `None`; there are no failure modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentIndex {
    spans: Vec<Span>,
}

impl SegmentIndex {
    pub fn new(reference: &Reference) -> Self {
        let spans = reference.segments.iter().map(|s| s.span).collect::<Vec<_>>();
        debug_assert!(spans.windows(2).all(|w| w[0].end <= w[1].start));
        SegmentIndex { spans }
    }

    /// Which segment, if any, contains `offset`. O(log n).
    pub fn segment_at(&self, offset: usize) -> Option<usize> {
        let candidate = self.spans.partition_point(|span| span.end <= offset);
        self.spans
            .get(candidate)
            .filter(|span| span.contains(offset))
            .map(|_| candidate)
    }

    /// The display span of segment `index` within the header line.
    pub fn span(&self, index: usize) -> Option<Span> {
        self.spans.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::parse_header;

    const HEADER: &str = "### Ephesians 1:1-4,5-7,2:3-4";

    fn index() -> (Reference, SegmentIndex) {
        let reference = parse_header(HEADER, 0).unwrap();
        let index = SegmentIndex::new(&reference);
        (reference, index)
    }

    #[test]
    fn offset_inside_a_range_finds_its_segment() {
        let (reference, index) = index();
        // Offset 17 is inside "1-4" of the first segment.
        let hit = index.segment_at(17).unwrap();
        assert_eq!(hit, 0);
        assert_eq!(reference.segments[hit].verse_end, 4);
    }

    #[test]
    fn offset_inside_the_book_name_finds_nothing() {
        let (_, index) = index();
        // Offset 6 is inside "Ephesians".
        assert_eq!(index.segment_at(6), None);
    }

    #[test]
    fn offset_on_a_comma_finds_nothing() {
        let (reference, index) = index();
        let comma = reference.segments[0].span.end;
        assert_eq!(&HEADER[comma..comma + 1], ",");
        assert_eq!(index.segment_at(comma), None);
    }

    #[test]
    fn out_of_range_offset_finds_nothing() {
        let (_, index) = index();
        assert_eq!(index.segment_at(HEADER.len() + 40), None);
    }

    #[test]
    fn every_segment_span_is_recoverable() {
        let (reference, index) = index();
        assert_eq!(index.len(), 3);
        for (i, segment) in reference.segments.iter().enumerate() {
            assert_eq!(index.span(i), Some(segment.span));
        }
    }
}
