//! Definition provider.
//!
//! A segment's "definition" is its first verse. The provider names the
//! verse; navigating to it is the caller's concern, since only the caller
//! knows how its content store addresses verses.

use tower_lsp::lsp_types::Position;

use crate::source::VerseKey;
use crate::workspace::Document;

pub fn goto_definition(document: &Document, position: Position) -> Option<VerseKey> {
    let offset = document.position_to_offset(position)?;
    let (ref_idx, seg_idx) = document.segment_at(offset)?;
    let parsed = &document.references()[ref_idx];
    let segment = &parsed.reference.segments[seg_idx];
    Some(VerseKey {
        book: parsed.reference.book.clone(),
        chapter: segment.chapter,
        verse: segment.verse_start,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "### Ephesians 1:1-4,5-7,2:3-4\n";

    #[test]
    fn definition_is_the_segment_start() {
        let document = Document::new(HEADER, 1);
        let key = goto_definition(&document, Position::new(0, 21)).unwrap();
        assert_eq!(key.book, "Ephesians");
        assert_eq!(key.chapter, 1);
        assert_eq!(key.verse, 5);
    }

    #[test]
    fn carry_over_segment_uses_the_established_chapter() {
        let document = Document::new(HEADER, 1);
        let key = goto_definition(&document, Position::new(0, 25)).unwrap();
        assert_eq!(key.chapter, 2);
        assert_eq!(key.verse, 3);
    }

    #[test]
    fn no_definition_outside_a_segment() {
        let document = Document::new(HEADER, 1);
        assert!(goto_definition(&document, Position::new(0, 6)).is_none());
        assert!(goto_definition(&document, Position::new(0, 13)).is_none());
    }
}
