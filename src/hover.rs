//! Hover provider.
//!
//! Hovering anywhere inside a segment of a parsed header shows that
//! segment's verse text as markdown. The window is controlled by
//! [`HoverContext`](crate::config::HoverContext): how many verses to show,
//! whether to lead with a chapter heading, and whether gaps appear as
//! placeholder lines or are skipped.

use tower_lsp::lsp_types::{
    Hover, HoverContents, MarkupContent, MarkupKind, Position,
};

use crate::config::Settings;
use crate::formatter::verse_line;
use crate::resolver::{DocumentResolution, ResolvedSegment, VerseText};
use crate::workspace::Document;

const MISSING_PLACEHOLDER: &str = "*(missing)*";

pub fn hover(
    document: &Document,
    resolution: &DocumentResolution,
    position: Position,
    settings: &Settings,
) -> Option<Hover> {
    if !settings.hover {
        return None;
    }
    if resolution.version != document.version() {
        return None;
    }

    let offset = document.position_to_offset(position)?;
    let (ref_idx, seg_idx) = document.segment_at(offset)?;
    let resolved = resolution.references.get(ref_idx)?;
    let segment = resolved.segments.get(seg_idx)?;

    let value = render_segment(&resolved.reference.book, segment, settings);
    if value.is_empty() {
        return None;
    }

    let span = document.references()[ref_idx].index.span(seg_idx)?;
    Some(Hover {
        contents: HoverContents::Markup(MarkupContent {
            kind: MarkupKind::Markdown,
            value,
        }),
        range: Some(document.span_to_range(span)),
    })
}

fn render_segment(book: &str, segment: &ResolvedSegment, settings: &Settings) -> String {
    let context = &settings.hover_context;
    let mut lines = Vec::new();
    if context.show_chapter_heading {
        lines.push(format!("### {book} {}", segment.segment.chapter));
    }

    let window = if context.verse_count == 0 {
        segment.verses.len()
    } else {
        context.verse_count
    };
    for verse in segment.verses.iter().take(window) {
        match &verse.text {
            VerseText::Text(text) => lines.push(verse_line(verse.chapter, verse.verse, text)),
            VerseText::Missing if context.show_missing_as_placeholder => {
                lines.push(verse_line(verse.chapter, verse.verse, MISSING_PLACEHOLDER))
            }
            VerseText::Missing => {}
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HoverContext;
    use crate::test_utils::ephesians;

    const HEADER: &str = "### Ephesians 1:1-4,5-7,2:3-4\n";

    fn run(text: &str, position: Position, settings: &Settings) -> Option<Hover> {
        let document = Document::new(text, 1);
        let resolution = DocumentResolution::compute(&document, &ephesians());
        hover(&document, &resolution, position, settings)
    }

    fn markdown(hover: &Hover) -> String {
        match &hover.contents {
            HoverContents::Markup(content) => content.value.clone(),
            other => panic!("unexpected hover contents: {other:?}"),
        }
    }

    #[test]
    fn hover_over_first_segment_shows_its_verses() {
        let settings = Settings::default();
        // Offset 15 is inside "1:1-4".
        let hover = run(HEADER, Position::new(0, 15), &settings).unwrap();
        let value = markdown(&hover);
        assert!(value.contains("[1:1] Ephesians 1:1 content"));
        assert!(!value.contains("[1:5]"));
        // Range covers the segment, not the whole header.
        assert_eq!(hover.range.unwrap().start.character, 14);
        assert_eq!(hover.range.unwrap().end.character, 19);
    }

    #[test]
    fn verse_count_zero_shows_the_whole_segment() {
        let settings = Settings {
            hover_context: HoverContext {
                verse_count: 0,
                ..HoverContext::default()
            },
            ..Settings::default()
        };
        let hover = run(HEADER, Position::new(0, 15), &settings).unwrap();
        let value = markdown(&hover);
        assert!(value.contains("[1:1]"));
        assert!(value.contains("[1:4]"));
    }

    #[test]
    fn chapter_heading_is_optional() {
        let with = Settings::default();
        let hover = run(HEADER, Position::new(0, 15), &with).unwrap();
        assert!(markdown(&hover).starts_with("### Ephesians 1\n"));

        let without = Settings {
            hover_context: HoverContext {
                show_chapter_heading: false,
                ..HoverContext::default()
            },
            ..Settings::default()
        };
        let hover = run(HEADER, Position::new(0, 15), &without).unwrap();
        assert!(markdown(&hover).starts_with("[1:1]"));
    }

    #[test]
    fn missing_verses_render_as_placeholders_when_asked() {
        let document = Document::new(HEADER, 1);
        let source = ephesians().without("Ephesians", 1, 2);
        let resolution = DocumentResolution::compute(&document, &source);
        let settings = Settings {
            hover_context: HoverContext {
                verse_count: 0,
                show_missing_as_placeholder: true,
                ..HoverContext::default()
            },
            ..Settings::default()
        };
        let hover = hover(&document, &resolution, Position::new(0, 15), &settings).unwrap();
        assert!(markdown(&hover).contains("[1:2] *(missing)*"));
    }

    #[test]
    fn hover_outside_any_segment_is_none() {
        let settings = Settings::default();
        // Inside the book name.
        assert!(run(HEADER, Position::new(0, 6), &settings).is_none());
        // Past the end of the line.
        assert!(run(HEADER, Position::new(0, 40), &settings).is_none());
    }

    #[test]
    fn hover_can_be_disabled() {
        let settings = Settings {
            hover: false,
            ..Settings::default()
        };
        assert!(run(HEADER, Position::new(0, 15), &settings).is_none());
    }

    #[test]
    fn stale_resolution_produces_no_hover() {
        let old = Document::new(HEADER, 1);
        let resolution = DocumentResolution::compute(&old, &ephesians());
        let new = Document::new(HEADER, 2);
        let settings = Settings::default();
        assert!(hover(&new, &resolution, Position::new(0, 15), &settings).is_none());
    }
}
