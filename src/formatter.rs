//! Canonical rendering of references and resolved content.
//!
//! The formatter is the inverse of the grammar parser and that is a
//! contract, not an accident: completion insertion and "normalize this
//! reference" both re-parse what the formatter emits, so
//! `parse(format(reference))` must reproduce the reference for anything the
//! parser can produce. The formatter therefore never emits a shape the
//! grammar cannot read back (and never repeats a chapter the carry-over rule
//! would elide).

use crate::reference::{Reference, HEADER_MARKER};
use crate::resolver::{ResolvedReference, VerseText};

/// `Ephesians 1:1-4, 5-7, 2:3-4` — the reference without the header marker.
///
/// A segment sharing its chapter with the previous segment renders without
/// the chapter, matching the carry-over rule of the grammar.
pub fn reference_label(reference: &Reference) -> String {
    let mut previous_chapter: Option<usize> = None;
    let items: Vec<String> = reference
        .segments
        .iter()
        .map(|segment| {
            let item = match (previous_chapter == Some(segment.chapter), segment.is_single_verse()) {
                (true, true) => format!("{}", segment.verse_start),
                (true, false) => format!("{}-{}", segment.verse_start, segment.verse_end),
                (false, true) => format!("{}:{}", segment.chapter, segment.verse_start),
                (false, false) => format!(
                    "{}:{}-{}",
                    segment.chapter, segment.verse_start, segment.verse_end
                ),
            };
            previous_chapter = Some(segment.chapter);
            item
        })
        .collect();
    format!("{} {}", reference.book, items.join(", "))
}

/// The canonical header line: `### Ephesians 1:1-4, 5-7, 2:3-4`.
pub fn format_reference(reference: &Reference) -> String {
    format!("{HEADER_MARKER}{}", reference_label(reference))
}

/// One body line: `[1:4] even as he chose us…`.
pub fn verse_line(chapter: usize, verse: usize, text: &str) -> String {
    format!("[{chapter}:{verse}] {text}")
}

/// Body blocks in segment order, verses ascending within each segment, one
/// blank line between segments. Missing verses are skipped.
pub fn format_content(resolved: &ResolvedReference) -> String {
    format_content_with(resolved, None)
}

/// Like [`format_content`], but rendering missing verses with `placeholder`
/// instead of dropping them. Hover uses this when configured to show gaps.
pub fn format_content_with(resolved: &ResolvedReference, placeholder: Option<&str>) -> String {
    resolved
        .segments
        .iter()
        .map(|segment| {
            segment
                .verses
                .iter()
                .filter_map(|verse| match (&verse.text, placeholder) {
                    (VerseText::Text(text), _) => {
                        Some(verse_line(verse.chapter, verse.verse, text))
                    }
                    (VerseText::Missing, Some(placeholder)) => {
                        Some(verse_line(verse.chapter, verse.verse, placeholder))
                    }
                    (VerseText::Missing, None) => None,
                })
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|block| !block.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Header, blank line, body blocks — the full round-trippable document form.
pub fn format_document(resolved: &ResolvedReference) -> String {
    format!(
        "{}\n\n{}",
        format_reference(&resolved.reference),
        format_content(resolved)
    )
}
