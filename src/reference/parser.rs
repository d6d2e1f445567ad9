//! Grammar parser for reference header lines.
//!
//! The grammar, bit-exact:
//!
//! ```text
//! header ::= "### " <book> " " <item> ("," <item>)*
//! item   ::= <int> ":" <range> | <range>
//! range  ::= <int> | <int> "-" <int>
//! ```
//!
//! The book name is the run of non-digit characters up to the first integer
//! token, trimmed of surrounding whitespace. Whitespace around commas,
//! colons, and hyphens is tolerated and stripped. An item without an explicit
//! chapter inherits the chapter of the preceding item (the carry-over rule),
//! implemented as a fold carrying the current chapter so the parser stays a
//! pure function over the line.
//!
//! Parsing is per header: a malformed header aborts interpretation of that
//! header only, never of other headers in the same document.

use thiserror::Error;

use super::{Reference, ReferenceSegment, Span};

/// Leading marker of a header line. The trailing space is mandatory.
pub const HEADER_MARKER: &str = "### ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The second verse of a range is smaller than the first, as in `1:5-3`.
    #[error("verse range {start}-{end} is inverted")]
    InvalidRange { start: usize, end: usize },
    /// A bare verse range appeared before any chapter was established, as in
    /// `### Ephesians 5-7`. The first item must include a chapter.
    #[error("verse range has no chapter to inherit")]
    DanglingVerseRange,
    /// A lone integer appeared before any chapter was established, as in
    /// `### Ephesians 3`. Whole-chapter references are not supported.
    #[error("bare chapter reference is not supported; add a verse range")]
    UnsupportedBareChapter,
    /// An empty item, a missing verse after `:`, or a zero (chapters and
    /// verses start at 1).
    #[error("expected a number greater than zero")]
    ExpectedNumber,
    /// Text that is not part of the grammar, as in `### Ephesians 1:1-4 KJV`.
    #[error("unexpected text after the reference")]
    TrailingCharacters,
    /// No book name before the first integer token.
    #[error("expected a book name before the reference")]
    MissingBook,
    /// The line does not start with `### `.
    #[error("line is not a reference header")]
    NotAHeader,
}

/// A structured parse failure: where, and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (offset {offset})")]
pub struct ParseError {
    /// Byte offset into the document where the problem starts.
    pub offset: usize,
    /// Span of the offending text, for diagnostics.
    pub span: Span,
    pub kind: ParseErrorKind,
}

impl ParseError {
    fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError {
            offset: span.start,
            span,
            kind,
        }
    }
}

/// Parse one header line into a [`Reference`].
///
/// `base` is the byte offset of the line's first character within the
/// document; all spans and error offsets are document-absolute. Pure
/// function: no side effects, no shared state.
pub fn parse_header(line: &str, base: usize) -> Result<Reference, ParseError> {
    let Some(rest) = line.strip_prefix(HEADER_MARKER) else {
        return Err(ParseError::new(
            ParseErrorKind::NotAHeader,
            Span::new(base, base + line.len()),
        ));
    };

    let book_base = base + HEADER_MARKER.len();
    let Some(list_start) = rest.find(|c: char| c.is_ascii_digit()) else {
        let end = book_base + rest.trim_end().len();
        return Err(ParseError::new(
            ParseErrorKind::ExpectedNumber,
            Span::new(end, end),
        ));
    };

    let book = rest[..list_start].trim();
    if book.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::MissingBook,
            Span::new(book_base, book_base + list_start),
        ));
    }

    let segments = parse_list(&rest[list_start..], book_base + list_start)?;
    let end = segments.last().map_or(book_base + list_start, |s| s.span.end);

    Ok(Reference {
        book: book.to_string(),
        segments,
        span: Span::new(base, end),
    })
}

/// Fold over comma-separated items, carrying the current chapter.
fn parse_list(list: &str, base: usize) -> Result<Vec<ReferenceSegment>, ParseError> {
    let mut segments = Vec::new();
    let mut current_chapter: Option<usize> = None;
    let mut cursor = 0usize;

    for raw in list.split(',') {
        let (item, item_base) = trim_with_offset(raw, base + cursor);
        cursor += raw.len() + 1;

        let segment = parse_item(item, item_base, current_chapter)?;
        current_chapter = Some(segment.chapter);
        segments.push(segment);
    }

    Ok(segments)
}

fn parse_item(
    item: &str,
    base: usize,
    current_chapter: Option<usize>,
) -> Result<ReferenceSegment, ParseError> {
    let span = Span::new(base, base + item.len());
    if item.is_empty() {
        return Err(ParseError::new(ParseErrorKind::ExpectedNumber, span));
    }

    if let Some((chapter_text, range_text)) = item.split_once(':') {
        let chapter = parse_number(chapter_text, base)?;
        let (verse_start, verse_end) =
            parse_range(range_text, base + chapter_text.len() + 1)?;
        return Ok(ReferenceSegment {
            chapter,
            verse_start,
            verse_end,
            span,
        });
    }

    // No explicit chapter: inherit the current one, or report why we can't.
    match (current_chapter, item.contains('-')) {
        (Some(chapter), _) => {
            let (verse_start, verse_end) = parse_range(item, base)?;
            Ok(ReferenceSegment {
                chapter,
                verse_start,
                verse_end,
                span,
            })
        }
        (None, true) => Err(ParseError::new(ParseErrorKind::DanglingVerseRange, span)),
        (None, false) => {
            // Make sure malformed tokens report as such, not as bare chapters.
            parse_number(item, base)?;
            Err(ParseError::new(ParseErrorKind::UnsupportedBareChapter, span))
        }
    }
}

fn parse_range(text: &str, base: usize) -> Result<(usize, usize), ParseError> {
    let (text, base) = trim_with_offset(text, base);

    let Some((start_text, end_text)) = text.split_once('-') else {
        let verse = parse_number(text, base)?;
        return Ok((verse, verse));
    };

    let start = parse_number(start_text, base)?;
    let end = parse_number(end_text, base + start_text.len() + 1)?;
    if end < start {
        return Err(ParseError::new(
            ParseErrorKind::InvalidRange { start, end },
            Span::new(base, base + text.len()),
        ));
    }
    Ok((start, end))
}

/// Parse a positive integer, rejecting zero and anything after the digits.
fn parse_number(text: &str, base: usize) -> Result<usize, ParseError> {
    let (text, base) = trim_with_offset(text, base);
    let digits_end = text
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len());
    let (digits, rest) = text.split_at(digits_end);

    if digits.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::ExpectedNumber,
            Span::new(base, base + text.len()),
        ));
    }
    if !rest.is_empty() {
        return Err(ParseError::new(
            ParseErrorKind::TrailingCharacters,
            Span::new(base + digits_end, base + text.len()),
        ));
    }

    match digits.parse::<usize>() {
        Ok(value) if value >= 1 => Ok(value),
        _ => Err(ParseError::new(
            ParseErrorKind::ExpectedNumber,
            Span::new(base, base + digits_end),
        )),
    }
}

fn trim_with_offset(text: &str, base: usize) -> (&str, usize) {
    let trimmed_start = text.trim_start();
    let base = base + (text.len() - trimmed_start.len());
    (trimmed_start.trim_end(), base)
}
