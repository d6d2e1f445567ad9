//! In-memory representation of the open documents. The editor collaborator
//! pushes full text plus a version number on every edit; the previous parse
//! result (and anything derived from it) is discarded wholesale, which keeps
//! the reference invariants trivially maintained. There is no incremental
//! mutation of a parsed reference in place.
//!
//! Methods expose the parsed data without interpreting it; analysis belongs
//! to the feature providers.

use std::collections::HashMap;

use ropey::Rope;
use tower_lsp::lsp_types::{Position, Range, Url};

use crate::reference::{
    parse_header, ParseError, Reference, SegmentIndex, Span, HEADER_MARKER,
};

/// A parsed header plus its rebuilt positional index.
#[derive(Debug, Clone)]
pub struct ParsedReference {
    pub reference: Reference,
    pub index: SegmentIndex,
}

/// One open document: rope for position math, version token from the editor,
/// and the parse results of every header line.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
    version: i32,
    references: Vec<ParsedReference>,
    failures: Vec<ParseError>,
}

impl Document {
    pub fn new(text: &str, version: i32) -> Self {
        let (references, failures) = scan_headers(text);
        Document {
            rope: Rope::from_str(text),
            version,
            references,
            failures,
        }
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Headers that parsed, in document order.
    pub fn references(&self) -> &[ParsedReference] {
        &self.references
    }

    /// Headers that did not parse. Each failure is independent; one malformed
    /// header never suppresses the others.
    pub fn failures(&self) -> &[ParseError] {
        &self.failures
    }

    /// The reference whose source span contains `offset`.
    pub fn reference_at(&self, offset: usize) -> Option<(usize, &ParsedReference)> {
        self.references
            .iter()
            .enumerate()
            .find(|(_, parsed)| parsed.reference.span.contains(offset))
    }

    /// The `(reference, segment)` index pair owning `offset`, or `None` when
    /// the offset falls on the book name, a separator, or plain text.
    pub fn segment_at(&self, offset: usize) -> Option<(usize, usize)> {
        let (reference_index, parsed) = self.reference_at(offset)?;
        let segment_index = parsed.index.segment_at(offset)?;
        Some((reference_index, segment_index))
    }

    /// Byte offset of an LSP position, clamped to the end of its line.
    pub fn position_to_offset(&self, position: Position) -> Option<usize> {
        let line = position.line as usize;
        let line_start = self.rope.try_line_to_char(line).ok()?;
        let line_end = if line + 1 < self.rope.len_lines() {
            self.rope.line_to_char(line + 1)
        } else {
            self.rope.len_chars()
        };
        let char_index = (line_start + position.character as usize).min(line_end);
        Some(self.rope.char_to_byte(char_index))
    }

    /// Convert a byte span to an LSP range using rope-based char counting.
    pub fn span_to_range(&self, span: Span) -> Range {
        Range {
            start: self.offset_to_position(span.start),
            end: self.offset_to_position(span.end),
        }
    }

    pub fn offset_to_position(&self, offset: usize) -> Position {
        let char_index = self.rope.byte_to_char(offset.min(self.rope.len_bytes()));
        let line = self.rope.char_to_line(char_index);
        let character = char_index - self.rope.line_to_char(line);
        Position {
            line: line as u32,
            character: character as u32,
        }
    }

    /// The line's text strictly before the cursor, for completion scanning.
    pub fn line_prefix(&self, position: Position) -> Option<String> {
        let line = self.rope.get_line(position.line as usize)?;
        Some(line.chars().take(position.character as usize).collect())
    }

    /// Reverse mapping of the segment index: the span of the body block that
    /// holds a segment's verse content. Blocks are blank-line separated and
    /// appear in segment order below the header, per the body format.
    pub fn segment_body_span(
        &self,
        reference_index: usize,
        segment_index: usize,
    ) -> Option<Span> {
        let parsed = self.references.get(reference_index)?;
        parsed.reference.segments.get(segment_index)?;

        let header_line = self.rope.byte_to_line(parsed.reference.span.start);
        let mut block: Option<(usize, usize)> = None;
        let mut blocks_seen = 0usize;

        for line_index in (header_line + 1)..self.rope.len_lines() {
            let text: String = self.rope.line(line_index).chars().collect();
            if text.starts_with(HEADER_MARKER) {
                break;
            }
            if text.trim().is_empty() {
                if let Some((start, end)) = block.take() {
                    if blocks_seen == segment_index {
                        return Some(Span::new(start, end));
                    }
                    blocks_seen += 1;
                }
                continue;
            }
            let start = self.rope.line_to_byte(line_index);
            let end = start + text.trim_end().len();
            block = Some(match block {
                Some((block_start, _)) => (block_start, end),
                None => (start, end),
            });
        }

        match block {
            Some((start, end)) if blocks_seen == segment_index => Some(Span::new(start, end)),
            _ => None,
        }
    }
}

/// Parse every `### ` line of the document. Each header is parsed
/// independently; failures for one line never abort the rest.
fn scan_headers(text: &str) -> (Vec<ParsedReference>, Vec<ParseError>) {
    let mut references = Vec::new();
    let mut failures = Vec::new();
    let mut offset = 0usize;

    for raw_line in text.split_inclusive('\n') {
        let line = raw_line.trim_end_matches(['\n', '\r']);
        if line.starts_with(HEADER_MARKER) {
            match parse_header(line, offset) {
                Ok(reference) => {
                    let index = SegmentIndex::new(&reference);
                    references.push(ParsedReference { reference, index });
                }
                Err(failure) => failures.push(failure),
            }
        }
        offset += raw_line.len();
    }

    (references, failures)
}

/// All open documents, keyed by URI. Single-writer: the request loop replaces
/// documents wholesale; providers only read.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    documents: HashMap<Url, Document>,
}

impl Workspace {
    pub fn new() -> Self {
        Workspace::default()
    }

    pub fn open_document(&mut self, uri: Url, version: i32, text: &str) {
        self.documents.insert(uri, Document::new(text, version));
    }

    /// Full replacement; edits are applied in the order received.
    pub fn update_document(&mut self, uri: &Url, version: i32, text: &str) {
        self.documents
            .insert(uri.clone(), Document::new(text, version));
    }

    pub fn close_document(&mut self, uri: &Url) {
        self.documents.remove(uri);
    }

    pub fn get_document(&self, uri: &Url) -> Option<&Document> {
        self.documents.get(uri)
    }

    pub fn document_count(&self) -> usize {
        self.documents.len()
    }
}
