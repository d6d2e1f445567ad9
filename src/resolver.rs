//! Content resolution: filling a parsed reference with verse text from the
//! injected [`ContentSource`], and the per-document cache in front of it.
//!
//! Resolution always succeeds. A verse the source does not have becomes a
//! [`VerseText::Missing`] marker; a source failure is recorded on the
//! reference and the affected verses degrade to missing, so diagnostics can
//! report the gap instead of the pipeline aborting.
//!
//! The cache holds exactly one resolution per document, keyed by the version
//! the resolution was computed from. A newer version evicts the old entry
//! outright; stale hover or diagnostic data is worse than a brief recompute.
//! Cancellation is last-edit-wins: a resolution computed for version N is
//! simply not admitted once version N+1 exists, and is never blended with a
//! fresher one.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use tower_lsp::lsp_types::Url;

use crate::reference::{Reference, ReferenceSegment};
use crate::source::{ContentError, ContentSource, VerseKey};
use crate::workspace::Document;

/// Verse content, or the MISSING marker for a well-formed reference to a
/// verse the source does not have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerseText {
    Text(String),
    Missing,
}

impl VerseText {
    pub fn is_missing(&self) -> bool {
        matches!(self, VerseText::Missing)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            VerseText::Text(text) => Some(text),
            VerseText::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedVerse {
    pub chapter: usize,
    pub verse: usize,
    pub text: VerseText,
}

/// One segment with its verses resolved, verse-ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSegment {
    pub segment: ReferenceSegment,
    pub verses: Vec<ResolvedVerse>,
}

impl ResolvedSegment {
    pub fn missing_count(&self) -> usize {
        self.verses.iter().filter(|v| v.text.is_missing()).count()
    }
}

/// A [`Reference`] plus resolved content for each segment, in segment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedReference {
    pub reference: Reference,
    pub segments: Vec<ResolvedSegment>,
    /// First source failure hit while resolving, if any. Verses after a
    /// failure degrade to missing rather than aborting the resolution.
    pub failure: Option<ContentError>,
}

impl ResolvedReference {
    pub fn resolve(reference: &Reference, source: &dyn ContentSource) -> Self {
        let mut failure = None;
        let segments = reference
            .segments
            .iter()
            .map(|segment| resolve_segment(&reference.book, segment, source, &mut failure))
            .collect();
        ResolvedReference {
            reference: reference.clone(),
            segments,
            failure,
        }
    }

    /// Keys of every verse that resolved to missing, in textual order.
    pub fn missing_keys(&self) -> Vec<VerseKey> {
        self.segments
            .iter()
            .flat_map(|resolved| {
                resolved
                    .verses
                    .iter()
                    .filter(|verse| verse.text.is_missing())
                    .map(|verse| VerseKey {
                        book: self.reference.book.clone(),
                        chapter: verse.chapter,
                        verse: verse.verse,
                    })
            })
            .collect()
    }
}

fn resolve_segment(
    book: &str,
    segment: &ReferenceSegment,
    source: &dyn ContentSource,
    failure: &mut Option<ContentError>,
) -> ResolvedSegment {
    let verses = segment
        .verses()
        .map(|verse| {
            let text = match source.lookup(book, segment.chapter, verse) {
                Ok(Some(text)) => VerseText::Text(text),
                Ok(None) => VerseText::Missing,
                Err(error) => {
                    failure.get_or_insert(error);
                    VerseText::Missing
                }
            };
            ResolvedVerse {
                chapter: segment.chapter,
                verse,
                text,
            }
        })
        .collect();
    ResolvedSegment {
        segment: segment.clone(),
        verses,
    }
}

/// Every reference of one document version, resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentResolution {
    pub version: i32,
    pub references: Vec<ResolvedReference>,
}

impl DocumentResolution {
    /// Query the source once per `(book, chapter, verse)`, segment order,
    /// verse-ascending, for every reference of the document as it stands at
    /// compute time.
    pub fn compute(document: &Document, source: &dyn ContentSource) -> Self {
        let references = document
            .references()
            .iter()
            .map(|parsed| ResolvedReference::resolve(&parsed.reference, source))
            .collect();
        DocumentResolution {
            version: document.version(),
            references,
        }
    }
}

/// Single-entry-per-document resolution cache. The resolution pipeline is the
/// only writer; feature providers are read-only consumers.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    cache: HashMap<Url, DocumentResolution>,
}

impl Resolver {
    pub fn new() -> Self {
        Resolver::default()
    }

    /// Resolve lazily: reuse the cached entry when its version matches the
    /// document, recompute (and replace wholesale) otherwise.
    pub fn resolve(
        &mut self,
        uri: &Url,
        document: &Document,
        source: &dyn ContentSource,
    ) -> &DocumentResolution {
        match self.cache.entry(uri.clone()) {
            Entry::Occupied(mut entry) => {
                if entry.get().version != document.version() {
                    entry.insert(DocumentResolution::compute(document, source));
                }
                entry.into_mut()
            }
            Entry::Vacant(entry) => {
                entry.insert(DocumentResolution::compute(document, source))
            }
        }
    }

    /// Admit a resolution computed out-of-band. Discarded unconditionally
    /// when the document has moved on since compute started.
    pub fn admit(&mut self, uri: &Url, resolution: DocumentResolution, current_version: i32) -> bool {
        if resolution.version != current_version {
            return false;
        }
        self.cache.insert(uri.clone(), resolution);
        true
    }

    /// The cached resolution, only if it is exactly `version`.
    pub fn get(&self, uri: &Url, version: i32) -> Option<&DocumentResolution> {
        self.cache
            .get(uri)
            .filter(|resolution| resolution.version == version)
    }

    pub fn invalidate(&mut self, uri: &Url) {
        self.cache.remove(uri);
    }
}
