//! The verse-content collaborator interface.
//!
//! The engine never owns verse text. It queries a [`ContentSource`] — an
//! explicitly injected collaborator, not ambient global state — so the whole
//! pipeline stays testable against a fake source. A verse the source does not
//! have is a data state (`Ok(None)`, surfaced downstream as a MISSING
//! marker), not an error; [`ContentError`] is reserved for the source itself
//! being unreachable.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure of the source itself, surfaced as a diagnostic and never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("verse source unavailable: {0}")]
    Unavailable(String),
    #[error("verse source timed out")]
    Timeout,
}

/// The lookup key for one verse. This is also the definition provider's
/// result: it names which verse maps to which entry in the source, and the
/// transport layer turns it into an editor-navigable location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VerseKey {
    pub book: String,
    pub chapter: usize,
    pub verse: usize,
}

impl std::fmt::Display for VerseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}:{}", self.book, self.chapter, self.verse)
    }
}

pub trait ContentSource {
    /// Canonical text of one verse. `Ok(None)` when the source has no such
    /// verse; `Err` only when the source itself fails.
    fn lookup(&self, book: &str, chapter: usize, verse: usize)
        -> Result<Option<String>, ContentError>;

    /// Display names of every known book, in canonical order.
    fn book_names(&self) -> Vec<String>;

    /// Number of chapters in a book, or `None` for an unknown book.
    fn chapter_count(&self, book: &str) -> Option<usize>;

    /// Highest verse number of a chapter, or `None` when unknown.
    fn max_verse(&self, book: &str, chapter: usize) -> Option<usize>;
}

/// Translation metadata carried by the JSON content format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    pub name: String,
    pub language: String,
    pub abbreviation: String,
}

/// Deserialization shape for one book:
/// `content[chapter - 1][verse - 1]` is the verse text.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct BookData {
    /// 1-based canonical position (Genesis = 1).
    id: usize,
    /// Display name.
    book: String,
    /// Accepted abbreviations, any case, not necessarily including the name.
    #[serde(default)]
    abbreviations: Vec<String>,
    content: Vec<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TranslationFile {
    translation: Translation,
    bible: Vec<BookData>,
}

/// A [`ContentSource`] backed by a single translation JSON file, reshaped at
/// load time into structures the lookups can index directly.
#[derive(Debug, Clone)]
pub struct JsonContentSource {
    translation: Translation,
    /// Display names in canonical order.
    names: Vec<String>,
    /// Lowercased names and abbreviations to index in `names`/`contents`.
    aliases: BTreeMap<String, usize>,
    /// `contents[book][chapter][verse]`, all 0-based.
    contents: Vec<Vec<Vec<String>>>,
}

impl JsonContentSource {
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading verse content from {}", path.display()))?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        let file: TranslationFile =
            serde_json::from_str(raw).context("malformed verse content JSON")?;

        let mut books = file.bible;
        books.sort_by_key(|book| book.id);

        let mut names = Vec::with_capacity(books.len());
        let mut aliases = BTreeMap::new();
        let mut contents = Vec::with_capacity(books.len());

        for (index, book) in books.into_iter().enumerate() {
            aliases.insert(book.book.to_lowercase(), index);
            for abbreviation in &book.abbreviations {
                aliases.insert(abbreviation.to_lowercase(), index);
            }
            names.push(book.book);
            contents.push(book.content);
        }

        Ok(JsonContentSource {
            translation: file.translation,
            names,
            aliases,
            contents,
        })
    }

    pub fn translation(&self) -> &Translation {
        &self.translation
    }

    /// Case-insensitive; a trailing period is tolerated so abbreviations can
    /// be written `Eph.`.
    fn book_index(&self, book: &str) -> Option<usize> {
        self.aliases
            .get(book.to_lowercase().trim_end_matches('.'))
            .copied()
    }
}

impl ContentSource for JsonContentSource {
    fn lookup(
        &self,
        book: &str,
        chapter: usize,
        verse: usize,
    ) -> Result<Option<String>, ContentError> {
        let text = self
            .book_index(book)
            .and_then(|index| self.contents.get(index))
            .and_then(|chapters| chapters.get(chapter.checked_sub(1)?))
            .and_then(|verses| verses.get(verse.checked_sub(1)?))
            .cloned();
        Ok(text)
    }

    fn book_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn chapter_count(&self, book: &str) -> Option<usize> {
        let index = self.book_index(book)?;
        Some(self.contents.get(index)?.len())
    }

    fn max_verse(&self, book: &str, chapter: usize) -> Option<usize> {
        let index = self.book_index(book)?;
        Some(
            self.contents
                .get(index)?
                .get(chapter.checked_sub(1)?)?
                .len(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::EPHESIANS_JSON;

    fn source() -> JsonContentSource {
        JsonContentSource::from_json(EPHESIANS_JSON).unwrap()
    }

    #[test]
    fn lookup_returns_verse_text() {
        let source = source();
        let text = source.lookup("Ephesians", 2, 4).unwrap();
        assert!(text.unwrap().starts_with("But God"));
    }

    #[test]
    fn lookup_is_case_insensitive_and_accepts_abbreviations() {
        let source = source();
        assert!(source.lookup("ephesians", 1, 1).unwrap().is_some());
        assert!(source.lookup("Eph", 1, 1).unwrap().is_some());
        assert!(source.lookup("eph.", 1, 1).unwrap().is_some());
    }

    #[test]
    fn absent_verse_is_none_not_an_error() {
        let source = source();
        assert_eq!(source.lookup("Ephesians", 1, 999).unwrap(), None);
        assert_eq!(source.lookup("Ephesians", 99, 1).unwrap(), None);
        assert_eq!(source.lookup("Hezekiah", 1, 1).unwrap(), None);
    }

    #[test]
    fn shape_queries_report_bounds() {
        let source = source();
        assert_eq!(source.chapter_count("Ephesians"), Some(2));
        assert_eq!(source.max_verse("Ephesians", 1), Some(7));
        assert_eq!(source.max_verse("Ephesians", 3), None);
        assert_eq!(source.chapter_count("Hezekiah"), None);
    }

    #[test]
    fn book_names_are_display_names_in_canonical_order() {
        let source = source();
        assert_eq!(source.book_names(), vec!["Ephesians".to_string()]);
    }

    #[test]
    fn malformed_json_is_a_load_error() {
        assert!(JsonContentSource::from_json("{ not json").is_err());
    }
}
