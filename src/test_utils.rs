//! Shared test fixtures: an in-memory verse source with controllable holes
//! and failures, plus a small JSON translation document. Only compiled for
//! tests.

use std::collections::BTreeMap;

use tower_lsp::lsp_types::Url;

use crate::source::{ContentError, ContentSource};

/// A deterministic in-memory [`ContentSource`]. Verses can be removed to
/// model gaps in the collaborator's data, and the whole source can be made
/// to fail to model an unreachable collaborator.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    names: Vec<String>,
    /// Verse counts per chapter, per book.
    shape: BTreeMap<String, Vec<usize>>,
    verses: BTreeMap<(String, usize, usize), String>,
    failure: Option<ContentError>,
}

impl FakeSource {
    pub fn with_book(mut self, name: &str, chapters: &[usize]) -> Self {
        self.names.push(name.to_string());
        self.shape.insert(name.to_string(), chapters.to_vec());
        for (chapter_index, verse_count) in chapters.iter().enumerate() {
            let chapter = chapter_index + 1;
            for verse in 1..=*verse_count {
                self.verses.insert(
                    (name.to_string(), chapter, verse),
                    format!("{name} {chapter}:{verse} content"),
                );
            }
        }
        self
    }

    /// Drop one verse, modelling a gap in the collaborator's data. The
    /// chapter shape is untouched, matching a store that knows the verse
    /// should exist but has no text for it.
    pub fn without(mut self, book: &str, chapter: usize, verse: usize) -> Self {
        self.verses.remove(&(book.to_string(), chapter, verse));
        self
    }

    pub fn failing_with(mut self, failure: ContentError) -> Self {
        self.failure = Some(failure);
        self
    }
}

impl ContentSource for FakeSource {
    fn lookup(
        &self,
        book: &str,
        chapter: usize,
        verse: usize,
    ) -> Result<Option<String>, ContentError> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(self
            .verses
            .get(&(book.to_string(), chapter, verse))
            .cloned())
    }

    fn book_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn chapter_count(&self, book: &str) -> Option<usize> {
        Some(self.shape.get(book)?.len())
    }

    fn max_verse(&self, book: &str, chapter: usize) -> Option<usize> {
        self.shape
            .get(book)?
            .get(chapter.checked_sub(1)?)
            .copied()
    }
}

/// Ephesians with two chapters (7 and 4 verses), plus neighbours so
/// completion has more than one book to rank.
pub fn ephesians() -> FakeSource {
    FakeSource::default()
        .with_book("Genesis", &[31, 25])
        .with_book("Exodus", &[22])
        .with_book("Ephesians", &[7, 4])
        .with_book("Ezra", &[11])
}

pub fn failing_source() -> FakeSource {
    ephesians().failing_with(ContentError::Unavailable("store offline".to_string()))
}

pub fn uri(text: &str) -> Url {
    Url::parse(text).expect("test URI must parse")
}

/// A minimal translation file in the JSON shape the loader accepts:
/// Ephesians only, two chapters.
pub const EPHESIANS_JSON: &str = r#"{
  "translation": { "name": "Test Translation", "language": "en", "abbreviation": "TT" },
  "bible": [
    {
      "id": 49,
      "book": "Ephesians",
      "abbreviations": ["Eph", "Ephes"],
      "content": [
        [
          "Paul, an apostle of Christ Jesus by the will of God, to the saints who are in Ephesus.",
          "Grace to you and peace from God our Father and the Lord Jesus Christ.",
          "Blessed be the God and Father of our Lord Jesus Christ.",
          "Even as he chose us in him before the foundation of the world.",
          "He predestined us for adoption to himself as sons through Jesus Christ.",
          "To the praise of his glorious grace, with which he has blessed us.",
          "In him we have redemption through his blood, the forgiveness of our trespasses."
        ],
        [
          "And you were dead in the trespasses and sins.",
          "In which you once walked, following the course of this world.",
          "Among whom we all once lived in the passions of our flesh.",
          "But God, being rich in mercy, because of the great love with which he loved us."
        ]
      ]
    }
  ]
}"#;
