//! Chapter and verse completion inside a header's segment list.
//!
//! The digits already typed decide what to offer next:
//!
//! | Typed so far            | Suggestions |
//! |-------------------------|-------------|
//! | `### Ephesians 1`       | chapters |
//! | `### Ephesians 1:`      | verses of chapter 1 |
//! | `### Ephesians 1:2-`    | verses after 2, closing the range |
//! | `### Ephesians 1:1-4,`  | verses after 4, plus later chapters |
//!
//! Digits touching the cursor are a token the client filters with, so they
//! are not part of the state; `1:2` is still "completing a verse of
//! chapter 1".

use once_cell::sync::Lazy;
use regex::Regex;
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, Documentation, MarkupContent, MarkupKind, Position,
};

use crate::reference::HEADER_MARKER;
use crate::source::ContentSource;

use super::{Completable, Completer, Context};

/// First segment item still being typed: digits, optionally a colon.
static FIRST_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(\d+)(:)?\s*$").unwrap());

/// Digits the cursor is touching; excluded from state analysis.
static TRAILING_PARTIAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+\s*$").unwrap());

/// Last explicit chapter, i.e. the last number followed by a colon.
static LAST_CHAPTER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*:").unwrap());

/// Last settled number before the end of input.
static LAST_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\D*$").unwrap());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum SegmentState {
    /// A chapter number is being typed.
    Chapters,
    /// A colon settled the chapter; verses from `from` upward.
    Verses { chapter: usize, from: usize },
    /// After a break both continue-verses and later chapters make sense.
    VersesAndChapters { chapter: usize, from_verse: usize },
}

pub struct SegmentCompleter<'a> {
    book: String,
    chapter_count: usize,
    state: SegmentState,
    source: &'a dyn ContentSource,
}

impl<'a> Completer<'a> for SegmentCompleter<'a> {
    fn construct(context: Context<'a>, position: Position) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let prefix = context.document.line_prefix(position)?;
        let rest = prefix.strip_prefix(HEADER_MARKER)?;
        let digit_at = rest.find(|c: char| c.is_ascii_digit())?;
        let book = rest[..digit_at].trim();
        if book.is_empty() {
            return None;
        }
        let chapter_count = context.source.chapter_count(book)?;
        let tail = &rest[digit_at..];

        let state = if let Some(cap) = FIRST_ITEM.captures(tail) {
            if cap.get(2).is_some() {
                let chapter = cap[1].parse().ok()?;
                SegmentState::Verses { chapter, from: 1 }
            } else {
                SegmentState::Chapters
            }
        } else {
            let settled = TRAILING_PARTIAL.replace(tail, "");
            let chapter = LAST_CHAPTER
                .captures_iter(&settled)
                .last()?
                .get(1)?
                .as_str()
                .parse()
                .ok()?;
            match settled.trim_end().chars().last()? {
                ':' => SegmentState::Verses { chapter, from: 1 },
                '-' => {
                    let verse = last_number(&settled)?;
                    SegmentState::Verses {
                        chapter,
                        from: verse + 1,
                    }
                }
                ',' => {
                    let verse = last_number(&settled)?;
                    SegmentState::VersesAndChapters {
                        chapter,
                        from_verse: verse + 1,
                    }
                }
                _ => return None,
            }
        };

        Some(Self {
            book: book.to_string(),
            chapter_count,
            state,
            source: context.source,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        match self.state {
            SegmentState::Chapters => self.chapters(1),
            SegmentState::Verses { chapter, from } => self.verses(chapter, from),
            SegmentState::VersesAndChapters { chapter, from_verse } => {
                let mut completions = self.verses(chapter, from_verse);
                completions.extend(self.chapters(chapter + 1));
                completions
            }
        }
    }
}

impl SegmentCompleter<'_> {
    fn chapters(&self, from: usize) -> Vec<SegmentCompletion> {
        (from..=self.chapter_count)
            .map(|number| SegmentCompletion::Chapter { number })
            .collect()
    }

    fn verses(&self, chapter: usize, from: usize) -> Vec<SegmentCompletion> {
        // An out-of-range chapter yields nothing rather than an error; the
        // diagnostics pass is where bad references get reported.
        let Some(max) = self.source.max_verse(&self.book, chapter) else {
            return Vec::new();
        };
        (from..=max)
            .map(|number| SegmentCompletion::Verse { chapter, number })
            .collect()
    }
}

fn last_number(settled: &str) -> Option<usize> {
    LAST_NUMBER.captures(settled)?.get(1)?.as_str().parse().ok()
}

pub enum SegmentCompletion {
    Chapter { number: usize },
    Verse { chapter: usize, number: usize },
}

impl<'a> Completable<'a, SegmentCompleter<'a>> for SegmentCompletion {
    fn completions(&self, completer: &SegmentCompleter<'a>) -> Option<CompletionItem> {
        let item = match *self {
            SegmentCompletion::Chapter { number } => CompletionItem {
                label: number.to_string(),
                kind: Some(CompletionItemKind::VALUE),
                detail: Some(format!("{} {number}", completer.book)),
                // Verses sort ahead of chapters, both numerically.
                sort_text: Some(format!("1{number:04}")),
                documentation: Some(Documentation::MarkupContent(MarkupContent {
                    kind: MarkupKind::Markdown,
                    value: format!("### {} {number}", completer.book),
                })),
                ..Default::default()
            },
            SegmentCompletion::Verse { chapter, number } => {
                let preview = completer
                    .source
                    .lookup(&completer.book, chapter, number)
                    .ok()
                    .flatten()
                    .map(|text| {
                        Documentation::MarkupContent(MarkupContent {
                            kind: MarkupKind::Markdown,
                            value: format!(
                                "### {} {chapter}:{number}\n\n[{chapter}:{number}] {text}",
                                completer.book
                            ),
                        })
                    });
                CompletionItem {
                    label: number.to_string(),
                    kind: Some(CompletionItemKind::VALUE),
                    detail: Some(format!("{} {chapter}:{number}", completer.book)),
                    sort_text: Some(format!("0{number:04}")),
                    documentation: preview,
                    ..Default::default()
                }
            }
        };
        Some(item)
    }
}
