//! Book name completion.
//!
//! Activates on a header line where no digit has been typed yet, for
//! example `### Ephe|` where `|` is the cursor. Candidates come from the
//! content source's book list, ranked by fuzzy match against whatever
//! follows the marker. The accepted item replaces everything after the
//! marker, so a half-typed abbreviation never lingers.

use itertools::Itertools;
use nucleo_matcher::{
    pattern::{self, Normalization},
    Matcher, Utf32Str,
};
use tower_lsp::lsp_types::{
    CompletionItem, CompletionItemKind, CompletionTextEdit, Documentation, MarkupContent,
    MarkupKind, Position, Range, TextEdit,
};

use crate::reference::HEADER_MARKER;

use super::{Completable, Completer, Context};

pub struct BookCompleter {
    query: String,
    books: Vec<String>,
    line: u32,
    character: u32,
}

impl<'a> Completer<'a> for BookCompleter {
    fn construct(context: Context<'a>, position: Position) -> Option<Self>
    where
        Self: Sized + Completer<'a>,
    {
        let prefix = context.document.line_prefix(position)?;
        let rest = prefix.strip_prefix(HEADER_MARKER)?;
        if rest.contains(|c: char| c.is_ascii_digit()) {
            return None;
        }

        Some(Self {
            query: rest.trim_start().to_string(),
            books: context.source.book_names(),
            line: position.line,
            character: position.character,
        })
    }

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized,
    {
        let mut matcher = Matcher::new(nucleo_matcher::Config::DEFAULT);
        let pattern = pattern::Pattern::parse(
            &self.query,
            pattern::CaseMatching::Smart,
            Normalization::Smart,
        );

        self.books
            .iter()
            .map(|name| {
                let mut buf = Vec::new();
                let score = pattern
                    .score(Utf32Str::new(name.as_str(), &mut buf), &mut matcher)
                    .unwrap_or_default();
                (score, name)
            })
            .filter(|(score, _)| self.query.is_empty() || *score > 0)
            .sorted_by(|(a, _), (b, _)| Ord::cmp(b, a))
            .map(|(_score, name)| BookCompletion { name: name.clone() })
            .collect_vec()
    }
}

pub struct BookCompletion {
    name: String,
}

impl<'a> Completable<'a, BookCompleter> for BookCompletion {
    fn completions(&self, completer: &BookCompleter) -> Option<CompletionItem> {
        let replace_range = Range {
            start: Position {
                line: completer.line,
                character: HEADER_MARKER.len() as u32,
            },
            end: Position {
                line: completer.line,
                character: completer.character,
            },
        };

        Some(CompletionItem {
            label: self.name.clone(),
            kind: Some(CompletionItemKind::REFERENCE),
            documentation: Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: format!("### {}", self.name),
            })),
            text_edit: Some(CompletionTextEdit::Edit(TextEdit {
                range: replace_range,
                new_text: self.name.clone(),
            })),
            ..Default::default()
        })
    }
}
