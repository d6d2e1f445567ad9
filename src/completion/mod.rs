use tower_lsp::lsp_types::{
    CompletionItem, CompletionList, CompletionResponse, Position,
};

use crate::{config::Settings, source::ContentSource, workspace::Document};

use self::book_completer::BookCompleter;
use self::segment_completer::SegmentCompleter;

mod book_completer;
mod segment_completer;

#[derive(Clone, Copy)]
pub struct Context<'a> {
    document: &'a Document,
    source: &'a dyn ContentSource,
}

pub trait Completer<'a>: Sized {
    /// Inspect the line up to the cursor; `None` when this completer does
    /// not apply there, letting the next one in the chain try.
    fn construct(context: Context<'a>, position: Position) -> Option<Self>
    where
        Self: Sized + Completer<'a>;

    fn completions(&self) -> Vec<impl Completable<'a, Self>>
    where
        Self: Sized;
}

pub trait Completable<'a, T: Completer<'a>>: Sized {
    fn completions(&self, completer: &T) -> Option<CompletionItem>;
}

pub fn get_completions(
    document: &Document,
    source: &dyn ContentSource,
    position: Position,
    settings: &Settings,
) -> Option<CompletionResponse> {
    if !settings.completions {
        return None;
    }

    let context = Context { document, source };

    // Segment digits take precedence; the book completer only sees lines
    // where no number has been typed yet.
    run_completer::<SegmentCompleter>(context, position)
        .or_else(|| run_completer::<BookCompleter>(context, position))
}

fn run_completer<'a, T: Completer<'a>>(
    context: Context<'a>,
    position: Position,
) -> Option<CompletionResponse> {
    let completer = T::construct(context, position)?;
    let completions = completer.completions();

    let completions = completions
        .into_iter()
        .take(20)
        .flat_map(|completable| completable.completions(&completer))
        .collect::<Vec<CompletionItem>>();

    Some(CompletionResponse::List(CompletionList {
        is_incomplete: true,
        items: completions,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::ephesians;

    fn complete(text: &str, position: Position) -> Option<CompletionResponse> {
        let document = Document::new(text, 1);
        get_completions(&document, &ephesians(), position, &Settings::default())
    }

    fn labels(response: &CompletionResponse) -> Vec<String> {
        match response {
            CompletionResponse::List(list) => {
                list.items.iter().map(|item| item.label.clone()).collect()
            }
            other => panic!("unexpected response: {other:?}"),
        }
    }

    #[test]
    fn bare_marker_offers_every_book() {
        let response = complete("### \n", Position::new(0, 4)).unwrap();
        let labels = labels(&response);
        assert!(labels.contains(&"Genesis".to_string()));
        assert!(labels.contains(&"Ephesians".to_string()));
    }

    #[test]
    fn digits_switch_to_segment_suggestions() {
        let response = complete("### Ephesians 1:\n", Position::new(0, 16)).unwrap();
        assert_eq!(labels(&response), vec!["1", "2", "3", "4", "5", "6", "7"]);
    }

    #[test]
    fn plain_text_line_gets_nothing() {
        assert!(complete("Ephesians 1:1\n", Position::new(0, 13)).is_none());
    }

    #[test]
    fn completions_can_be_disabled() {
        let document = Document::new("### \n", 1);
        let settings = Settings {
            completions: false,
            ..Settings::default()
        };
        let response =
            get_completions(&document, &ephesians(), Position::new(0, 4), &settings);
        assert!(response.is_none());
    }
}
