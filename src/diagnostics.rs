//! Diagnostics provider.
//!
//! Three kinds of diagnostic, none of them fatal to the host document:
//!
//! | Condition | Severity |
//! |-----------|----------|
//! | Header failed to parse | `ERROR` |
//! | Source failed while resolving a reference | `WARNING` |
//! | Well-formed reference to verses the source lacks | `INFORMATION` |
//!
//! The missing-verse message obeys [`DiagnosticsMode`]: reference-only,
//! first-verse context per affected segment, or the full verse listing with
//! MISSING markers.

use itertools::Itertools;
use rayon::prelude::*;
use tower_lsp::lsp_types::{Diagnostic, DiagnosticSeverity};

use crate::config::{DiagnosticsMode, Settings};
use crate::formatter::{reference_label, verse_line};
use crate::resolver::{DocumentResolution, ResolvedReference, VerseText};
use crate::workspace::Document;

const SOURCE_NAME: &str = "verseref";

pub fn diagnostics(
    document: &Document,
    resolution: &DocumentResolution,
    settings: &Settings,
) -> Vec<Diagnostic> {
    let mut diags: Vec<Diagnostic> = document
        .failures()
        .iter()
        .map(|failure| Diagnostic {
            range: document.span_to_range(failure.span),
            severity: Some(DiagnosticSeverity::ERROR),
            message: failure.kind.to_string(),
            source: Some(SOURCE_NAME.into()),
            ..Default::default()
        })
        .collect();

    // A resolution for another version is never blended in; the next
    // request will carry a matching one.
    if resolution.version != document.version() {
        return diags;
    }

    let content_diags: Vec<Diagnostic> = resolution
        .references
        .par_iter()
        .flat_map(|resolved| reference_diagnostics(document, resolved, settings.diagnostics_mode))
        .collect();

    diags.extend(content_diags);
    diags
}

fn reference_diagnostics(
    document: &Document,
    resolved: &ResolvedReference,
    mode: DiagnosticsMode,
) -> Vec<Diagnostic> {
    let range = document.span_to_range(resolved.reference.span);

    if let Some(failure) = &resolved.failure {
        // Everything after a source failure is missing anyway; flagging the
        // individual verses on top would only add noise.
        return vec![Diagnostic {
            range,
            severity: Some(DiagnosticSeverity::WARNING),
            message: format!(
                "{}: {failure}",
                reference_label(&resolved.reference)
            ),
            source: Some(SOURCE_NAME.into()),
            ..Default::default()
        }];
    }

    let missing = resolved.missing_keys();
    if missing.is_empty() {
        return Vec::new();
    }

    let flagged = format!(
        "missing verses: {}",
        missing.iter().map(ToString::to_string).join(", ")
    );
    let message = match mode {
        DiagnosticsMode::ReferenceOnly => flagged,
        DiagnosticsMode::FirstVerse => {
            let context = resolved
                .segments
                .iter()
                .filter(|segment| segment.missing_count() > 0)
                .filter_map(|segment| {
                    let first = segment.verses.first()?;
                    Some(match &first.text {
                        VerseText::Text(text) => verse_line(first.chapter, first.verse, text),
                        VerseText::Missing => verse_line(first.chapter, first.verse, "MISSING"),
                    })
                })
                .join("\n");
            format!("{flagged}\n{context}")
        }
        DiagnosticsMode::AllVerses => {
            let listing = resolved
                .segments
                .iter()
                .flat_map(|segment| &segment.verses)
                .map(|verse| match &verse.text {
                    VerseText::Text(text) => verse_line(verse.chapter, verse.verse, text),
                    VerseText::Missing => verse_line(verse.chapter, verse.verse, "MISSING"),
                })
                .join("\n");
            format!("{flagged}\n{listing}")
        }
    };

    vec![Diagnostic {
        range,
        severity: Some(DiagnosticSeverity::INFORMATION),
        message,
        source: Some(SOURCE_NAME.into()),
        ..Default::default()
    }]
}
