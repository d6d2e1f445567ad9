use std::path::Path;

use anyhow::anyhow;
use config::{Config, File};
use serde::Deserialize;

/// Engine configuration. Consumed, not owned: the editor collaborator can
/// override any of this per workspace via `<root>/.verseref`, layered over
/// `~/.config/verseref/settings`.
#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// Verbosity of missing-verse diagnostics.
    pub diagnostics_mode: DiagnosticsMode,
    pub hover: bool,
    pub hover_context: HoverContext,
    pub completions: bool,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Eq)]
pub enum DiagnosticsMode {
    /// Flag missing verses by reference only.
    ReferenceOnly,
    /// Include each affected segment's first verse for context.
    FirstVerse,
    /// Include every resolved verse, flagging the missing ones.
    AllVerses,
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub struct HoverContext {
    /// Verses of context shown per hovered segment; 0 means all of them.
    pub verse_count: usize,
    pub show_chapter_heading: bool,
    pub show_missing_as_placeholder: bool,
}

impl Settings {
    pub fn new(root_dir: &Path) -> anyhow::Result<Settings> {
        let expanded = shellexpand::tilde("~/.config/verseref/settings");
        let settings = Config::builder()
            .add_source(File::with_name(&expanded).required(false))
            .add_source(
                File::with_name(&format!(
                    "{}/.verseref",
                    root_dir
                        .to_str()
                        .ok_or(anyhow!("Can't convert root_dir to str"))?
                ))
                .required(false),
            )
            .set_default("diagnostics_mode", "FirstVerse")?
            .set_default("hover", true)?
            .set_default("hover_context.verse_count", 3)?
            .set_default("hover_context.show_chapter_heading", true)?
            .set_default("hover_context.show_missing_as_placeholder", true)?
            .set_default("completions", true)?
            .build()
            .map_err(|err| anyhow!("Build err: {err}"))?;

        let settings = settings.try_deserialize::<Settings>()?;

        anyhow::Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            diagnostics_mode: DiagnosticsMode::FirstVerse,
            hover: true,
            hover_context: HoverContext::default(),
            completions: true,
        }
    }
}

impl Default for HoverContext {
    fn default() -> Self {
        HoverContext {
            verse_count: 3,
            show_chapter_heading: true,
            show_missing_as_placeholder: true,
        }
    }
}
