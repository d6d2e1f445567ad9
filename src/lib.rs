//! verseref: editor intelligence for scripture references in plain text
//!
//! This crate is the engine behind scripture-aware editing support: it finds
//! reference headers in markdown-ish documents, resolves them against a
//! translation's content, and answers the questions an editor asks about
//! them.
//!
//! # Overview
//!
//! A reference header looks like `### Ephesians 1:1-4, 5-7, 2:3-4`: a book
//! name followed by comma-separated segments, where a segment is a verse, a
//! verse range, or a chapter-qualified form of either. Chapters carry over
//! left to right, so `5-7` above still means chapter 1.
//!
//! On top of that single grammar the crate provides:
//!
//! - **Parsing**: strict reference grammar with byte-accurate error spans
//! - **Resolution**: verse text lookup with explicit MISSING gaps
//! - **Formatting**: canonical headers and verse body blocks
//! - **Diagnostics**: parse errors, source failures, and missing verses
//! - **Hover**: verse text preview for the segment under the cursor
//! - **Completion**: book names, then chapters and verses as you type
//! - **Definition**: the first verse a segment points at
//!
//! # Architecture
//!
//! - [`reference`]: the reference model, parser, and segment index
//! - [`source`]: the [`source::ContentSource`] trait and its JSON impl
//! - [`workspace`]: open documents, their parses, and position math
//! - [`resolver`]: content resolution with a version-guarded cache
//! - [`completion`], [`diagnostics`], [`hover`], [`gotodef`]: feature
//!   providers, each a pure function over the above
//!
//! The crate is transport-agnostic: it speaks `lsp_types` values but never
//! owns a connection, leaving the server loop to the embedding binary.

pub mod completion;
pub mod config;
pub mod diagnostics;
pub mod formatter;
pub mod gotodef;
pub mod hover;
pub mod reference;
pub mod resolver;
pub mod source;
pub mod workspace;

#[cfg(test)]
pub mod test_utils;
