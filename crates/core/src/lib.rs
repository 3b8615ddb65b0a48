//! TypeScript type erasure by blanking.
//!
//! This crate turns TypeScript into JavaScript by overwriting every type-only byte range with
//! whitespace of the same length and line structure. Nothing else is rewritten, so every token
//! that survives keeps its original offset and its original line/column. Debuggers, coverage
//! tools and error reporters can consume the output without a sourcemap.
//!
//! Entry points:
//!
//! - [`blank_space`] / [`blank_space_with`] take source text and parse it themselves.
//! - [`blank_tree`] takes a tree the caller already parsed.
//! - [`blank_space_strict`] fails when any construct could not be erased.
//!
//! Internals:
//!
//! - [`parse`] contains the tree-sitter parsing logic and the [`Dialect`] selection.
//! - [`buffer`] holds the erase-op model and renders the final text.
//! - [`scan`] re-tokenizes small ranges to find exact punctuation positions.
//! - [`kind`] classifies tree-sitter node kinds for the dispatcher.
//! - [`blank`] owns the walk; per-construct rules live in `rules`.
//! - [`report`] describes constructs that were left untouched.
//! - [`utf16`] converts byte offsets to UTF-16 line/column positions.

pub mod blank;
pub mod buffer;
pub mod kind;
pub mod parse;
pub mod report;
mod rules;
pub mod scan;
pub mod utf16;

pub use blank::{blank_space, blank_space_strict, blank_space_with, blank_tree};
pub use parse::Dialect;
pub use report::{Diagnostic, Position, Unsupported, UnsupportedKind};

/// Errors that can occur while blanking.
#[derive(thiserror::Error, Debug)]
pub enum BlankError {
    #[error("tree-sitter failed to parse input")]
    ParseFailed,

    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    #[error("{} unsupported construct(s), first at {}", .diagnostics.len(), first_position(.diagnostics))]
    Unsupported { diagnostics: Vec<Diagnostic> },
}

fn first_position(diagnostics: &[Diagnostic]) -> String {
    diagnostics
        .first()
        .map(|d| d.position.to_string())
        .unwrap_or_else(|| "<none>".to_owned())
}
