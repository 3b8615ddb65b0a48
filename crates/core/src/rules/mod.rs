//! Per-construct erasure rules.
//!
//! Each file adds an `impl Walker` block for one syntax family. Rules record erase ops on the
//! walker's buffer and visit the children that may still hold types.

mod classes;
mod expressions;
mod functions;
mod modules;
mod recovery;
mod statements;

#[cfg(test)]
pub(crate) mod testing {
    use crate::{Dialect, UnsupportedKind, blank_space_with};

    /// Blanks TypeScript source and returns the output plus every reported kind.
    pub(crate) fn blank_reporting(src: &str) -> (String, Vec<UnsupportedKind>) {
        let mut kinds = Vec::new();
        let out = blank_space_with(src, Dialect::TypeScript, |u| kinds.push(u.kind)).unwrap();
        (out, kinds)
    }

    /// Blanks TypeScript source that must not produce any report.
    pub(crate) fn blank(src: &str) -> String {
        let (out, kinds) = blank_reporting(src);
        assert!(kinds.is_empty(), "unexpected reports {kinds:?} for {src:?}");
        assert_eq!(
            out.encode_utf16().count(),
            src.encode_utf16().count(),
            "UTF-16 length changed"
        );
        out
    }
}
