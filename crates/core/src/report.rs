//! The error channel: constructs that were left untouched.
//!
//! A report never stops the walk. The reported node's text is copied to the output unchanged, so
//! the output is still valid TypeScript at that span but not valid JavaScript. Callers decide what
//! to do with reports: [`crate::blank_space_strict`] turns them into a [`crate::BlankError`].

use std::{fmt, ops::Range};

use tree_sitter::Node;

pub use crate::utf16::Position;

/// Why a construct could not be erased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnsupportedKind {
    /// `enum E {}` without `declare`.
    Enum,
    /// `namespace N {}` that is neither ambient nor type-only.
    Namespace,
    /// `module M {}` with an identifier name.
    LegacyModule,
    /// `import x = require("x")`.
    ImportRequire,
    /// `import x = N.y`.
    ImportAlias,
    /// `export = x`.
    ExportAssignment,
    /// A `public`/`private`/`protected`/`readonly`/`override` constructor parameter.
    ParameterProperty,
    /// Legacy `<T>expr` cast.
    PrefixTypeAssertion,
    /// Arrow return type spanning lines that cannot be relocated.
    ArrowReturnType,
    /// Type arguments on a tagged template that are not a plain list of names and literals.
    TemplateTypeArguments,
    /// Source the grammar could not parse (an `ERROR` or missing node).
    ParseError,
}

impl UnsupportedKind {
    pub fn message(self) -> &'static str {
        match self {
            UnsupportedKind::Enum => "enums are not erasable",
            UnsupportedKind::Namespace => "namespace with runtime code is not erasable",
            UnsupportedKind::LegacyModule => "`module` declarations are not erasable",
            UnsupportedKind::ImportRequire => "`import = require()` is not erasable",
            UnsupportedKind::ImportAlias => "`import =` alias is not erasable",
            UnsupportedKind::ExportAssignment => "`export =` is not erasable",
            UnsupportedKind::ParameterProperty => "parameter properties are not erasable",
            UnsupportedKind::PrefixTypeAssertion => "prefix type assertion is not erasable",
            UnsupportedKind::ArrowReturnType => {
                "multi-line arrow return type cannot be erased without moving `=>`"
            }
            UnsupportedKind::TemplateTypeArguments => {
                "tagged template type arguments could not be delimited"
            }
            UnsupportedKind::ParseError => "syntax could not be parsed",
        }
    }
}

impl fmt::Display for UnsupportedKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// A report handed to the `on_unsupported` callback.
#[derive(Debug, Clone, Copy)]
pub struct Unsupported<'tree> {
    pub kind: UnsupportedKind,
    /// The offending node. Its span is unchanged in the output.
    pub node: Node<'tree>,
    /// Start of `node`, in UTF-16 columns.
    pub position: Position,
}

impl Unsupported<'_> {
    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    /// Source text of the reported node.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.byte_range()).unwrap_or_default()
    }

    /// An owned copy that outlives the tree.
    pub fn to_diagnostic(&self, source: &str) -> Diagnostic {
        Diagnostic {
            kind: self.kind,
            position: self.position,
            excerpt: excerpt(self.text(source)),
        }
    }
}

/// Owned form of [`Unsupported`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: UnsupportedKind,
    pub position: Position,
    /// First line of the node's text, shortened.
    pub excerpt: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}: `{}`", self.position, self.kind, self.excerpt)
    }
}

const EXCERPT_CHARS: usize = 40;

fn excerpt(text: &str) -> String {
    let line = text.lines().next().unwrap_or_default().trim_end();
    let mut chars = line.chars();
    let mut out: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() || line.len() < text.trim_end().len() {
        out.push('…');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Excerpts keep the first line and mark truncation.
    #[test]
    fn excerpt_first_line() {
        assert_eq!(excerpt("enum E {}"), "enum E {}");
        assert_eq!(excerpt("enum E {\n  A\n}"), "enum E {…");
        let long = "x".repeat(50);
        assert_eq!(excerpt(&long), format!("{}…", "x".repeat(40)));
    }

    /// Diagnostics print 1-based positions.
    #[test]
    fn diagnostic_display() {
        let d = Diagnostic {
            kind: UnsupportedKind::Enum,
            position: Position { line: 2, column: 4 },
            excerpt: "enum E {}".to_owned(),
        };
        assert_eq!(d.to_string(), "3:5: enums are not erasable: `enum E {}`");
    }
}
