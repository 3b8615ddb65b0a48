use std::{cell::RefCell, fmt, path::Path, str::FromStr};

use tree_sitter::{Language, Parser, Tree};

use crate::BlankError;

/// Which tree-sitter-typescript grammar a source is parsed with.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Dialect {
    /// `.ts`, `.mts`, `.cts`. Supports the legacy `<T>expr` cast.
    #[default]
    TypeScript,
    /// `.tsx`. JSX is kept; `<T>expr` casts do not exist.
    Tsx,
}

impl Dialect {
    /// Maps a file extension (without the dot) to a dialect.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "ts" | "mts" | "cts" => Some(Dialect::TypeScript),
            "tsx" => Some(Dialect::Tsx),
            _ => None,
        }
    }

    /// Infers the dialect from a path's extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Extension of the blanked output for this dialect.
    pub fn output_extension(self) -> &'static str {
        match self {
            Dialect::TypeScript => "js",
            Dialect::Tsx => "jsx",
        }
    }

    fn language(self) -> Language {
        match self {
            Dialect::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Dialect::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Dialect::TypeScript => "ts",
            Dialect::Tsx => "tsx",
        })
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown dialect `{0}` (expected `ts` or `tsx`)")]
pub struct UnknownDialect(pub String);

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ts" | "typescript" | "mts" | "cts" => Ok(Dialect::TypeScript),
            "tsx" => Ok(Dialect::Tsx),
            _ => Err(UnknownDialect(s.to_owned())),
        }
    }
}

thread_local! {
    /// Shared Tree-sitter parser instances, one per dialect. We reuse them to avoid reloading the
    /// language for each call. Loaded lazily so a grammar error surfaces as a `BlankError`.
    static TS_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };

    static TSX_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

/// Parse source code for the given dialect.
pub fn parse(source: &str, dialect: Dialect) -> Result<Tree, BlankError> {
    let slot = match dialect {
        Dialect::TypeScript => &TS_PARSER,
        Dialect::Tsx => &TSX_PARSER,
    };
    slot.with(|cell| {
        let mut guard = cell.borrow_mut();
        if guard.is_none() {
            let mut parser = Parser::new();
            parser.set_language(&dialect.language())?;
            tracing::debug!(%dialect, "loaded grammar");
            *guard = Some(parser);
        }
        let Some(parser) = guard.as_mut() else {
            return Err(BlankError::ParseFailed);
        };
        parser.parse(source, None).ok_or(BlankError::ParseFailed)
    })
}
