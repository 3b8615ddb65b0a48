//! The erase-op model and final rendering.
//!
//! This module defines [`EraseOp`], a byte range of the original source that is overwritten with
//! whitespace, and [`BlankBuffer`], which records ops during the walk and renders the output once
//! at the end.
//!
//! Key ideas:
//!
//! - Internal offsets are byte-based (tree-sitter’s model).
//! - Every erased character becomes as many spaces as it has UTF-16 code units, so an astral
//!   character (a surrogate pair) becomes two spaces. UTF-16 length and UTF-16 columns of the
//!   output equal those of the input.
//! - Line terminators inside an erased range are copied through, so line structure is unchanged.
//! - Some ops splice a short ASCII fragment (`;`, `=>`, ` 0,`, `0||`, `(`, `)`) into their range. The
//!   fragment replaces code units of the range, it is never inserted.
//!
//! Invariants:
//!
//! - Ops are recorded in non-decreasing `start` order by the walk, but nested rules can record a
//!   range that starts inside the previous one. Rendering clamps each op's start to the previous
//!   op's end, and drops ops that end up empty.
//! - A fragment is only spliced when it fits in the clamped range without covering a line
//!   terminator; otherwise the range is blanked plainly.

use crate::utf16::{is_line_terminator, utf16_len};

/// How an erased range is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EraseKind {
    /// Whitespace only.
    Plain,
    /// Starts with `=>`, relocating an arrow marker.
    Arrow,
    /// Starts with ` 0,`, turning a dropped generic list into a comma-operator prefix.
    CommaOperator,
    /// Starts with `0||`, so a prefix cast in arrow-body position stays an expression.
    ZeroOr,
    /// Starts with `;`, terminating the previous statement.
    Semi,
    /// Starts with `(`, relocating an opening parenthesis to the start of the range.
    OpenParen,
    /// Ends with `)`, relocating a closing parenthesis to the end of the range.
    CloseParen,
}

impl EraseKind {
    /// The literal text spliced into the range.
    pub const fn fragment(self) -> &'static str {
        match self {
            EraseKind::Plain => "",
            EraseKind::Arrow => "=>",
            EraseKind::CommaOperator => " 0,",
            EraseKind::ZeroOr => "0||",
            EraseKind::Semi => ";",
            EraseKind::OpenParen => "(",
            EraseKind::CloseParen => ")",
        }
    }

    /// Whether the fragment sits at the end of the range instead of the start.
    const fn at_end(self) -> bool {
        matches!(self, EraseKind::CloseParen)
    }
}

/// A byte range of the original source that is blanked in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EraseOp {
    /// Start byte offset (inclusive) in the input.
    pub start: usize,
    /// End byte offset (exclusive) in the input.
    pub end: usize,
    pub kind: EraseKind,
}

/// Like an edit list, but every edit is a blanking.
#[derive(Debug, Clone)]
pub struct BlankBuffer<'a> {
    source: &'a str,
    ops: Vec<EraseOp>,
}

impl<'a> BlankBuffer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            ops: Vec::new(),
        }
    }

    pub fn ops(&self) -> &[EraseOp] {
        &self.ops
    }

    /// Records an op. Empty and inverted ranges are ignored.
    pub fn push(&mut self, start: usize, end: usize, kind: EraseKind) {
        if start >= end {
            return;
        }
        tracing::trace!(start, end, ?kind, "erase");
        self.ops.push(EraseOp { start, end, kind });
    }

    pub fn blank(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::Plain);
    }

    pub fn blank_start_with_arrow(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::Arrow);
    }

    pub fn blank_start_with_comma_operator(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::CommaOperator);
    }

    pub fn blank_replace_start_with_zero_or(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::ZeroOr);
    }

    pub fn blank_start_with_semi(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::Semi);
    }

    pub fn blank_start_with_open_paren(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::OpenParen);
    }

    pub fn blank_end_with_close_paren(&mut self, start: usize, end: usize) {
        self.push(start, end, EraseKind::CloseParen);
    }

    /// Renders the output. Text outside every op is copied verbatim.
    pub fn finish(self) -> String {
        if self.ops.is_empty() {
            return self.source.to_owned();
        }

        let mut out = String::with_capacity(self.source.len());
        let mut cursor = 0usize;
        for op in &self.ops {
            let start = op.start.max(cursor);
            if start >= op.end {
                continue;
            }
            let (Some(kept), Some(erased)) =
                (self.source.get(cursor..start), self.source.get(start..op.end))
            else {
                tracing::warn!(start, end = op.end, "erase op is not on a character boundary");
                continue;
            };
            out.push_str(kept);
            render(&mut out, erased, op.kind);
            cursor = op.end;
        }
        out.push_str(self.source.get(cursor..).unwrap_or_default());
        out
    }
}

/// Appends the blanked form of `erased`, splicing the kind's fragment when it fits.
fn render(out: &mut String, erased: &str, kind: EraseKind) {
    let fragment = kind.fragment();
    if fragment.is_empty() || utf16_len(erased) < fragment.len() {
        push_blank(out, erased);
        return;
    }

    if kind.at_end() {
        let Some((split, covered)) = split_units_from_end(erased, fragment.len()) else {
            push_blank(out, erased);
            return;
        };
        push_blank(out, &erased[..split]);
        push_spaces(out, covered - fragment.len());
        out.push_str(fragment);
    } else {
        let Some((split, covered)) = split_units_from_start(erased, fragment.len()) else {
            push_blank(out, erased);
            return;
        };
        out.push_str(fragment);
        push_spaces(out, covered - fragment.len());
        push_blank(out, &erased[split..]);
    }
}

/// Byte index after the shortest prefix spanning at least `units` UTF-16 units, and the units it
/// spans. `None` if that prefix contains a line terminator.
fn split_units_from_start(s: &str, units: usize) -> Option<(usize, usize)> {
    let mut covered = 0;
    for (i, ch) in s.char_indices() {
        if covered >= units {
            return Some((i, covered));
        }
        if is_line_terminator(ch) {
            return None;
        }
        covered += ch.len_utf16();
    }
    (covered >= units).then_some((s.len(), covered))
}

/// Byte index where the shortest suffix spanning at least `units` UTF-16 units begins, and the
/// units it spans. `None` if that suffix contains a line terminator.
fn split_units_from_end(s: &str, units: usize) -> Option<(usize, usize)> {
    let mut covered = 0;
    for (i, ch) in s.char_indices().rev() {
        if is_line_terminator(ch) {
            return None;
        }
        covered += ch.len_utf16();
        if covered >= units {
            return Some((i, covered));
        }
    }
    None
}

fn push_blank(out: &mut String, erased: &str) {
    for ch in erased.chars() {
        if is_line_terminator(ch) {
            out.push(ch);
        } else {
            push_spaces(out, ch.len_utf16());
        }
    }
}

fn push_spaces(out: &mut String, n: usize) {
    out.extend(std::iter::repeat_n(' ', n));
}
