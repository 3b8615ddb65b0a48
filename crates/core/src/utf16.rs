//! UTF-16 line/column indexing.
//!
//! Tree-sitter reports byte offsets into UTF-8 text, but JavaScript tooling (debuggers, stack
//! traces, coverage reports) expresses positions as a line plus a column counted in **UTF-16 code
//! units**. This module converts byte offsets to such positions so reports can be expressed the
//! way consumers of the blanked output will see them.
//!
//! Lines are split on every ECMAScript line terminator: `\n`, `\r\n`, a lone `\r`, U+2028 and
//! U+2029. Each line keeps sparse checkpoints so a lookup never rescans from the line start by
//! more than [`LineIndex::CHECKPOINT_STRIDE`] characters.

use std::{cmp::Ordering, fmt};

/// A 0-based line and a 0-based column in UTF-16 code units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for Position {
    /// Formats as the 1-based `line:column` pair editors display.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Returns the UTF-16 length of `s`.
pub fn utf16_len(s: &str) -> usize {
    s.chars().map(char::len_utf16).sum()
}

/// Returns true for the characters ECMAScript treats as line terminators.
pub fn is_line_terminator(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

/// Byte offsets where each line of `s` begins. The first entry is always `0`.
pub fn line_starts(s: &str) -> Vec<usize> {
    let mut starts = vec![0];
    let mut chars = s.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        match ch {
            '\r' => {
                if let Some(&(j, '\n')) = chars.peek() {
                    chars.next();
                    starts.push(j + 1);
                } else {
                    starts.push(i + 1);
                }
            }
            '\n' | '\u{2028}' | '\u{2029}' => starts.push(i + ch.len_utf8()),
            _ => {}
        }
    }
    starts
}

/// A precomputed line/column index over a whole string.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    text: &'a str,
    lines: Vec<Line>,
}

/// One line of the index. `end` excludes the terminator.
#[derive(Debug, Clone)]
struct Line {
    start: usize,
    end: usize,
    checkpoints: Vec<Checkpoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Checkpoint {
    byte: usize,
    column: usize,
}

impl<'a> LineIndex<'a> {
    /// Characters between two checkpoints on the same line.
    pub const CHECKPOINT_STRIDE: usize = 64;

    pub fn new(text: &'a str) -> Self {
        let starts = line_starts(text);
        let lines = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let end = match starts.get(i + 1) {
                    Some(&next) => terminator_start(text, start, next),
                    None => text.len(),
                };
                Line::new(text, start, end)
            })
            .collect();
        Self { text, lines }
    }

    /// Position of an absolute byte offset.
    ///
    /// Offsets inside a multi-byte character clamp to that character's start. Offsets on a line
    /// terminator report the column just past the line's last character.
    pub fn position_of(&self, byte: usize) -> Position {
        let line = match self.lines.binary_search_by(|l| {
            if l.start <= byte {
                Ordering::Less
            } else {
                Ordering::Greater
            }
        }) {
            Ok(i) => i,
            Err(0) => 0,
            Err(i) => i - 1,
        };
        let column = self
            .lines
            .get(line)
            .map_or(0, |l| l.column_of(self.text, byte));
        Position { line, column }
    }
}

/// Finds where the terminator ending at `next` begins (`\r\n` counts as one terminator).
fn terminator_start(text: &str, start: usize, next: usize) -> usize {
    let Some(line) = text.get(start..next) else {
        return next;
    };
    let mut end = next;
    let mut rev = line.chars().rev();
    if let Some(last) = rev.next() {
        end -= last.len_utf8();
        if last == '\n' && rev.next() == Some('\r') {
            end -= 1;
        }
    }
    end
}

impl Line {
    fn new(text: &str, start: usize, end: usize) -> Self {
        let mut checkpoints = vec![Checkpoint {
            byte: start,
            column: 0,
        }];
        let mut column = 0;
        for (count, (rel, ch)) in text
            .get(start..end)
            .unwrap_or_default()
            .char_indices()
            .enumerate()
        {
            column += ch.len_utf16();
            if (count + 1) % LineIndex::CHECKPOINT_STRIDE == 0 {
                checkpoints.push(Checkpoint {
                    byte: start + rel + ch.len_utf8(),
                    column,
                });
            }
        }
        if checkpoints.last().map(|c| c.byte) != Some(end) {
            checkpoints.push(Checkpoint { byte: end, column });
        }
        Self {
            start,
            end,
            checkpoints,
        }
    }

    fn column_of(&self, text: &str, byte: usize) -> usize {
        let target = byte.clamp(self.start, self.end);
        let cp = match self.checkpoints.binary_search_by(|c| c.byte.cmp(&target)) {
            Ok(i) => self.checkpoints[i],
            Err(0) => self.checkpoints[0],
            Err(i) => self.checkpoints[i - 1],
        };
        let mut column = cp.column;
        for (rel, ch) in text.get(cp.byte..self.end).unwrap_or_default().char_indices() {
            if cp.byte + rel + ch.len_utf8() > target {
                break;
            }
            column += ch.len_utf16();
        }
        column
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize, column: usize) -> Position {
        Position { line, column }
    }

    /// Naive column computation used to cross-check the checkpointed index.
    fn naive_column(line: &str, rel_byte: usize) -> usize {
        line.char_indices()
            .take_while(|(i, ch)| i + ch.len_utf8() <= rel_byte)
            .map(|(_, ch)| ch.len_utf16())
            .sum()
    }

    /// ASCII offsets and columns coincide.
    #[test]
    fn ascii_positions() {
        let idx = LineIndex::new("abc");
        assert_eq!(idx.position_of(0), pos(0, 0));
        assert_eq!(idx.position_of(3), pos(0, 3));
        assert_eq!(idx.position_of(99), pos(0, 3));
    }

    /// An astral character takes two UTF-16 units; offsets inside it clamp to its start.
    #[test]
    fn surrogate_pairs_count_twice() {
        let idx = LineIndex::new("a🙂b");
        assert_eq!(idx.position_of(1), pos(0, 1));
        assert_eq!(idx.position_of(3), pos(0, 1));
        assert_eq!(idx.position_of(5), pos(0, 3));
        assert_eq!(idx.position_of(6), pos(0, 4));
    }

    /// Every ECMAScript line terminator starts a new line, and CRLF counts once.
    #[test]
    fn splits_on_all_line_terminators() {
        let text = "a\r\nb\rc\u{2028}d\ne";
        assert_eq!(line_starts(text), vec![0, 3, 5, 9, 11]);
        let idx = LineIndex::new(text);
        assert_eq!(idx.position_of(1), pos(0, 1));
        assert_eq!(idx.position_of(3), pos(1, 0));
        assert_eq!(idx.position_of(9), pos(3, 0));
        assert_eq!(idx.position_of(12), pos(4, 1));
    }

    /// The UTF-16 length helper matches `encode_utf16`.
    #[test]
    fn utf16_len_matches_std() {
        let s = "let 🙂: \"é\" = 1;";
        assert_eq!(utf16_len(s), s.encode_utf16().count());
    }

    /// Checkpointed lookups agree with a naive scan on a long mixed line.
    #[test]
    fn checkpoints_match_naive_scan() {
        let mut line = String::new();
        for _ in 0..150 {
            line.push('a');
            line.push('🙂');
            line.push('あ');
        }
        let text = format!("{line}\nnext");
        let idx = LineIndex::new(&text);
        for rel in [0, 1, 2, 5, 63, 64, 65, 300, 799, line.len()] {
            let abs = rel.min(line.len());
            assert_eq!(
                idx.position_of(abs).column,
                naive_column(&line, abs),
                "column mismatch at byte {abs}"
            );
        }
        assert_eq!(idx.position_of(line.len() + 1), pos(1, 0));
    }
}
