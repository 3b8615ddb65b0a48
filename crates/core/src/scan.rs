//! Token re-scan over bounded ranges.
//!
//! The tree tells us which node holds a generic list or a parameter list, but some rules need the
//! exact offset of one punctuation token inside a range (the `<` of a type argument list, its
//! `>`, a closing `)`, a trailing `,`). [`Rescanner`] lexes just that slice and reports where the
//! first matching token sits.
//!
//! Strings, template literals and comments are lexed as whole tokens (or skipped) so punctuation
//! inside them is never matched. Everything the lexer does not know is an error token and is
//! stepped over.

use std::ops::Range;

use logos::Logos;

/// The few tokens re-scans look for, plus the literals that must not be looked into.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f\x{0B}\x{A0}\x{FEFF}\x{2028}\x{2029}]+")]
#[logos(skip r"//[^\n\r\x{2028}\x{2029}]*")]
#[logos(skip r"/\*([^*]|\*+[^*/])*\*+/")]
pub enum Punct {
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(",")]
    Comma,
    #[token("=>")]
    Arrow,
    #[token(".")]
    Dot,
    #[regex(r#""([^"\\\n\r]|\\[^\n\r]|\\\r?\n)*""#)]
    #[regex(r#"'([^'\\\n\r]|\\[^\n\r]|\\\r?\n)*'"#)]
    Str,
    #[regex(r"`([^`\\]|\\(.|\n))*`")]
    Template,
    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,
    #[regex(r"[0-9][0-9A-Za-z_.]*")]
    Number,
}

/// Re-lexes slices of one source text.
#[derive(Debug, Clone, Copy)]
pub struct Rescanner<'a> {
    source: &'a str,
}

impl<'a> Rescanner<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source }
    }

    /// Absolute byte range of the first `target` token in `start..end`.
    pub fn first_token(&self, target: Punct, start: usize, end: usize) -> Option<Range<usize>> {
        let slice = self.source.get(start..end.min(self.source.len()))?;
        let mut lexer = Punct::lexer(slice);
        while let Some(token) = lexer.next() {
            if token == Ok(target) {
                let span = lexer.span();
                return Some(start + span.start..start + span.end);
            }
        }
        None
    }

    /// Range of the token right at `start` (after trivia) when it is `target`.
    pub fn next_is(&self, target: Punct, start: usize, end: usize) -> Option<Range<usize>> {
        let slice = self.source.get(start..end.min(self.source.len()))?;
        let mut lexer = Punct::lexer(slice);
        match lexer.next() {
            Some(Ok(token)) if token == target => {
                let span = lexer.span();
                Some(start + span.start..start + span.end)
            }
            _ => None,
        }
    }

    /// Start of the first `target` in `start..end`, or `start` when it is not there.
    pub fn token_start(&self, target: Punct, start: usize, end: usize) -> usize {
        match self.first_token(target, start, end) {
            Some(range) => range.start,
            None => self.fallback(target, start, end),
        }
    }

    /// End of the first `target` in `start..end`, or `start` when it is not there.
    pub fn token_end(&self, target: Punct, start: usize, end: usize) -> usize {
        match self.first_token(target, start, end) {
            Some(range) => range.end,
            None => self.fallback(target, start, end),
        }
    }

    /// Start of the `<` matching the `>` tokens that end `start..end`, when only names, literals,
    /// `.` and `,` lie between them: `f<A, N.B<C>>` yields the first `<`. `None` otherwise.
    pub fn type_list_start(&self, start: usize, end: usize) -> Option<usize> {
        let slice = self.source.get(start..end.min(self.source.len()))?;
        let tokens = Punct::lexer(slice).spanned().collect::<Vec<_>>();
        let mut depth = 0usize;
        for (token, span) in tokens.iter().rev() {
            match token {
                Ok(Punct::Gt) => depth += 1,
                Ok(Punct::Lt) => {
                    depth = depth.checked_sub(1)?;
                    if depth == 0 {
                        return Some(start + span.start);
                    }
                }
                Ok(Punct::Word | Punct::Str | Punct::Number | Punct::Dot | Punct::Comma)
                    if depth > 0 => {}
                _ => return None,
            }
        }
        None
    }

    fn fallback(&self, target: Punct, start: usize, end: usize) -> usize {
        tracing::warn!(?target, start, end, "re-scan did not find token, using range start");
        start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The first `<` is found even when the grammar saw a shift operator.
    #[test]
    fn finds_open_angle_in_shift() {
        let src = "f<<T>(x: T) => T>(g)";
        let scan = Rescanner::new(src);
        assert_eq!(scan.first_token(Punct::Lt, 0, src.len()), Some(1..2));
        assert_eq!(scan.token_start(Punct::Lt, 2, src.len()), 2);
    }

    /// Punctuation inside strings, templates and comments is ignored.
    #[test]
    fn skips_literals_and_comments() {
        let src = r#"a /* ) */ ")" `)${x}` ')' // )
            )"#;
        let scan = Rescanner::new(src);
        let close = src.rfind(')').unwrap();
        assert_eq!(scan.first_token(Punct::RParen, 0, src.len()), Some(close..close + 1));
    }

    /// `=>` is one token, never `=` followed by `>`.
    #[test]
    fn arrow_is_not_greater_than() {
        let src = "(a) => b > c";
        let scan = Rescanner::new(src);
        assert_eq!(scan.token_end(Punct::Arrow, 0, src.len()), 6);
        assert_eq!(scan.token_start(Punct::Gt, 0, src.len()), 9);
    }

    /// `next_is` only looks at the first token after trivia.
    #[test]
    fn next_is_checks_first_token_only() {
        let src = "A /**/ , B, C";
        let scan = Rescanner::new(src);
        assert_eq!(scan.next_is(Punct::Comma, 1, src.len()), Some(7..8));
        assert_eq!(scan.next_is(Punct::Comma, 8, src.len()), None);
    }

    /// Type lists are matched from their closing `>` back to their `<`.
    #[test]
    fn type_list_start_balances_angles() {
        let src = "x = f<A, N.B<\"s\">>";
        let scan = Rescanner::new(src);
        assert_eq!(scan.type_list_start(0, src.len()), Some(5));
        assert_eq!(scan.type_list_start(6, src.len()), None);
        let src = "a < b + 1 >";
        assert_eq!(Rescanner::new(src).type_list_start(0, src.len()), None);
        let src = "a, b >";
        assert_eq!(Rescanner::new(src).type_list_start(0, src.len()), None);
    }

    /// A missing token degrades to the start of the range.
    #[test]
    fn missing_token_falls_back_to_start() {
        let scan = Rescanner::new("a, b");
        assert_eq!(scan.token_start(Punct::Gt, 1, 4), 1);
        assert_eq!(scan.token_end(Punct::RParen, 2, 4), 2);
        assert_eq!(scan.first_token(Punct::Comma, 2, 99), None);
    }
}
