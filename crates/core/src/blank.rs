//! Entry points and the walk.
//!
//! A call parses (or receives) a tree, reports the syntax errors no rule can recover from, walks
//! it once depth-first, and renders the recorded erase ops once. All state lives in a [`Walker`] created per call, so calls never observe each other.
//!
//! The walk is keyed by [`NodeKind`]. Recognized kinds go to a rule in `crate::rules`; a rule
//! decides which children (if any) are visited further. Unrecognized kinds recurse into their
//! named children unchanged.

use std::cell::OnceCell;

use tree_sitter::{Node, Tree};

use crate::{
    BlankError,
    buffer::BlankBuffer,
    kind::NodeKind,
    parse::{Dialect, parse},
    report::{Unsupported, UnsupportedKind},
    scan::{Punct, Rescanner},
    utf16::{LineIndex, is_line_terminator},
};

/// Blank all TypeScript syntax in `source`. Unsupported constructs are left untouched silently.
pub fn blank_space(source: &str, dialect: Dialect) -> Result<String, BlankError> {
    blank_space_with(source, dialect, |_| {})
}

/// Blank all TypeScript syntax in `source`, calling `on_unsupported` for every construct that is
/// left untouched.
pub fn blank_space_with(
    source: &str,
    dialect: Dialect,
    mut on_unsupported: impl FnMut(&Unsupported<'_>),
) -> Result<String, BlankError> {
    let tree = parse(source, dialect)?;
    Ok(blank_tree(&tree, source, &mut on_unsupported))
}

/// Like [`blank_space`], but any unsupported construct turns into [`BlankError::Unsupported`].
///
/// The walk is not cut short: every report is collected before failing.
pub fn blank_space_strict(source: &str, dialect: Dialect) -> Result<String, BlankError> {
    let mut diagnostics = Vec::new();
    let out = blank_space_with(source, dialect, |u| {
        diagnostics.push(u.to_diagnostic(source));
    })?;
    if diagnostics.is_empty() {
        Ok(out)
    } else {
        diagnostics.sort_by_key(|d| d.position);
        Err(BlankError::Unsupported { diagnostics })
    }
}

/// Blank a tree the caller already parsed from `source`.
///
/// `tree` must have been produced from exactly `source`.
pub fn blank_tree(
    tree: &Tree,
    source: &str,
    mut on_unsupported: impl FnMut(&Unsupported<'_>),
) -> String {
    let _span = tracing::debug_span!("blank", bytes = source.len()).entered();

    let mut walker = Walker::new(source, &mut on_unsupported);
    walker.report_syntax_errors(tree.root_node());
    walker.visit_program(tree.root_node());
    walker.finish()
}

/// What a visited node contributes to its statement list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Visited {
    /// Erased, or trivia.
    Blank,
    /// Runtime code survives.
    Js,
}

/// Per-call walk state.
pub(crate) struct Walker<'s, 'cb> {
    pub(crate) source: &'s str,
    pub(crate) buf: BlankBuffer<'s>,
    pub(crate) scan: Rescanner<'s>,
    on_unsupported: &'cb mut dyn FnMut(&Unsupported<'_>),
    lines: OnceCell<LineIndex<'s>>,
    /// Whether the current statement list already has surviving code.
    pub(crate) seen_js: bool,
    /// End offset of the innermost statement that ends without `;`.
    pub(crate) missing_semi_pos: Option<usize>,
}

impl<'s, 'cb> Walker<'s, 'cb> {
    pub(crate) fn new(source: &'s str, on_unsupported: &'cb mut dyn FnMut(&Unsupported<'_>)) -> Self {
        Self {
            source,
            buf: BlankBuffer::new(source),
            scan: Rescanner::new(source),
            on_unsupported,
            lines: OnceCell::new(),
            seen_js: false,
            missing_semi_pos: None,
        }
    }

    pub(crate) fn finish(self) -> String {
        tracing::debug!(ops = self.buf.ops().len(), "rendering");
        self.buf.finish()
    }

    fn visit_program(&mut self, root: Node<'_>) {
        let mut cursor = root.walk();
        for child in root.named_children(&mut cursor) {
            self.visit_top(child);
        }
    }

    /// Visits a module-level statement. Import/export forms only occur here.
    pub(crate) fn visit_top(&mut self, node: Node<'_>) -> Visited {
        let visited = match NodeKind::of(node) {
            NodeKind::ImportStatement => self.visit_import(node),
            NodeKind::ExportStatement => self.visit_export(node),
            _ => return self.visit(node),
        };
        if visited == Visited::Js {
            self.seen_js = true;
        }
        visited
    }

    pub(crate) fn visit(&mut self, node: Node<'_>) -> Visited {
        let visited = self.dispatch(node);
        if visited == Visited::Js {
            self.seen_js = true;
        }
        visited
    }

    fn dispatch(&mut self, node: Node<'_>) -> Visited {
        match NodeKind::of(node) {
            NodeKind::Comment | NodeKind::HashBangLine => Visited::Blank,

            NodeKind::Program => {
                self.visit_program(node);
                Visited::Js
            }
            NodeKind::StatementBlock => self.visit_block(node),
            NodeKind::ExpressionStatement => self.visit_expression_statement(node),
            NodeKind::LexicalDeclaration | NodeKind::VariableDeclaration => {
                self.visit_variable_statement(node)
            }
            NodeKind::VariableDeclarator => self.visit_declarator(node),
            NodeKind::ReturnStatement | NodeKind::ThrowStatement => self.visit_return(node),

            NodeKind::InterfaceDeclaration
            | NodeKind::TypeAliasDeclaration
            | NodeKind::AmbientDeclaration
            | NodeKind::FunctionSignature => {
                self.blank_statement(node);
                Visited::Blank
            }
            NodeKind::EnumDeclaration => {
                self.report(UnsupportedKind::Enum, node);
                Visited::Js
            }
            NodeKind::Module | NodeKind::InternalModule => self.visit_module(node, node),
            NodeKind::ImportAlias => {
                self.report(UnsupportedKind::ImportAlias, node);
                Visited::Js
            }
            NodeKind::ImportStatement | NodeKind::ExportStatement => self.visit_top(node),

            NodeKind::ClassDeclaration
            | NodeKind::AbstractClassDeclaration
            | NodeKind::Class => self.visit_class(node),
            NodeKind::ClassBody => self.visit_class_body(node),
            NodeKind::ClassHeritage => self.visit_heritage(node),
            NodeKind::PublicFieldDefinition => self.visit_field(node, false),
            NodeKind::MethodSignature
            | NodeKind::AbstractMethodSignature
            | NodeKind::IndexSignature => {
                self.blank_exact(node);
                Visited::Blank
            }

            NodeKind::FunctionDeclaration
            | NodeKind::GeneratorFunctionDeclaration
            | NodeKind::FunctionExpression
            | NodeKind::GeneratorFunction
            | NodeKind::ArrowFunction
            | NodeKind::MethodDefinition => self.visit_function(node),

            NodeKind::TypeAnnotation => {
                self.blank_exact(node);
                Visited::Blank
            }
            NodeKind::TypeArguments | NodeKind::TypeParameters => {
                self.blank_generics(node);
                Visited::Blank
            }
            NodeKind::AsExpression | NodeKind::SatisfiesExpression => {
                self.visit_postfix_cast(node)
            }
            NodeKind::NonNullExpression => self.visit_non_null(node),
            NodeKind::TypeAssertion => self.visit_prefix_cast(node),
            NodeKind::CallExpression | NodeKind::SubscriptExpression => {
                self.visit_call_or_subscript(node)
            }
            NodeKind::BinaryExpression => self.visit_binary(node),

            NodeKind::Error => self.visit_error(node),

            NodeKind::ClassStaticBlock | NodeKind::Decorator | NodeKind::Other => {
                self.visit_children(node)
            }
        }
    }

    /// Generic recursion into every named child.
    pub(crate) fn visit_children(&mut self, node: Node<'_>) -> Visited {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
        Visited::Js
    }

    /// A nested statement list: `seen_js` and terminator tracking start fresh and are restored on
    /// exit.
    pub(crate) fn visit_block(&mut self, node: Node<'_>) -> Visited {
        let saved = (self.seen_js, self.missing_semi_pos.take());
        self.seen_js = false;
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            self.visit(child);
        }
        (self.seen_js, self.missing_semi_pos) = saved;
        Visited::Js
    }

    pub(crate) fn blank_exact(&mut self, node: Node<'_>) {
        self.buf.blank(node.start_byte(), node.end_byte());
    }

    /// Erases a whole statement. After surviving code, the first character becomes `;` so the
    /// previous statement cannot run into the next one.
    pub(crate) fn blank_statement(&mut self, node: Node<'_>) {
        tracing::debug!(kind = node.kind(), start = node.start_byte(), "erasing statement");
        self.blank_statement_span(node.start_byte(), node.end_byte());
    }

    pub(crate) fn blank_statement_span(&mut self, start: usize, end: usize) {
        if self.seen_js {
            self.buf.blank_start_with_semi(start, end);
        } else {
            self.buf.blank(start, end);
        }
    }

    /// Erases a `<…>` list from its re-scanned `<` through its re-scanned `>`.
    pub(crate) fn blank_generics(&mut self, list: Node<'_>) {
        let (start, end) = self.generics_range(list);
        self.buf.blank(start, end);
    }

    pub(crate) fn generics_range(&self, list: Node<'_>) -> (usize, usize) {
        let mut cursor = list.walk();
        let mut named = list.named_children(&mut cursor);
        let Some(first) = named.next() else {
            return (list.start_byte(), list.end_byte());
        };
        let last = named.last().unwrap_or(first);
        let start = self
            .scan
            .token_start(Punct::Lt, list.start_byte(), first.start_byte());
        let end = self.scan.token_end(Punct::Gt, last.end_byte(), list.end_byte());
        (start, end)
    }

    /// Erases `node` plus the `,` right after it, if any, within `parent`.
    pub(crate) fn blank_with_trailing_comma(&mut self, node: Node<'_>, parent: Node<'_>) {
        let end = self
            .scan
            .next_is(Punct::Comma, node.end_byte(), parent.end_byte())
            .map_or(node.end_byte(), |comma| comma.end);
        self.buf.blank(node.start_byte(), end);
    }

    /// Records that `statement` ends without `;`.
    pub(crate) fn note_terminator(&mut self, statement: Node<'_>) {
        if !has_semicolon(statement) {
            self.missing_semi_pos = Some(statement.end_byte());
        }
    }

    /// Whether `node` ends exactly where a statement without `;` ends.
    pub(crate) fn at_statement_end(&self, node: Node<'_>) -> bool {
        self.missing_semi_pos == Some(node.end_byte())
    }

    /// Whether a line terminator lies between byte offsets `a` and `b`.
    pub(crate) fn spans_lines(&self, a: usize, b: usize) -> bool {
        self.source
            .get(a.min(b)..a.max(b))
            .is_some_and(|s| s.chars().any(is_line_terminator))
    }

    pub(crate) fn report(&mut self, kind: UnsupportedKind, node: Node<'_>) {
        let source = self.source;
        let position = self
            .lines
            .get_or_init(|| LineIndex::new(source))
            .position_of(node.start_byte());
        tracing::debug!(?kind, %position, "unsupported construct left untouched");
        (self.on_unsupported)(&Unsupported {
            kind,
            node,
            position,
        });
    }
}

/// Whether the last non-trivia child of `node` is `;`.
pub(crate) fn has_semicolon(node: Node<'_>) -> bool {
    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|c| !c.is_extra())
        .last()
        .is_some_and(|c| c.kind() == ";")
}

/// First named child that is not a comment.
pub(crate) fn first_named(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .find(|c| !NodeKind::of(*c).is_trivia())
}

/// Last named child that is not a comment.
pub(crate) fn last_named(node: Node<'_>) -> Option<Node<'_>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|c| !NodeKind::of(*c).is_trivia())
        .last()
}

/// All children, anonymous tokens included.
pub(crate) fn children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    node.children(&mut cursor).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank(src: &str) -> String {
        blank_space(src, Dialect::TypeScript).unwrap()
    }

    /// Plain JavaScript comes back byte-identical.
    #[test]
    fn plain_js_is_unchanged() {
        let src = "const a = [1, 2].map((x) => x * 2);\nif (a) { console.log(a) }\n";
        assert_eq!(blank(src), src);
    }

    /// Declarator annotations are erased from the colon.
    #[test]
    fn variable_annotation() {
        assert_eq!(blank("let x : number = 1;"), "let x          = 1;");
    }

    /// Definite-assignment marks and several declarators.
    #[test]
    fn several_declarators() {
        assert_eq!(
            blank("let x: any, y! : string, z: any;\n"),
            "let x     , y          , z     ;\n"
        );
    }

    /// Surrogate pairs inside an erased annotation become two spaces.
    #[test]
    fn astral_annotation_keeps_utf16_length() {
        let src = "function f(): \"💥\" {}";
        let out = blank(src);
        assert_eq!(out, "function f()       {}");
        assert_eq!(out.encode_utf16().count(), src.encode_utf16().count());
    }

    /// Every report reaches the callback and the reported text survives.
    #[test]
    fn reports_reach_callback() {
        let src = "enum E {}";
        let mut seen = Vec::new();
        let out = blank_space_with(src, Dialect::TypeScript, |u| {
            seen.push((u.kind, u.byte_range(), u.position));
        })
        .unwrap();
        assert_eq!(out, src);
        assert_eq!(seen, vec![(UnsupportedKind::Enum, 0..9, Default::default())]);
    }

    /// The strict entry point fails with every collected report.
    #[test]
    fn strict_collects_all_reports() {
        let err = blank_space_strict("let a = 1;\nenum A {}\nenum B {}\n", Dialect::TypeScript)
            .unwrap_err();
        let BlankError::Unsupported { diagnostics } = err else {
            panic!("expected unsupported error, got {err:?}");
        };
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].position.to_string(), "2:1");
        assert_eq!(diagnostics[1].excerpt, "enum B {}");
        assert!(blank_space_strict("let a: number = 1;", Dialect::TypeScript).is_ok());
    }

    /// A tree parsed by the caller can be blanked directly.
    #[test]
    fn blank_existing_tree() {
        let src = "let v = f<string>();";
        let tree = parse(src, Dialect::TypeScript).unwrap();
        assert_eq!(blank_tree(&tree, src, |_| {}), "let v = f        ();");
    }

    /// TSX keeps JSX while erasing types.
    #[test]
    fn tsx_dialect() {
        let src = "const el = <div id={x as string}>{y!}</div>;";
        let out = blank_space(src, Dialect::Tsx).unwrap();
        assert_eq!(out, "const el = <div id={x          }>{y }</div>;");
    }
}
