use tree_sitter::Node;

use crate::{
    UnsupportedKind,
    blank::{Visited, Walker, children, last_named},
    kind::{NodeKind, is_token, is_type_modifier},
    scan::Punct,
    utf16::is_line_terminator,
};

impl Walker<'_, '_> {
    /// Functions, methods, accessors, constructors and arrows that have a body.
    ///
    /// Erases modifiers, generics, the optional-method `?`, parameter types and markers, a
    /// leading `this` parameter and the return type. Bodies are visited as their own statement
    /// list.
    pub(crate) fn visit_function(&mut self, node: Node<'_>) -> Visited {
        let params = node.child_by_field_name("parameters");
        let return_type = node.child_by_field_name("return_type");
        let body = node.child_by_field_name("body");
        let kids = children(node);
        let arrow = kids.iter().copied().find(|c| is_token(*c, "=>"));
        let mut moved_paren = None;

        for child in kids {
            if Some(child) == params {
                if let Some(paren) = moved_paren {
                    self.buf.blank(paren, paren + 1);
                }
                self.visit_parameters(child);
            } else if Some(child) == return_type {
                self.blank_return_type(child, params, arrow);
            } else if Some(child) == body {
                self.visit_function_body(child, arrow);
            } else if is_type_modifier(child) || is_token(child, "?") {
                self.blank_exact(child);
            } else if NodeKind::of(child) == NodeKind::TypeParameters {
                moved_paren = self.blank_arrow_generics(child, params.filter(|_| arrow.is_some()));
            } else if child.is_named() {
                self.visit(child);
            }
        }
        Visited::Js
    }

    /// Erases a function's `<…>` list. On an arrow whose `(` sits on a later line than the `<`,
    /// the `(` moves up into the list's place: `async <\n T\n>(v: T) => v` would otherwise
    /// leave `async`, `yield`, `return` or `throw` alone on its line. Returns the offset of the
    /// `(` to erase.
    fn blank_arrow_generics(&mut self, list: Node<'_>, params: Option<Node<'_>>) -> Option<usize> {
        let (start, end) = self.generics_range(list);
        let paren = params
            .filter(|p| p.child(0).is_some_and(|c| is_token(c, "(")))
            .map(|p| p.start_byte())
            .filter(|paren| self.spans_lines(start, *paren));
        match paren {
            Some(_) => self.buf.blank_start_with_open_paren(start, end),
            None => self.buf.blank(start, end),
        }
        paren
    }

    fn visit_parameters(&mut self, params: Node<'_>) {
        let mut first = true;
        let list = {
            let mut cursor = params.walk();
            params.named_children(&mut cursor).collect::<Vec<_>>()
        };
        for param in list {
            match param.kind() {
                "required_parameter" | "optional_parameter" => {
                    let is_this = param
                        .child_by_field_name("pattern")
                        .is_some_and(|p| p.kind() == "this");
                    if first && is_this {
                        self.blank_with_trailing_comma(param, params);
                    } else {
                        self.visit_parameter(param);
                    }
                    first = false;
                }
                _ => {
                    if !NodeKind::of(param).is_trivia() {
                        first = false;
                    }
                    self.visit(param);
                }
            }
        }
    }

    /// `a?: T = v`. Parameter-property modifiers are reported, never erased.
    fn visit_parameter(&mut self, param: Node<'_>) {
        for child in children(param) {
            match child.kind() {
                "accessibility_modifier" | "override_modifier" | "readonly" => {
                    self.report(UnsupportedKind::ParameterProperty, child);
                }
                "?" => self.blank_exact(child),
                _ if child.is_named() => {
                    self.visit(child);
                }
                _ => {}
            }
        }
    }

    fn blank_return_type(&mut self, ret: Node<'_>, params: Option<Node<'_>>, arrow: Option<Node<'_>>) {
        if let (Some(params), Some(arrow)) = (params, arrow) {
            if self.spans_lines(params.end_byte(), arrow.start_byte()) {
                self.relocate_arrow(params, ret, arrow);
                return;
            }
        }
        self.blank_exact(ret);
    }

    /// Erasing a return type that spans lines would put a line break right before `=>`. Either
    /// `=>` moves up to the `)`, or the `)` moves down to the end of the type.
    fn relocate_arrow(&mut self, params: Node<'_>, ret: Node<'_>, arrow: Node<'_>) {
        let from = last_named(params).map_or(params.start_byte(), |p| p.end_byte());
        let paren_end = self.scan.token_end(Punct::RParen, from, params.end_byte());
        if self.fits_before_line_end(paren_end, 2) {
            self.buf.blank_start_with_arrow(paren_end, arrow.end_byte());
        } else if !self.spans_lines(ret.end_byte(), arrow.start_byte()) {
            self.buf
                .blank_end_with_close_paren(paren_end.saturating_sub(1), ret.end_byte());
        } else {
            self.report(UnsupportedKind::ArrowReturnType, ret);
        }
    }

    /// Whether `units` UTF-16 units starting at `start` stay on one line.
    pub(crate) fn fits_before_line_end(&self, start: usize, units: usize) -> bool {
        let mut covered = 0;
        for ch in self.source.get(start..).unwrap_or_default().chars() {
            if covered >= units {
                return true;
            }
            if is_line_terminator(ch) {
                return false;
            }
            covered += ch.len_utf16();
        }
        covered >= units
    }

    fn visit_function_body(&mut self, body: Node<'_>, arrow: Option<Node<'_>>) {
        if arrow.is_some() && NodeKind::of(body) == NodeKind::TypeAssertion {
            self.visit_cast_arrow_body(body);
        } else {
            self.visit(body);
        }
    }

    /// `() => <T>expr`: the cast becomes `0||` so the body cannot turn into a block.
    fn visit_cast_arrow_body(&mut self, cast: Node<'_>) {
        let Some(expr) = last_named(cast) else {
            return;
        };
        self.buf
            .blank_replace_start_with_zero_or(cast.start_byte(), expr.start_byte());
        self.visit(expr);
    }
}
